use async_trait::async_trait;

use super::RepoError;
use crate::domain::offer::{NewOffer, Offer, OfferPatch};

#[async_trait]
pub trait OfferRepository: Send + Sync + 'static {
    async fn create_offer(&self, new: NewOffer) -> Result<Offer, RepoError>;
    async fn get_offer(&self, id: i64) -> Result<Option<Offer>, RepoError>;
    async fn list_offers(&self) -> Result<Vec<Offer>, RepoError>;
    async fn update_offer(&self, id: i64, patch: OfferPatch) -> Result<Option<Offer>, RepoError>;
    async fn delete_offer(&self, id: i64) -> Result<bool, RepoError>;
}
