use crate::errors::AppError;
use market_types::domain::offer::{NewOffer, Offer, OfferPatch};
use market_types::ports::OfferRepository;

pub struct OfferService<R> {
    repo: R,
}

impl<R: OfferRepository> OfferService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_offer(&self, new: NewOffer) -> Result<Offer, AppError> {
        let offer = self.repo.create_offer(new).await?;
        tracing::debug!(offer_id = offer.id, order_id = offer.order_id, "offer created");
        Ok(offer)
    }

    pub async fn get_offer(&self, id: i64) -> Result<Offer, AppError> {
        match self.repo.get_offer(id).await? {
            Some(o) => Ok(o),
            None => Err(AppError::NotFound(format!("offer {}", id))),
        }
    }

    pub async fn list_offers(&self) -> Result<Vec<Offer>, AppError> {
        Ok(self.repo.list_offers().await?)
    }

    pub async fn update_offer(&self, id: i64, patch: OfferPatch) -> Result<Offer, AppError> {
        match self.repo.update_offer(id, patch).await? {
            Some(o) => Ok(o),
            None => Err(AppError::NotFound(format!("offer {}", id))),
        }
    }

    pub async fn delete_offer(&self, id: i64) -> Result<(), AppError> {
        if self.repo.delete_offer(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("offer {}", id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_repo::memory::InMemoryRepo;

    #[tokio::test]
    async fn offer_for_missing_order_is_rejected() {
        let svc = OfferService::new(InMemoryRepo::new());
        let res = svc
            .create_offer(NewOffer {
                order_id: 1,
                executor_id: 1,
            })
            .await;
        assert!(matches!(res, Err(AppError::Conflict(_))));
        assert!(svc.list_offers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn not_found_paths() {
        let svc = OfferService::new(InMemoryRepo::new());
        assert!(matches!(svc.get_offer(3).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            svc.update_offer(3, OfferPatch::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(svc.delete_offer(3).await, Err(AppError::NotFound(_))));
    }
}
