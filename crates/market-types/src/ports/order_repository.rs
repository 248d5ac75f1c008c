use async_trait::async_trait;

use super::RepoError;
use crate::domain::order::{NewOrder, Order, OrderPatch};

#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    async fn create_order(&self, new: NewOrder) -> Result<Order, RepoError>;
    async fn get_order(&self, id: i64) -> Result<Option<Order>, RepoError>;
    async fn list_orders(&self) -> Result<Vec<Order>, RepoError>;
    async fn update_order(&self, id: i64, patch: OrderPatch) -> Result<Option<Order>, RepoError>;
    async fn delete_order(&self, id: i64) -> Result<bool, RepoError>;
}
