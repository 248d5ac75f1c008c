use crate::errors::AppError;
use market_types::domain::order::{NewOrder, Order, OrderPatch};
use market_types::ports::OrderRepository;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_order(&self, new: NewOrder) -> Result<Order, AppError> {
        let order = self.repo.create_order(new).await?;
        tracing::debug!(order_id = order.id, customer_id = order.customer_id, "order created");
        Ok(order)
    }

    pub async fn get_order(&self, id: i64) -> Result<Order, AppError> {
        match self.repo.get_order(id).await? {
            Some(o) => Ok(o),
            None => Err(AppError::NotFound(format!("order {}", id))),
        }
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.repo.list_orders().await?)
    }

    /// Each date comes from its own field of the patch; the end date is never
    /// derived from the start date.
    pub async fn update_order(&self, id: i64, patch: OrderPatch) -> Result<Order, AppError> {
        match self.repo.update_order(id, patch).await? {
            Some(o) => Ok(o),
            None => Err(AppError::NotFound(format!("order {}", id))),
        }
    }

    pub async fn delete_order(&self, id: i64) -> Result<(), AppError> {
        if self.repo.delete_order(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("order {}", id)))
        }
    }
}
