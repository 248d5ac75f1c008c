pub mod offer_service;
pub mod order_service;
pub mod user_service;

use std::sync::Arc;

use market_types::ports::Repository;
use offer_service::OfferService;
use order_service::OrderService;
use user_service::UserService;

/// One service per entity, all backed by clones of the same storage handle.
pub struct Services<R> {
    pub users: Arc<UserService<R>>,
    pub orders: Arc<OrderService<R>>,
    pub offers: Arc<OfferService<R>>,
}

impl<R: Repository + Clone> Services<R> {
    pub fn new(repo: R) -> Self {
        Self {
            users: Arc::new(UserService::new(repo.clone())),
            orders: Arc::new(OrderService::new(repo.clone())),
            offers: Arc::new(OfferService::new(repo)),
        }
    }
}

impl<R> Clone for Services<R> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            orders: self.orders.clone(),
            offers: self.offers.clone(),
        }
    }
}
