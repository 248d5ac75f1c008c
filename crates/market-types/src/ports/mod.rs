pub mod offer_repository;
pub mod order_repository;
pub mod user_repository;

pub use offer_repository::OfferRepository;
pub use order_repository::OrderRepository;
pub use user_repository::UserRepository;

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    /// A unique column (user email) already holds the value.
    #[error("unique constraint violated: {0}")]
    Unique(String),
    /// A referenced row is missing, or the row is still referenced.
    #[error("foreign key constraint violated: {0}")]
    ForeignKey(String),
    #[error("db error: {0}")]
    DbError(String),
}

/// Everything a storage adapter has to provide to back the API.
pub trait Repository: UserRepository + OrderRepository + OfferRepository {}

impl<T> Repository for T where T: UserRepository + OrderRepository + OfferRepository {}
