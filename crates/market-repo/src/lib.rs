#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use market_types::domain::offer::{NewOffer, Offer, OfferPatch};
use market_types::domain::order::{NewOrder, Order, OrderPatch};
use market_types::domain::user::{NewUser, User, UserPatch};
use market_types::ports::{OfferRepository, OrderRepository, RepoError, UserRepository};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://market.db";

/// The storage handle the server is built around. Opened once at startup,
/// cloned into each service, closed once at shutdown.
#[derive(Clone)]
pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteRepo),
}

pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(url).await
}

impl Repo {
    /// A URL selects SQLite; `None` selects the in-memory store when it is
    /// compiled in and the default SQLite file otherwise.
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        match database_url {
            #[cfg(feature = "sqlite")]
            Some(url) => Ok(Self::Sqlite(sqlite::SqliteRepo::new(url).await?)),
            #[cfg(not(feature = "sqlite"))]
            Some(url) => {
                tracing::warn!(url, "sqlite support not compiled in, using in-memory store");
                Ok(Self::Memory(memory::InMemoryRepo::new()))
            }
            #[cfg(feature = "memory")]
            None => Ok(Self::Memory(memory::InMemoryRepo::new())),
            #[cfg(not(feature = "memory"))]
            None => Ok(Self::Sqlite(
                sqlite::SqliteRepo::new(DEFAULT_DATABASE_URL).await?,
            )),
        }
    }

    pub async fn close(&self) {
        match self {
            #[cfg(feature = "memory")]
            Self::Memory(_) => {}
            #[cfg(feature = "sqlite")]
            Self::Sqlite(repo) => repo.close().await,
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $repo:ident => $call:expr) => {
        match $self {
            #[cfg(feature = "memory")]
            Repo::Memory($repo) => $call,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite($repo) => $call,
        }
    };
}

#[async_trait::async_trait]
impl UserRepository for Repo {
    async fn create_user(&self, new: NewUser) -> Result<User, RepoError> {
        dispatch!(self, repo => repo.create_user(new).await)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        dispatch!(self, repo => repo.get_user(id).await)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        dispatch!(self, repo => repo.list_users().await)
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, RepoError> {
        dispatch!(self, repo => repo.update_user(id, patch).await)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, RepoError> {
        dispatch!(self, repo => repo.delete_user(id).await)
    }
}

#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn create_order(&self, new: NewOrder) -> Result<Order, RepoError> {
        dispatch!(self, repo => repo.create_order(new).await)
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, RepoError> {
        dispatch!(self, repo => repo.get_order(id).await)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepoError> {
        dispatch!(self, repo => repo.list_orders().await)
    }

    async fn update_order(&self, id: i64, patch: OrderPatch) -> Result<Option<Order>, RepoError> {
        dispatch!(self, repo => repo.update_order(id, patch).await)
    }

    async fn delete_order(&self, id: i64) -> Result<bool, RepoError> {
        dispatch!(self, repo => repo.delete_order(id).await)
    }
}

#[async_trait::async_trait]
impl OfferRepository for Repo {
    async fn create_offer(&self, new: NewOffer) -> Result<Offer, RepoError> {
        dispatch!(self, repo => repo.create_offer(new).await)
    }

    async fn get_offer(&self, id: i64) -> Result<Option<Offer>, RepoError> {
        dispatch!(self, repo => repo.get_offer(id).await)
    }

    async fn list_offers(&self) -> Result<Vec<Offer>, RepoError> {
        dispatch!(self, repo => repo.list_offers().await)
    }

    async fn update_offer(&self, id: i64, patch: OfferPatch) -> Result<Option<Offer>, RepoError> {
        dispatch!(self, repo => repo.update_offer(id, patch).await)
    }

    async fn delete_offer(&self, id: i64) -> Result<bool, RepoError> {
        dispatch!(self, repo => repo.delete_offer(id).await)
    }
}
