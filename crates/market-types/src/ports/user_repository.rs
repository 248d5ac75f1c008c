use async_trait::async_trait;

use super::RepoError;
use crate::domain::user::{NewUser, User, UserPatch};

#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn create_user(&self, new: NewUser) -> Result<User, RepoError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError>;
    async fn list_users(&self) -> Result<Vec<User>, RepoError>;
    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, RepoError>;
    async fn delete_user(&self, id: i64) -> Result<bool, RepoError>;
}
