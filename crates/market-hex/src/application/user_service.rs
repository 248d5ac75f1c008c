use crate::errors::AppError;
use market_types::domain::user::{NewUser, User, UserPatch};
use market_types::ports::UserRepository;

pub struct UserService<R> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_user(&self, new: NewUser) -> Result<User, AppError> {
        let user = self.repo.create_user(new).await?;
        tracing::debug!(user_id = user.id, "user created");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<User, AppError> {
        match self.repo.get_user(id).await? {
            Some(u) => Ok(u),
            None => Err(AppError::NotFound(format!("user {}", id))),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.repo.list_users().await?)
    }

    pub async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User, AppError> {
        match self.repo.update_user(id, patch).await? {
            Some(u) => Ok(u),
            None => Err(AppError::NotFound(format!("user {}", id))),
        }
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        if self.repo.delete_user(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("user {}", id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Alice".into(),
            last_name: "Smith".into(),
            age: Some(29),
            email: email.into(),
            role: "customer".into(),
            phone: Some("555-0101".into()),
        }
    }

    #[tokio::test]
    async fn create_and_list_keeps_all_fields() {
        let repo = market_repo::memory::InMemoryRepo::new();
        let svc = UserService::new(repo);
        let created = svc.create_user(new_user("alice@example.com")).await.unwrap();

        let list = svc.list_users().await.unwrap();
        assert_eq!(list, vec![created.clone()]);
        assert_eq!(created.first_name, "Alice");
        assert_eq!(created.age, Some(29));
        assert_eq!(created.phone.as_deref(), Some("555-0101"));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = market_repo::memory::InMemoryRepo::new();
        let svc = UserService::new(repo);
        svc.create_user(new_user("same@example.com")).await.unwrap();
        let res = svc.create_user(new_user("same@example.com")).await;
        assert!(matches!(res, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn partial_update_preserves_other_fields() {
        let repo = market_repo::memory::InMemoryRepo::new();
        let svc = UserService::new(repo);
        let user = svc.create_user(new_user("p@example.com")).await.unwrap();

        let updated = svc
            .update_user(
                user.id,
                UserPatch {
                    phone: Some(Some("555-0199".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("555-0199"));
        assert_eq!(updated.first_name, user.first_name);
        assert_eq!(updated.email, user.email);
        assert_eq!(svc.get_user(user.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn not_found_paths() {
        let repo = market_repo::memory::InMemoryRepo::new();
        let svc = UserService::new(repo);
        assert!(matches!(svc.get_user(1).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            svc.update_user(1, UserPatch::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(svc.delete_user(1).await, Err(AppError::NotFound(_))));
    }
}
