#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use market_repo::sqlite::SqliteRepo;
use market_types::domain::offer::{NewOffer, OfferPatch};
use market_types::domain::order::{NewOrder, OrderPatch};
use market_types::domain::user::{NewUser, UserPatch};
use market_types::ports::{OfferRepository, OrderRepository, RepoError, UserRepository};
use std::path::PathBuf;

fn temp_db_url() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut path = PathBuf::from(dir.path());
    path.push("market.db");
    let url = format!("sqlite://{}", path.display());
    (dir, url)
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        first_name: "Test".into(),
        last_name: "User".into(),
        age: None,
        email: email.into(),
        role: "executor".into(),
        phone: Some("555-0100".into()),
    }
}

fn new_order(customer_id: i64) -> NewOrder {
    NewOrder {
        name: "Move boxes".into(),
        description: "Ten boxes, third floor".into(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 10),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 20),
        address: "3 High St".into(),
        price: 9000,
        customer_id,
        executor_id: None,
    }
}

#[tokio::test]
async fn sqlite_repo_crud_flow() {
    let (_dir, url) = temp_db_url();
    let repo = SqliteRepo::new(&url).await.unwrap();

    let user = repo.create_user(new_user("test@example.com")).await.unwrap();
    let fetched = repo.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(fetched, user);

    let order = repo.create_order(new_order(user.id)).await.unwrap();
    let fetched = repo.get_order(order.id).await.unwrap().unwrap();
    assert_eq!(fetched.start_date, NaiveDate::from_ymd_opt(2024, 1, 10));
    assert_eq!(fetched.end_date, NaiveDate::from_ymd_opt(2024, 1, 20));

    let updated = repo
        .update_order(
            order.id,
            OrderPatch {
                start_date: Some(NaiveDate::from_ymd_opt(2024, 2, 1)),
                end_date: Some(NaiveDate::from_ymd_opt(2024, 2, 15)),
                executor_id: Some(Some(user.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.end_date, NaiveDate::from_ymd_opt(2024, 2, 15));
    assert_eq!(repo.get_order(order.id).await.unwrap().unwrap(), updated);

    let offer = repo
        .create_offer(NewOffer {
            order_id: order.id,
            executor_id: user.id,
        })
        .await
        .unwrap();
    let moved = repo
        .update_offer(offer.id, OfferPatch::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved, offer);

    assert!(repo.delete_offer(offer.id).await.unwrap());
    assert!(repo.list_offers().await.unwrap().is_empty());
    assert!(repo.delete_order(order.id).await.unwrap());
    assert!(repo.delete_user(user.id).await.unwrap());
    assert!(repo.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn sqlite_repo_partial_update_keeps_other_columns() {
    let (_dir, url) = temp_db_url();
    let repo = SqliteRepo::new(&url).await.unwrap();
    let user = repo.create_user(new_user("keep@example.com")).await.unwrap();

    repo.update_user(
        user.id,
        UserPatch {
            age: Some(Some(41)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let stored = repo.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.age, Some(41));
    assert_eq!(stored.phone.as_deref(), Some("555-0100"));
    assert_eq!(stored.email, "keep@example.com");
}

#[tokio::test]
async fn sqlite_repo_rejects_duplicate_email() {
    let (_dir, url) = temp_db_url();
    let repo = SqliteRepo::new(&url).await.unwrap();
    repo.create_user(new_user("dup@example.com")).await.unwrap();
    let err = repo
        .create_user(new_user("dup@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Unique(_)), "got {err:?}");
    assert_eq!(repo.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sqlite_repo_enforces_foreign_keys() {
    let (_dir, url) = temp_db_url();
    let repo = SqliteRepo::new(&url).await.unwrap();
    let user = repo.create_user(new_user("fk@example.com")).await.unwrap();

    let err = repo
        .create_offer(NewOffer {
            order_id: 404,
            executor_id: user.id,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::ForeignKey(_)), "got {err:?}");

    repo.create_order(new_order(user.id)).await.unwrap();
    let err = repo.delete_user(user.id).await.unwrap_err();
    assert!(matches!(err, RepoError::ForeignKey(_)), "got {err:?}");
}

#[tokio::test]
async fn sqlite_repo_reopens_existing_file() {
    let (_dir, url) = temp_db_url();
    let repo = SqliteRepo::new(&url).await.unwrap();
    repo.create_user(new_user("persist@example.com")).await.unwrap();
    repo.close().await;

    let reopened = SqliteRepo::new(&url).await.unwrap();
    let users = reopened.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "persist@example.com");
}

#[tokio::test]
async fn sqlite_repo_handles_missing_rows() {
    let (_dir, url) = temp_db_url();
    let repo = SqliteRepo::new(&url).await.unwrap();

    assert!(repo.get_order(7).await.unwrap().is_none());
    let updated = repo.update_order(7, OrderPatch::default()).await.unwrap();
    assert!(updated.is_none());
    assert!(!repo.delete_user(7).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sqlite_repo_concurrent_updates_all_commit() {
    let (_dir, url) = temp_db_url();
    let repo = SqliteRepo::new(&url).await.unwrap();
    let shared_id = repo
        .create_user(new_user("shared@example.com"))
        .await
        .unwrap()
        .id;
    let mut distinct = Vec::new();
    for i in 0..20 {
        let user = repo
            .create_user(new_user(&format!("row{i}@example.com")))
            .await
            .unwrap();
        distinct.push(user.id);
    }

    let mut tasks = Vec::new();
    for age in 0..40 {
        let repo = repo.clone();
        tasks.push(tokio::spawn(async move {
            repo.update_user(
                shared_id,
                UserPatch {
                    age: Some(Some(age)),
                    ..Default::default()
                },
            )
            .await
        }));
    }
    for id in distinct.iter().copied() {
        let repo = repo.clone();
        tasks.push(tokio::spawn(async move {
            repo.update_user(
                id,
                UserPatch {
                    age: Some(Some(id)),
                    ..Default::default()
                },
            )
            .await
        }));
    }

    for task in tasks {
        let updated = task.await.unwrap();
        assert!(matches!(updated, Ok(Some(_))), "got {updated:?}");
    }

    let stored = repo.get_user(shared_id).await.unwrap().unwrap();
    assert!(matches!(stored.age, Some(age) if (0..40).contains(&age)));
    for id in distinct {
        let user = repo.get_user(id).await.unwrap().unwrap();
        assert_eq!(user.age, Some(id));
    }
}
