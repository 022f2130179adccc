//! Tests for the provided `rotate` and `count_active` methods, exercised through the mock store

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::repositories::token::{MockTokenRepository, TokenRepository};

fn record(user_id: Uuid, hash: &str) -> RefreshToken {
    RefreshToken::new(user_id, hash.to_string(), Utc::now(), Duration::days(14))
}

#[tokio::test]
async fn test_rotate_revokes_then_appends() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();
    let old = repo.append(record(user_id, "old")).await.unwrap();

    let now = Utc::now();
    let rotated = repo.rotate(old.id, now, record(user_id, "new")).await.unwrap();
    assert!(rotated);

    let tokens = repo.find_by_user(user_id).await.unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].revoked_at, Some(now));
    assert!(tokens[1].is_active(now));
    assert_eq!(repo.count_active(user_id, now).await.unwrap(), 1);
}

#[tokio::test]
async fn test_rotate_of_revoked_record_appends_nothing() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();
    let old = repo.append(record(user_id, "old")).await.unwrap();
    let now = Utc::now();

    assert!(repo.mark_revoked(old.id, now).await.unwrap());
    assert!(!repo.rotate(old.id, now, record(user_id, "new")).await.unwrap());

    let tokens = repo.find_by_user(user_id).await.unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(repo.count_active(user_id, now).await.unwrap(), 0);
}

#[tokio::test]
async fn test_append_rejects_duplicate_hash() {
    let repo = MockTokenRepository::new();
    repo.append(record(Uuid::new_v4(), "same")).await.unwrap();

    let result = repo.append(record(Uuid::new_v4(), "same")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_find_active_is_scoped_to_owner() {
    let repo = MockTokenRepository::new();
    let owner = Uuid::new_v4();
    repo.append(record(owner, "h1")).await.unwrap();
    let now = Utc::now();

    assert_eq!(repo.find_active(owner, "h1", now).await.unwrap().len(), 1);
    assert!(repo.find_active(Uuid::new_v4(), "h1", now).await.unwrap().is_empty());
    assert!(repo
        .find_active(owner, "h1", now + Duration::days(14))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_unavailable_store_returns_error() {
    let repo = MockTokenRepository::new();
    repo.set_unavailable(true);

    assert!(repo.find_by_user(Uuid::new_v4()).await.is_err());
    assert_eq!(repo.call_count(), 1);
}
