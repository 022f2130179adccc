//! Unit tests for the token lifecycle service

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use tg_shared::config::auth::JwtConfig;

use crate::domain::entities::token::RefreshToken;
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::clock::{Clock, ManualClock};
use crate::services::lifecycle::{LifecycleConfig, TokenLifecycleService};
use crate::services::token::{AccessTokenCodec, ExpiryPolicy, RefreshTokenGenerator};

use super::mocks::{MockCredentialVerifier, MockTokenRepository, MockUserRepository};

const EMAIL: &str = "a@x.com";
const PASSWORD: &str = "correct";

type Service = TokenLifecycleService<
    MockUserRepository,
    MockTokenRepository,
    MockCredentialVerifier,
    ManualClock,
>;

struct Harness {
    service: Arc<Service>,
    users: Arc<MockUserRepository>,
    tokens: Arc<MockTokenRepository>,
    verifier: Arc<MockCredentialVerifier>,
    clock: Arc<ManualClock>,
    codec: AccessTokenCodec,
    user: User,
}

impl Harness {
    fn store_calls(&self) -> usize {
        self.users.call_count() + self.tokens.call_count()
    }

    fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

fn jwt_config() -> JwtConfig {
    JwtConfig::new("lifecycle-test-secret-of-32-bytes-minimum").with_access_expiry_minutes(15)
}

fn harness_with(config: LifecycleConfig) -> Harness {
    let user = User::new(EMAIL, "Ada", "Lovelace", MockCredentialVerifier::hash_of(PASSWORD));
    let users = Arc::new(MockUserRepository::with_user(user.clone()));
    let tokens = Arc::new(MockTokenRepository::new());
    let verifier = Arc::new(MockCredentialVerifier::new());
    let clock = Arc::new(ManualClock::new(start()));
    let codec = AccessTokenCodec::new(&jwt_config()).unwrap();

    let service = Arc::new(TokenLifecycleService::with_clock(
        users.clone(),
        tokens.clone(),
        verifier.clone(),
        codec.clone(),
        config,
        clock.clone(),
    ));

    Harness {
        service,
        users,
        tokens,
        verifier,
        clock,
        codec,
        user,
    }
}

fn harness() -> Harness {
    harness_with(LifecycleConfig::default())
}

fn is_invalid_token(result: &Result<impl std::fmt::Debug, DomainError>) -> bool {
    matches!(result, Err(DomainError::Token(TokenError::InvalidToken)))
}

fn is_invalid_credentials(result: &Result<impl std::fmt::Debug, DomainError>) -> bool {
    matches!(result, Err(DomainError::Auth(AuthError::InvalidCredentials)))
}

#[tokio::test]
async fn test_login_issues_token_pair() {
    let h = harness();

    let response = h.service.login(EMAIL, PASSWORD).await.unwrap();

    assert_eq!(response.id, h.user.id);
    assert_eq!(response.email, EMAIL);
    assert_eq!(response.first_name, "Ada");
    assert_eq!(response.last_name, "Lovelace");
    assert_eq!(response.expires_in, 900);
    assert_eq!(response.refresh_token_expiration, start() + Duration::days(14));
    assert_eq!(
        h.codec.validate(&response.token, start(), ExpiryPolicy::Enforce),
        Some(h.user.id)
    );

    let records = h.tokens.all().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_id, h.user.id);
    assert_eq!(records[0].created_at, start());
    assert_eq!(records[0].token_hash, RefreshTokenGenerator::hash(&response.refresh_token));
    assert_ne!(records[0].token_hash, response.refresh_token);
}

#[tokio::test]
async fn test_login_matches_email_case_insensitively() {
    let h = harness();

    let response = h.service.login("  A@X.COM ", PASSWORD).await.unwrap();
    assert_eq!(response.id, h.user.id);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let h = harness();

    let unknown = h.service.login("nobody@x.com", PASSWORD).await;
    let wrong = h.service.login(EMAIL, "incorrect").await;

    assert!(is_invalid_credentials(&unknown));
    assert!(is_invalid_credentials(&wrong));
    assert_eq!(
        unknown.unwrap_err().to_string(),
        wrong.unwrap_err().to_string()
    );
    assert!(h.tokens.all().await.is_empty());
}

#[tokio::test]
async fn test_unknown_email_costs_one_verification() {
    let h = harness();

    let before = h.verifier.call_count();
    let unknown = h.service.login("nobody@x.com", PASSWORD).await;
    let unknown_calls = h.verifier.call_count() - before;

    let before = h.verifier.call_count();
    let wrong = h.service.login(EMAIL, "incorrect").await;
    let wrong_calls = h.verifier.call_count() - before;

    assert!(is_invalid_credentials(&unknown));
    assert!(is_invalid_credentials(&wrong));
    assert_eq!(unknown_calls, 1);
    assert_eq!(unknown_calls, wrong_calls);
}

#[tokio::test]
async fn test_unknown_email_hashes_decoy_once() {
    let h = harness();

    for _ in 0..3 {
        let result = h.service.login("nobody@x.com", PASSWORD).await;
        assert!(is_invalid_credentials(&result));
    }

    assert_eq!(h.verifier.call_count(), 3);
    assert_eq!(h.verifier.hash_count(), 1);
}

#[tokio::test]
async fn test_verifier_failure_on_unknown_email_is_service_unavailable() {
    let h = harness();
    h.verifier.set_unavailable(true);

    let result = h.service.login("nobody@x.com", PASSWORD).await;

    assert!(matches!(result, Err(DomainError::ServiceUnavailable { .. })));
}

#[tokio::test]
async fn test_login_with_empty_credentials_touches_nothing() {
    let h = harness();

    assert!(is_invalid_credentials(&h.service.login("", PASSWORD).await));
    assert!(is_invalid_credentials(&h.service.login("   ", PASSWORD).await));
    assert!(is_invalid_credentials(&h.service.login(EMAIL, "").await));

    assert_eq!(h.store_calls(), 0);
    assert_eq!(h.verifier.call_count(), 0);
}

#[tokio::test]
async fn test_login_refresh_replay_scenario() {
    let h = harness();
    let p1 = h.service.login(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(p1.refresh_token_expiration, start() + Duration::days(14));

    h.clock.advance(Duration::minutes(5));
    let p2 = h.service.refresh(&p1.token, &p1.refresh_token).await.unwrap();

    assert_ne!(p2.token, p1.token);
    assert_ne!(p2.refresh_token, p1.refresh_token);
    assert_eq!(p2.id, h.user.id);
    assert_eq!(
        p2.refresh_token_expiration,
        start() + Duration::minutes(5) + Duration::days(14)
    );

    let records = h.tokens.all().await;
    let old_hash = RefreshTokenGenerator::hash(&p1.refresh_token);
    let old = records.iter().find(|t| t.token_hash == old_hash).unwrap();
    assert_eq!(old.revoked_at, Some(start() + Duration::minutes(5)));

    let replay = h.service.refresh(&p1.token, &p1.refresh_token).await;
    assert!(is_invalid_token(&replay));

    // The replacement keeps working
    let p3 = h.service.refresh(&p2.token, &p2.refresh_token).await.unwrap();
    assert_ne!(p3.refresh_token, p2.refresh_token);
}

#[tokio::test]
async fn test_refresh_with_tampered_access_token_skips_store() {
    let h = harness();
    let p1 = h.service.login(EMAIL, PASSWORD).await.unwrap();
    let calls_before = h.store_calls();

    let (head, signature) = p1.token.rsplit_once('.').unwrap();
    let mut chars: Vec<char> = signature.chars().collect();
    let mid = chars.len() / 2;
    chars[mid] = if chars[mid] == 'A' { 'B' } else { 'A' };
    let tampered = format!("{}.{}", head, chars.into_iter().collect::<String>());

    let result = h.service.refresh(&tampered, &p1.refresh_token).await;

    assert!(is_invalid_token(&result));
    assert_eq!(h.store_calls(), calls_before);
}

#[tokio::test]
async fn test_refresh_accepts_expired_access_token_when_allowed() {
    let h = harness();
    let p1 = h.service.login(EMAIL, PASSWORD).await.unwrap();

    h.clock.advance(Duration::hours(3));
    let p2 = h.service.refresh(&p1.token, &p1.refresh_token).await.unwrap();

    assert_eq!(p2.id, h.user.id);
}

#[tokio::test]
async fn test_refresh_rejects_expired_access_token_when_enforced() {
    let h = harness_with(LifecycleConfig {
        accept_expired_access_tokens: false,
        ..LifecycleConfig::default()
    });
    let p1 = h.service.login(EMAIL, PASSWORD).await.unwrap();

    h.clock.advance(Duration::minutes(14));
    let p2 = h.service.refresh(&p1.token, &p1.refresh_token).await.unwrap();

    h.clock.advance(Duration::minutes(15));
    let calls_before = h.store_calls();
    let result = h.service.refresh(&p2.token, &p2.refresh_token).await;

    assert!(is_invalid_token(&result));
    assert_eq!(h.store_calls(), calls_before);
}

#[tokio::test]
async fn test_refresh_rejects_expired_refresh_token() {
    let h = harness();
    let p1 = h.service.login(EMAIL, PASSWORD).await.unwrap();

    h.clock.advance(Duration::days(14));
    let result = h.service.refresh(&p1.token, &p1.refresh_token).await;

    assert!(is_invalid_token(&result));
}

#[tokio::test]
async fn test_refresh_only_revokes_the_redeemed_record() {
    let h = harness();
    let phone = h.service.login(EMAIL, PASSWORD).await.unwrap();
    let laptop = h.service.login(EMAIL, PASSWORD).await.unwrap();

    h.service.refresh(&phone.token, &phone.refresh_token).await.unwrap();

    let now = h.clock_now();
    let laptop_hash = RefreshTokenGenerator::hash(&laptop.refresh_token);
    let active = h.tokens.find_active(h.user.id, &laptop_hash, now).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(h.tokens.count_active(h.user.id, now).await.unwrap(), 2);

    h.service.refresh(&laptop.token, &laptop.refresh_token).await.unwrap();
}

#[tokio::test]
async fn test_refresh_token_of_another_user_is_rejected() {
    let h = harness();
    let other = User::new("b@x.com", "Bob", "Builder", MockCredentialVerifier::hash_of("pw"));
    h.users.create(other.clone()).await.unwrap();

    let ours = h.service.login(EMAIL, PASSWORD).await.unwrap();
    let theirs = h.service.login("b@x.com", "pw").await.unwrap();

    let result = h.service.refresh(&ours.token, &theirs.refresh_token).await;
    assert!(is_invalid_token(&result));

    // Bob's token is still redeemable by Bob
    let bob = h.service.refresh(&theirs.token, &theirs.refresh_token).await.unwrap();
    assert_eq!(bob.id, other.id);
}

#[tokio::test]
async fn test_refresh_for_unknown_user_is_rejected() {
    let h = harness();
    let p1 = h.service.login(EMAIL, PASSWORD).await.unwrap();

    let stranger = h.codec.issue(Uuid::new_v4(), start()).unwrap();
    let result = h.service.refresh(&stranger.token, &p1.refresh_token).await;

    assert!(is_invalid_token(&result));
}

#[tokio::test]
async fn test_refresh_with_unknown_or_empty_refresh_token_is_rejected() {
    let h = harness();
    let p1 = h.service.login(EMAIL, PASSWORD).await.unwrap();
    let unknown = RefreshTokenGenerator::new().generate();

    assert!(is_invalid_token(&h.service.refresh(&p1.token, &unknown).await));
    assert!(is_invalid_token(&h.service.refresh(&p1.token, "").await));
    assert!(is_invalid_token(&h.service.refresh("", &p1.refresh_token).await));
}

#[tokio::test]
async fn test_duplicate_active_records_are_an_integrity_fault() {
    let h = harness();
    let p1 = h.service.login(EMAIL, PASSWORD).await.unwrap();
    let hash = RefreshTokenGenerator::hash(&p1.refresh_token);
    h.tokens
        .seed(RefreshToken::new(h.user.id, hash.clone(), start(), Duration::days(14)))
        .await;

    let result = h.service.refresh(&p1.token, &p1.refresh_token).await;

    assert!(is_invalid_token(&result));
    let records = h.tokens.all().await;
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|t| t.revoked_at.is_none()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redemption_has_one_winner() {
    let h = harness();
    let p1 = h.service.login(EMAIL, PASSWORD).await.unwrap();

    let attempts: Vec<_> = (0..8)
        .map(|_| {
            let service = h.service.clone();
            let access = p1.token.clone();
            let refresh = p1.refresh_token.clone();
            tokio::spawn(async move { service.refresh(&access, &refresh).await })
        })
        .collect();

    let mut successes = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert!(matches!(e, DomainError::Token(TokenError::InvalidToken))),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(h.tokens.all().await.len(), 2);
}

#[tokio::test]
async fn test_store_failure_is_service_unavailable() {
    let h = harness();
    let p1 = h.service.login(EMAIL, PASSWORD).await.unwrap();

    h.tokens.set_unavailable(true);
    let login = h.service.login(EMAIL, PASSWORD).await;
    let refresh = h.service.refresh(&p1.token, &p1.refresh_token).await;
    assert!(matches!(login, Err(DomainError::ServiceUnavailable { .. })));
    assert!(matches!(refresh, Err(DomainError::ServiceUnavailable { .. })));

    h.tokens.set_unavailable(false);
    h.users.set_unavailable(true);
    let login = h.service.login(EMAIL, PASSWORD).await;
    assert!(matches!(login, Err(DomainError::ServiceUnavailable { .. })));
}

#[tokio::test]
async fn test_verifier_failure_is_service_unavailable() {
    let h = harness();
    h.verifier.set_unavailable(true);

    let result = h.service.login(EMAIL, PASSWORD).await;

    assert!(matches!(result, Err(DomainError::ServiceUnavailable { .. })));
    assert!(!result.unwrap_err().is_authentication_failure());
}
