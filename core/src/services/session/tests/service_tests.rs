use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::user::{Role, User};
use crate::errors::AuthError;
use crate::repositories::{MockSessionRepository, MockUserRepository};
use crate::services::clock::ManualClock;
use crate::services::session::SessionService;
use crate::services::token::{TokenCodec, TokenCodecConfig, TOKEN_KEY_LEN};

const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;

struct Harness {
    service: SessionService<MockSessionRepository>,
    repo: MockSessionRepository,
    codec: TokenCodec,
    clock: Arc<ManualClock>,
    user_id: Uuid,
}

async fn harness() -> Harness {
    let clock = Arc::new(ManualClock::starting_now());

    let users = MockUserRepository::new();
    let user_id = Uuid::new_v4();
    users
        .insert(User {
            id: user_id,
            username: "finch".to_string(),
            first_name: "Finch".to_string(),
            last_name: "Ibara".to_string(),
            email: "finch@example.com".to_string(),
            password_hash: String::new(),
            is_active: true,
            role: Role {
                name: "user".to_string(),
                level: 1,
            },
            created_at: Utc::now(),
        })
        .await;

    let repo = MockSessionRepository::new(users.users_handle());
    let service = SessionService::new(repo.clone(), clock.clone());

    let codec = TokenCodec::new(
        TokenCodecConfig::new(
            BASE64.encode([0x0a; TOKEN_KEY_LEN]),
            BASE64.encode([0x0b; TOKEN_KEY_LEN]),
        ),
        clock.clone(),
    )
    .unwrap();

    Harness {
        service,
        repo,
        codec,
        clock,
        user_id,
    }
}

#[tokio::test]
async fn test_validate_unknown_session_is_invalid() {
    let h = harness().await;

    let result = h.service.validate_session(Uuid::new_v4(), 1).await;

    assert_eq!(result.err(), Some(AuthError::SessionInvalid));
}

#[tokio::test]
async fn test_validate_returns_session_user_and_extension_flag() {
    let h = harness().await;
    let session = h
        .service
        .create_session(h.user_id, "ua", "ip", WEEK, true, MONTH)
        .await
        .unwrap();

    let (found, user, can_extend) = h.service.validate_session(session.id, 1).await.unwrap();

    assert_eq!(found.id, session.id);
    assert_eq!(user.id, h.user_id);
    assert!(can_extend);
}

#[tokio::test]
async fn test_non_remember_session_is_never_extendable() {
    let h = harness().await;
    let session = h
        .service
        .create_session(h.user_id, "ua", "ip", HOUR, false, MONTH)
        .await
        .unwrap();

    let (_, _, can_extend) = h.service.validate_session(session.id, 1).await.unwrap();
    assert!(!can_extend);

    let result = h.service.extend_session(&session, &h.codec, WEEK).await;
    assert_eq!(result.err(), Some(AuthError::SessionNotExtendable));
}

#[tokio::test]
async fn test_expired_session_is_deleted_on_validation() {
    let h = harness().await;
    let session = h
        .service
        .create_session(h.user_id, "ua", "ip", HOUR, false, 0)
        .await
        .unwrap();

    h.clock.advance(Duration::seconds(HOUR + 1));

    let result = h.service.validate_session(session.id, 1).await;

    assert_eq!(result.err(), Some(AuthError::SessionInvalid));
    assert!(h.repo.get(session.id).await.is_none());
}

#[tokio::test]
async fn test_version_counts_extensions() {
    let h = harness().await;
    let session = h
        .service
        .create_session(h.user_id, "ua", "ip", WEEK, true, MONTH)
        .await
        .unwrap();

    for n in 1..=3 {
        let (current, _, can_extend) = h
            .service
            .validate_session(session.id, n)
            .await
            .unwrap();
        assert!(can_extend);
        h.service
            .extend_session(&current, &h.codec, WEEK)
            .await
            .unwrap();
    }

    let stored = h.repo.get(session.id).await.unwrap();
    assert_eq!(stored.version, 1 + 3);
}

#[tokio::test]
async fn test_stale_version_is_rejected_even_though_token_decrypts() {
    let h = harness().await;
    let session = h
        .service
        .create_session(h.user_id, "ua", "ip", WEEK, true, MONTH)
        .await
        .unwrap();

    // Token minted against version 1, captured by an attacker
    let captured = h.codec.mint_refresh(session.id, 1, WEEK).unwrap();

    // Legitimate refresh rotates the session to version 2
    h.service
        .extend_session(&session, &h.codec, WEEK)
        .await
        .unwrap();

    // The captured token still decrypts fine
    let claims = h.codec.verify_refresh(&captured).unwrap();
    assert_eq!(claims.version, 1);

    // But the session no longer accepts its version
    let result = h
        .service
        .validate_session(claims.session_id, claims.version)
        .await;
    assert_eq!(result.err(), Some(AuthError::SessionInvalid));
}

#[tokio::test]
async fn test_extension_never_passes_the_renewal_ceiling() {
    let h = harness().await;
    let session = h
        .service
        .create_session(h.user_id, "ua", "ip", HOUR, true, 2 * DAY)
        .await
        .unwrap();
    let ceiling = session.max_renewal_time();

    // A week-long renewal request must clamp to created_at + 2 days
    h.service
        .extend_session(&session, &h.codec, WEEK)
        .await
        .unwrap();

    let stored = h.repo.get(session.id).await.unwrap();
    assert_eq!(stored.expires_at, ceiling);
}

#[tokio::test]
async fn test_exhausted_renewal_deletes_the_session() {
    let h = harness().await;
    let session = h
        .service
        .create_session(h.user_id, "ua", "ip", HOUR, true, 2 * DAY)
        .await
        .unwrap();

    // Push the expiry to the ceiling
    h.service
        .extend_session(&session, &h.codec, WEEK)
        .await
        .unwrap();

    // The next validation finds the cap exhausted
    let result = h.service.validate_session(session.id, 2).await;

    assert_eq!(result.err(), Some(AuthError::SessionInvalid));
    assert!(h.repo.get(session.id).await.is_none());
}

#[tokio::test]
async fn test_extension_from_stale_snapshot_conflicts() {
    let h = harness().await;
    let session = h
        .service
        .create_session(h.user_id, "ua", "ip", WEEK, true, MONTH)
        .await
        .unwrap();

    // Two callers read the session at version 1
    let snapshot_a = session.clone();
    let snapshot_b = session;

    // First extension wins
    h.service
        .extend_session(&snapshot_a, &h.codec, WEEK)
        .await
        .unwrap();

    // Second extension from the same version loses the race
    let result = h.service.extend_session(&snapshot_b, &h.codec, WEEK).await;
    assert_eq!(result.err(), Some(AuthError::ExtensionConflict));

    // The winner's increment is the only one applied
    let stored = h.repo.get(snapshot_a.id).await.unwrap();
    assert_eq!(stored.version, 2);
}

#[tokio::test]
async fn test_invalidated_session_never_resurrects() {
    let h = harness().await;
    let session = h
        .service
        .create_session(h.user_id, "ua", "ip", WEEK, true, MONTH)
        .await
        .unwrap();
    let token = h.codec.mint_refresh(session.id, 1, WEEK).unwrap();

    h.service.invalidate(session.id).await.unwrap();

    // Cryptographically the token is still fine
    let claims = h.codec.verify_refresh(&token).unwrap();

    // Structurally it is dead
    let result = h
        .service
        .validate_session(claims.session_id, claims.version)
        .await;
    assert_eq!(result.err(), Some(AuthError::SessionInvalid));
}

#[tokio::test]
async fn test_store_failures_surface_as_lookup_not_denial() {
    let h = harness().await;
    let session = h
        .service
        .create_session(h.user_id, "ua", "ip", WEEK, true, MONTH)
        .await
        .unwrap();

    h.repo.set_fail(true);

    match h.service.validate_session(session.id, 1).await {
        Err(AuthError::Lookup { .. }) => {}
        other => panic!("expected Lookup error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_touch_last_used_is_best_effort() {
    let h = harness().await;
    let session = h
        .service
        .create_session(h.user_id, "ua", "ip", WEEK, true, MONTH)
        .await
        .unwrap();

    // Does not fail even when the store is down
    h.repo.set_fail(true);
    h.service.touch_last_used(session.id).await;
    h.repo.set_fail(false);

    h.service.touch_last_used(session.id).await;
    let stored = h.repo.get(session.id).await.unwrap();
    assert!(stored.last_used_at.is_some());
}
