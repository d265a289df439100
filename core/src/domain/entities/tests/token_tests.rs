use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{AccessClaims, RefreshClaims};
use crate::errors::AuthError;

#[test]
fn test_access_claims_expiry_bounds() {
    let now = Utc::now();
    let claims = AccessClaims::new(Uuid::new_v4(), Uuid::new_v4(), 900, now);

    assert_eq!(claims.iat, now.timestamp());
    assert_eq!(claims.exp, (now + Duration::seconds(900)).timestamp());
    assert!(!claims.is_expired(now));
    assert!(claims.is_expired(now + Duration::seconds(900)));
}

#[test]
fn test_access_claims_validate() {
    let now = Utc::now();
    let claims = AccessClaims::new(Uuid::new_v4(), Uuid::new_v4(), 900, now);

    assert!(claims.validate(now).is_ok());
    assert_eq!(
        claims.validate(now + Duration::seconds(901)),
        Err(AuthError::ExpiredToken)
    );
}

#[test]
fn test_refresh_claims_carry_session_version() {
    let now = Utc::now();
    let session_id = Uuid::new_v4();
    let claims = RefreshClaims::new(session_id, 3, 604_800, now);

    assert_eq!(claims.session_id, session_id);
    assert_eq!(claims.version, 3);
    assert!(claims.validate(now).is_ok());
}

#[test]
fn test_claims_serialization_round_trip() {
    let claims = RefreshClaims::new(Uuid::new_v4(), 7, 3_600, Utc::now());

    let json = serde_json::to_string(&claims).unwrap();
    let decoded: RefreshClaims = serde_json::from_str(&json).unwrap();

    assert_eq!(claims, decoded);
}
