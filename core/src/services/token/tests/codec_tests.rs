use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Duration;
use uuid::Uuid;

use crate::errors::AuthError;
use crate::services::clock::ManualClock;
use crate::services::token::{TokenCodec, TokenCodecConfig, TokenKeyError, TOKEN_KEY_LEN};

fn key(fill: u8) -> String {
    BASE64.encode([fill; TOKEN_KEY_LEN])
}

fn codec_with_clock() -> (TokenCodec, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_now());
    let codec = TokenCodec::new(
        TokenCodecConfig::new(key(0x11), key(0x22)),
        clock.clone(),
    )
    .unwrap();
    (codec, clock)
}

#[test]
fn test_access_token_round_trip() {
    let (codec, _clock) = codec_with_clock();
    let user_id = Uuid::new_v4();
    let session_id = Uuid::new_v4();

    let token = codec.mint_access(user_id, session_id, 900).unwrap();
    let claims = codec.verify_access(&token).unwrap();

    assert_eq!(claims.user_id, user_id);
    assert_eq!(claims.session_id, session_id);
}

#[test]
fn test_refresh_token_round_trip() {
    let (codec, _clock) = codec_with_clock();
    let session_id = Uuid::new_v4();

    let token = codec.mint_refresh(session_id, 4, 604_800).unwrap();
    let claims = codec.verify_refresh(&token).unwrap();

    assert_eq!(claims.session_id, session_id);
    assert_eq!(claims.version, 4);
}

#[test]
fn test_kinds_never_cross_verify() {
    let (codec, _clock) = codec_with_clock();

    let access = codec
        .mint_access(Uuid::new_v4(), Uuid::new_v4(), 900)
        .unwrap();
    let refresh = codec.mint_refresh(Uuid::new_v4(), 1, 900).unwrap();

    assert_eq!(
        codec.verify_refresh(&access),
        Err(AuthError::InvalidToken)
    );
    assert_eq!(codec.verify_access(&refresh), Err(AuthError::InvalidToken));
}

#[test]
fn test_expired_token_is_rejected() {
    let (codec, clock) = codec_with_clock();

    let token = codec
        .mint_access(Uuid::new_v4(), Uuid::new_v4(), 900)
        .unwrap();
    assert!(codec.verify_access(&token).is_ok());

    clock.advance(Duration::seconds(901));
    assert_eq!(codec.verify_access(&token), Err(AuthError::ExpiredToken));
}

#[test]
fn test_tampered_token_is_rejected() {
    let (codec, _clock) = codec_with_clock();

    let token = codec
        .mint_access(Uuid::new_v4(), Uuid::new_v4(), 900)
        .unwrap();

    // Flip a character somewhere past the nonce prefix
    let mut bytes = token.into_bytes();
    let idx = bytes.len() / 2;
    bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(bytes).unwrap();

    assert_eq!(
        codec.verify_access(&tampered),
        Err(AuthError::InvalidToken)
    );
}

#[test]
fn test_garbage_inputs_are_rejected() {
    let (codec, _clock) = codec_with_clock();

    for garbage in ["", "not-a-token", "!!!!", "AAAA"] {
        assert_eq!(
            codec.verify_access(garbage),
            Err(AuthError::InvalidToken),
            "input {:?} should be rejected",
            garbage
        );
    }
}

#[test]
fn test_token_from_other_key_is_rejected() {
    let clock = Arc::new(ManualClock::starting_now());
    let codec_a = TokenCodec::new(
        TokenCodecConfig::new(key(0x11), key(0x22)),
        clock.clone(),
    )
    .unwrap();
    let codec_b = TokenCodec::new(
        TokenCodecConfig::new(key(0x33), key(0x44)),
        clock.clone(),
    )
    .unwrap();

    let token = codec_a
        .mint_access(Uuid::new_v4(), Uuid::new_v4(), 900)
        .unwrap();

    assert_eq!(codec_b.verify_access(&token), Err(AuthError::InvalidToken));
}

#[test]
fn test_short_key_is_a_construction_error() {
    let clock = Arc::new(ManualClock::starting_now());
    let short = BASE64.encode([0u8; 16]);

    let result = TokenCodec::new(TokenCodecConfig::new(short, key(0x22)), clock);

    assert_eq!(
        result.err(),
        Some(TokenKeyError::InvalidLength {
            kind: "access",
            expected: TOKEN_KEY_LEN,
            actual: 16,
        })
    );
}

#[test]
fn test_non_base64_key_is_a_construction_error() {
    let clock = Arc::new(ManualClock::starting_now());

    let result = TokenCodec::new(
        TokenCodecConfig::new(key(0x11), "*** not base64 ***"),
        clock,
    );

    assert_eq!(
        result.err(),
        Some(TokenKeyError::InvalidEncoding { kind: "refresh" })
    );
}
