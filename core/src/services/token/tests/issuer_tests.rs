//! Unit tests for the token issuer

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

use crate::domain::entities::session::{Claims, TokenKind};
use crate::errors::{DomainError, TokenError};
use crate::services::token::{TokenIssuer, TokenServiceConfig};

fn create_issuer() -> TokenIssuer {
    TokenIssuer::new(&TokenServiceConfig::default())
}

#[test]
fn test_issue_and_verify_access_token() {
    let issuer = create_issuer();
    let user_id = Uuid::new_v4();

    let token = issuer.issue_access_token(user_id, Utc::now()).unwrap();
    let claims = issuer.verify_access_token(&token).unwrap();

    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.kind, TokenKind::Access);
}

#[test]
fn test_verify_garbage_token() {
    let issuer = create_issuer();
    let result = issuer.verify_access_token("not_a_jwt");

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::InvalidTokenFormat)
    ));
}

#[test]
fn test_verify_token_signed_with_other_key() {
    let issuer = create_issuer();
    let claims = Claims::new_access_token(Uuid::new_v4(), Utc::now(), 15);
    let forged = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let result = issuer.verify_access_token(&forged);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::InvalidSignature)
    ));
}

#[test]
fn test_verify_expired_token() {
    let issuer = create_issuer();
    let config = TokenServiceConfig::default();

    // Valid signature, but issued far enough in the past that its expiry
    // (and the default decoding leeway) has elapsed
    let mut claims = Claims::new_access_token(Uuid::new_v4(), Utc::now(), 15);
    claims.exp = Utc::now().timestamp() - 600;
    let stale = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap();

    let result = issuer.verify_access_token(&stale);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::TokenExpired)
    ));
}

#[test]
fn test_verify_rejects_wrong_kind() {
    let issuer = create_issuer();
    let config = TokenServiceConfig::default();

    // A correctly signed token claiming to be a refresh credential must
    // never pass where an access token is required
    let mut claims = Claims::new_access_token(Uuid::new_v4(), Utc::now(), 15);
    claims.kind = TokenKind::Refresh;
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap();

    let result = issuer.verify_access_token(&token);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::WrongTokenKind)
    ));
}

#[test]
fn test_generate_secret_entropy_and_hash() {
    let issuer = create_issuer();

    let (raw, hash) = issuer.generate_secret();

    // 32 bytes hex-encoded
    assert_eq!(raw.len(), 64);
    assert!(raw.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(hash, TokenIssuer::hash_secret(&raw));
    // The stored form never contains the raw secret
    assert_ne!(raw, hash);
}

#[test]
fn test_generated_secrets_are_unique() {
    let issuer = create_issuer();

    let (a, _) = issuer.generate_secret();
    let (b, _) = issuer.generate_secret();

    assert_ne!(a, b);
}

#[test]
fn test_hash_secret_is_deterministic() {
    let hashes: Vec<String> = (0..5)
        .map(|_| TokenIssuer::hash_secret("the_same_secret"))
        .collect();

    for hash in &hashes[1..] {
        assert_eq!(&hashes[0], hash);
    }
    assert_eq!(hashes[0].len(), 64);
}
