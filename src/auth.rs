//! Account credentials and bearer tokens.
//!
//! Passwords are hashed with PBKDF2 (PHC string format). Sessions are
//! stateless HS256 JWTs: subject = doctor id, 7-day expiry, no refresh and
//! no revocation list. Any verification failure collapses to the same
//! `AuthError` so the API layer can answer a uniform 401.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand_core::OsRng;
use pbkdf2::Pbkdf2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token lifetime (7 days).
const TOKEN_TTL_HOURS: i64 = 24 * 7;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Password hashing failed")]
    Hash,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Doctor id.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Hash a password for storage (PBKDF2-SHA256, random salt).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Pbkdf2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| AuthError::Hash)
}

/// Verify a password against a stored PHC hash.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::InvalidCredentials)?;
    Pbkdf2
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Issue a signed bearer token for the given doctor.
pub fn issue_token(secret: &str, doctor_id: &Uuid) -> Result<String, AuthError> {
    issue_token_with_ttl(secret, doctor_id, Duration::hours(TOKEN_TTL_HOURS))
}

fn issue_token_with_ttl(
    secret: &str,
    doctor_id: &Uuid,
    ttl: Duration,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: doctor_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Verify a bearer token and return the encoded doctor id.
///
/// Expired, malformed, and wrong-secret tokens are indistinguishable to the
/// caller: all return `AuthError::InvalidToken`.
pub fn verify_token(secret: &str, token: &str) -> Result<Uuid, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthError::InvalidToken)?;

    Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-signing-secret";

    #[test]
    fn password_round_trips() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash).is_ok());
    }

    #[test]
    fn wrong_password_rejected() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("wrong-password", &hash).is_err());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn token_round_trips() {
        let id = Uuid::new_v4();
        let token = issue_token(SECRET, &id).unwrap();
        assert_eq!(verify_token(SECRET, &token).unwrap(), id);
    }

    #[test]
    fn tampered_token_rejected() {
        let token = issue_token(SECRET, &Uuid::new_v4()).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        assert!(matches!(
            verify_token(SECRET, &tampered),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token(SECRET, &Uuid::new_v4()).unwrap();
        assert!(matches!(
            verify_token("another-secret", &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_rejected_same_as_tampered() {
        let id = Uuid::new_v4();
        // Past the default validation leeway
        let token = issue_token_with_ttl(SECRET, &id, Duration::minutes(-5)).unwrap();
        assert!(matches!(
            verify_token(SECRET, &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_token_rejected() {
        assert!(verify_token(SECRET, "not-a-jwt").is_err());
    }
}
