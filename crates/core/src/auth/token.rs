//! Verification of the signed bearer credential.
//!
//! Token issuance lives with the external auth provider; this module only
//! decodes and validates tokens it is handed. Verification fails closed:
//! a missing, malformed, or signature-invalid token yields `None`, never an
//! error — callers decide per-endpoint whether anonymous access is allowed.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried inside the session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's id.
    pub id: Uuid,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Verify a token and extract the caller's user id.
///
/// Any failure (bad signature, expired, garbage input) resolves to `None`.
pub fn verify(token: &str, secret: &str) -> Option<Uuid> {
    let validation = Validation::default();
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Some(data.claims.id),
        Err(err) => {
            tracing::debug!("token verification failed: {err}");
            None
        }
    }
}

/// Sign a token for the given user, valid for `ttl_secs` seconds.
///
/// The production login flow is handled by the external auth provider; this
/// is used by seeding tooling and tests.
pub fn sign(user_id: Uuid, secret: &str, ttl_secs: i64) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        id: user_id,
        iat: now,
        exp: now + ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn verify_round_trip() {
        let user_id = Uuid::new_v4();
        let token = sign(user_id, SECRET, 3600).unwrap();
        assert_eq!(verify(&token, SECRET), Some(user_id));
    }

    #[test]
    fn wrong_secret_resolves_to_anonymous() {
        let token = sign(Uuid::new_v4(), SECRET, 3600).unwrap();
        assert_eq!(verify(&token, "other-secret"), None);
    }

    #[test]
    fn expired_token_resolves_to_anonymous() {
        let token = sign(Uuid::new_v4(), SECRET, -3600).unwrap();
        assert_eq!(verify(&token, SECRET), None);
    }

    #[test]
    fn garbage_resolves_to_anonymous() {
        assert_eq!(verify("not-a-token", SECRET), None);
        assert_eq!(verify("", SECRET), None);
    }
}
