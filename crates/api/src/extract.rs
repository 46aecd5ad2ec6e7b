//! The identity resolver.
//!
//! Every request resolves to either a verified user id or anonymous. The
//! signed credential is looked for in the `Authorization: Bearer` header
//! first, then in the `token` cookie. Resolution fails closed: a missing or
//! invalid credential yields `Identity(None)` rather than a rejection, and
//! each handler decides whether anonymous access is permitted.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use axum_extra::extract::cookie::CookieJar;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub const TOKEN_COOKIE: &str = "token";

/// The caller's identity, or `None` for anonymous.
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub Option<Uuid>);

impl Identity {
    /// The verified user id, or `Unauthorized` where identity is required.
    pub fn require(&self) -> Result<Uuid, ApiError> {
        self.0.ok_or(ApiError::Unauthorized)
    }
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Identity(resolve(parts, state.jwt_secret())))
    }
}

fn resolve(parts: &Parts, secret: &str) -> Option<Uuid> {
    let token = bearer_token(parts).or_else(|| cookie_token(parts))?;
    verse_core::auth::token::verify(&token, secret)
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn cookie_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Admin gate: the resolved user's stored `is_admin` flag must be set.
pub async fn require_admin(pool: &PgPool, user_id: Uuid) -> Result<(), ApiError> {
    let is_admin: Option<bool> = sqlx::query_scalar("SELECT is_admin FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    if is_admin.unwrap_or(false) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Not an admin".to_string()))
    }
}

/// Whether the caller is an admin; anonymous callers are not.
pub async fn is_admin(pool: &PgPool, identity: Identity) -> Result<bool, ApiError> {
    match identity.0 {
        Some(user_id) => Ok(require_admin(pool, user_id).await.is_ok()),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use verse_core::auth::token;

    const SECRET: &str = "extract-test-secret";

    fn parts_with_headers(headers: &[(&str, String)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, value.as_str());
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let header_user = Uuid::new_v4();
        let cookie_user = Uuid::new_v4();
        let header_tok = token::sign(header_user, SECRET, 3600).unwrap();
        let cookie_tok = token::sign(cookie_user, SECRET, 3600).unwrap();
        let parts = parts_with_headers(&[
            ("authorization", format!("Bearer {header_tok}")),
            ("cookie", format!("token={cookie_tok}")),
        ]);
        assert_eq!(resolve(&parts, SECRET), Some(header_user));
    }

    #[test]
    fn falls_back_to_cookie() {
        let user = Uuid::new_v4();
        let tok = token::sign(user, SECRET, 3600).unwrap();
        let parts = parts_with_headers(&[("cookie", format!("token={tok}"))]);
        assert_eq!(resolve(&parts, SECRET), Some(user));
    }

    #[test]
    fn missing_or_invalid_credential_is_anonymous() {
        let parts = parts_with_headers(&[]);
        assert_eq!(resolve(&parts, SECRET), None);

        let parts = parts_with_headers(&[("authorization", "Bearer junk".to_string())]);
        assert_eq!(resolve(&parts, SECRET), None);

        let parts = parts_with_headers(&[("cookie", "token=junk".to_string())]);
        assert_eq!(resolve(&parts, SECRET), None);
    }

    #[test]
    fn require_rejects_anonymous() {
        assert!(Identity(None).require().is_err());
        let user = Uuid::new_v4();
        assert_eq!(Identity(Some(user)).require().unwrap(), user);
    }
}
