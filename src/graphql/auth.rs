//! GraphQL authentication
//!
//! The HTTP handler calls [`resolve_identity`] once per request and, when it
//! yields an identity, attaches it to the request data. Resolvers read it back
//! through [`AuthExt`].

use async_graphql::{Context, Result};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::graphql::errors::{LOGIN_REQUIRED, authentication_error};
use crate::services::auth::{AuthService, TokenPayload};

/// User context extracted from the identity token, available in GraphQL resolvers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub email: String,
}

impl From<TokenPayload> for AuthUser {
    fn from(payload: TokenPayload) -> Self {
        Self {
            user_id: payload.id,
            username: payload.username,
            email: payload.email,
        }
    }
}

/// Pull the raw credential out of a request.
///
/// The `Authorization` header wins; its last space-separated segment is the
/// token, so `Bearer <token>` and a bare `<token>` both work. Without the
/// header, a `token` query parameter is used.
pub fn extract_credential(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        return value
            .split_whitespace()
            .last()
            .map(str::to_string);
    }

    query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// Resolve the caller's identity for one request.
///
/// - no credential: anonymous
/// - credential that verifies: that identity
/// - credential that does not verify (bad signature, expired, malformed):
///   anonymous. The request still runs; protected resolvers reject it.
pub fn resolve_identity(
    auth: &AuthService,
    headers: &HeaderMap,
    query: Option<&str>,
) -> Option<AuthUser> {
    let Some(token) = extract_credential(headers, query) else {
        tracing::debug!("No auth token in request");
        return None;
    };

    match auth.verify_token(&token) {
        Ok(payload) => {
            tracing::debug!(user_id = %payload.id, "Auth successful");
            Some(payload.into())
        }
        Err(e) => {
            tracing::debug!(error = %e, "Token verification failed; continuing anonymously");
            None
        }
    }
}

/// Extension trait to get authenticated user from GraphQL context
pub trait AuthExt {
    /// Get the authenticated user, or fail with "You need to be logged in!"
    fn auth_user(&self) -> Result<&AuthUser>;
}

impl AuthExt for Context<'_> {
    fn auth_user(&self) -> Result<&AuthUser> {
        self.data_opt::<AuthUser>()
            .ok_or_else(|| authentication_error(LOGIN_REQUIRED))
    }
}
