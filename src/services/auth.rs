//! Identity token signing and verification
//!
//! Tokens are HS256 JWTs carrying `{ data: { username, email, _id }, iat, exp }`.
//! They are stateless: nothing is stored server-side, so there is no
//! revocation, rotation or refresh. A token stays valid until it expires,
//! even if the user's password changes or the user is deleted.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::db::UserRecord;

// ============================================================================
// JWT Claims
// ============================================================================

/// Identity asserted by a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub username: String,
    pub email: String,
    #[serde(rename = "_id")]
    pub id: String,
}

impl From<&UserRecord> for TokenPayload {
    fn from(user: &UserRecord) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            id: user.id.clone(),
        }
    }
}

/// Claims structure for identity tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub data: TokenPayload,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 2 hours)
    pub token_lifetime_secs: i64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_lifetime_secs: 2 * 60 * 60,
        }
    }
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_lifetime_secs: config.token_lifetime_secs,
        }
    }
}

// ============================================================================
// Auth Service
// ============================================================================

/// Signs and verifies identity tokens with a single shared secret
#[derive(Clone)]
pub struct AuthService {
    token_lifetime_secs: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            token_lifetime_secs: config.token_lifetime_secs,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for `user`
    pub fn sign_token(&self, user: &UserRecord) -> Result<String, AuthError> {
        self.sign_payload(TokenPayload::from(user))
    }

    /// Issue a token asserting `payload`
    pub fn sign_payload(&self, payload: TokenPayload) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            data: payload,
            exp: (now + Duration::seconds(self.token_lifetime_secs)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(AuthError::Sign)
    }

    /// Check signature and expiry, returning the asserted identity
    pub fn verify_token(&self, token: &str) -> Result<TokenPayload, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.data)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid(e),
            })
    }
}
