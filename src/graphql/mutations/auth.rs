//! Registration and login
//!
//! Neither mutation requires an identity. Both return a fresh token with the user.

use super::prelude::*;

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Register a new user account
    ///
    /// The store validates the input and hashes the password. Duplicate
    /// usernames or emails surface as store errors.
    async fn add_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        password: String,
    ) -> Result<Auth> {
        let db = ctx.data_unchecked::<Database>();
        let auth = ctx.data_unchecked::<AuthService>();

        let user = db
            .users()
            .create(CreateUser {
                username,
                email,
                password,
            })
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "User registration failed");
                e
            })?;

        let token = auth.sign_token(&user)?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User registered successfully"
        );

        Ok(Auth {
            token: ID(token),
            user: user.into(),
        })
    }

    /// Authenticate a user with email and password
    ///
    /// An unknown email and a wrong password fail with the same message.
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<Auth> {
        let db = ctx.data_unchecked::<Database>();
        let auth = ctx.data_unchecked::<AuthService>();

        let Some(user) = db.users().get_by_email(&email).await? else {
            tracing::warn!(email = %email, reason = "unknown email", "Login failed");
            return Err(authentication_error(INVALID_CREDENTIALS));
        };

        if !user.is_correct_password(&password).await? {
            tracing::warn!(email = %email, reason = "wrong password", "Login failed");
            return Err(authentication_error(INVALID_CREDENTIALS));
        }

        let token = auth.sign_token(&user)?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User logged in successfully"
        );

        Ok(Auth {
            token: ID(token),
            user: user.into(),
        })
    }
}
