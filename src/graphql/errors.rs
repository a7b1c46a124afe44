//! GraphQL error constructors shared by resolvers

use async_graphql::ErrorExtensions;

/// Raised by every protected operation when the request carries no identity
pub const LOGIN_REQUIRED: &str = "You need to be logged in!";

/// Raised by `login` for an unknown email and for a wrong password alike
pub const INVALID_CREDENTIALS: &str = "Incorrect email or password!";

/// Authentication failure, tagged with `extensions.code = "UNAUTHENTICATED"`
pub fn authentication_error(message: &str) -> async_graphql::Error {
    async_graphql::Error::new(message).extend_with(|_, e| e.set("code", "UNAUTHENTICATED"))
}
