pub mod auth;
pub mod books;

pub use auth::AuthMutations;
pub use books::BookMutations;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ID, Object, Result};

    pub(crate) use crate::db::*;
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::errors::*;
    pub(crate) use crate::graphql::types::*;
    pub(crate) use crate::services::AuthService;
}
