//! GraphQL API
//!
//! This is the single data API of the backend, built with async-graphql and
//! served over HTTP by [`crate::api::graphql`].
//!
//! Queries and mutations live in domain files under `queries/` and
//! `mutations/`, each a `#[derive(Default)]` struct with an `#[Object]` impl,
//! merged into the roots in `schema.rs`.

pub mod auth;
pub mod errors;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use auth::{AuthUser, resolve_identity};
pub use schema::{BookshelfSchema, MutationRoot, QueryRoot, build_schema};
