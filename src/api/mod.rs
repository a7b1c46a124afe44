//! HTTP route definitions
//!
//! The data API is GraphQL at /graphql; health probes sit beside it.

pub mod graphql;
pub mod health;
