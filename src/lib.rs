//! Bookshelf backend
//!
//! Users register, log in, and keep a personal list of saved books. Everything
//! is exposed through GraphQL at `/graphql`.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod graphql;
pub mod services;

pub use app::{AppState, build_app};
