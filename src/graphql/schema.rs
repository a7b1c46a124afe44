//! GraphQL schema definition
//!
//! One query (`me`) and four mutations (`addUser`, `login`, `saveBook`,
//! `removeBook`). The store and auth handles are schema data; the caller's
//! identity, when there is one, is request data.

use async_graphql::extensions::Tracing;
use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;
use crate::services::AuthService;

use super::mutations::{AuthMutations, BookMutations};
use super::queries::UserQueries;

/// The GraphQL schema type
pub type BookshelfSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(UserQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutations, BookMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(db: Database, auth: AuthService) -> BookshelfSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(db)
    .data(auth)
    .extension(Tracing)
    .finish()
}
