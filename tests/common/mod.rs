//! Shared setup for integration tests: an in-memory store, a schema and the
//! HTTP router over it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::{Request, Response, Variables};
use axum::Router;
use serde_json::Value;

use bookshelf::config::Config;
use bookshelf::db::Database;
use bookshelf::graphql::{AuthUser, BookshelfSchema, build_schema};
use bookshelf::services::{AuthConfig, AuthService};
use bookshelf::{AppState, build_app};

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub db: Database,
    pub auth: AuthService,
    pub schema: BookshelfSchema,
    pub config: Arc<Config>,
}

pub async fn test_app() -> TestApp {
    test_app_with(&[]).await
}

/// Build an app with extra configuration variables on top of the test defaults
pub async fn test_app_with(vars: &[(&str, &str)]) -> TestApp {
    let mut env: HashMap<String, String> = HashMap::new();
    env.insert("JWT_SECRET".to_string(), TEST_SECRET.to_string());
    env.insert("BCRYPT_COST".to_string(), "4".to_string());
    for (k, v) in vars {
        env.insert(k.to_string(), v.to_string());
    }
    let config = Config::from_lookup(|key| env.get(key).cloned()).unwrap();

    let db = Database::in_memory()
        .await
        .unwrap()
        .with_password_cost(config.bcrypt_cost);
    let auth = AuthService::new(AuthConfig::from(&config));
    let schema = build_schema(db.clone(), auth.clone());

    TestApp {
        db,
        auth,
        schema,
        config: Arc::new(config),
    }
}

impl TestApp {
    pub fn router(&self) -> Router {
        build_app(AppState {
            config: self.config.clone(),
            db: self.db.clone(),
            schema: self.schema.clone(),
            auth: self.auth.clone(),
        })
    }

    /// Execute an operation, as `user` when given
    pub async fn execute(&self, query: &str, variables: Value, user: Option<AuthUser>) -> Response {
        let mut request = Request::new(query).variables(Variables::from_json(variables));
        if let Some(user) = user {
            request = request.data(user);
        }
        self.schema.execute(request).await
    }

    /// Execute an operation as the holder of `token`
    pub async fn execute_with_token(&self, query: &str, variables: Value, token: &str) -> Response {
        let user = self.auth.verify_token(token).ok().map(AuthUser::from);
        self.execute(query, variables, user).await
    }

    /// Register a user through the API and return its token and id
    pub async fn register(&self, username: &str, email: &str, password: &str) -> (String, String) {
        let response = self
            .execute(
                ADD_USER,
                serde_json::json!({ "username": username, "email": email, "password": password }),
                None,
            )
            .await;
        assert!(response.errors.is_empty(), "addUser failed: {:?}", response.errors);
        let data = response.data.into_json().unwrap();
        (
            data["addUser"]["token"].as_str().unwrap().to_string(),
            data["addUser"]["user"]["_id"].as_str().unwrap().to_string(),
        )
    }
}

/// Message of the first error, if any
pub fn first_error(response: &Response) -> Option<String> {
    response.errors.first().map(|e| e.message.clone())
}

/// `extensions.code` of the first error, if any
pub fn first_error_code(response: &Response) -> Option<String> {
    let error = response.errors.first()?;
    let value = serde_json::to_value(error).ok()?;
    value["extensions"]["code"].as_str().map(str::to_string)
}

pub fn book_input(book_id: &str) -> Value {
    serde_json::json!({
        "bookId": book_id,
        "title": format!("Book {}", book_id),
        "description": "A fine book",
        "authors": ["First Author", "Second Author"],
        "image": format!("https://covers.example/{}.jpg", book_id),
        "link": null,
    })
}

pub const USER_FIELDS: &str =
    "_id username email bookCount savedBooks { bookId title description authors image link }";

pub const ADD_USER: &str = r#"
    mutation AddUser($username: String!, $email: String!, $password: String!) {
        addUser(username: $username, email: $email, password: $password) {
            token
            user { _id username email bookCount savedBooks { bookId } }
        }
    }
"#;

pub const LOGIN: &str = r#"
    mutation Login($email: String!, $password: String!) {
        login(email: $email, password: $password) {
            token
            user { _id username }
        }
    }
"#;

pub fn me_query() -> String {
    format!("query {{ me {{ {} }} }}", USER_FIELDS)
}

pub fn save_book_mutation() -> String {
    format!(
        "mutation SaveBook($input: BookInput!) {{ saveBook(input: $input) {{ {} }} }}",
        USER_FIELDS
    )
}

pub fn remove_book_mutation() -> String {
    format!(
        "mutation RemoveBook($bookId: ID!) {{ removeBook(bookId: $bookId) {{ {} }} }}",
        USER_FIELDS
    )
}
