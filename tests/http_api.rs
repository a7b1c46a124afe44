//! HTTP-level tests: requests go through the full router.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::*;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn graphql_post(uri: &str, authorization: Option<&str>, query: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap()
}

async fn post_graphql(
    app: Router,
    uri: &str,
    authorization: Option<&str>,
    query: &str,
) -> (StatusCode, Value) {
    let (status, body) = send(app, graphql_post(uri, authorization, query)).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_invalid_token_runs_anonymously() {
    let app = test_app().await;

    let (status, body) = post_graphql(
        app.router(),
        "/graphql",
        Some("Bearer not.a.token"),
        "{ me { username } }",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["errors"][0]["message"], json!("You need to be logged in!"));
    assert_eq!(body["errors"][0]["extensions"]["code"], json!("UNAUTHENTICATED"));
}

#[tokio::test]
async fn test_invalid_token_does_not_block_public_operations() {
    let app = test_app().await;
    app.register("reader", "reader@example.com", "secret").await;

    let (status, body) = post_graphql(
        app.router(),
        "/graphql",
        Some("Bearer garbage"),
        r#"
            mutation {
                login(email: "reader@example.com", password: "secret") { user { username } }
            }
        "#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["login"]["user"]["username"], json!("reader"));
}

#[tokio::test]
async fn test_bearer_header_identifies_caller() {
    let app = test_app().await;
    let (token, _) = app.register("reader", "reader@example.com", "secret").await;

    let (status, body) = post_graphql(
        app.router(),
        "/graphql",
        Some(&format!("Bearer {}", token)),
        "{ me { username email bookCount } }",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["me"],
        json!({ "username": "reader", "email": "reader@example.com", "bookCount": 0 })
    );
}

#[tokio::test]
async fn test_token_query_parameter_identifies_caller() {
    let app = test_app().await;
    let (token, _) = app.register("reader", "reader@example.com", "secret").await;

    let (status, body) = post_graphql(
        app.router(),
        &format!("/graphql?token={}", token),
        None,
        "{ me { username } }",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["me"]["username"], json!("reader"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app().await;

    let (status, body) = send(
        app.router(),
        Request::get("/healthz").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], json!("healthy"));

    let (status, body) = send(
        app.router(),
        Request::get("/readyz").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "ready": true, "database": true, "missing_tables": [] }));
}

#[tokio::test]
async fn test_readyz_reports_missing_tables() {
    let app = test_app().await;
    sqlx::query("DROP TABLE saved_books")
        .execute(app.db.pool())
        .await
        .unwrap();

    let (status, body) = send(
        app.router(),
        Request::get("/readyz").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({ "ready": false, "database": true, "missing_tables": ["saved_books"] })
    );
}

#[tokio::test]
async fn test_graphql_get_without_html_is_rejected() {
    let app = test_app().await;

    let (status, _) = send(
        app.router(),
        Request::get("/graphql").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, body) = send(
        app.router(),
        Request::get("/graphql")
            .header(header::ACCEPT, "text/html")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("graphiql"));
}

#[tokio::test]
async fn test_client_is_not_served_outside_production() {
    let app = test_app().await;

    let (status, _) = send(
        app.router(),
        Request::get("/saved").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_production_serves_client_with_index_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>bookshelf</html>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('hi')").unwrap();

    let build_dir = dir.path().to_string_lossy().to_string();
    let app = test_app_with(&[
        ("APP_ENV", "production"),
        ("CLIENT_BUILD_DIR", build_dir.as_str()),
    ])
    .await;

    let (status, body) = send(
        app.router(),
        Request::get("/app.js").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log('hi')".to_vec());

    // client-side routes fall back to the index document
    let (status, body) = send(
        app.router(),
        Request::get("/saved").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<html>bookshelf</html>".to_vec());

    // the API still wins over the fallback
    let (status, _) = send(
        app.router(),
        Request::get("/healthz").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
