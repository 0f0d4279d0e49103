mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::Utc;
use serde_json::{json, Value};

use common::TestApp;
use trivia_cafe_api::auth::{generate_jwt, Claims};
use trivia_cafe_api::config::AppConfig;
use trivia_cafe_api::database::Store;

fn assert_auth_error(status: StatusCode, body: &Value, expected: u16, code: &str) {
    assert_eq!(status.as_u16(), expected, "unexpected status, body: {}", body);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], expected);
    assert_eq!(body["code"], code);
    assert!(body["message"].is_string());
}

async fn with_header(app: &TestApp, method: Method, uri: &str, authorization: &str) -> Result<(StatusCode, Value)> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())?;
    app.send(req).await
}

#[tokio::test]
async fn protected_routes_require_authorization_header() -> Result<()> {
    let app = TestApp::new();

    let cases = [
        (Method::GET, "/drinks-detail"),
        (Method::POST, "/drinks"),
        (Method::PATCH, "/drinks/1"),
        (Method::DELETE, "/drinks/1"),
    ];
    for (method, uri) in cases {
        let (status, body) = app.request(method, uri, None, None).await?;
        assert_auth_error(status, &body, 401, "authorization_header_missing");
    }
    Ok(())
}

#[tokio::test]
async fn malformed_headers_are_invalid() -> Result<()> {
    let app = TestApp::new();

    for value in ["Basic abc", "Bearer", "Bearer a b", "Bearer not-a-jwt"] {
        let (status, body) = with_header(&app, Method::GET, "/drinks-detail", value).await?;
        assert_auth_error(status, &body, 401, "invalid_header");
    }
    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let mut claims = Claims::new("late", vec!["get:drinks-detail".into()], &app.config.auth)?;
    claims.exp = Utc::now().timestamp() - 3600;
    let token = generate_jwt(&claims, &app.config.auth)?;

    let (status, body) = app.request(Method::GET, "/drinks-detail", None, Some(&token)).await?;
    assert_auth_error(status, &body, 401, "token_expired");
    Ok(())
}

#[tokio::test]
async fn wrong_audience_is_invalid_claims() -> Result<()> {
    let mut config = AppConfig::development();
    config.auth.audience = Some("coffee-shop".to_string());
    let app = TestApp::with_config(config);

    let mut foreign = app.config.auth.clone();
    foreign.audience = Some("tea-house".to_string());
    let claims = Claims::new("visitor", vec!["get:drinks-detail".into()], &foreign)?;
    let token = generate_jwt(&claims, &foreign)?;

    let (status, body) = app.request(Method::GET, "/drinks-detail", None, Some(&token)).await?;
    assert_auth_error(status, &body, 401, "invalid_claims");

    let (status, _) = app
        .request(Method::GET, "/drinks-detail", None, Some(&app.token(&["get:drinks-detail"])))
        .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn token_without_permissions_claim_is_bad_request() -> Result<()> {
    let app = TestApp::new();
    let mut claims = Claims::new("nobody", vec![], &app.config.auth)?;
    claims.permissions = None;
    let token = generate_jwt(&claims, &app.config.auth)?;

    let (status, body) = app.request(Method::GET, "/drinks-detail", None, Some(&token)).await?;
    assert_auth_error(status, &body, 400, "invalid_claims");
    Ok(())
}

#[tokio::test]
async fn missing_permission_is_forbidden_and_nothing_changes() -> Result<()> {
    let app = TestApp::new();
    let token = app.token(&["get:drinks-detail"]);

    let (status, body) = app
        .request(
            Method::POST,
            "/drinks",
            Some(json!({ "title": "latte", "recipe": [{ "name": "milk", "color": "white", "parts": 3 }] })),
            Some(&token),
        )
        .await?;
    assert_auth_error(status, &body, 403, "unauthorized");

    let (status, _) = app
        .request(Method::PATCH, "/drinks/1", Some(json!({ "title": "hijacked" })), Some(&token))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request(Method::DELETE, "/drinks/1", None, Some(&token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let drinks = app.store.list_drinks().await?;
    assert_eq!(drinks.len(), 1);
    assert_eq!(drinks[0].title, "water");
    Ok(())
}

#[tokio::test]
async fn auth_runs_before_body_parsing() -> Result<()> {
    let app = TestApp::new();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/drinks")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{broken"))?;
    let (status, body) = app.send(req).await?;
    assert_auth_error(status, &body, 401, "authorization_header_missing");
    Ok(())
}

#[tokio::test]
async fn unrouted_method_on_protected_path_is_405_not_401() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.request(Method::PUT, "/drinks/1", None, None).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], 405);
    Ok(())
}
