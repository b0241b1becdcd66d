//! End-to-end tests of the request pipeline over real sockets.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use auth_api::{ApiError, AppState, JsonBody};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use reqwest::header;
use serde::Deserialize;
use serde_json::{json, Value};

mod common;

#[derive(Debug, Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(JsonBody(creds): JsonBody<Credentials>) -> Result<Json<Value>, ApiError> {
    if creds.email == "a@b.com" && creds.password == "x" {
        Ok(Json(json!({ "email": creds.email })))
    } else {
        Err(ApiError::new(StatusCode::UNAUTHORIZED, "Invalid credentials"))
    }
}

async fn signup() -> ApiError {
    ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation failed.")
        .with_data(json!([{ "param": "email", "msg": "E-Mail address already exists!" }]))
}

async fn crash() -> ApiError {
    ApiError::default()
}

async fn users(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let db = state.db.require_database()?;
    Ok(Json(json!({ "database": db.name() })))
}

fn auth_router(hits: Arc<AtomicUsize>) -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/crash", get(crash))
        .route("/users", get(users))
        .fallback(move || {
            hits.fetch_add(1, Ordering::SeqCst);
            async { ApiError::not_found("Not found") }
        })
}

fn assert_cors(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-methods"],
        "OPTIONS, GET, POST, PUT, DELETE"
    );
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
}

#[tokio::test]
async fn test_login_success_has_cors() {
    let app = common::spawn_app(common::test_config(), auth_router(Default::default())).await;

    let res = common::client()
        .post(app.url("/auth/login"))
        .json(&json!({ "email": "a@b.com", "password": "x" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_cors(&res);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "email": "a@b.com" }));
}

#[tokio::test]
async fn test_invalid_credentials_envelope() {
    let app = common::spawn_app(common::test_config(), auth_router(Default::default())).await;

    let res = common::client()
        .post(app.url("/auth/login"))
        .json(&json!({ "email": "a@b.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 401);
    assert_cors(&res);
    assert_eq!(
        res.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(res.text().await.unwrap(), r#"{"message":"Invalid credentials"}"#);
}

#[tokio::test]
async fn test_error_data_passes_through() {
    let app = common::spawn_app(common::test_config(), auth_router(Default::default())).await;

    let res = common::client()
        .post(app.url("/auth/signup"))
        .json(&json!({ "email": "a@b.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 422);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({
            "message": "Validation failed.",
            "data": [{ "param": "email", "msg": "E-Mail address already exists!" }]
        })
    );
}

#[tokio::test]
async fn test_error_without_status_is_500() {
    let app = common::spawn_app(common::test_config(), auth_router(Default::default())).await;

    let res = common::client().get(app.url("/auth/crash")).send().await.unwrap();

    assert_eq!(res.status(), 500);
    assert_cors(&res);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({}));
}

#[tokio::test]
async fn test_malformed_json_is_error_envelope() {
    let app = common::spawn_app(common::test_config(), auth_router(Default::default())).await;

    let res = common::client()
        .post(app.url("/auth/login"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(r#"{"email": "a@b.com", "password": }"#)
        .send()
        .await
        .unwrap();

    assert!(!res.status().is_success());
    assert_cors(&res);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_preflight_succeeds() {
    let app = common::spawn_app(common::test_config(), auth_router(Default::default())).await;

    let res = common::client()
        .request(reqwest::Method::OPTIONS, app.url("/auth/login"))
        .header(header::ORIGIN, "https://app.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_cors(&res);
}

#[tokio::test]
async fn test_outside_prefix_skips_router() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = common::spawn_app(common::test_config(), auth_router(hits.clone())).await;
    let client = common::client();

    let res = client.get(app.url("/login")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert!(res.text().await.unwrap().is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let res = client.get(app.url("/auth/nope")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_database_unavailable_inside_router() {
    let app = common::spawn_app(common::test_config(), auth_router(Default::default())).await;

    let res = common::client().get(app.url("/auth/users")).send().await.unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({ "message": "database connection is not available" })
    );
}

#[tokio::test]
async fn test_body_limit() {
    let mut config = common::test_config();
    config.body.json_limit_bytes = 32;
    let app = common::spawn_app(config, auth_router(Default::default())).await;

    let res = common::client()
        .post(app.url("/auth/login"))
        .json(&json!({ "email": "a@b.com", "password": "x".repeat(64) }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 413);
    assert_cors(&res);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({ "message": "request entity too large" })
    );
}
