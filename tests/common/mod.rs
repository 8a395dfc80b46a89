#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use pagecraft::pagecraft_config::{CorsConfig, JwtConfig, MediaConfig};
use pagecraft::pagecraft_core::hash_password;
use pagecraft::router::init_router;
use pagecraft::state::AppState;

pub const TEST_PASSWORD: &str = "pw123456";

pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub password: String,
}

pub struct LoginResult {
    pub access_token: String,
    /// `refresh_token=<jwt>`, ready for a `Cookie` header.
    pub refresh_cookie: String,
}

pub fn test_media_config() -> MediaConfig {
    let upload_dir = std::env::temp_dir().join(format!("pagecraft-test-{}", Uuid::new_v4()));

    MediaConfig {
        upload_dir,
        public_url: "/static/uploads".to_string(),
        max_bytes: 1024,
        allowed_types: vec!["image/png".to_string(), "text/plain".to_string()],
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    dotenvy::dotenv().ok();
    AppState::new(
        pool,
        JwtConfig::for_testing(),
        CorsConfig::from_env(),
        test_media_config(),
    )
}

pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(pool))
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Inserts a user directly. `role` is one of `admin`, `editor`, `public`.
pub async fn create_test_user(pool: &PgPool, role: &str) -> TestUser {
    create_test_user_with(pool, &generate_unique_email(), TEST_PASSWORD, role, true).await
}

pub async fn create_test_user_with(
    pool: &PgPool,
    email: &str,
    password: &str,
    role: &str,
    is_active: bool,
) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (email, hashed_password, role, is_active)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(email)
    .bind(hashed)
    .bind(role)
    .bind(is_active)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
    }
}

pub fn login_request(email: &str, password: &str) -> Request<Body> {
    let body = format!(
        "username={}&password={}",
        urlencode(email),
        urlencode(password)
    );

    Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn urlencode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

/// `refresh_token=<jwt>` from a login response's `Set-Cookie`.
pub fn refresh_cookie_from(response: &axum::response::Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("refresh_token="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub async fn login(app: &Router, user: &TestUser) -> LoginResult {
    let response = app
        .clone()
        .oneshot(login_request(&user.email, &user.password))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "login failed");

    let refresh_cookie = refresh_cookie_from(&response).expect("refresh cookie");
    let body = body_json(response).await;

    LoginResult {
        access_token: body["access_token"].as_str().unwrap().to_string(),
        refresh_cookie,
    }
}

/// Creates a user with `role` and returns its access token.
pub async fn token_for(app: &Router, pool: &PgPool, role: &str) -> (TestUser, String) {
    let user = create_test_user(pool, role).await;
    let tokens = login(app, &user).await;
    (user, tokens.access_token)
}

pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

/// Sends a request and returns the status with the decoded JSON body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

/// Status only, for responses that are not JSON.
pub async fn status_of(app: &Router, request: Request<Body>) -> StatusCode {
    app.clone().oneshot(request).await.unwrap().status()
}

pub async fn audit_count(pool: &PgPool, action: &str, resource_type: &str, resource_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM audit_logs
         WHERE action = $1 AND resource_type = $2 AND resource_id = $3",
    )
    .bind(action)
    .bind(resource_type)
    .bind(resource_id)
    .fetch_one(pool)
    .await
    .unwrap()
}
