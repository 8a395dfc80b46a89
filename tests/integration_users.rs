mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::json;
use sqlx::PgPool;

use common::{
    TestUser, audit_count, create_test_user, generate_unique_email, json_request, login,
    login_request, send, setup_test_app, token_for,
};

fn refresh_request(cookie: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/auth/refresh")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

async fn reset_token_for(app: &Router, user: &TestUser) -> String {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/auth/reset-password/request",
            None,
            Some(json!({"email": user.email})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["reset_token"].as_str().unwrap().to_string()
}

async fn confirm_reset(app: &Router, token: &str) -> StatusCode {
    let (status, _) = send(
        app,
        json_request(
            Method::POST,
            "/api/auth/reset-password/confirm",
            None,
            Some(json!({"token": token, "new_password": "hijacked123"})),
        ),
    )
    .await;
    status
}

async fn register(app: &Router, email: &str, password: &str) -> StatusCode {
    let (status, _) = send(
        app,
        json_request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": email, "password": password})),
        ),
    )
    .await;
    status
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_lists_users(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "admin").await;
    create_test_user(&pool, "editor").await;
    create_test_user(&pool, "public").await;

    let (status, body) = send(
        &app,
        json_request(Method::GET, "/api/users?limit=2", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["has_more"], true);

    let (status, body) = send(
        &app,
        json_request(Method::GET, "/api/users?role=editor", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["role"], "editor");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_editor_cannot_manage_users(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "editor").await;

    let (status, body) = send(
        &app,
        json_request(Method::GET, "/api/users", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("users.view"));

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/users",
            Some(&token),
            Some(json!({"email": generate_unique_email(), "password": "pw123456"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_users_require_authentication(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send(&app, json_request(Method::GET, "/api/users", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_get_update_delete_user(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin, token) = token_for(&app, &pool, "admin").await;
    let email = generate_unique_email();

    let (status, created) = send(
        &app,
        json_request(
            Method::POST,
            "/api/users",
            Some(&token),
            Some(json!({"email": email, "password": "pw123456", "role": "editor"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["role"], "editor");
    assert_eq!(created["is_active"], true);
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(
        &app,
        json_request(Method::GET, &format!("/api/users/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["email"], email.as_str());

    let (status, updated) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/users/{id}"),
            Some(&token),
            Some(json!({"role": "public"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "public");
    assert_eq!(updated["email"], email.as_str());

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, &format!("/api/users/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        json_request(Method::GET, &format!("/api/users/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(audit_count(&pool, "create", "user", id).await, 1);
    assert_eq!(audit_count(&pool, "update", "user", id).await, 1);
    assert_eq!(audit_count(&pool, "delete", "user", id).await, 1);

    let actor: i64 = sqlx::query_scalar(
        "SELECT user_id FROM audit_logs WHERE action = 'delete' AND resource_id = $1",
    )
    .bind(id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(actor, admin.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_user_duplicate_email(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin, token) = token_for(&app, &pool, "admin").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/users",
            Some(&token),
            Some(json!({"email": admin.email, "password": "pw123456"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already registered");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_cannot_delete_self(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (admin, token) = token_for(&app, &pool, "admin").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::DELETE,
            &format!("/api/users/{}", admin.id),
            Some(&token),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You cannot delete your own account");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_password_change_revokes_sessions(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "admin").await;
    let editor = create_test_user(&pool, "editor").await;
    let editor_tokens = login(&app, &editor).await;

    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/users/{}", editor.id),
            Some(&token),
            Some(json!({"password": "changed123"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, refresh_request(&editor_tokens.refresh_cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, login_request(&editor.email, "changed123")).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_missing_user(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "admin").await;

    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/users/999999",
            Some(&token),
            Some(json!({"is_active": false})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleted_user_tokens_do_not_reach_new_account(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, admin_token) = token_for(&app, &pool, "admin").await;
    let old = create_test_user(&pool, "public").await;
    let old_tokens = login(&app, &old).await;
    let old_reset = reset_token_for(&app, &old).await;

    let (status, _) = send(
        &app,
        json_request(
            Method::DELETE,
            &format!("/api/users/{}", old.id),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(register(&app, &old.email, "newowner123").await, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/auth/me", Some(&old_tokens.access_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, refresh_request(&old_tokens.refresh_cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(confirm_reset(&app, &old_reset).await, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, login_request(&old.email, "newowner123")).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_email_change_revokes_tokens(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, admin_token) = token_for(&app, &pool, "admin").await;
    let editor = create_test_user(&pool, "editor").await;
    let editor_tokens = login(&app, &editor).await;
    let editor_reset = reset_token_for(&app, &editor).await;
    let new_email = generate_unique_email();

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/users/{}", editor.id),
            Some(&admin_token),
            Some(json!({"email": new_email})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], new_email.as_str());

    let (status, _) = send(&app, refresh_request(&editor_tokens.refresh_cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(confirm_reset(&app, &editor_reset).await, StatusCode::UNAUTHORIZED);

    assert_eq!(register(&app, &editor.email, "squatter123").await, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/auth/me", Some(&editor_tokens.access_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, refresh_request(&editor_tokens.refresh_cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(confirm_reset(&app, &editor_reset).await, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, login_request(&new_email, &editor.password)).await;
    assert_eq!(status, StatusCode::OK);
}
