mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;

use common::{audit_count, json_request, send, setup_test_app, token_for};

async fn create_page(app: &axum::Router, token: &str, slug: &str) -> i64 {
    let (status, page) = send(
        app,
        json_request(
            Method::POST,
            "/api/pages",
            Some(token),
            Some(json!({"slug": slug, "title": slug})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    page["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_editor_reads_audit_trail_newest_first(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (editor, token) = token_for(&app, &pool, "editor").await;
    let first = create_page(&app, &token, "first").await;
    let second = create_page(&app, &token, "second").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::GET,
            "/api/audit-logs?resource_type=page",
            Some(&token),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["data"][0]["resource_id"], second);
    assert_eq!(body["data"][1]["resource_id"], first);
    assert_eq!(body["data"][0]["user_id"], editor.id);
    assert_eq!(body["data"][0]["action"], "create");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_filters_combine(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (editor, token) = token_for(&app, &pool, "editor").await;
    let page_id = create_page(&app, &token, "combo").await;
    send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/pages/{page_id}"),
            Some(&token),
            Some(json!({"title": "Combo"})),
        ),
    )
    .await;

    let uri = format!(
        "/api/audit-logs?user_id={}&resource_id={page_id}&action=update",
        editor.id
    );
    let (status, body) = send(&app, json_request(Method::GET, &uri, Some(&token), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["resource_type"], "page");

    let (_, body) = send(
        &app,
        json_request(Method::GET, "/api/audit-logs?action=login", Some(&token), None),
    )
    .await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["resource_type"], "user");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_public_cannot_read_audit_trail(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "public").await;

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/audit-logs", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_audit_log(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "admin").await;

    let id: i64 = sqlx::query_scalar("SELECT id FROM audit_logs ORDER BY id DESC LIMIT 1")
        .fetch_one(&pool)
        .await
        .unwrap();

    let (status, entry) = send(
        &app,
        json_request(Method::GET, &format!("/api/audit-logs/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["action"], "login");

    let (status, body) = send(
        &app,
        json_request(Method::GET, "/api/audit-logs/999999", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Audit log not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_admin_deletes_entries(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, editor_token) = token_for(&app, &pool, "editor").await;
    let (admin, admin_token) = token_for(&app, &pool, "admin").await;
    let page_id = create_page(&app, &editor_token, "doomed").await;

    let entry: i64 = sqlx::query_scalar(
        "SELECT id FROM audit_logs WHERE resource_type = 'page' AND resource_id = $1",
    )
    .bind(page_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    let (status, body) = send(
        &app,
        json_request(
            Method::DELETE,
            &format!("/api/audit-logs/{entry}"),
            Some(&editor_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("audit.delete"));

    let (status, _) = send(
        &app,
        json_request(
            Method::DELETE,
            &format!("/api/audit-logs/{entry}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(audit_count(&pool, "create", "page", page_id).await, 0);
    assert_eq!(audit_count(&pool, "delete", "audit_log", entry).await, 1);

    let actor: i64 = sqlx::query_scalar(
        "SELECT user_id FROM audit_logs WHERE resource_type = 'audit_log' AND resource_id = $1",
    )
    .bind(entry)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(actor, admin.id);

    let (status, _) = send(
        &app,
        json_request(
            Method::DELETE,
            &format!("/api/audit-logs/{entry}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
