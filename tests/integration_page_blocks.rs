mod common;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;

use common::{audit_count, json_request, send, setup_test_app, token_for};

async fn create_page(app: &axum::Router, token: &str, slug: &str) -> i64 {
    let (status, page) = send(
        app,
        json_request(
            Method::POST,
            "/api/pages",
            Some(token),
            Some(json!({"slug": slug, "title": "Landing"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    page["id"].as_i64().unwrap()
}

async fn create_block(app: &axum::Router, token: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        json_request(Method::POST, "/api/page-blocks", Some(token), Some(body)),
    )
    .await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_block_defaults(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (editor, token) = token_for(&app, &pool, "editor").await;
    let page_id = create_page(&app, &token, "landing").await;

    let (status, block) = create_block(
        &app,
        &token,
        json!({"page_id": page_id, "type": "hero", "content": {"heading": "Welcome"}}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(block["type"], "hero");
    assert_eq!(block["order"], 0);
    assert_eq!(block["is_visible"], true);
    assert_eq!(block["content"]["heading"], "Welcome");
    assert_eq!(block["created_by_id"], editor.id);

    let id = block["id"].as_i64().unwrap();
    assert_eq!(audit_count(&pool, "create", "page_block", id).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_block_for_unknown_page(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "editor").await;

    let (status, body) = create_block(
        &app,
        &token,
        json!({"page_id": 999999, "type": "text", "content": {}}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Page not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_block_content_must_be_object(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "editor").await;
    let page_id = create_page(&app, &token, "home").await;

    let (status, _) = create_block(
        &app,
        &token,
        json!({"page_id": page_id, "type": "text", "content": "plain"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_blocks_of_page_in_display_order(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "editor").await;
    let page_id = create_page(&app, &token, "story").await;
    let other_page = create_page(&app, &token, "other").await;

    for (kind, order) in [("gallery", 2), ("hero", 0), ("text", 1)] {
        let (status, _) = create_block(
            &app,
            &token,
            json!({"page_id": page_id, "type": kind, "content": {}, "order": order}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    create_block(
        &app,
        &token,
        json!({"page_id": other_page, "type": "text", "content": {}}),
    )
    .await;

    let (status, body) = send(
        &app,
        json_request(
            Method::GET,
            &format!("/api/page-blocks?page_id={page_id}"),
            Some(&token),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 3);
    let kinds: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|block| block["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, ["hero", "text", "gallery"]);

    let (_, page) = send(
        &app,
        json_request(
            Method::GET,
            &format!("/api/pages/{page_id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(page["blocks"][0]["type"], "hero");
    assert_eq!(page["blocks"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_delete_block(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "editor").await;
    let page_id = create_page(&app, &token, "faq").await;
    let (_, block) = create_block(
        &app,
        &token,
        json!({"page_id": page_id, "type": "text", "content": {"text": "Q"}}),
    )
    .await;
    let id = block["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/page-blocks/{id}"),
            Some(&token),
            Some(json!({"content": {"text": "A"}, "is_visible": false, "order": 5})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"]["text"], "A");
    assert_eq!(updated["is_visible"], false);
    assert_eq!(updated["order"], 5);
    assert_eq!(updated["type"], "text");

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, &format!("/api/page-blocks/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        json_request(Method::GET, &format!("/api/page-blocks/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Page block not found");

    assert_eq!(audit_count(&pool, "update", "page_block", id).await, 1);
    assert_eq!(audit_count(&pool, "delete", "page_block", id).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_public_cannot_touch_blocks(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "public").await;

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/page-blocks", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, "/api/page-blocks/1", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
