mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use sqlx::PgPool;

use common::{audit_count, json_request, send, setup_test_app, status_of, token_for};

const BOUNDARY: &str = "pagecraft-test-boundary";
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-an-image";

fn multipart_request(
    token: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    content: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/media")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_and_serve_file(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (editor, token) = token_for(&app, &pool, "editor").await;

    let (status, media) = send(
        &app,
        multipart_request(&token, "file", "logo.png", "image/png", PNG_BYTES),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{media}");
    assert_eq!(media["filename"], "logo.png");
    assert_eq!(media["mimetype"], "image/png");
    assert_eq!(media["filesize_bytes"], PNG_BYTES.len());
    assert_eq!(media["uploaded_by_user_id"], editor.id);

    let url = media["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/static/uploads/"));

    let status = status_of(&app, Request::builder().uri(&url).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);

    let id = media["id"].as_i64().unwrap();
    assert_eq!(audit_count(&pool, "upload", "media", id).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_rejects_disallowed_type(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "editor").await;

    let (status, body) = send(
        &app,
        multipart_request(&token, "file", "run.sh", "application/x-sh", b"#!/bin/sh"),
    )
    .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["error"].as_str().unwrap().contains("application/x-sh"));

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM media")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_rejects_oversized_file(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "editor").await;
    let content = vec![b'a'; 2048];

    let (status, _) = send(
        &app,
        multipart_request(&token, "file", "big.txt", "text/plain", &content),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_requires_file_field(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "editor").await;

    let (status, body) = send(
        &app,
        multipart_request(&token, "attachment", "notes.txt", "text/plain", b"hello"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "file is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_rejects_overlong_filename(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "editor").await;
    let filename = format!("{}.txt", "n".repeat(252));

    let (status, body) = send(
        &app,
        multipart_request(&token, "file", &filename, "text/plain", b"hello"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "filename must be at most 255 bytes");

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM media")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);

    let longest = format!("{}.txt", "n".repeat(251));
    let (status, media) = send(
        &app,
        multipart_request(&token, "file", &longest, "text/plain", b"hello"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(media["filename"], longest.as_str());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_with_long_extension_is_stored(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "editor").await;
    let filename = format!("a.{}", "x".repeat(240));

    let (status, media) = send(
        &app,
        multipart_request(&token, "file", &filename, "text/plain", b"hello"),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let url = media["url"].as_str().unwrap();
    assert!(!url.trim_start_matches("/static/uploads/").contains('.'));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_public_cannot_upload(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "public").await;

    let (status, _) = send(
        &app,
        multipart_request(&token, "file", "notes.txt", "text/plain", b"hello"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_get_and_delete_media(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let (_, token) = token_for(&app, &pool, "editor").await;

    let (_, first) = send(
        &app,
        multipart_request(&token, "file", "a.txt", "text/plain", b"first"),
    )
    .await;
    let (_, second) = send(
        &app,
        multipart_request(&token, "file", "b.txt", "text/plain", b"second"),
    )
    .await;

    let (status, list) = send(
        &app,
        json_request(Method::GET, "/api/media", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["meta"]["total"], 2);
    assert_eq!(list["data"][0]["id"], second["id"]);

    let id = first["id"].as_i64().unwrap();
    let (status, fetched) = send(
        &app,
        json_request(Method::GET, &format!("/api/media/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["filename"], "a.txt");

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, &format!("/api/media/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let url = first["url"].as_str().unwrap();
    let status = status_of(&app, Request::builder().uri(url).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        json_request(Method::GET, &format!("/api/media/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Media not found");

    assert_eq!(audit_count(&pool, "delete", "media", id).await, 1);
}
