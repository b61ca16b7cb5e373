//! Upload endpoint integration tests.
//!
//! Run with: `cargo test -p storereel-api --test upload_test`

mod helpers;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};

use helpers::{setup_test_app, setup_with_platform};
use storereel_ingest::test_helpers::MockPlatform;

fn video_form(len: usize) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", "Backstage clip")
        .add_text("source_type", "TikTok")
        .add_text("source_author", "@creator")
        .add_text("duration_seconds", "28")
        .add_part(
            "file",
            Part::bytes(vec![0u8; len])
                .file_name("backstage.mp4")
                .mime_type("video/mp4"),
        )
}

#[tokio::test]
async fn test_upload_commits_a_record() {
    let app = setup_test_app();

    let response = app
        .server
        .post("/api/v0/videos/upload?shop=shop-a.example.com")
        .multipart(video_form(1024))
        .await;

    assert_eq!(response.status_code(), 201);
    let video: serde_json::Value = response.json();
    assert_eq!(video["title"], "Backstage clip");
    assert_eq!(video["video_url"], "https://cdn.example.com/v/clip.mp4");
    assert_eq!(video["sort_order"], 1);
    assert_eq!(app.store.len(), 1);
    // sources came back with registration: no polling happened
    assert_eq!(app.platform.status_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upload_title_defaults_to_filename() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(vec![0u8; 64])
            .file_name("weekend-vlog.mp4")
            .mime_type("video/mp4"),
    );
    let response = app
        .server
        .post("/api/v0/videos/upload?shop=shop-a.example.com")
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 201);
    let video: serde_json::Value = response.json();
    assert_eq!(video["title"], "weekend-vlog");
}

#[tokio::test]
async fn test_upload_rejects_non_video_payload() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(vec![0u8; 64])
            .file_name("photo.png")
            .mime_type("image/png"),
    );
    let response = app
        .server
        .post("/api/v0/videos/upload?shop=shop-a.example.com")
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.store.is_empty());
    assert_eq!(app.platform.staged_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_text("title", "no file");
    let response = app
        .server
        .post("/api/v0/videos/upload?shop=shop-a.example.com")
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_upload_surfaces_staging_errors_as_bad_gateway() {
    let platform = Arc::new(MockPlatform::new().with_staging_error("File size not allowed"));
    let app = setup_with_platform(platform);

    let response = app
        .server
        .post("/api/v0/videos/upload?shop=shop-a.example.com")
        .multipart(video_form(1024))
        .await;

    assert_eq!(response.status_code(), 502);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "ASSET_SERVICE_ERROR");
    assert!(app.store.is_empty());
}
