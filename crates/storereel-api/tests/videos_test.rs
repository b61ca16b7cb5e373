//! Catalog API integration tests.
//!
//! Run with: `cargo test -p storereel-api --test videos_test`

mod helpers;

use helpers::{seed_video, setup_test_app};
use storereel_db::VideoStore;

#[tokio::test]
async fn test_list_videos_is_ordered_by_sort_order() {
    let app = setup_test_app();
    seed_video(&app, "shop-a.example.com", "first").await;
    seed_video(&app, "shop-a.example.com", "second").await;
    seed_video(&app, "other.example.com", "elsewhere").await;

    let response = app
        .server
        .get("/api/v0/videos?shop=shop-a.example.com")
        .await;

    assert_eq!(response.status_code(), 200);
    let videos: serde_json::Value = response.json();
    let videos = videos.as_array().unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0]["title"], "first");
    assert_eq!(videos[0]["sort_order"], 1);
    assert_eq!(videos[1]["title"], "second");
    assert_eq!(videos[1]["sort_order"], 2);
}

#[tokio::test]
async fn test_create_video_from_known_url() {
    let app = setup_test_app();

    let response = app
        .server
        .post("/api/v0/videos?shop=shop-a.example.com")
        .json(&serde_json::json!({
            "title": "Unboxing",
            "video_url": "https://cdn.example.com/v/unboxing.mp4",
            "source_type": "YouTube",
            "source_author": "@creator"
        }))
        .await;

    assert_eq!(response.status_code(), 201);
    let video: serde_json::Value = response.json();
    assert_eq!(video["title"], "Unboxing");
    assert_eq!(video["sort_order"], 1);
    assert_eq!(video["is_active"], true);
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn test_create_video_rejects_blank_title() {
    let app = setup_test_app();

    let response = app
        .server
        .post("/api/v0/videos?shop=shop-a.example.com")
        .json(&serde_json::json!({
            "title": "",
            "video_url": "https://cdn.example.com/v/x.mp4"
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_toggle_flips_only_the_target() {
    let app = setup_test_app();
    let first = seed_video(&app, "shop-a.example.com", "first").await;
    let second = seed_video(&app, "shop-a.example.com", "second").await;

    let response = app
        .server
        .post(&format!("/api/v0/videos/{}/toggle", first))
        .await;
    assert_eq!(response.status_code(), 200);
    let video: serde_json::Value = response.json();
    assert_eq!(video["is_active"], false);

    let untouched = app.store.get(second).await.unwrap().unwrap();
    assert!(untouched.is_active);
}

#[tokio::test]
async fn test_toggle_video_not_found() {
    let app = setup_test_app();
    let fake_id = uuid::Uuid::new_v4();

    let response = app
        .server
        .post(&format!("/api/v0/videos/{}/toggle", fake_id))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_delete_video_keeps_other_sort_orders() {
    let app = setup_test_app();
    let first = seed_video(&app, "shop-a.example.com", "first").await;
    seed_video(&app, "shop-a.example.com", "second").await;

    let response = app.server.delete(&format!("/api/v0/videos/{}", first)).await;
    assert_eq!(response.status_code(), 204);

    let listing = app
        .server
        .get("/api/v0/videos?shop=shop-a.example.com")
        .await;
    let videos: serde_json::Value = listing.json();
    let videos = videos.as_array().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0]["title"], "second");
    assert_eq!(videos[0]["sort_order"], 2);
}

#[tokio::test]
async fn test_delete_video_not_found() {
    let app = setup_test_app();
    let fake_id = uuid::Uuid::new_v4();

    let response = app
        .server
        .delete(&format!("/api/v0/videos/{}", fake_id))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_feed_returns_active_videos_with_cache_header() {
    let app = setup_test_app();
    let first = seed_video(&app, "shop-a.example.com", "visible").await;
    let second = seed_video(&app, "shop-a.example.com", "hidden").await;
    app.store.toggle_active(second).await.unwrap();

    let response = app.server.get("/api/v0/feed?shop=shop-a.example.com").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response
            .headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("public, max-age=60")
    );

    let body: serde_json::Value = response.json();
    let videos = body["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0]["title"], "visible");
    assert_eq!(videos[0]["id"], first.to_string());
}

#[tokio::test]
async fn test_missing_shop_parameter_is_rejected() {
    let app = setup_test_app();
    let response = app.server.get("/api/v0/videos").await;
    assert_eq!(response.status_code(), 400);
}
