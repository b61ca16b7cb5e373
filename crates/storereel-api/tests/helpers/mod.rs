//! Test helpers: build the router over the in-memory store and scripted
//! platform doubles, served through axum-test.

use std::sync::Arc;

use axum_test::TestServer;

use storereel_api::routes::build_router;
use storereel_api::state::AppState;
use storereel_core::models::AssetSource;
use storereel_core::Config;
use storereel_db::{MemoryVideoStore, VideoStore};
use storereel_ingest::test_helpers::{MockPlatform, MockTransferer};
use storereel_ingest::{PipelineConfig, UploadPipeline};

pub struct TestApp {
    pub server: TestServer,
    pub store: MemoryVideoStore,
    pub platform: Arc<MockPlatform>,
}

/// Server whose asset platform reports processed sources at registration,
/// so uploads complete without polling.
pub fn setup_test_app() -> TestApp {
    let platform = Arc::new(MockPlatform::new().with_register_sources(
        vec![AssetSource {
            url: "https://cdn.example.com/v/clip.mp4".to_string(),
            mime_type: "video/mp4".to_string(),
        }],
        Some("https://cdn.example.com/t/clip.jpg"),
    ));
    setup_with_platform(platform)
}

pub fn setup_with_platform(platform: Arc<MockPlatform>) -> TestApp {
    let store = MemoryVideoStore::new();
    let config = Config::default();

    let pipeline = Arc::new(UploadPipeline::new(
        platform.clone(),
        Arc::new(MockTransferer::new()),
        Arc::new(store.clone()),
        PipelineConfig::from(&config),
    ));

    let state = Arc::new(AppState {
        store: Arc::new(store.clone()) as Arc<dyn VideoStore>,
        pipeline,
        config: config.clone(),
    });

    let server = TestServer::new(build_router(state, &config)).expect("test server");
    TestApp {
        server,
        store,
        platform,
    }
}

pub async fn seed_video(app: &TestApp, shop: &str, title: &str) -> uuid::Uuid {
    let record = app
        .store
        .create(
            shop,
            storereel_core::models::NewVideo {
                title: title.to_string(),
                video_url: format!("https://cdn.example.com/{}.mp4", title),
                ..Default::default()
            },
        )
        .await
        .expect("seed video");
    record.id
}
