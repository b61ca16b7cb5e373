//! Application state shared by all handlers.

use std::sync::Arc;

use storereel_core::Config;
use storereel_db::VideoStore;
use storereel_ingest::UploadPipeline;

pub struct AppState {
    pub store: Arc<dyn VideoStore>,
    pub pipeline: Arc<UploadPipeline>,
    pub config: Config,
}
