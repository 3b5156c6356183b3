//! HTTP front door: upload endpoint, health check and usage page.

pub mod error;
pub mod handlers;
pub mod usage;

use crate::core::importer::Importer;
use crate::core::OdooApi;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn OdooApi>,
    pub importer: Importer,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(client: Arc<dyn OdooApi>, upload_dir: PathBuf) -> Self {
        Self {
            importer: Importer::new(client.clone()),
            client,
            upload_dir,
        }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(usage::usage))
        .route("/health", get(handlers::health))
        .route("/import/{entity_type}", post(handlers::import_data))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
