//! mfcc-ui library - Upload interface for MFCC extraction
//!
//! One HTTP request per upload: the handler receives the file, checks its
//! extension, runs the extractor, and returns an [`upload::UploadOutcome`]
//! that is rendered as HTML or JSON. No session state is kept between
//! requests.

pub mod api;
pub mod cli;
pub mod render;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use mfcc_extractor::{FeatureExtractor, MfccExtractor};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
///
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Audio bytes → MFCC matrix
    pub extractor: Arc<dyn FeatureExtractor>,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(extractor: Arc<dyn FeatureExtractor>, max_upload_bytes: usize) -> Self {
        Self {
            extractor,
            max_upload_bytes,
            startup_time: Utc::now(),
        }
    }

    /// State backed by the production MFCC extractor
    pub fn with_mfcc_extractor(max_upload_bytes: usize) -> Self {
        Self::new(Arc::new(MfccExtractor::new()), max_upload_bytes)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let body_limit = state.max_upload_bytes;

    Router::new()
        // UI routes (HTML pages)
        .merge(api::ui_routes())
        // JSON API
        .merge(api::extract_routes())
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
