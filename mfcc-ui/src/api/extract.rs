//! JSON extraction API
//!
//! POST /api/extract takes the same multipart form as the page and answers
//! with the serialized [`UploadOutcome`](crate::upload::UploadOutcome):
//! 200 on success, 400 when the upload is rejected, 422 when extraction fails.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    routing::post,
    Router,
};

use crate::upload::{handle_upload, UploadOutcome};
use crate::AppState;

/// POST /api/extract
pub async fn extract_json(
    State(state): State<AppState>,
    upload: Result<Multipart, MultipartRejection>,
) -> UploadOutcome {
    handle_upload(&state, upload).await
}

/// Build extraction API routes
pub fn extract_routes() -> Router<AppState> {
    Router::new().route("/api/extract", post(extract_json))
}
