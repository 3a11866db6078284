//! UI Routes - server-rendered upload page
//!
//! GET / shows the empty form; POST /extract handles one upload and shows
//! the same page with the outcome underneath. Both always answer 200 so the
//! browser stays on a usable page after a failure.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Html,
    routing::{get, post},
    Router,
};

use crate::render::render_page;
use crate::upload::handle_upload;
use crate::AppState;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_page))
        .route("/extract", post(extract_page))
}

/// GET /
async fn index_page() -> Html<String> {
    Html(render_page(None))
}

/// POST /extract
async fn extract_page(
    State(state): State<AppState>,
    upload: Result<Multipart, MultipartRejection>,
) -> Html<String> {
    let outcome = handle_upload(&state, upload).await;
    Html(render_page(Some(&outcome)))
}
