use crate::handlers;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};

/// Upload cap. Axum's 2 MB default is too small for real datasets.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/workspace", get(handlers::get_workspace))
        .route("/api/upload", post(handlers::upload))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/navigate", post(handlers::navigate))
        .route("/api/theme", post(handlers::set_theme))
        .route("/api/reset", post(handlers::reset))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
