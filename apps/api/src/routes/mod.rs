pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resumes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/v1/resumes/extract", post(handlers::handle_extract))
        .route(
            "/api/v1/resumes/analyze",
            post(handlers::handle_analyze_upload),
        )
        .route("/api/v1/analysis", post(handlers::handle_analyze_text))
        .layer(upload_limit)
        .with_state(state)
}
