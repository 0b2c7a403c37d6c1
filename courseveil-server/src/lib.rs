//! HTTP API for the courseveil feedback attestation service.

pub mod allowlist;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};

pub use allowlist::{Allowlist, DEFAULT_NETWORKS};
pub use error::{ApiError, ErrorResponse};
pub use handlers::{
    AppState, CoursePageResponse, CreatedResponse, HealthResponse, IndexResponse,
    OverviewResponse, VerifyResponse,
};

/// Build the HTTP API router with the given application state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::index))
        .route("/overview/{year}/{course_id}", get(handlers::overview))
        .route("/new-course/{course_id}", get(handlers::new_course))
        .route("/course/{year}/{token}", get(handlers::course_page))
        .route("/course/{year}/{token}/verify/{signature}", get(handlers::verify))
        .with_state(state)
}
