pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(handlers::handle_intake))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_discard),
        )
        .route("/api/v1/sessions/:id/answer", post(handlers::handle_answer))
        .route("/api/v1/sessions/:id/skip", post(handlers::handle_skip))
        .route("/api/v1/sessions/:id/back", post(handlers::handle_back))
        .route("/api/v1/sessions/:id/finish", post(handlers::handle_finish))
        .route(
            "/api/v1/sessions/:id/navigate",
            post(handlers::handle_navigate),
        )
        .route("/api/v1/sessions/:id/report", get(handlers::handle_report))
        // Persisted dashboards and reference data
        .route("/api/v1/history", get(handlers::handle_history))
        .route("/api/v1/analytics", get(handlers::handle_analytics))
        .route("/api/v1/jobs", get(handlers::handle_jobs))
        // Degradable features
        .route("/api/v1/cv/extract", post(handlers::handle_cv_extract))
        .route("/api/v1/speech", post(handlers::handle_speech))
        .with_state(state)
}
