use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Recording control
        .route("/recorder/start", post(handlers::start_recording))
        .route("/recorder/stop", post(handlers::stop_recording))
        // Recording state
        .route("/recorder/status", get(handlers::recorder_status))
        .route("/recorder/audio", get(handlers::recorder_audio))
        // Memos
        .route(
            "/memos",
            get(handlers::list_memos).post(handlers::create_memo),
        )
        .route(
            "/memos/:id",
            get(handlers::get_memo)
                .put(handlers::update_memo)
                .delete(handlers::delete_memo),
        )
        // Browser front ends call this API directly
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
