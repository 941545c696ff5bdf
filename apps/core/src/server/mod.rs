//! HTTP surface.
//!
//! REST endpoints for the chat widget and the FAQ pages.

mod routes;

use crate::brain::FaqAssistant;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<FaqAssistant>,
}

impl AppState {
    pub fn new(assistant: FaqAssistant) -> Self {
        Self {
            assistant: Arc::new(assistant),
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        // Chat
        .route("/api/chat", post(routes::chat))
        // FAQ pages
        .route("/api/faq/:id/helpful", post(routes::mark_helpful))
        .route("/api/faq/categories", get(routes::categories))
        .route("/api/faq/category/:category", get(routes::by_category))
        .route("/api/faq/search", get(routes::search))
        .route("/api/faq/popular", get(routes::popular))
        .route("/api/faq/suggestions", get(routes::suggestions))
        // Health check
        .route("/health", get(routes::health))
        // Middleware
        .layer(CatchPanicLayer::custom(routes::panic_response))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
