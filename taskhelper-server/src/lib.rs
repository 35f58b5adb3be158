//! TaskHelper web server.
//!
//! Serves the page routes (each answering with a view id), the form login
//! and logout endpoints, and the session-backed access policy in front of
//! them. State lives in memory; nothing is persisted.

pub mod handlers;
pub mod infra;
pub mod middleware;
pub mod routes;
pub mod views;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use infra::app_state::AppState;

/// Build the complete application with its state applied.
pub fn create_app(state: AppState) -> Router {
    routes::create_router(state.clone())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
