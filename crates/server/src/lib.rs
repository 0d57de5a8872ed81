//! Webshop server library.
//!
//! This crate provides the shop's HTTP service as a library, allowing it to
//! be spawned in-process by the integration tests and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use axum::middleware::from_fn;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::SqliteStore;

use crate::state::AppState;

/// Assemble the application router with all middleware layers applied.
///
/// API routes take precedence; anything else falls through to the static
/// file directory serving the browser pages.
#[must_use]
pub fn build_app(state: AppState, session_layer: SessionManagerLayer<SqliteStore>) -> Router {
    let cors = middleware::cors_layer(state.config());
    let public_dir = state.config().public_dir.clone();

    Router::new()
        .merge(routes::router())
        .fallback_service(ServeDir::new(public_dir))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
