//! Route handlers and router composition.

pub mod admin;
pub mod cart;
pub mod products;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        // Public catalog and cart
        .route("/api/products", get(products::list))
        .route("/api/products/{id}", get(products::show))
        .route("/api/cart", get(cart::show))
        .route("/api/cart/items", post(cart::add))
        .route(
            "/api/cart/items/{product_id}",
            put(cart::update).delete(cart::remove),
        )
        // Admin panel
        .route("/api/admin/login", post(admin::login))
        .route(
            "/api/admin/products",
            get(products::list).post(admin::create_product),
        )
        .route(
            "/api/admin/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/api/admin/credentials", get(admin::credentials))
        .route("/api/admin/update-username", post(admin::update_username))
        .route("/api/admin/update-password", post(admin::update_password))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
