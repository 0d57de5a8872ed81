//! CORS configuration for the browser pages.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::WebshopConfig;

/// Build the CORS layer from the configured origins.
///
/// Credentials are allowed so the session cookie travels with cross-origin
/// API calls from the static pages; unparseable origins are skipped.
#[must_use]
pub fn cors_layer(config: &WebshopConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
