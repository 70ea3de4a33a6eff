//! CORS policy for the fan sites
//!
//! Only the configured origins are echoed back; they also receive
//! `Access-Control-Allow-Credentials: true` so the session cookie travels.
//! Preflight requests are answered by the layer itself with 200.

use axum::http::{HeaderName, HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::CorsLayer;

pub const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

pub const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let mut allowed_origins = Vec::with_capacity(origins.len());
    for origin in origins {
        match origin.parse::<HeaderValue>() {
            Ok(v) => allowed_origins.push(v),
            Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
        }
    }

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
        .max_age(PREFLIGHT_MAX_AGE)
}
