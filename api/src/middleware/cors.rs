//! CORS middleware configuration for the web frontend.
//!
//! With no configured origins any origin is accepted, which configuration
//! validation only allows outside production.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use mw_shared::CorsConfig;

/// Creates a CORS middleware instance from configuration.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![
            header::RETRY_AFTER,
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(config.max_age);

    if config.is_permissive() {
        tracing::info!("Configuring permissive CORS");
        return cors.allow_any_origin();
    }

    config
        .allowed_origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .fold(cors.supports_credentials(), |cors, origin| {
            tracing::info!("Adding allowed origin: {}", origin);
            cors.allowed_origin(origin)
        })
}
