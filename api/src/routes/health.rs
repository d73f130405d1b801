use actix_web::HttpResponse;

use mw_shared::{HealthResponse, HealthStatus};

/// Name reported by the health endpoint
pub const SERVICE_NAME: &str = "mindwell-otp";

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: HealthStatus::Healthy,
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
