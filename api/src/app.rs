//! Application state and factory

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, Error, HttpResponse};
use tracing_actix_web::TracingLogger;

use mw_core::services::OtpService;
use mw_shared::CorsConfig;

use crate::errors::ApiError;
use crate::middleware::create_cors;
use crate::routes;

/// Application state that holds shared services
pub struct AppState {
    pub otp_service: Arc<OtpService>,
}

impl AppState {
    pub fn new(otp_service: Arc<OtpService>) -> Self {
        Self { otp_service }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
    cors: &CorsConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(json_config())
        .wrap(create_cors(cors))
        .wrap(TracingLogger::default())
        .configure(routes::configure)
        .default_service(web::route().to(not_found))
}

/// Malformed JSON bodies get the same `{ "message" }` shape as other errors
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(format!("Invalid request body: {}", err)).into())
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(mw_shared::MessageResponse::new("Route not found"))
}
