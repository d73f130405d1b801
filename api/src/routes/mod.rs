//! Route handlers
//!
//! - `otp` - issuing, resending and verifying codes
//! - `health` - liveness probe

pub mod health;
pub mod otp;

use actix_web::web;

/// Register every route of the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(otp::scope()),
        );
}
