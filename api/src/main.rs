use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use mw_api::{create_app, telemetry, AppState};
use mw_core::services::OtpService;
use mw_infra::{create_mailer, create_otp_store};
use mw_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init_tracing(&config.logging);

    info!(
        environment = %config.environment,
        "Starting MindWell OTP API Server"
    );

    let mailer = create_mailer(&config.mail, &config.otp);
    let store = create_otp_store(&config.cache)
        .await
        .context("Failed to initialize OTP store")?;
    let otp_service = Arc::new(OtpService::new(mailer, store, config.otp.clone()));

    spawn_cleanup(otp_service.clone(), config.server.cleanup_interval_seconds);

    let state = web::Data::new(AppState::new(otp_service));
    let cors = config.cors.clone();
    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone(), &cors));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("Server error")
}

/// Purge expired codes every `interval_seconds`
fn spawn_cleanup(service: Arc<OtpService>, interval_seconds: u64) {
    if interval_seconds == 0 {
        warn!("OTP cleanup disabled");
        return;
    }

    actix_web::rt::spawn(async move {
        let period = Duration::from_secs(interval_seconds);
        let mut ticker = actix_web::rt::time::interval_at(
            actix_web::rt::time::Instant::now() + period,
            period,
        );
        loop {
            ticker.tick().await;
            if let Err(e) = service.cleanup_expired().await {
                warn!(error = %e, "OTP cleanup run failed");
            }
        }
    });
}
