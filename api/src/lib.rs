//! HTTP API for email one-time passcodes
//!
//! Routes live under `/api/otp`; [`app::create_app`] assembles them with
//! CORS and request tracing.

pub mod app;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
pub use errors::ApiError;
