//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - OTP record storage backend
//! - `client` - settings for applications embedding the verification session
//! - `environment` - Environment detection and logging configuration
//! - `mail` - outbound mail delivery
//! - `otp` - code length, lifetime, resend cooldown and attempt limits
//! - `server` - HTTP server and CORS configuration

pub mod cache;
pub mod client;
pub mod environment;
pub mod mail;
pub mod otp;
pub mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use cache::{CacheConfig, CacheType};
pub use client::ClientConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use mail::{MailConfig, MailProvider};
pub use otp::OtpConfig;
pub use server::{CorsConfig, ServerConfig};

/// Prefix of environment variables overriding configuration keys,
/// e.g. `MINDWELL__SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "MINDWELL";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// CORS configuration
    pub cors: CorsConfig,

    /// OTP policy
    pub otp: OtpConfig,

    /// Mail delivery
    pub mail: MailConfig,

    /// OTP record storage
    pub cache: CacheConfig,

    /// Verification client settings
    pub client: ClientConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Baseline configuration for an environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            server: ServerConfig::default(),
            cors: CorsConfig::default(),
            otp: OtpConfig::default(),
            mail: MailConfig::default(),
            cache: CacheConfig::default(),
            client: ClientConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load configuration for the environment named by `ENVIRONMENT`
    ///
    /// Sources, lowest precedence first:
    /// 1. built-in defaults for the environment
    /// 2. `config.<environment>.toml` in the working directory, if present
    /// 3. `MINDWELL__*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        dotenvy::from_filename(environment.env_file()).ok();
        dotenvy::dotenv().ok();
        Self::load_from(environment, Some(environment.config_file()))
    }

    /// Load configuration from an explicit file (without extension)
    pub fn load_from(environment: Environment, file: Option<&str>) -> Result<Self, ConfigError> {
        let defaults = config::Config::try_from(&Self::for_environment(environment))?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(file) = file {
            builder = builder.add_source(config::File::with_name(file).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        );

        let mut loaded: AppConfig = builder.build()?.try_deserialize()?;
        loaded.environment = environment;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.otp.code_length == 0 {
            return Err(ConfigError::Invalid("otp.code_length must be at least 1".into()));
        }
        if self.otp.max_attempts == 0 {
            return Err(ConfigError::Invalid("otp.max_attempts must be at least 1".into()));
        }
        if self.otp.resend_cooldown_seconds > self.otp.expiry_seconds {
            return Err(ConfigError::Invalid(
                "otp.resend_cooldown_seconds cannot exceed otp.expiry_seconds".into(),
            ));
        }
        if self.mail.provider == MailProvider::Smtp && !self.mail.has_credentials() {
            return Err(ConfigError::Invalid(
                "mail.provider = smtp requires mail.username and mail.password".into(),
            ));
        }
        if self.environment.is_production() && self.cors.is_permissive() {
            return Err(ConfigError::Invalid(
                "cors.allowed_origins must be set in production".into(),
            ));
        }
        Ok(())
    }
}
