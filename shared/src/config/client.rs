//! Verification client configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings used by applications embedding the verification session
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the OTP API, e.g. `http://localhost:5000/api`
    pub api_base_url: String,

    /// File backing the durable pending-identity slot
    pub pending_store_path: PathBuf,

    /// HTTP request timeout in seconds
    pub request_timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::from("http://localhost:5000/api"),
            pending_store_path: PathBuf::from(".mindwell/pending.json"),
            request_timeout_seconds: 15,
        }
    }
}
