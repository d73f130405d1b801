//! Shared fixtures for route tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mw_api::AppState;
use mw_core::domain::OtpCode;
use mw_core::services::{MailerTrait, OtpService, OtpStoreTrait};
use mw_infra::InMemoryOtpStore;
use mw_shared::{OtpConfig, OtpPurpose};

pub const EMAIL: &str = "user@example.com";

/// Mailer recording every code it was asked to deliver
#[derive(Default)]
pub struct CapturingMailer {
    sent: Mutex<Vec<(String, String, OtpPurpose)>>,
    fail: bool,
}

impl CapturingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn last_code(&self) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .last()
            .map(|(_, code, _)| code.clone())
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MailerTrait for CapturingMailer {
    async fn send_code(&self, email: &str, code: &str, purpose: OtpPurpose) -> Result<(), String> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string(), purpose));
        if self.fail {
            Err("smtp unavailable".to_string())
        } else {
            Ok(())
        }
    }
}

/// Store whose every operation fails
pub struct BrokenStore;

#[async_trait]
impl OtpStoreTrait for BrokenStore {
    async fn replace(&self, _code: &OtpCode) -> Result<(), String> {
        Err("connection refused".to_string())
    }

    async fn latest(&self, _email: &str, _purpose: OtpPurpose) -> Result<Option<OtpCode>, String> {
        Err("connection refused".to_string())
    }

    async fn compare_and_save(
        &self,
        _current: &OtpCode,
        _updated: &OtpCode,
    ) -> Result<bool, String> {
        Err("connection refused".to_string())
    }

    async fn purge_expired(&self) -> Result<usize, String> {
        Err("connection refused".to_string())
    }
}

pub struct Fixture {
    pub mailer: Arc<CapturingMailer>,
    pub store: Arc<InMemoryOtpStore>,
    pub state: actix_web::web::Data<AppState>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_mailer(CapturingMailer::default(), OtpConfig::default())
    }

    pub fn with_mailer(mailer: CapturingMailer, config: OtpConfig) -> Self {
        let mailer = Arc::new(mailer);
        let store = Arc::new(InMemoryOtpStore::new());
        let service = OtpService::new(mailer.clone(), store.clone(), config);
        Self {
            mailer,
            store,
            state: actix_web::web::Data::new(AppState::new(Arc::new(service))),
        }
    }

    pub fn broken() -> actix_web::web::Data<AppState> {
        let service = OtpService::new(
            Arc::new(CapturingMailer::default()),
            Arc::new(BrokenStore),
            OtpConfig::default(),
        );
        actix_web::web::Data::new(AppState::new(Arc::new(service)))
    }
}
