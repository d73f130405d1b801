//! End-to-end verification flow: a client session driving the OTP service
//! in-process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use mw_core::client::{
    EntryEvent, EntryOutcome, FlowStep, NavigationSink, PendingIdentityStore, Redirect,
    SessionPhase, VerificationSession, PENDING_IDENTITY_KEY,
};
use mw_core::domain::OtpCode;
use mw_core::errors::SessionError;
use mw_core::services::{MailerTrait, OtpService, OtpStoreTrait};
use mw_shared::{OtpConfig, OtpPurpose};

const EMAIL: &str = "user@example.com";

#[derive(Default)]
struct Outbox {
    sent: Mutex<Vec<(String, String)>>,
}

impl Outbox {
    fn last_code(&self) -> String {
        self.sent
            .lock()
            .unwrap()
            .last()
            .map(|(_, code)| code.clone())
            .expect("a code was mailed")
    }
}

#[async_trait]
impl MailerTrait for Outbox {
    async fn send_code(&self, email: &str, code: &str, _purpose: OtpPurpose) -> Result<(), String> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
        Ok(())
    }
}

#[derive(Default)]
struct Codes {
    codes: Mutex<HashMap<(String, OtpPurpose), OtpCode>>,
}

#[async_trait]
impl OtpStoreTrait for Codes {
    async fn replace(&self, code: &OtpCode) -> Result<(), String> {
        self.codes
            .lock()
            .unwrap()
            .insert((code.email.clone(), code.purpose), code.clone());
        Ok(())
    }

    async fn latest(&self, email: &str, purpose: OtpPurpose) -> Result<Option<OtpCode>, String> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .get(&(email.to_string(), purpose))
            .cloned())
    }

    async fn compare_and_save(&self, current: &OtpCode, updated: &OtpCode) -> Result<bool, String> {
        let mut codes = self.codes.lock().unwrap();
        let key = (current.email.clone(), current.purpose);
        if codes.get(&key) != Some(current) {
            return Ok(false);
        }
        codes.insert(key, updated.clone());
        Ok(true)
    }

    async fn purge_expired(&self) -> Result<usize, String> {
        let now = Utc::now();
        let mut codes = self.codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|_, code| code.expires_at > now);
        Ok(before - codes.len())
    }
}

#[derive(Default)]
struct Browser {
    storage: Mutex<HashMap<String, String>>,
    redirects: Mutex<Vec<Redirect>>,
}

#[async_trait]
impl PendingIdentityStore for Browser {
    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.storage.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.storage
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), String> {
        self.storage.lock().unwrap().remove(key);
        Ok(())
    }
}

impl NavigationSink for Browser {
    fn navigate(&self, redirect: Redirect) {
        self.redirects.lock().unwrap().push(redirect);
    }
}

fn wrong_code(code: &str) -> String {
    code.chars()
        .map(|c| if c == '9' { '1' } else { '9' })
        .collect()
}

async fn type_code(
    session: &VerificationSession<OtpService, Browser, Browser>,
    code: &str,
) -> Result<EntryOutcome, SessionError> {
    // Empty the last slot so the buffer only fills on the final digit
    let _ = session
        .input(EntryEvent::character(code.len() - 1, ""))
        .await;
    let mut last = Ok(EntryOutcome::Ignored);
    for (slot, ch) in code.chars().enumerate() {
        last = session
            .input(EntryEvent::character(slot, ch.to_string()))
            .await;
    }
    last
}

#[tokio::test(start_paused = true)]
async fn test_signup_verification_flow() {
    let outbox = Arc::new(Outbox::default());
    let service = Arc::new(OtpService::new(
        outbox.clone(),
        Arc::new(Codes::default()),
        OtpConfig::default(),
    ));
    let browser = Arc::new(Browser::default());

    // Signup issues the code and hands the address to the verification page
    service
        .send_code(EMAIL, OtpPurpose::EmailVerification)
        .await
        .unwrap();
    let code = outbox.last_code();

    let session = VerificationSession::builder(service.clone(), browser.clone(), browser.clone())
        .with_identity(EMAIL)
        .build();
    session.start().await.unwrap();
    assert_eq!(
        browser.storage.lock().unwrap().get(PENDING_IDENTITY_KEY).cloned(),
        Some(EMAIL.to_string())
    );

    // A typo is reported inline and leaves the digits in place
    let result = type_code(&session, &wrong_code(&code)).await;
    assert_eq!(
        result,
        Err(SessionError::VerificationRejected {
            message: "Invalid OTP code".to_string()
        })
    );
    assert_eq!(
        session.phase(),
        SessionPhase::Failed {
            message: "Invalid OTP code".to_string()
        }
    );

    // Resending right away is refused by the server cooldown
    assert_eq!(
        session.resend().await,
        Err(SessionError::ResendRejected {
            message: "Please wait 1 minute before requesting a new OTP".to_string()
        })
    );

    // Correcting the code verifies the address
    let result = type_code(&session, &code).await;
    assert_eq!(result, Ok(EntryOutcome::Completed(code.clone())));
    assert_eq!(session.phase(), SessionPhase::Verified);
    assert!(browser.storage.lock().unwrap().is_empty());

    tokio::time::sleep(Duration::from_millis(2001)).await;
    let redirects = browser.redirects.lock().unwrap().clone();
    assert_eq!(redirects.len(), 1);
    assert_eq!(redirects[0].step, FlowStep::SignIn);
    assert_eq!(redirects[0].identity.as_deref(), Some(EMAIL));
}

#[tokio::test]
async fn test_reload_resumes_pending_verification() {
    let outbox = Arc::new(Outbox::default());
    let service = Arc::new(OtpService::new(
        outbox.clone(),
        Arc::new(Codes::default()),
        OtpConfig::default(),
    ));
    let browser = Arc::new(Browser::default());
    service
        .send_code(EMAIL, OtpPurpose::EmailVerification)
        .await
        .unwrap();

    // First visit persists the address, then the page goes away
    let first = VerificationSession::builder(service.clone(), browser.clone(), browser.clone())
        .with_identity(EMAIL)
        .build();
    first.start().await.unwrap();
    drop(first);

    // The reloaded page has no handed-over address
    let reloaded =
        VerificationSession::builder(service.clone(), browser.clone(), browser.clone()).build();
    assert_eq!(reloaded.start().await.unwrap(), EMAIL);

    reloaded.submit(&outbox.last_code()).await.unwrap();
    assert_eq!(reloaded.phase(), SessionPhase::Verified);
    assert!(browser.redirects.lock().unwrap().is_empty());
}
