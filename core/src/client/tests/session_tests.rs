//! Unit tests for the verification session state machine

use mw_shared::OtpPurpose;

use crate::client::{
    EntryEvent, EntryOutcome, FlowStep, NoticeKind, Redirect, ResendReply, SessionConfig,
    SessionPhase, VerifyReply, PENDING_IDENTITY_KEY,
};
use crate::errors::{GatewayError, SessionError, SessionResult};

use super::mocks::{Harness, MockStore, TestSession, EMAIL};

async fn type_code(session: &TestSession, code: &str) -> SessionResult<EntryOutcome> {
    let mut last = Ok(EntryOutcome::Ignored);
    for (slot, ch) in code.chars().enumerate() {
        last = session
            .input(EntryEvent::character(slot, ch.to_string()))
            .await;
    }
    last
}

fn digits(snapshot_slots: &[Option<char>]) -> String {
    snapshot_slots.iter().flatten().collect()
}

#[tokio::test]
async fn test_start_uses_stored_identity() {
    let harness = Harness::new(MockStore::with_pending(EMAIL));
    let session = harness.session(SessionConfig::default());

    let identity = session.start().await.unwrap();

    assert_eq!(identity, EMAIL);
    assert_eq!(session.identity().as_deref(), Some(EMAIL));
    assert!(harness.navigator.redirects().is_empty());
    assert!(harness.gateway.verify_calls().is_empty());
    assert!(harness.gateway.resend_calls().is_empty());

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.expiry_seconds, 600);
    assert_eq!(snapshot.cooldown_seconds, 0);
    assert_eq!(snapshot.slots.len(), 6);
    assert!(!snapshot.input_disabled);
}

#[tokio::test]
async fn test_start_without_identity_redirects_to_signup() {
    let harness = Harness::new(MockStore::new());
    let session = harness.session(SessionConfig::default());

    let result = session.start().await;

    assert_eq!(result, Err(SessionError::NoPendingIdentity));
    assert_eq!(
        harness.navigator.redirects(),
        vec![Redirect::to(FlowStep::IdentityCollection)]
    );

    // Never verifies without a subject
    assert_eq!(
        session.submit("123456").await,
        Err(SessionError::NoPendingIdentity)
    );
    assert_eq!(session.resend().await, Err(SessionError::NoPendingIdentity));
    assert!(harness.gateway.verify_calls().is_empty());
    assert!(harness.gateway.resend_calls().is_empty());
}

#[tokio::test]
async fn test_explicit_identity_wins_and_is_persisted() {
    let harness = Harness::new(MockStore::with_pending("old@example.com"));
    let session = harness.builder().with_identity(" new@example.com ").build();

    let identity = session.start().await.unwrap();

    assert_eq!(identity, "new@example.com");
    assert_eq!(harness.store.pending().as_deref(), Some("new@example.com"));
}

#[tokio::test]
async fn test_blank_identities_count_as_absent() {
    let harness = Harness::new(MockStore::with_pending("   "));
    let session = harness.builder().with_identity("").build();

    assert_eq!(session.start().await, Err(SessionError::NoPendingIdentity));
    assert_eq!(harness.navigator.redirects().len(), 1);
}

#[tokio::test]
async fn test_store_read_failure_is_treated_as_absent() {
    let harness = Harness::new(MockStore {
        fail_reads: true,
        ..MockStore::default()
    });
    let session = harness.session(SessionConfig::default());

    assert_eq!(session.start().await, Err(SessionError::NoPendingIdentity));
    assert_eq!(
        harness.navigator.redirects()[0].step,
        FlowStep::IdentityCollection
    );
}

#[tokio::test]
async fn test_store_write_failure_does_not_block_start() {
    let harness = Harness::new(MockStore {
        fail_writes: true,
        ..MockStore::default()
    });
    let session = harness.builder().with_identity(EMAIL).build();

    assert_eq!(session.start().await.unwrap(), EMAIL);
    assert!(harness.navigator.redirects().is_empty());
}

#[tokio::test]
async fn test_start_is_idempotent() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    assert_eq!(session.start().await.unwrap(), EMAIL);
    assert!(harness.navigator.redirects().is_empty());
}

#[tokio::test]
async fn test_completed_entry_submits_code() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    harness
        .gateway
        .push_verify(Ok(VerifyReply::verified("OTP verified successfully")));

    let outcome = type_code(&session, "123456").await.unwrap();

    assert_eq!(outcome, EntryOutcome::Completed("123456".to_string()));
    assert_eq!(
        harness.gateway.verify_calls(),
        vec![(
            EMAIL.to_string(),
            "123456".to_string(),
            OtpPurpose::EmailVerification
        )]
    );
    assert_eq!(session.phase(), SessionPhase::Verified);
}

#[tokio::test]
async fn test_rejected_code_keeps_buffer_and_reenables_input() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    harness
        .gateway
        .push_verify(Ok(VerifyReply::rejected("Invalid code")));

    let result = type_code(&session, "123456").await;

    assert_eq!(
        result,
        Err(SessionError::VerificationRejected {
            message: "Invalid code".to_string()
        })
    );
    let snapshot = session.snapshot();
    assert_eq!(
        snapshot.phase,
        SessionPhase::Failed {
            message: "Invalid code".to_string()
        }
    );
    assert_eq!(digits(&snapshot.slots), "123456");
    assert_eq!(snapshot.error.as_deref(), Some("Invalid code"));
    assert!(!snapshot.input_disabled);
    assert_eq!(
        harness.notifier.notices(),
        vec![("Invalid code".to_string(), NoticeKind::Error)]
    );
}

#[tokio::test]
async fn test_rejection_without_reason_uses_fallback() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    harness.gateway.push_verify(Ok(VerifyReply {
        verified: false,
        message: None,
    }));

    let result = session.submit("123456").await;

    assert_eq!(
        result,
        Err(SessionError::VerificationRejected {
            message: "Verification failed. Please try again.".to_string()
        })
    );
}

#[tokio::test]
async fn test_service_errors_surface_inline() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    harness.gateway.push_verify(Err(GatewayError::Service {
        status: 500,
        message: Some("Failed to verify OTP".to_string()),
    }));
    harness
        .gateway
        .push_verify(Err(GatewayError::Transport("connection refused".to_string())));

    assert_eq!(
        session.submit("123456").await,
        Err(SessionError::VerificationService {
            message: "Failed to verify OTP".to_string()
        })
    );
    assert_eq!(
        session.submit("123456").await,
        Err(SessionError::VerificationService {
            message: "Verification failed. Please try again.".to_string()
        })
    );

    let snapshot = session.snapshot();
    assert!(matches!(snapshot.phase, SessionPhase::Failed { .. }));
    assert!(!snapshot.input_disabled);
}

#[tokio::test]
async fn test_corrected_code_is_resubmitted() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    harness
        .gateway
        .push_verify(Ok(VerifyReply::rejected("Invalid OTP code")));
    harness
        .gateway
        .push_verify(Ok(VerifyReply::verified("OTP verified successfully")));

    assert!(type_code(&session, "123456").await.is_err());

    // Typing over the same digits does not resubmit
    assert_eq!(
        type_code(&session, "123456").await,
        Ok(EntryOutcome::Updated)
    );
    assert_eq!(harness.gateway.verify_calls().len(), 1);

    // Correcting the last digit does
    let outcome = session.input(EntryEvent::character(5, "7")).await;
    assert_eq!(outcome, Ok(EntryOutcome::Completed("123457".to_string())));
    assert_eq!(harness.gateway.verify_calls().len(), 2);
    assert_eq!(session.phase(), SessionPhase::Verified);
}

#[tokio::test]
async fn test_unlimited_local_retries() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    for _ in 0..10 {
        harness
            .gateway
            .push_verify(Ok(VerifyReply::rejected("Invalid OTP code")));
        assert!(matches!(
            session.submit("000000").await,
            Err(SessionError::VerificationRejected { .. })
        ));
    }
    assert_eq!(harness.gateway.verify_calls().len(), 10);
    assert!(!session.snapshot().input_disabled);
}

#[tokio::test]
async fn test_malformed_code_is_not_sent() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;

    assert_eq!(
        session.submit("12345").await,
        Err(SessionError::InvalidCode { expected: 6 })
    );
    assert_eq!(
        session.submit("12345a").await,
        Err(SessionError::InvalidCode { expected: 6 })
    );
    assert!(harness.gateway.verify_calls().is_empty());
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[tokio::test]
async fn test_verified_clears_store_and_notifies() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    harness
        .gateway
        .push_verify(Ok(VerifyReply::verified("OTP verified successfully")));

    session.submit("123456").await.unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Verified);
    assert!(snapshot.input_disabled);
    assert!(snapshot.slots.iter().all(Option::is_none));
    assert_eq!(snapshot.active_index, 0);
    assert_eq!(harness.store.pending(), None);
    assert!(!harness
        .store
        .values
        .lock()
        .unwrap()
        .contains_key(PENDING_IDENTITY_KEY));
    assert_eq!(
        harness.notifier.notices(),
        vec![(
            "Email verified successfully! You can now log in.".to_string(),
            NoticeKind::Success
        )]
    );

    // Terminal
    assert_eq!(
        session.submit("123456").await,
        Err(SessionError::AlreadyVerified)
    );
    assert_eq!(session.resend().await, Err(SessionError::AlreadyVerified));
    assert_eq!(
        session.input(EntryEvent::backspace(1)).await,
        Err(SessionError::AlreadyVerified)
    );
}

#[tokio::test]
async fn test_input_disabled_while_submitting() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    let gate = harness.gateway.gate_verify();

    let submit = session.submit("123456");
    let probe = async {
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Submitting);
        assert!(snapshot.input_disabled);
        assert_eq!(
            session.input(EntryEvent::character(0, "9")).await,
            Ok(EntryOutcome::Ignored)
        );
        assert_eq!(
            session.submit("654321").await,
            Err(SessionError::InputDisabled)
        );
        gate.send(Ok(VerifyReply::rejected("Invalid OTP code")))
            .unwrap();
    };

    let (result, ()) = tokio::join!(submit, probe);
    assert!(matches!(
        result,
        Err(SessionError::VerificationRejected { .. })
    ));
    assert_eq!(harness.gateway.verify_calls().len(), 1);
}

#[tokio::test]
async fn test_late_response_does_not_override_newer_submission() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    let first_gate = harness.gateway.gate_verify();
    harness
        .gateway
        .push_verify(Ok(VerifyReply::verified("OTP verified successfully")));

    let first = session.submit("111111");
    let later = async {
        assert_eq!(session.phase(), SessionPhase::Submitting);
        session.resend().await.unwrap();
        session.submit("222222").await.unwrap();
        first_gate
            .send(Ok(VerifyReply::rejected("Invalid OTP code")))
            .unwrap();
    };

    let (first_result, ()) = tokio::join!(first, later);

    assert_eq!(first_result, Err(SessionError::StaleResponse));
    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Verified);
    assert_eq!(snapshot.error, None);
}

#[tokio::test]
async fn test_late_response_while_newer_submission_in_flight() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    let first_gate = harness.gateway.gate_verify();
    let second_gate = harness.gateway.gate_verify();

    let first = session.submit("111111");
    let second = async {
        session.resend().await.unwrap();
        let second = session.submit("222222");
        let release = async {
            // The stale reply lands while the second submission is pending
            first_gate
                .send(Ok(VerifyReply::verified("OTP verified successfully")))
                .unwrap();
            tokio::task::yield_now().await;
            assert_eq!(session.phase(), SessionPhase::Submitting);
            second_gate
                .send(Ok(VerifyReply::rejected("Invalid OTP code")))
                .unwrap();
        };
        tokio::join!(second, release).0
    };

    let (first_result, second_result) = tokio::join!(first, second);

    assert_eq!(first_result, Err(SessionError::StaleResponse));
    assert_eq!(
        second_result,
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
    assert_eq!(harness.store.pending().as_deref(), Some(EMAIL));
}

#[tokio::test]
async fn test_resend_supersedes_pending_submission() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    let gate = harness.gateway.gate_verify();

    let submit = session.submit("111111");
    let resend = async {
        session.resend().await.unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Idle);
        assert!(!snapshot.input_disabled);
        gate.send(Ok(VerifyReply::verified("OTP verified successfully")))
            .unwrap();
    };

    let (result, ()) = tokio::join!(submit, resend);

    assert_eq!(result, Err(SessionError::StaleResponse));
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(harness.store.pending().as_deref(), Some(EMAIL));
}

#[tokio::test(start_paused = true)]
async fn test_resend_reply_after_verification_is_discarded() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    let verify_gate = harness.gateway.gate_verify();
    let resend_gate = harness.gateway.gate_resend();

    let submit = session.submit("123456");
    let resend = session.resend();
    let release = async {
        verify_gate
            .send(Ok(VerifyReply::verified("OTP verified successfully")))
            .unwrap();
        tokio::task::yield_now().await;
        assert_eq!(session.phase(), SessionPhase::Verified);
        resend_gate
            .send(Ok(ResendReply::sent("OTP resent successfully to your email")))
            .unwrap();
    };

    let (submit_result, resend_result, ()) = tokio::join!(submit, resend, release);

    assert_eq!(submit_result, Ok(()));
    assert_eq!(resend_result, Err(SessionError::StaleResponse));
    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Verified);
    assert_eq!(snapshot.cooldown_seconds, 0);
    assert_eq!(snapshot.expiry_seconds, 600);
    assert!(!snapshot.resend_in_flight);
    assert!(snapshot.input_disabled);
    assert_eq!(harness.gateway.resend_calls(), vec![EMAIL.to_string()]);

    tokio::time::sleep(std::time::Duration::from_millis(2500)).await;
    let redirects = harness.navigator.redirects();
    assert_eq!(redirects.len(), 1);
    assert_eq!(redirects[0].step, FlowStep::SignIn);
}

#[tokio::test]
async fn test_successful_resend_resets_entry_and_error() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    harness
        .gateway
        .push_verify(Ok(VerifyReply::rejected("Invalid OTP code")));
    let _ = type_code(&session, "123456").await;
    assert!(session.snapshot().error.is_some());

    session.resend().await.unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.error, None);
    assert!(snapshot.slots.iter().all(Option::is_none));
    assert_eq!(snapshot.active_index, 0);
    assert_eq!(snapshot.cooldown_seconds, 60);
    assert_eq!(snapshot.expiry_seconds, 600);
    assert_eq!(harness.gateway.resend_calls(), vec![EMAIL.to_string()]);
    assert!(harness
        .notifier
        .notices()
        .contains(&("OTP resent successfully to your email".to_string(), NoticeKind::Info)));
}

#[tokio::test]
async fn test_resend_during_cooldown_is_noop() {
    let config = SessionConfig {
        initial_cooldown_seconds: 60,
        ..SessionConfig::default()
    };
    let (harness, session) = Harness::started(config).await;
    let before = session.snapshot();

    let result = session.resend().await;

    assert_eq!(
        result,
        Err(SessionError::CooldownActive {
            remaining_seconds: 60
        })
    );
    assert!(harness.gateway.resend_calls().is_empty());
    assert_eq!(session.snapshot(), before);
}

#[tokio::test]
async fn test_refused_resend_shows_error_and_keeps_phase() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    harness
        .gateway
        .push_resend(Ok(ResendReply::refused("Please wait 1 minute before requesting a new OTP")));
    harness.gateway.push_resend(Err(GatewayError::Transport(
        "connection reset".to_string(),
    )));

    assert_eq!(
        session.resend().await,
        Err(SessionError::ResendRejected {
            message: "Please wait 1 minute before requesting a new OTP".to_string()
        })
    );
    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.cooldown_seconds, 0);
    assert!(!snapshot.resend_in_flight);
    assert!(!snapshot.input_disabled);
    assert_eq!(
        snapshot.error.as_deref(),
        Some("Please wait 1 minute before requesting a new OTP")
    );

    assert_eq!(
        session.resend().await,
        Err(SessionError::ResendService {
            message: "Failed to resend OTP. Please try again.".to_string()
        })
    );
}

#[tokio::test]
async fn test_concurrent_resend_is_rejected() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    let gate = harness.gateway.gate_resend();

    let first = session.resend();
    let second = async {
        let snapshot = session.snapshot();
        assert!(snapshot.resend_in_flight);
        assert!(snapshot.input_disabled);
        assert!(!snapshot.can_resend());
        let result = session.resend().await;
        gate.send(Ok(ResendReply::sent("OTP resent successfully to your email")))
            .unwrap();
        result
    };

    let (first_result, second_result) = tokio::join!(first, second);

    assert_eq!(first_result, Ok(()));
    assert_eq!(second_result, Err(SessionError::InputDisabled));
    assert_eq!(harness.gateway.resend_calls().len(), 1);
}

#[tokio::test]
async fn test_submit_rejected_while_resend_in_flight() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    let gate = harness.gateway.gate_resend();

    let resend = session.resend();
    let submit = async {
        let result = session.submit("123456").await;
        gate.send(Ok(ResendReply::sent("sent"))).unwrap();
        result
    };

    let (_, submit_result) = tokio::join!(resend, submit);

    assert_eq!(submit_result, Err(SessionError::InputDisabled));
    assert!(harness.gateway.verify_calls().is_empty());
}

#[tokio::test]
async fn test_teardown_closes_session() {
    let (harness, session) = Harness::started(SessionConfig::default()).await;
    let gate = harness.gateway.gate_verify();

    let submit = session.submit("123456");
    let close = async {
        session.teardown();
        gate.send(Ok(VerifyReply::verified("OTP verified successfully")))
            .unwrap();
    };
    let (result, ()) = tokio::join!(submit, close);

    // The reply arrived after teardown and is dropped
    assert_eq!(result, Err(SessionError::StaleResponse));
    assert_eq!(harness.store.pending().as_deref(), Some(EMAIL));

    assert_eq!(session.submit("123456").await, Err(SessionError::Closed));
    assert_eq!(session.resend().await, Err(SessionError::Closed));
    assert_eq!(session.start().await, Err(SessionError::Closed));
    session.teardown();
}

#[tokio::test]
async fn test_custom_code_length() {
    let config = SessionConfig {
        code_length: 4,
        ..SessionConfig::default()
    };
    let (harness, session) = Harness::started(config).await;
    harness
        .gateway
        .push_verify(Ok(VerifyReply::verified("OTP verified successfully")));

    assert_eq!(
        type_code(&session, "4821").await,
        Ok(EntryOutcome::Completed("4821".to_string()))
    );
    assert_eq!(harness.gateway.verify_calls()[0].1, "4821");
}
