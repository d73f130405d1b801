//! Verification session controller.
//!
//! Owns the pending identity of one verification attempt, submits codes and
//! resend requests through a [`VerificationGateway`], runs the expiry and
//! cooldown countdowns and hands control to sign-in once the address is
//! verified.
//!
//! State lives behind a synchronous mutex that is never held across an
//! await. Every network call takes a ticket before suspending and is only
//! honored if the ticket still matches when the reply arrives.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use mw_shared::mask_email;

use crate::errors::{SessionError, SessionResult};

use super::config::SessionConfig;
use super::countdown::CountdownPair;
use super::entry::{CodeEntry, EntryOutcome};
use super::traits::{NavigationSink, NotificationSink, PendingIdentityStore, VerificationGateway};
use super::types::{
    EntryEvent, FlowStep, NoticeKind, Redirect, SessionPhase, SessionSnapshot,
    PENDING_IDENTITY_KEY,
};

const RESEND_NOTICE: &str = "A new OTP has been sent to your email";

/// Mutable state shared with the timer tasks
#[derive(Debug)]
struct SessionState {
    identity: Option<String>,
    phase: SessionPhase,
    entry: CodeEntry,
    countdown: CountdownPair,
    resend_in_flight: bool,
    /// Bumped by every successful resend; replies from an older epoch are stale
    epoch: u64,
    /// Incremented by every submission
    submission: u64,
    torn_down: bool,
}

/// Identifies the request a reply belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    epoch: u64,
    submission: u64,
}

impl SessionState {
    fn new(config: &SessionConfig) -> Self {
        Self {
            identity: None,
            phase: SessionPhase::Idle,
            entry: CodeEntry::new(config.code_length),
            countdown: CountdownPair::new(
                config.expiry_window_seconds,
                config.cooldown_window_seconds,
                config.initial_cooldown_seconds,
            ),
            resend_in_flight: false,
            epoch: 0,
            submission: 0,
            torn_down: false,
        }
    }

    fn ensure_open(&self) -> SessionResult<&str> {
        if self.torn_down {
            return Err(SessionError::Closed);
        }
        if self.phase == SessionPhase::Verified {
            return Err(SessionError::AlreadyVerified);
        }
        self.identity
            .as_deref()
            .ok_or(SessionError::NoPendingIdentity)
    }

    /// Input is blocked while any request is in flight and after verification
    fn sync_input(&mut self) {
        let blocked = matches!(self.phase, SessionPhase::Submitting | SessionPhase::Verified)
            || self.resend_in_flight;
        self.entry.set_disabled(blocked);
    }

    fn honors(&self, ticket: Ticket) -> bool {
        !self.torn_down
            && self.phase == SessionPhase::Submitting
            && self.epoch == ticket.epoch
            && self.submission == ticket.submission
    }

    fn fail(&mut self, message: &str) {
        self.phase = SessionPhase::Failed {
            message: message.to_string(),
        };
        self.entry.set_error(message);
        self.sync_input();
    }
}

#[derive(Debug, Default)]
struct SessionTasks {
    expiry: Option<JoinHandle<()>>,
    cooldown: Option<JoinHandle<()>>,
    redirect: Option<JoinHandle<()>>,
}

impl SessionTasks {
    fn abort_countdowns(&mut self) {
        for handle in [self.expiry.take(), self.cooldown.take()].into_iter().flatten() {
            handle.abort();
        }
    }

    fn abort_all(&mut self) {
        self.abort_countdowns();
        if let Some(handle) = self.redirect.take() {
            handle.abort();
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Countdown {
    Expiry,
    Cooldown,
}

fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Decrement one counter every `tick` until it reaches zero
fn spawn_countdown(
    state: Arc<Mutex<SessionState>>,
    which: Countdown,
    tick: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + tick, tick);
        loop {
            interval.tick().await;
            let remaining = {
                let mut state = lock_state(&state);
                if state.torn_down {
                    return;
                }
                match which {
                    Countdown::Expiry => state.countdown.tick_expiry(),
                    Countdown::Cooldown => state.countdown.tick_cooldown(),
                }
            };
            if remaining == 0 {
                debug!(countdown = ?which, "Countdown finished");
                return;
            }
        }
    })
}

/// Builder for [`VerificationSession`]
pub struct SessionBuilder<G, S, N> {
    gateway: Arc<G>,
    store: Arc<S>,
    navigator: Arc<N>,
    notifier: Option<Arc<dyn NotificationSink>>,
    identity: Option<String>,
    config: SessionConfig,
}

impl<G, S, N> SessionBuilder<G, S, N>
where
    G: VerificationGateway,
    S: PendingIdentityStore,
    N: NavigationSink + 'static,
{
    pub fn new(gateway: Arc<G>, store: Arc<S>, navigator: Arc<N>) -> Self {
        Self {
            gateway,
            store,
            navigator,
            notifier: None,
            identity: None,
            config: SessionConfig::default(),
        }
    }

    /// Identity handed over by the previous step of the flow
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> VerificationSession<G, S, N> {
        VerificationSession {
            state: Arc::new(Mutex::new(SessionState::new(&self.config))),
            tasks: Mutex::new(SessionTasks::default()),
            gateway: self.gateway,
            store: self.store,
            navigator: self.navigator,
            notifier: self.notifier,
            explicit_identity: self.identity,
            config: self.config,
        }
    }
}

/// Lifecycle of a single pending email verification
///
/// Dropping the session tears it down: countdowns stop and a scheduled
/// redirect never fires.
pub struct VerificationSession<G, S, N> {
    state: Arc<Mutex<SessionState>>,
    tasks: Mutex<SessionTasks>,
    gateway: Arc<G>,
    store: Arc<S>,
    navigator: Arc<N>,
    notifier: Option<Arc<dyn NotificationSink>>,
    explicit_identity: Option<String>,
    config: SessionConfig,
}

impl<G, S, N> VerificationSession<G, S, N>
where
    G: VerificationGateway,
    S: PendingIdentityStore,
    N: NavigationSink + 'static,
{
    pub fn builder(gateway: Arc<G>, store: Arc<S>, navigator: Arc<N>) -> SessionBuilder<G, S, N> {
        SessionBuilder::new(gateway, store, navigator)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Identity under verification, once started
    pub fn identity(&self) -> Option<String> {
        self.state().identity.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state().phase.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        SessionSnapshot {
            identity: state.identity.clone().unwrap_or_default(),
            phase: state.phase.clone(),
            resend_in_flight: state.resend_in_flight,
            expiry_seconds: state.countdown.expiry_remaining(),
            cooldown_seconds: state.countdown.cooldown_remaining(),
            slots: state.entry.slots().to_vec(),
            active_index: state.entry.active_index(),
            input_disabled: state.entry.is_disabled(),
            error: state.entry.error().map(str::to_string),
        }
    }

    /// Resolve the pending identity and start the countdowns.
    ///
    /// Without an identity the flow is sent back to identity collection and
    /// no request is ever issued.
    pub async fn start(&self) -> SessionResult<String> {
        {
            let state = self.state();
            if state.torn_down {
                return Err(SessionError::Closed);
            }
            if let Some(identity) = &state.identity {
                return Ok(identity.clone());
            }
        }

        let explicit = self
            .explicit_identity
            .as_deref()
            .map(str::trim)
            .filter(|identity| !identity.is_empty());

        let identity = match explicit {
            Some(identity) => {
                if let Err(e) = self.store.set(PENDING_IDENTITY_KEY, identity).await {
                    warn!(
                        event = "pending_identity_persist_failed",
                        email = %mask_email(identity),
                        error = %e,
                        "Failed to persist pending identity"
                    );
                }
                Some(identity.to_string())
            }
            None => match self.store.get(PENDING_IDENTITY_KEY).await {
                Ok(stored) => stored
                    .map(|identity| identity.trim().to_string())
                    .filter(|identity| !identity.is_empty()),
                Err(e) => {
                    warn!(
                        event = "pending_identity_read_failed",
                        error = %e,
                        "Failed to read pending identity"
                    );
                    None
                }
            },
        };

        let Some(identity) = identity else {
            info!(
                event = "pending_identity_missing",
                "No email awaiting verification, returning to signup"
            );
            self.navigator
                .navigate(Redirect::to(FlowStep::IdentityCollection));
            return Err(SessionError::NoPendingIdentity);
        };

        {
            let mut state = self.state();
            if state.torn_down {
                return Err(SessionError::Closed);
            }
            state.identity = Some(identity.clone());
        }
        self.restart_countdowns();

        info!(
            event = "verification_session_started",
            email = %mask_email(&identity),
            "Verification session started"
        );
        Ok(identity)
    }

    /// Apply an input event to the code entry, submitting on completion
    pub async fn input(&self, event: EntryEvent) -> SessionResult<EntryOutcome> {
        let outcome = {
            let mut state = self.state();
            state.ensure_open()?;
            match event {
                EntryEvent::Character { slot, text } => state.entry.enter(slot, &text),
                EntryEvent::Backspace { slot } => state.entry.backspace(slot),
            }
        };

        if let EntryOutcome::Completed(code) = &outcome {
            self.submit(code).await?;
        }
        Ok(outcome)
    }

    /// Send a complete code to the verification service
    pub async fn submit(&self, code: &str) -> SessionResult<()> {
        let (identity, ticket) = {
            let mut state = self.state();
            let identity = state.ensure_open()?.to_string();
            if state.phase == SessionPhase::Submitting || state.resend_in_flight {
                return Err(SessionError::InputDisabled);
            }
            let expected = state.entry.len();
            if code.len() != expected || !code.chars().all(|c| c.is_ascii_digit()) {
                return Err(SessionError::InvalidCode { expected });
            }

            state.phase = SessionPhase::Submitting;
            state.submission += 1;
            state.entry.clear_error();
            state.sync_input();
            let ticket = Ticket {
                epoch: state.epoch,
                submission: state.submission,
            };
            (identity, ticket)
        };

        debug!(
            event = "otp_submit",
            email = %mask_email(&identity),
            "Submitting verification code"
        );
        let result = self
            .gateway
            .verify(&identity, code, self.config.purpose)
            .await;

        let outcome = {
            let mut state = self.state();
            if !state.honors(ticket) {
                debug!(
                    event = "otp_verify_stale",
                    email = %mask_email(&identity),
                    "Discarding superseded verification response"
                );
                return Err(SessionError::StaleResponse);
            }

            match result {
                Ok(reply) if reply.verified => {
                    state.phase = SessionPhase::Verified;
                    state.entry.reset();
                    state.sync_input();
                    Ok(())
                }
                Ok(reply) => {
                    let message = reply
                        .message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| self.config.verify_fallback_message.clone());
                    state.fail(&message);
                    Err(SessionError::VerificationRejected { message })
                }
                Err(e) => {
                    warn!(
                        event = "otp_verify_failed",
                        email = %mask_email(&identity),
                        error = %e,
                        "Verification request failed"
                    );
                    let message = e
                        .service_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| self.config.verify_fallback_message.clone());
                    state.fail(&message);
                    Err(SessionError::VerificationService { message })
                }
            }
        };

        match outcome {
            Ok(()) => {
                self.finish_verified(identity).await;
                Ok(())
            }
            Err(e) => {
                info!(
                    event = "otp_verify_rejected",
                    email = %mask_email(&identity),
                    reason = %e,
                    "Verification code not accepted"
                );
                self.notify(&e.to_string(), NoticeKind::Error);
                Err(e)
            }
        }
    }

    /// Ask for a fresh code. A no-op while the cooldown is running.
    pub async fn resend(&self) -> SessionResult<()> {
        let (identity, epoch) = {
            let mut state = self.state();
            let identity = state.ensure_open()?.to_string();
            if state.resend_in_flight {
                return Err(SessionError::InputDisabled);
            }
            let remaining = state.countdown.cooldown_remaining();
            if remaining > 0 {
                return Err(SessionError::CooldownActive {
                    remaining_seconds: remaining,
                });
            }

            state.resend_in_flight = true;
            state.sync_input();
            (identity, state.epoch)
        };

        debug!(
            event = "otp_resend",
            email = %mask_email(&identity),
            "Requesting a new verification code"
        );
        let result = self.gateway.resend(&identity, self.config.purpose).await;

        let mut state = self.state();
        state.resend_in_flight = false;
        state.sync_input();
        if state.torn_down || state.phase == SessionPhase::Verified || state.epoch != epoch {
            debug!(
                event = "otp_resend_stale",
                email = %mask_email(&identity),
                "Discarding superseded resend response"
            );
            return Err(SessionError::StaleResponse);
        }

        match result {
            Ok(reply) if reply.ok => {
                state.epoch += 1;
                state.countdown.restart();
                state.entry.reset();
                if matches!(
                    state.phase,
                    SessionPhase::Submitting | SessionPhase::Failed { .. }
                ) {
                    state.phase = SessionPhase::Idle;
                }
                state.sync_input();
                drop(state);

                self.restart_countdowns();
                info!(
                    event = "otp_resent",
                    email = %mask_email(&identity),
                    "Verification code resent"
                );
                let notice = reply
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| RESEND_NOTICE.to_string());
                self.notify(&notice, NoticeKind::Info);
                Ok(())
            }
            Ok(reply) => {
                let message = reply
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| self.config.resend_fallback_message.clone());
                state.entry.set_error(&message);
                drop(state);

                info!(
                    event = "otp_resend_rejected",
                    email = %mask_email(&identity),
                    reason = %message,
                    "Resend refused"
                );
                self.notify(&message, NoticeKind::Error);
                Err(SessionError::ResendRejected { message })
            }
            Err(e) => {
                let message = e
                    .service_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| self.config.resend_fallback_message.clone());
                state.entry.set_error(&message);
                drop(state);

                warn!(
                    event = "otp_resend_failed",
                    email = %mask_email(&identity),
                    error = %e,
                    "Resend request failed"
                );
                self.notify(&message, NoticeKind::Error);
                Err(SessionError::ResendService { message })
            }
        }
    }

    /// Stop all background work. Idempotent.
    pub fn teardown(&self) {
        {
            let mut state = self.state();
            if state.torn_down {
                return;
            }
            state.torn_down = true;
            state.sync_input();
        }
        self.tasks().abort_all();
        debug!(event = "verification_session_closed", "Verification session torn down");
    }

    async fn finish_verified(&self, identity: String) {
        self.tasks().abort_countdowns();

        if let Err(e) = self.store.clear(PENDING_IDENTITY_KEY).await {
            warn!(
                event = "pending_identity_clear_failed",
                email = %mask_email(&identity),
                error = %e,
                "Failed to clear pending identity"
            );
        }

        info!(
            event = "otp_verified",
            email = %mask_email(&identity),
            "Email address verified"
        );
        self.notify(&self.config.success_message, NoticeKind::Success);

        let redirect = Redirect::to(FlowStep::SignIn)
            .with_identity(identity)
            .with_message(self.config.success_message.clone());
        let delay = self.config.redirect_delay;
        let state = Arc::clone(&self.state);
        let navigator = Arc::clone(&self.navigator);

        let mut tasks = self.tasks();
        if lock_state(&self.state).torn_down {
            return;
        }
        tasks.redirect = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if lock_state(&state).torn_down {
                return;
            }
            navigator.navigate(redirect);
        }));
    }

    /// Replace the countdown tasks with fresh ones for the current counters
    fn restart_countdowns(&self) {
        let mut tasks = self.tasks();
        tasks.abort_countdowns();

        let (expiry, cooldown) = {
            let state = self.state();
            if state.torn_down || state.phase.is_terminal() {
                return;
            }
            (
                state.countdown.expiry_remaining(),
                state.countdown.cooldown_remaining(),
            )
        };

        let tick = self.config.tick;
        if expiry > 0 {
            tasks.expiry = Some(spawn_countdown(
                Arc::clone(&self.state),
                Countdown::Expiry,
                tick,
            ));
        }
        if cooldown > 0 {
            tasks.cooldown = Some(spawn_countdown(
                Arc::clone(&self.state),
                Countdown::Cooldown,
                tick,
            ));
        }
    }

    fn notify(&self, message: &str, kind: NoticeKind) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(message, kind);
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        lock_state(&self.state)
    }

    fn tasks(&self) -> MutexGuard<'_, SessionTasks> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<G, S, N> Drop for VerificationSession<G, S, N> {
    fn drop(&mut self) {
        lock_state(&self.state).torn_down = true;
        self.tasks
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .abort_all();
    }
}
