//! Lock-screen state machine: lock status, attempt accounting, idle relock.

use crate::codec::{self, Attempts, LockCode};
use crate::config::PinlockConfig;
use crate::error::PinlockResult;
use crate::provider::{
    ActivityEvent, DialogKind, ModalHost, NotificationSink, SettingScope, SettingsStore, Signal,
};
use crate::verify::verify;
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;

/// Whether the lock screen is currently covering the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    Unlocked,
    Locked,
}

/// Result of handing a PIN to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Correct code; attempts reset and the screen opened.
    Unlocked,
    /// Wrong code; one attempt spent.
    Mismatch { remaining: Attempts },
    /// Wrong code and no attempts left. The logout signal has been emitted
    /// and the machine accepts nothing further.
    SignedOut,
    /// Correct code on the removal path; the slot has been cleared.
    Removed,
    /// Nothing to do: no code configured, or the session is already ending.
    Ignored,
}

/// Coordinates the stored code, the attempts counter, and the idle deadline.
///
/// All collaborators are injected; the machine never reaches for global
/// state. Transitions are synchronous — the host's event loop serializes
/// them — and the idle deadline is the single suspending primitive, rearmed
/// on every activity event and disarmed once it fires.
pub struct LockScreen<S, N, M>
where
    S: SettingsStore,
    N: NotificationSink,
    M: ModalHost,
{
    config: Arc<PinlockConfig>,
    store: S,
    notifier: N,
    modals: M,
    code: LockCode,
    status: LockStatus,
    terminated: bool,
    deadline: Option<Instant>,
}

impl<S, N, M> LockScreen<S, N, M>
where
    S: SettingsStore,
    N: NotificationSink,
    M: ModalHost,
{
    /// Read the settings slot and start locked iff a code is configured.
    pub fn new(
        config: Arc<PinlockConfig>,
        store: S,
        notifier: N,
        modals: M,
    ) -> PinlockResult<Self> {
        let deadline = Instant::now() + config.idle_timeout();
        let mut screen = Self {
            config,
            store,
            notifier,
            modals,
            code: LockCode::absent(),
            status: LockStatus::Unlocked,
            terminated: false,
            deadline: Some(deadline),
        };
        screen.reload()?;
        if screen.code.is_configured() {
            screen.enter_locked();
        }
        Ok(screen)
    }

    pub fn status(&self) -> LockStatus {
        self.status
    }

    pub fn is_configured(&self) -> bool {
        self.code.is_configured()
    }

    /// True once the logout signal has been emitted.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn remaining_attempts(&self) -> Attempts {
        self.code.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.lock.max_attempts
    }

    pub fn modals(&self) -> &M {
        &self.modals
    }

    pub fn modals_mut(&mut self) -> &mut M {
        &mut self.modals
    }

    /// Verify a PIN entered on the lock screen.
    pub fn submit(&mut self, pin: &str) -> PinlockResult<SubmitOutcome> {
        if self.terminated || !self.code.is_configured() {
            return Ok(SubmitOutcome::Ignored);
        }

        let result = verify(pin, &self.code, self.config.lock.max_attempts);
        if !result.matched {
            return self.register_mismatch(result.next);
        }

        self.persist(&result.next)?;
        self.code = result.next;
        self.status = LockStatus::Unlocked;
        info!("lock screen unlocked");
        Ok(SubmitOutcome::Unlocked)
    }

    /// Verify a PIN entered in the remove dialog; a match clears the slot.
    ///
    /// Mismatches run through the same attempt accounting as lock-screen
    /// submissions, so the remove dialog cannot be used for free guesses.
    pub fn submit_removal(&mut self, pin: &str) -> PinlockResult<SubmitOutcome> {
        if self.terminated || !self.code.is_configured() {
            return Ok(SubmitOutcome::Ignored);
        }

        let result = verify(pin, &self.code, self.config.lock.max_attempts);
        if !result.matched {
            return self.register_mismatch(result.next);
        }

        self.store
            .set_value(&self.config.lock.setting_key, SettingScope::Device, "")?;
        self.code = LockCode::absent();
        self.status = LockStatus::Unlocked;
        info!("lock code removed");
        Ok(SubmitOutcome::Removed)
    }

    /// Persist a newly configured code with the full attempts budget.
    ///
    /// The running session stays usable; the lock takes effect on the next
    /// startup or when an external change is observed.
    pub fn configure_code(&mut self, digits: &str) -> PinlockResult<()> {
        let next = LockCode {
            digits: digits.to_string(),
            attempts: Attempts::Remaining(self.config.lock.max_attempts),
        };
        self.persist(&next)?;
        self.code = next;
        info!("lock code configured");
        Ok(())
    }

    /// React to the settings slot changing underneath us. A newly configured
    /// code locks the screen immediately; a removed code leaves it inert.
    pub fn observe_code_change(&mut self) -> PinlockResult<()> {
        self.reload()?;
        if self.code.is_configured() {
            self.enter_locked();
        } else {
            self.status = LockStatus::Unlocked;
        }
        Ok(())
    }

    /// Rearm the idle deadline. Every activity kind counts the same.
    pub fn record_activity(&mut self, _event: ActivityEvent) {
        self.deadline = Some(Instant::now() + self.config.idle_timeout());
    }

    /// Check the idle deadline; returns whether the screen relocked.
    ///
    /// Once fired the deadline stays disarmed until the next activity
    /// event. The slot is re-read before locking, in case the code was
    /// removed while we were idle.
    pub fn poll_idle(&mut self) -> PinlockResult<bool> {
        let Some(deadline) = self.deadline else {
            return Ok(false);
        };
        if Instant::now() < deadline {
            return Ok(false);
        }
        self.deadline = None;

        self.reload()?;
        if self.code.is_configured() {
            info!("idle timeout elapsed; relocking");
            self.enter_locked();
            return Ok(true);
        }
        Ok(false)
    }

    /// Which settings dialog applies right now.
    pub fn settings_dialog(&self) -> DialogKind {
        if self.code.is_configured() {
            DialogKind::Remove
        } else {
            DialogKind::Setup
        }
    }

    /// Ask the host to present the applicable settings dialog.
    pub fn request_settings_dialog(&mut self) {
        let kind = self.settings_dialog();
        self.modals.open_dialog(kind);
    }

    fn reload(&mut self) -> PinlockResult<()> {
        let stored = self.store.get_value(&self.config.lock.setting_key)?;
        self.code = codec::decode(stored.as_deref().unwrap_or(""));
        Ok(())
    }

    fn enter_locked(&mut self) {
        self.status = LockStatus::Locked;
        self.modals.close_all_modals();
    }

    fn register_mismatch(&mut self, next: LockCode) -> PinlockResult<SubmitOutcome> {
        self.persist(&next)?;
        self.code = next;

        if self.code.attempts.is_exhausted() {
            warn!("attempts exhausted; requesting sign-out");
            self.notifier.notify(Signal::Logout);
            self.terminated = true;
            return Ok(SubmitOutcome::SignedOut);
        }

        Ok(SubmitOutcome::Mismatch {
            remaining: self.code.attempts,
        })
    }

    fn persist(&mut self, next: &LockCode) -> PinlockResult<()> {
        let attempts = next
            .attempts
            .count()
            .unwrap_or(self.config.lock.max_attempts);
        let encoded = codec::encode(&next.digits, attempts);
        self.store
            .set_value(&self.config.lock.setting_key, SettingScope::Device, &encoded)
    }
}
