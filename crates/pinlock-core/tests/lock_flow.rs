//! End-to-end lock-screen scenarios against the public API.

use pinlock_core::{
    codec, Attempts, DialogKind, LockScreen, LockStatus, MemoryStore, ModalHost,
    NotificationSink, PinlockConfig, SettingScope, SettingsStore, Signal, SubmitOutcome,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Clone, Default)]
struct RecordingNotifier {
    signals: Rc<RefCell<Vec<Signal>>>,
}

impl NotificationSink for RecordingNotifier {
    fn notify(&mut self, signal: Signal) {
        self.signals.borrow_mut().push(signal);
    }
}

#[derive(Default)]
struct NullModals;

impl ModalHost for NullModals {
    fn close_all_modals(&mut self) {}
    fn open_dialog(&mut self, _kind: DialogKind) {}
}

fn store_with_code(cfg: &PinlockConfig, digits: &str) -> MemoryStore {
    let mut store = MemoryStore::new();
    store
        .set_value(
            &cfg.lock.setting_key,
            SettingScope::Device,
            &codec::encode_new(digits),
        )
        .unwrap();
    store
}

#[test]
fn configure_relock_and_recover() {
    let cfg = Arc::new(PinlockConfig::default());

    // First session: no code yet, the user sets one up.
    let mut session = LockScreen::new(
        cfg.clone(),
        MemoryStore::new(),
        RecordingNotifier::default(),
        NullModals,
    )
    .unwrap();
    assert_eq!(session.status(), LockStatus::Unlocked);
    session.configure_code("1234").unwrap();

    // Next load: the code is present, so the screen starts locked.
    let store = store_with_code(&cfg, "1234");
    let notifier = RecordingNotifier::default();
    let mut session = LockScreen::new(cfg, store, notifier.clone(), NullModals).unwrap();
    assert_eq!(session.status(), LockStatus::Locked);

    // Two wrong guesses spend attempts but keep the screen up.
    assert_eq!(
        session.submit("0000").unwrap(),
        SubmitOutcome::Mismatch {
            remaining: Attempts::Remaining(2)
        }
    );
    assert_eq!(
        session.submit("9999").unwrap(),
        SubmitOutcome::Mismatch {
            remaining: Attempts::Remaining(1)
        }
    );
    assert_eq!(session.status(), LockStatus::Locked);

    // The right code opens the screen and restores the budget.
    assert_eq!(session.submit("1234").unwrap(), SubmitOutcome::Unlocked);
    assert_eq!(session.status(), LockStatus::Unlocked);
    assert_eq!(session.remaining_attempts(), Attempts::Remaining(3));
    assert!(notifier.signals.borrow().is_empty());
}

#[test]
fn exhaustion_ends_the_session() {
    let cfg = Arc::new(PinlockConfig::default());
    let store = store_with_code(&cfg, "1234");
    let notifier = RecordingNotifier::default();
    let mut session = LockScreen::new(cfg, store, notifier.clone(), NullModals).unwrap();

    for wrong in ["0000", "1111"] {
        assert!(matches!(
            session.submit(wrong).unwrap(),
            SubmitOutcome::Mismatch { .. }
        ));
    }
    assert_eq!(session.submit("2222").unwrap(), SubmitOutcome::SignedOut);

    // Exactly one signal, and the machine stays terminal afterwards.
    assert_eq!(notifier.signals.borrow().as_slice(), &[Signal::Logout]);
    assert_eq!(session.submit("1234").unwrap(), SubmitOutcome::Ignored);
    assert_eq!(notifier.signals.borrow().len(), 1);
}

#[test]
fn removal_round_trip() {
    let cfg = Arc::new(PinlockConfig::default());
    let store = store_with_code(&cfg, "4321");
    let mut session = LockScreen::new(
        cfg,
        store,
        RecordingNotifier::default(),
        NullModals,
    )
    .unwrap();

    session.submit("4321").unwrap();
    assert_eq!(session.settings_dialog(), DialogKind::Remove);

    assert_eq!(
        session.submit_removal("4321").unwrap(),
        SubmitOutcome::Removed
    );
    assert_eq!(session.settings_dialog(), DialogKind::Setup);
    assert_eq!(session.submit("4321").unwrap(), SubmitOutcome::Ignored);
}
