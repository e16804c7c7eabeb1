//! Collaborator contracts the lock screen depends on.
//!
//! The core never touches host state directly. Settings persistence, session
//! teardown, and modal surfaces are all injected behind these traits so the
//! state machine can be exercised without a real frontend.

use crate::error::PinlockResult;
use std::collections::HashMap;

/// Storage level a setting is written at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingScope {
    Device,
    Account,
}

/// Generic string-valued settings slot.
///
/// The lock screen reads and writes exactly one key. An absent or empty
/// value means "no code configured". Write failures surface through the
/// store's own error contract.
pub trait SettingsStore {
    fn get_value(&self, key: &str) -> PinlockResult<Option<String>>;

    fn set_value(&mut self, key: &str, scope: SettingScope, value: &str) -> PinlockResult<()>;
}

/// The one discrete signal the core emits toward the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Terminate the session. Emitted once, on attempt exhaustion.
    Logout,
}

/// Notification sink consumed by the host application.
pub trait NotificationSink {
    fn notify(&mut self, signal: Signal);
}

/// Dialogs the host can be asked to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Setup,
    Remove,
}

/// Modal and overlay surface owned by the presentation layer.
pub trait ModalHost {
    /// Close every open modal surface. Requested whenever the screen locks.
    fn close_all_modals(&mut self);

    /// Present a dialog; completion is presentation-only.
    fn open_dialog(&mut self, kind: DialogKind);
}

/// User-activity events that rearm the idle deadline. All variants are
/// treated identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEvent {
    PointerMove,
    PointerDown,
    Resize,
    KeyDown,
    Touch,
    Wheel,
}

/// In-memory [`SettingsStore`] used by tests and ephemeral frontends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<(SettingScope, String), String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    /// Device values shadow account values, matching how host settings
    /// stores resolve levels.
    fn get_value(&self, key: &str) -> PinlockResult<Option<String>> {
        for scope in [SettingScope::Device, SettingScope::Account] {
            if let Some(value) = self.values.get(&(scope, key.to_string())) {
                return Ok(Some(value.clone()));
            }
        }
        Ok(None)
    }

    fn set_value(&mut self, key: &str, scope: SettingScope, value: &str) -> PinlockResult<()> {
        if value.is_empty() {
            self.values.remove(&(scope, key.to_string()));
        } else {
            self.values
                .insert((scope, key.to_string()), value.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_scope_shadows_account() {
        let mut store = MemoryStore::new();
        store
            .set_value("lock", SettingScope::Account, "account")
            .unwrap();
        store
            .set_value("lock", SettingScope::Device, "device")
            .unwrap();
        assert_eq!(store.get_value("lock").unwrap().as_deref(), Some("device"));
    }

    #[test]
    fn empty_write_clears_the_slot() {
        let mut store = MemoryStore::new();
        store
            .set_value("lock", SettingScope::Device, "value")
            .unwrap();
        store.set_value("lock", SettingScope::Device, "").unwrap();
        assert_eq!(store.get_value("lock").unwrap(), None);
    }
}
