//! Collaborator implementations wiring the core to this frontend.

use log::warn;
use pinlock_core::toolbar::Toolbar;
use pinlock_core::{DialogKind, ModalHost, NotificationSink, Signal};

/// Notification sink for a standalone terminal session. The event loop ends
/// the session when the machine reports sign-out; this just leaves a trace.
#[derive(Debug, Default)]
pub struct SessionNotifier;

impl NotificationSink for SessionNotifier {
    fn notify(&mut self, signal: Signal) {
        match signal {
            Signal::Logout => warn!("sign-out requested after attempt exhaustion"),
        }
    }
}

/// Overlay surfaces owned by the frontend: the toolbar context menu and the
/// active settings dialog. The lock screen closes both whenever it locks.
#[derive(Debug, Default)]
pub struct OverlayHost {
    toolbar: Option<Toolbar>,
    dialog: Option<DialogKind>,
}

impl OverlayHost {
    pub fn new(toolbar: Option<Toolbar>) -> Self {
        Self {
            toolbar,
            dialog: None,
        }
    }

    pub fn toolbar(&self) -> Option<&Toolbar> {
        self.toolbar.as_ref()
    }

    pub fn toolbar_mut(&mut self) -> Option<&mut Toolbar> {
        self.toolbar.as_mut()
    }

    pub fn dialog(&self) -> Option<DialogKind> {
        self.dialog
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }
}

impl ModalHost for OverlayHost {
    fn close_all_modals(&mut self) {
        if let Some(toolbar) = &mut self.toolbar {
            toolbar.close_menu();
        }
        self.dialog = None;
    }

    fn open_dialog(&mut self, kind: DialogKind) {
        self.dialog = Some(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinlock_core::{PinlockConfig, ToolbarItem};

    fn toolbar() -> Toolbar {
        let mut cfg = PinlockConfig::default();
        cfg.toolbar.push(ToolbarItem {
            label: "Handbook".to_string(),
            url: "https://example.org".to_string(),
        });
        Toolbar::from_config(&cfg).unwrap()
    }

    #[test]
    fn locking_closes_menu_and_dialog() {
        let mut host = OverlayHost::new(Some(toolbar()));
        host.toolbar_mut().unwrap().open_menu();
        host.open_dialog(DialogKind::Setup);

        host.close_all_modals();
        assert!(!host.toolbar().unwrap().is_menu_open());
        assert_eq!(host.dialog(), None);
    }
}
