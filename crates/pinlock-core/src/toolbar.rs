//! Configured shortcut toolbar with a context-menu model.

use crate::config::{PinlockConfig, ToolbarItem};

/// Toolbar state for the frontend: the configured shortcuts plus whether the
/// context menu is showing.
#[derive(Debug, Clone)]
pub struct Toolbar {
    items: Vec<ToolbarItem>,
    menu_open: bool,
}

impl Toolbar {
    /// Build from config. `None` when no shortcuts are configured — the
    /// toolbar is absent entirely, not rendered empty.
    pub fn from_config(config: &PinlockConfig) -> Option<Self> {
        if config.toolbar.is_empty() {
            return None;
        }
        Some(Self {
            items: config.toolbar.clone(),
            menu_open: false,
        })
    }

    pub fn items(&self) -> &[ToolbarItem] {
        &self.items
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn open_menu(&mut self) {
        self.menu_open = true;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    /// Pick the shortcut at `index`: the menu closes and the target URL is
    /// handed back for the host to open.
    pub fn activate(&mut self, index: usize) -> Option<&str> {
        self.menu_open = false;
        self.items.get(index).map(|item| item.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_items(count: usize) -> PinlockConfig {
        let mut cfg = PinlockConfig::default();
        for index in 0..count {
            cfg.toolbar.push(ToolbarItem {
                label: format!("Item {index}"),
                url: format!("https://example.org/{index}"),
            });
        }
        cfg
    }

    #[test]
    fn absent_when_unconfigured() {
        assert!(Toolbar::from_config(&PinlockConfig::default()).is_none());
    }

    #[test]
    fn activate_returns_url_and_closes_menu() {
        let mut toolbar = Toolbar::from_config(&config_with_items(2)).unwrap();
        toolbar.open_menu();
        assert!(toolbar.is_menu_open());

        assert_eq!(toolbar.activate(1), Some("https://example.org/1"));
        assert!(!toolbar.is_menu_open());
    }

    #[test]
    fn activate_out_of_range_still_closes() {
        let mut toolbar = Toolbar::from_config(&config_with_items(1)).unwrap();
        toolbar.open_menu();
        assert_eq!(toolbar.activate(5), None);
        assert!(!toolbar.is_menu_open());
    }

    #[test]
    fn toggle_flips_the_menu() {
        let mut toolbar = Toolbar::from_config(&config_with_items(1)).unwrap();
        toolbar.toggle_menu();
        assert!(toolbar.is_menu_open());
        toolbar.toggle_menu();
        assert!(!toolbar.is_menu_open());
    }
}
