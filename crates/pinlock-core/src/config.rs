use crate::error::PinlockResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LockCfg {
    /// Wrong submissions allowed before the session is terminated.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Inactivity window before the screen relocks.
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    /// Number of digits in a PIN.
    #[serde(default = "default_pin_length")]
    pub pin_length: usize,

    /// Settings slot holding the encoded code.
    #[serde(default = "default_setting_key")]
    pub setting_key: String,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_idle_timeout_ms() -> u64 {
    2 * 60 * 1000
}

fn default_pin_length() -> usize {
    4
}

fn default_setting_key() -> String {
    "lockscreen.hidden_code".to_string()
}

impl Default for LockCfg {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            idle_timeout_ms: default_idle_timeout_ms(),
            pin_length: default_pin_length(),
            setting_key: default_setting_key(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoreCfg {
    /// File backing the settings slots.
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    "pinlock-store.json".to_string()
}

impl Default for StoreCfg {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// One configured toolbar shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolbarItem {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PinlockConfig {
    #[serde(default)]
    pub lock: LockCfg,

    #[serde(default)]
    pub store: StoreCfg,

    #[serde(default)]
    pub toolbar: Vec<ToolbarItem>,

    #[serde(skip)]
    pub path: PathBuf,
}

impl PinlockConfig {
    /// Load a config file, picking the parser by extension (`.toml` or YAML).
    pub fn load<P: AsRef<Path>>(path: P) -> PinlockResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut cfg = if matches!(path.extension().and_then(|ext| ext.to_str()), Some(ext) if ext.eq_ignore_ascii_case("toml"))
        {
            toml::from_str::<Self>(&contents)?
        } else {
            serde_yaml::from_str::<Self>(&contents)?
        };

        cfg.path = path.to_path_buf();
        Ok(cfg)
    }

    /// Load `path` when it exists, otherwise fall back to defaults so the
    /// tool works out of the box.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> PinlockResult<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Collect human-readable configuration issues without failing fast.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.lock.max_attempts == 0 {
            issues.push("lock.max_attempts must be at least 1".to_string());
        }
        if self.lock.idle_timeout_ms == 0 {
            issues.push("lock.idle_timeout_ms must be non-zero".to_string());
        }
        if self.lock.pin_length == 0 {
            issues.push("lock.pin_length must be at least 1".to_string());
        }
        if self.lock.setting_key.is_empty() {
            issues.push("lock.setting_key must not be empty".to_string());
        }
        if self.store.path.is_empty() {
            issues.push("store.path must not be empty".to_string());
        }
        for (index, item) in self.toolbar.iter().enumerate() {
            if item.label.is_empty() {
                issues.push(format!("toolbar[{index}].label must not be empty"));
            }
            if item.url.is_empty() {
                issues.push(format!("toolbar[{index}].url must not be empty"));
            }
        }

        issues
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.lock.idle_timeout_ms)
    }

    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.store.path)
    }
}
