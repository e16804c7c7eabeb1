//! File-backed settings store for the terminal frontend.
//!
//! A small JSON document with one map per scope stands in for the host
//! application's settings service. Writes go straight to disk.

use pinlock_core::{PinlockError, PinlockResult, SettingScope, SettingsStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    device: BTreeMap<String, String>,

    #[serde(default)]
    account: BTreeMap<String, String>,
}

/// JSON-file [`SettingsStore`]. A missing file is an empty store; a file we
/// cannot parse is an error, since silently dropping settings loses data.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: StoreFile,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> PinlockResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                PinlockError::Store(format!("corrupt store file {}: {err}", path.display()))
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => StoreFile::default(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, data })
    }

    fn scope_map(&mut self, scope: SettingScope) -> &mut BTreeMap<String, String> {
        match scope {
            SettingScope::Device => &mut self.data.device,
            SettingScope::Account => &mut self.data.account,
        }
    }

    fn flush(&self) -> PinlockResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(&self.data)
            .map_err(|err| PinlockError::Store(err.to_string()))?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl SettingsStore for FileStore {
    /// Device values shadow account values, like the in-memory store.
    fn get_value(&self, key: &str) -> PinlockResult<Option<String>> {
        if let Some(value) = self.data.device.get(key) {
            return Ok(Some(value.clone()));
        }
        Ok(self.data.account.get(key).cloned())
    }

    fn set_value(&mut self, key: &str, scope: SettingScope, value: &str) -> PinlockResult<()> {
        let map = self.scope_map(scope);
        if value.is_empty() {
            map.remove(key);
        } else {
            map.insert(key.to_string(), value.to_string());
        }
        self.flush()
    }
}
