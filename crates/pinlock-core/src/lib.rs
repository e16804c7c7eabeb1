pub mod codec;
pub mod config;
pub mod dialog;
pub mod entry;
pub mod error;
pub mod logging;
pub mod provider;
pub mod screen;
pub mod toolbar;
pub mod verify;

pub use codec::{decode, encode, encode_new, Attempts, LockCode, DEFAULT_ATTEMPTS};
pub use config::{PinlockConfig, ToolbarItem};
pub use entry::{PinEntry, PinKey, SubmitDisposition, PIN_LEN};
pub use error::{PinlockError, PinlockResult};
pub use provider::{
    ActivityEvent, DialogKind, MemoryStore, ModalHost, NotificationSink, SettingScope,
    SettingsStore, Signal,
};
pub use screen::{LockScreen, LockStatus, SubmitOutcome};
pub use verify::{verify, Verification};
