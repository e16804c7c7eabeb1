use thiserror::Error;

/// Result alias for core operations.
pub type PinlockResult<T> = Result<T, PinlockError>;

#[derive(Error, Debug)]
pub enum PinlockError {
    #[error("[PL1000] io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[PL1001] toml config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("[PL1002] yaml config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("[PL1100] configuration error: {0}")]
    InvalidConfig(String),

    #[error("[PL2000] settings store error: {0}")]
    Store(String),
}

impl PinlockError {
    pub fn code(&self) -> &'static str {
        match self {
            PinlockError::Io(_) => "PL1000",
            PinlockError::Toml(_) => "PL1001",
            PinlockError::Yaml(_) => "PL1002",
            PinlockError::InvalidConfig(_) => "PL1100",
            PinlockError::Store(_) => "PL2000",
        }
    }
}
