use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unsupported config format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedConfigFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Config errors can be fixed by editing the file and re-running.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidConfig(_)
                | EngineError::ConfigIo { .. }
                | EngineError::ConfigParse { .. }
                | EngineError::UnsupportedConfigFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
