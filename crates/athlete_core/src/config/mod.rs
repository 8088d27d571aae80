//! # Engine Configuration Module
//!
//! Every tuning constant of the engine lives in [`EngineConfig`]: window
//! sizes, the anomaly multiplier, risk weights, the score → category table,
//! the fuzzy-match threshold, the alias table and the roster.
//!
//! ## Usage
//! ```rust
//! use athlete_core::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let legacy = EngineConfig::legacy();
//! assert!(config.validate().is_ok());
//! assert_eq!(legacy.window.size, 7);
//! ```
//!
//! ## Environment Variables
//!
//! - `ATHLETE_ENGINE_CONFIG`: path to a YAML/JSON config file
//! - `ATHLETE_ENGINE_PROFILE`: preset when no file is given (legacy, strict, default)

mod anomaly_config;
mod identity_config;
mod risk_config;
mod window_config;

pub use anomaly_config::{AnomalyConfig, Direction};
pub use identity_config::IdentityConfig;
pub use risk_config::{AnomalyWeights, CategoryThreshold, RiskConfig};
pub use window_config::{WindowConfig, WorkloadConfig};

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::info;

pub const CONFIG_PATH_ENV: &str = "ATHLETE_ENGINE_CONFIG";
pub const CONFIG_PROFILE_ENV: &str = "ATHLETE_ENGINE_PROFILE";

/// Beyond this `10^decimals` stops being a usable rounding factor for f64.
pub const MAX_OUTPUT_DECIMALS: u32 = 15;

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Rolling baseline window
    pub window: WindowConfig,
    /// Acute/chronic workload windows
    pub workload: WorkloadConfig,
    /// Anomaly multiplier and per-metric direction
    pub anomaly: AnomalyConfig,
    /// Risk weights and category table
    pub risk: RiskConfig,
    /// Registry, aliases, fuzzy threshold
    pub identity: IdentityConfig,
}

impl EngineConfig {
    /// First-generation category cut-offs (5 / 3 / 1 / 0)
    pub fn legacy() -> Self {
        Self {
            risk: RiskConfig::legacy(),
            ..Self::default()
        }
    }

    /// Tighter anomaly band, stricter name matching
    pub fn strict() -> Self {
        let mut cfg = Self::default();
        cfg.anomaly.k = 1.5;
        cfg.identity.threshold = 90;
        cfg
    }

    /// Preset by name; unknown names fall back to the default
    pub fn from_profile(profile: &str) -> Self {
        match profile.trim().to_lowercase().as_str() {
            "legacy" => Self::legacy(),
            "strict" => Self::strict(),
            _ => Self::default(),
        }
    }

    /// Load from `ATHLETE_ENGINE_CONFIG` if set, else the preset named by
    /// `ATHLETE_ENGINE_PROFILE`, else the default.
    pub fn from_env_or_default() -> Result<Self> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Self::from_path(Path::new(path.trim()));
            }
        }
        let cfg = Self::from_profile(&env::var(CONFIG_PROFILE_ENV).unwrap_or_default());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a YAML (`.yaml`/`.yml`) or JSON (`.json`) file. Missing fields
    /// keep their defaults. The result is validated.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let text = fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        let cfg: EngineConfig = match ext.as_str() {
            "yaml" | "yml" => {
                serde_yaml::from_str(&text).map_err(|e| EngineError::ConfigParse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?
            }
            "json" => serde_json::from_str(&text).map_err(|e| EngineError::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            other => return Err(EngineError::UnsupportedConfigFormat(other.to_string())),
        };

        cfg.validate()?;
        info!(path = %path.display(), "loaded engine config");
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.size == 0 {
            return Err(EngineError::InvalidConfig(
                "window.size must be at least 1".to_string(),
            ));
        }
        if self.workload.acute_days < 1 {
            return Err(EngineError::InvalidConfig(
                "workload.acute_days must be at least 1".to_string(),
            ));
        }
        if self.workload.chronic_days < self.workload.acute_days {
            return Err(EngineError::InvalidConfig(format!(
                "workload.chronic_days ({}) must be >= workload.acute_days ({})",
                self.workload.chronic_days, self.workload.acute_days
            )));
        }
        if self.workload.output_decimals > MAX_OUTPUT_DECIMALS {
            return Err(EngineError::InvalidConfig(format!(
                "workload.output_decimals must be at most {} (got {})",
                MAX_OUTPUT_DECIMALS, self.workload.output_decimals
            )));
        }
        if !self.anomaly.k.is_finite() || self.anomaly.k < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "anomaly.k must be a finite non-negative number (got {})",
                self.anomaly.k
            )));
        }
        self.risk.validate().map_err(EngineError::InvalidConfig)?;
        self.identity.validate().map_err(EngineError::InvalidConfig)?;
        Ok(())
    }
}

// ========== Tests ==========
