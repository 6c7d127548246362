//! Engine configuration.
//!
//! [`EngineConfig`] controls whether mutations are permitted, optional
//! per-chain size limits, and logging. It can be built in code:
//!
//! ```
//! use questline_core::{AccessMode, EngineConfig};
//!
//! let cfg = EngineConfig::new()
//!     .access_mode(AccessMode::ReadOnly)
//!     .max_missions_per_chain(50);
//! assert!(cfg.is_read_only());
//! ```
//!
//! or loaded from TOML:
//!
//! ```toml
//! access_mode = "read_only"
//!
//! [limits]
//! max_missions_per_chain = 50
//! max_dependencies_per_chain = 200
//!
//! [logging]
//! level = "debug"
//! ansi = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};

/// Controls whether the engine allows mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Allow both reads and writes (default).
    #[default]
    ReadWrite,
    /// Read-only mode: every mutating operation returns [`ChainError::ReadOnly`].
    ReadOnly,
}

/// Optional per-chain size limits. `None` means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainLimits {
    /// Maximum number of member missions in one chain.
    pub max_missions_per_chain: Option<usize>,
    /// Maximum number of dependency edges in one chain.
    pub max_dependencies_per_chain: Option<usize>,
}

/// Logging settings consumed by the facade's tracing initialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level: `trace`, `debug`, `info`, `warn` or `error`.
    pub level: String,
    /// Emit ANSI colour codes.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Whether mutations are permitted.
    pub access_mode: AccessMode,
    /// Per-chain size limits.
    pub limits: ChainLimits,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Create a configuration with default settings (read-write, no limits).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the access mode.
    pub fn access_mode(mut self, mode: AccessMode) -> Self {
        self.access_mode = mode;
        self
    }

    /// Limit the number of missions per chain.
    pub fn max_missions_per_chain(mut self, limit: usize) -> Self {
        self.limits.max_missions_per_chain = Some(limit);
        self
    }

    /// Limit the number of dependency edges per chain.
    pub fn max_dependencies_per_chain(mut self, limit: usize) -> Self {
        self.limits.max_dependencies_per_chain = Some(limit);
        self
    }

    /// Set the logging level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    /// True if mutations are rejected.
    pub fn is_read_only(&self) -> bool {
        self.access_mode == AccessMode::ReadOnly
    }

    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> ChainResult<Self> {
        toml::from_str(text).map_err(|e| ChainError::config(e.to_string()))
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ChainResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ChainError::config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> ChainResult<String> {
        toml::to_string(self).map_err(|e| ChainError::config(e.to_string()))
    }
}
