//! Host configuration (evolve.toml)
//!
//! Every field is optional; missing fields take the defaults below.
//!
//! ```toml
//! max_allocation_bytes = 1048576
//! max_total_bytes = 8388608
//! max_open_files = 32
//! log_filter = "evolve=debug"
//! ```

use crate::error::ConfigError;
use evolve_stdlib::MemoryLimits;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Resource limits and logging settings for a [`crate::Host`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Largest single script allocation in bytes
    pub max_allocation_bytes: u64,

    /// Largest total of live script allocations in bytes
    pub max_total_bytes: u64,

    /// Maximum number of simultaneously open file handles
    pub max_open_files: usize,

    /// `tracing` filter directive used when `EVOLVE_LOG` is unset
    pub log_filter: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        let memory = MemoryLimits::default();
        Self {
            max_allocation_bytes: memory.max_allocation_bytes,
            max_total_bytes: memory.max_total_bytes,
            max_open_files: 256,
            log_filter: "info".to_string(),
        }
    }
}

impl HostConfig {
    /// Parse a config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a config from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: HostConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_allocation_bytes == 0 {
            return Err(ConfigError::Invalid("max_allocation_bytes must be greater than 0".to_string()));
        }
        if self.max_total_bytes == 0 {
            return Err(ConfigError::Invalid("max_total_bytes must be greater than 0".to_string()));
        }
        if self.max_allocation_bytes > self.max_total_bytes {
            return Err(ConfigError::Invalid(format!(
                "max_allocation_bytes ({}) exceeds max_total_bytes ({})",
                self.max_allocation_bytes, self.max_total_bytes
            )));
        }
        if self.max_open_files == 0 {
            return Err(ConfigError::Invalid("max_open_files must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Memory limits derived from this config
    pub fn memory_limits(&self) -> MemoryLimits {
        MemoryLimits {
            max_allocation_bytes: self.max_allocation_bytes,
            max_total_bytes: self.max_total_bytes,
        }
    }
}
