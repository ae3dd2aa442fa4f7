//! System configuration from environment variables.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const CHANNEL_CAPACITY_VAR: &str = "FEFO_CHANNEL_CAPACITY";
pub const DATA_DIR_VAR: &str = "FEFO_DATA_DIR";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Settings for [`FulfillmentSystem`](crate::lifecycle::FulfillmentSystem).
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    /// Mailbox size of every actor.
    pub channel_capacity: usize,

    /// Where snapshots are read from and written to. `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 32,
            data_dir: None,
        }
    }
}

impl SystemConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `FEFO_CHANNEL_CAPACITY`: actor mailbox size (default: 32)
    /// - `FEFO_DATA_DIR`: snapshot directory (default: none, in-memory only)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let channel_capacity = match lookup(CHANNEL_CAPACITY_VAR) {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: CHANNEL_CAPACITY_VAR,
                        value,
                    })
                }
            },
            None => defaults.channel_capacity,
        };

        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            channel_capacity,
            data_dir,
        })
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }
}
