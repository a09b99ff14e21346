//! Settings persistence layer
//!
//! This module defines the wire format for stored configuration snapshots.
//! The host decides where the bytes live; loading is safe against corruption
//! and falls back to defaults.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use crate::FeedbackConfig;
use serde::{Deserialize, Serialize};

/// Serializable container for a configuration snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigData {
    /// Version of the configuration format (for future migrations)
    pub version: u32,
    /// The configuration tree
    pub config: FeedbackConfig,
}

impl ConfigData {
    /// Current version of the configuration format
    pub const CURRENT_VERSION: u32 = 1;

    /// Wraps a configuration in the current container version
    pub fn new(config: FeedbackConfig) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            config,
        }
    }
}

impl Default for ConfigData {
    fn default() -> Self {
        Self::new(FeedbackConfig::default())
    }
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors that can occur during persistence operations
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// Failed to serialize the configuration
    SerializationFailed(String),
    /// Failed to deserialize the configuration
    DeserializationFailed(String),
    /// Unsupported configuration version
    UnsupportedVersion(u32),
}

impl core::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PersistenceError::SerializationFailed(msg) => {
                write!(f, "Failed to serialize configuration: {}", msg)
            }
            PersistenceError::DeserializationFailed(msg) => {
                write!(f, "Failed to deserialize configuration: {}", msg)
            }
            PersistenceError::UnsupportedVersion(version) => {
                write!(f, "Unsupported configuration version: {}", version)
            }
        }
    }
}

/// Serializes a configuration snapshot to JSON bytes
pub fn serialize_config(data: &ConfigData) -> PersistenceResult<Vec<u8>> {
    serde_json::to_vec_pretty(data)
        .map_err(|e| PersistenceError::SerializationFailed(e.to_string()))
}

/// Deserializes a configuration snapshot from JSON bytes
pub fn deserialize_config(bytes: &[u8]) -> PersistenceResult<ConfigData> {
    let data: ConfigData = serde_json::from_slice(bytes)
        .map_err(|e| PersistenceError::DeserializationFailed(e.to_string()))?;

    if data.version != ConfigData::CURRENT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(data.version));
    }

    Ok(data)
}

/// Attempts to load a configuration from bytes, falling back to defaults on error
pub fn load_config_safe(bytes: &[u8]) -> ConfigData {
    deserialize_config(bytes).unwrap_or_default()
}
