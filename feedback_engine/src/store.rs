//! Progression and configuration persistence
//!
//! Persistence is best-effort: the dispatcher saves after every progression
//! mutation, treats read failures as "absent" and never retries writes. The
//! worst-case failure mode is stale progression, which self-corrects on the
//! next successful save.

use feedback_settings::FeedbackConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted progression pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Total experience points
    pub xp: u64,
    /// Current level
    pub level: u32,
}

impl ProgressRecord {
    /// Creates a record from an XP/level pair
    pub fn new(xp: u64, level: u32) -> Self {
        Self { xp, level }
    }

    /// The session-start default: 0 XP, level 1
    pub fn initial() -> Self {
        Self { xp: 0, level: 1 }
    }
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self::initial()
    }
}

/// Store error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store read failed: {0}")]
    ReadFailed(String),

    #[error("Store write failed: {0}")]
    WriteFailed(String),

    #[error("Unsupported record version: {0}")]
    UnsupportedVersion(u32),
}

/// Progression persistence abstraction
///
/// The engine only needs the `(xp, level)` pair back; the host decides the
/// storage mechanism.
pub trait ProgressStore {
    /// Loads the persisted record, `None` when nothing has been saved yet
    fn load(&mut self) -> Result<Option<ProgressRecord>, StoreError>;

    /// Persists the record, replacing any previous one
    fn save(&mut self, record: &ProgressRecord) -> Result<(), StoreError>;
}

/// Configuration persistence abstraction
pub trait ConfigStore {
    /// Persists the configuration snapshot, replacing any previous one
    fn save(&mut self, config: &FeedbackConfig) -> Result<(), StoreError>;
}

/// In-memory progression store
///
/// Used for tests and for hosts without persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    record: Option<ProgressRecord>,
    save_count: usize,
}

impl MemoryProgressStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a record
    pub fn with_record(record: ProgressRecord) -> Self {
        Self {
            record: Some(record),
            save_count: 0,
        }
    }

    /// The currently stored record
    pub fn record(&self) -> Option<ProgressRecord> {
        self.record
    }

    /// Number of saves performed
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&mut self) -> Result<Option<ProgressRecord>, StoreError> {
        Ok(self.record)
    }

    fn save(&mut self, record: &ProgressRecord) -> Result<(), StoreError> {
        self.record = Some(*record);
        self.save_count += 1;
        Ok(())
    }
}

/// In-memory configuration store
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    config: Option<FeedbackConfig>,
    save_count: usize,
}

impl MemoryConfigStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// The last saved configuration
    pub fn config(&self) -> Option<&FeedbackConfig> {
        self.config.as_ref()
    }

    /// Number of saves performed
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl ConfigStore for MemoryConfigStore {
    fn save(&mut self, config: &FeedbackConfig) -> Result<(), StoreError> {
        self.config = Some(config.clone());
        self.save_count += 1;
        Ok(())
    }
}

/// Serializable container for a progression record
///
/// Versioned like the settings wire format, so the stored shape can evolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressData {
    /// Version of the record format
    pub version: u32,
    /// Total experience points
    pub xp: u64,
    /// Current level
    pub level: u32,
}

impl ProgressData {
    /// Current version of the record format
    pub const CURRENT_VERSION: u32 = 1;

    /// Wraps a record in the current container version
    pub fn new(record: ProgressRecord) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            xp: record.xp,
            level: record.level,
        }
    }

    /// Unwraps the record
    pub fn record(&self) -> ProgressRecord {
        ProgressRecord::new(self.xp, self.level)
    }
}

/// Serializes a progression record to JSON bytes
pub fn serialize_progress(record: &ProgressRecord) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec_pretty(&ProgressData::new(*record))
        .map_err(|e| StoreError::WriteFailed(e.to_string()))
}

/// Deserializes a progression record from JSON bytes
pub fn deserialize_progress(bytes: &[u8]) -> Result<ProgressRecord, StoreError> {
    let data: ProgressData =
        serde_json::from_slice(bytes).map_err(|e| StoreError::ReadFailed(e.to_string()))?;

    if data.version != ProgressData::CURRENT_VERSION {
        return Err(StoreError::UnsupportedVersion(data.version));
    }

    Ok(data.record())
}

/// Attempts to load a progression record, treating failures as "absent"
pub fn load_progress_safe(bytes: &[u8]) -> ProgressRecord {
    deserialize_progress(bytes).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_record() {
        let record = ProgressRecord::initial();
        assert_eq!(record.xp, 0);
        assert_eq!(record.level, 1);
    }

    #[test]
    fn test_memory_store_starts_empty() {
        let mut store = MemoryProgressStore::new();
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_memory_store_save_then_load() {
        let mut store = MemoryProgressStore::new();
        store.save(&ProgressRecord::new(42, 2)).unwrap();

        assert_eq!(store.load().unwrap(), Some(ProgressRecord::new(42, 2)));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_memory_store_seeded() {
        let mut store = MemoryProgressStore::with_record(ProgressRecord::new(7, 1));
        assert_eq!(store.load().unwrap(), Some(ProgressRecord::new(7, 1)));
    }

    #[test]
    fn test_memory_config_store() {
        let mut store = MemoryConfigStore::new();
        assert!(store.config().is_none());

        store.save(&FeedbackConfig::default()).unwrap();
        assert_eq!(store.config(), Some(&FeedbackConfig::default()));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_progress_round_trip() {
        let record = ProgressRecord::new(1234, 5);
        let bytes = serialize_progress(&record).unwrap();
        assert_eq!(deserialize_progress(&bytes).unwrap(), record);
    }

    #[test]
    fn test_progress_version_check() {
        let mut data = ProgressData::new(ProgressRecord::initial());
        data.version = 3;
        let bytes = serde_json::to_vec(&data).unwrap();

        assert_eq!(
            deserialize_progress(&bytes),
            Err(StoreError::UnsupportedVersion(3))
        );
    }

    #[test]
    fn test_load_safe_corrupt_falls_back() {
        let record = load_progress_safe(b"{broken");
        assert_eq!(record, ProgressRecord::initial());
    }

    #[test]
    fn test_load_safe_valid_bytes() {
        let bytes = serialize_progress(&ProgressRecord::new(99, 2)).unwrap();
        assert_eq!(load_progress_safe(&bytes), ProgressRecord::new(99, 2));
    }
}
