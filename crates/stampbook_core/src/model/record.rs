//! Record domain model.
//!
//! # Responsibility
//! - Define the timestamped record persisted by the store.
//! - Capture the creation timestamp exactly once, at construction.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another record.
//! - `created_at` is epoch milliseconds, positive, and immutable after
//!   creation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a persisted record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordId = Uuid;

/// Validation error for record field invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    /// `created_at` must be a positive epoch-millisecond value.
    NonPositiveTimestamp(i64),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveTimestamp(value) => {
                write!(f, "record timestamp must be positive, got {value}")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// The single entity managed by this crate: an identity plus the moment
/// it was created. Records are immutable once persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable global ID assigned at creation.
    pub uuid: RecordId,
    /// Creation time in Unix epoch milliseconds, never mutated afterwards.
    pub created_at: i64,
}

impl Record {
    /// Creates a record stamped with the current wall-clock time.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4(), now_epoch_ms())
    }

    /// Creates a record with caller-provided identity and timestamp.
    ///
    /// Used by read paths rehydrating persisted rows; does not validate.
    pub fn with_id(uuid: RecordId, created_at: i64) -> Self {
        Self { uuid, created_at }
    }

    /// Checks field invariants. Write paths must call this before
    /// persistence; read paths must reject rows that fail it.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.created_at <= 0 {
            return Err(RecordValidationError::NonPositiveTimestamp(self.created_at));
        }
        Ok(())
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

/// Current wall-clock time as Unix epoch milliseconds.
///
/// A clock set before the epoch yields `0`, which `validate` rejects
/// instead of persisting a nonsense timestamp.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
