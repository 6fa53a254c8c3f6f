//! Core record-store logic for Stampbook.
//! This crate is the single source of truth for the record lifecycle.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{Record, RecordId, RecordValidationError};
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult, SqliteRecordRepository};
pub use store::record_store::{ChangeListener, RecordStore, StorageMode, StoreError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
