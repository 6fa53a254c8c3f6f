//! Record store: backend handle, in-memory projection, last error.
//!
//! # Responsibility
//! - Own the backend handle and the published `items`/`error` fields.
//! - Refresh `items` wholesale after every successful mutation.
//!
//! # Invariants
//! - `items` is sorted `created_at DESC, uuid ASC`, matching backend order.
//! - `error` is sticky: set on failure, never cleared on success, only
//!   overwritten by a newer failure.
//! - A store that failed to open stays detached for its whole lifetime;
//!   recovery means constructing a new store.
//!
//! # Concurrency
//! - Single-writer by construction: every operation takes `&mut self`,
//!   and no internal locking exists. Callers sharing a store across
//!   threads must add their own serialization (e.g. `Mutex<RecordStore>`).

use crate::db::{open_db, open_db_in_memory};
use crate::model::record::{Record, RecordId};
use crate::repo::record_repo::{RecordRepository, RepoError, SqliteRecordRepository};
use log::{error, info};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Container placement for `RecordStore::open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    /// On-disk container at the given path, created when missing.
    Durable(PathBuf),
    /// In-memory container scoped to this store instance.
    Ephemeral,
}

/// Store-level failure recorded into the published `error` field.
#[derive(Debug)]
pub enum StoreError {
    /// An operation was attempted without a usable backend handle.
    NotConnected,
    /// The backend reported a failure.
    Backend(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "record store has no backend connection"),
            Self::Backend(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotConnected => None,
            Self::Backend(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Backend(value)
    }
}

/// Callback invoked with the new projection after each successful
/// wholesale replacement of `items`.
pub type ChangeListener = Box<dyn FnMut(&[Record]) + Send>;

/// Owns a backend handle and mirrors its full contents into `items`
/// after every mutation. Failures land in `last_error` instead of
/// propagating; no operation retries or rolls back.
pub struct RecordStore<R: RecordRepository> {
    backend: Option<R>,
    items: Vec<Record>,
    error: Option<StoreError>,
    change_listener: Option<ChangeListener>,
}

impl RecordStore<SqliteRecordRepository> {
    /// Opens a store over a SQLite container in the given mode.
    ///
    /// On open failure the returned store is permanently detached:
    /// `items` is empty, `last_error` holds the open failure, and every
    /// subsequent operation records `StoreError::NotConnected`.
    pub fn open(mode: StorageMode) -> Self {
        let opened = match &mode {
            StorageMode::Durable(path) => open_db(path),
            StorageMode::Ephemeral => open_db_in_memory(),
        };

        match opened {
            Ok(conn) => {
                info!("event=store_open module=store status=ok");
                Self::with_backend(SqliteRecordRepository::new(conn))
            }
            Err(err) => {
                error!("event=store_open module=store status=error error={err}");
                let mut store = Self::detached();
                store.error = Some(StoreError::Backend(err.into()));
                store
            }
        }
    }
}

impl<R: RecordRepository> RecordStore<R> {
    /// Creates a store over an already-opened backend and performs the
    /// initial refresh.
    pub fn with_backend(backend: R) -> Self {
        let mut store = Self {
            backend: Some(backend),
            items: Vec::new(),
            error: None,
            change_listener: None,
        };
        store.refresh();
        store
    }

    /// Creates a store with no backend attached. Every mutating
    /// operation on it records `StoreError::NotConnected`.
    pub fn detached() -> Self {
        Self {
            backend: None,
            items: Vec::new(),
            error: None,
            change_listener: None,
        }
    }

    /// The published projection: all persisted records, newest first.
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    /// The published last-error field. Sticky across later successes.
    pub fn last_error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    /// Whether a backend handle is attached.
    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    /// Registers a callback fired after each successful replacement of
    /// `items`, for presentation layers that subscribe instead of poll.
    pub fn set_change_listener(&mut self, listener: ChangeListener) {
        self.change_listener = Some(listener);
    }

    /// Creates a record stamped "now", commits it, and refreshes the
    /// projection. On success the new record is `items[0]` unless an
    /// equal-or-later timestamp already exists.
    pub fn create_record(&mut self) {
        let Some(backend) = self.backend.as_ref() else {
            self.error = Some(StoreError::NotConnected);
            return;
        };

        let record = Record::new();
        let result = backend
            .insert_record(&record)
            .and_then(|_| backend.commit());

        match result {
            Ok(()) => {
                info!(
                    "event=record_create module=store status=ok id={} created_at={}",
                    record.uuid, record.created_at
                );
                self.refresh();
            }
            Err(err) => {
                error!("event=record_create module=store status=error error={err}");
                self.error = Some(err.into());
            }
        }
    }

    /// Deletes the records at the given positions of the current `items`,
    /// commits, and refreshes the projection.
    ///
    /// Positions are resolved against the projection as it stands when
    /// the call is made. A failure partway leaves whatever the backend
    /// already applied; there is no compensation.
    ///
    /// # Panics
    /// Panics if an index is not a valid position in `items`. Callers
    /// must only pass positions obtained from the current projection.
    pub fn delete_records(&mut self, indices: &BTreeSet<usize>) {
        let Some(backend) = self.backend.as_ref() else {
            self.error = Some(StoreError::NotConnected);
            return;
        };

        let ids: Vec<RecordId> = indices
            .iter()
            .map(|&position| self.items[position].uuid)
            .collect();

        let result = ids
            .iter()
            .try_for_each(|&id| backend.delete_record(id))
            .and_then(|()| backend.commit());

        match result {
            Ok(()) => {
                info!(
                    "event=record_delete module=store status=ok count={}",
                    ids.len()
                );
                self.refresh();
            }
            Err(err) => {
                error!("event=record_delete module=store status=error error={err}");
                self.error = Some(err.into());
            }
        }
    }

    /// Replaces `items` with a full fetch from the backend. On fetch
    /// failure the previous (possibly stale) projection is kept and the
    /// failure is recorded.
    pub fn refresh(&mut self) {
        let Some(backend) = self.backend.as_ref() else {
            self.error = Some(StoreError::NotConnected);
            return;
        };

        match backend.list_records_desc() {
            Ok(records) => {
                self.items = records;
                if let Some(listener) = self.change_listener.as_mut() {
                    listener(&self.items);
                }
            }
            Err(err) => {
                error!("event=store_refresh module=store status=error error={err}");
                self.error = Some(err.into());
            }
        }
    }
}
