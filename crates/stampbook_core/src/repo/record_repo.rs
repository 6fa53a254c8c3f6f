//! Record persistence contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the insert/delete/commit/fetch surface the store depends on.
//! - Own the connection handle for the SQLite backend.
//!
//! # Invariants
//! - `list_records_desc` always returns the full table in
//!   `created_at DESC, uuid ASC` order.
//! - `delete_record` targets identity, never position.

use crate::db::DbError;
use crate::model::record::{Record, RecordId, RecordValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    NotFound(RecordId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Backend-agnostic persistence interface for records.
///
/// The store only ever talks to this trait, so a buffering in-memory fake
/// can stand in for SQLite in tests. Backends that stage writes apply them
/// in `commit`; eager backends treat `commit` as a consistency check.
pub trait RecordRepository {
    fn insert_record(&self, record: &Record) -> RepoResult<RecordId>;
    fn delete_record(&self, id: RecordId) -> RepoResult<()>;
    fn commit(&self) -> RepoResult<()>;
    fn list_records_desc(&self) -> RepoResult<Vec<Record>>;
}

/// SQLite-backed record repository. Owns its connection; the store owns
/// the repository, so the handle has exactly one writer.
pub struct SqliteRecordRepository {
    conn: Connection,
}

impl SqliteRecordRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl RecordRepository for SqliteRecordRepository {
    fn insert_record(&self, record: &Record) -> RepoResult<RecordId> {
        record.validate()?;

        self.conn.execute(
            "INSERT INTO records (uuid, created_at) VALUES (?1, ?2);",
            params![record.uuid.to_string(), record.created_at],
        )?;

        Ok(record.uuid)
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM records WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn commit(&self) -> RepoResult<()> {
        // Statements above run in autocommit mode; an open explicit
        // transaction only exists if a caller started one, so finish it.
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT;")?;
        }
        Ok(())
    }

    fn list_records_desc(&self) -> RepoResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, created_at FROM records
             ORDER BY created_at DESC, uuid ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in records.uuid"))
    })?;

    let record = Record::with_id(uuid, row.get("created_at")?);
    record.validate()?;
    Ok(record)
}
