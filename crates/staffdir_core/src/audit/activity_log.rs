//! Named activity-log queue over SQLite storage.
//!
//! # Responsibility
//! - Append one human-readable line per completed mutation.
//! - Stay write-only; no read contract exists in core.
//!
//! # Invariants
//! - Appends run on the caller's connection so they share the caller's
//!   transaction boundary.

use crate::db::DbError;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default queue name for employee-directory activity.
pub const DEFAULT_QUEUE: &str = "EMPLOG";

pub type AuditResult<T> = Result<T, AuditError>;

#[derive(Debug)]
pub enum AuditError {
    Db(DbError),
}

impl Display for AuditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "activity log append failed: {err}"),
        }
    }
}

impl Error for AuditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for AuditError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Append-only transactional log resource.
pub trait ActivityLog: Send + Sync {
    fn append(&self, conn: &Connection, message: &str) -> AuditResult<()>;
}

/// Activity log writing to the `activity_log` table under a queue name.
pub struct SqliteActivityLog {
    queue: String,
}

impl SqliteActivityLog {
    pub fn new(queue: impl Into<String>) -> Self {
        Self {
            queue: queue.into(),
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }
}

impl Default for SqliteActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE)
    }
}

impl ActivityLog for SqliteActivityLog {
    fn append(&self, conn: &Connection, message: &str) -> AuditResult<()> {
        conn.execute(
            "INSERT INTO activity_log (queue, message) VALUES (?1, ?2);",
            params![self.queue, message],
        )?;
        Ok(())
    }
}
