//! Data-source collaborator that leases connections to one caller at a time.
//!
//! # Responsibility
//! - Hand out connections for exactly one coordinator or query invocation.
//! - Keep acquisition failure observable as a distinct error path.
//!
//! # Invariants
//! - A leased connection is exclusively owned by its caller and is released
//!   by drop scope on every exit path.
//! - Pooling policy, if any, lives behind this trait, never in core logic.

use super::{open_db, DbResult};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Supplier of exclusively-owned connections.
///
/// Implementations decide where connections come from; callers only rely on
/// getting a migrated, foreign-key-enforcing connection or an error.
pub trait DataSource: Send + Sync {
    fn acquire(&self) -> DbResult<Connection>;
}

/// File-backed data source opening one fresh connection per lease.
pub struct SqliteDataSource {
    path: PathBuf,
}

impl SqliteDataSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for SqliteDataSource {
    fn acquire(&self) -> DbResult<Connection> {
        open_db(&self.path)
    }
}
