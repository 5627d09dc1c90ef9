//! Tagged demarcation variants behind one begin/commit/rollback surface.
//!
//! # Responsibility
//! - Dispatch commit/rollback to the mechanism matching the active mode.
//!
//! # Invariants
//! - Ambient mode finishes work with the connection's own COMMIT/ROLLBACK
//!   primitives; no transaction manager is involved.
//! - Explicit mode drives a `TransactionManager` handle exclusively.

use super::{TransactionHandle, TransactionManager, TxError, TxResult, TxStage, TxState};
use rusqlite::Connection;

/// Unit of work carried by the surrounding environment.
///
/// Beginning one only turns off the connection's implicit auto-commit so
/// that the store write and the log append stay invisible until the
/// connection-level commit.
#[derive(Debug)]
pub struct AmbientTransaction {
    state: TxState,
}

impl AmbientTransaction {
    fn begin(conn: &Connection) -> TxResult<Self> {
        conn.execute_batch("BEGIN;").map_err(|source| TxError::Sqlite {
            stage: TxStage::Begin,
            source,
        })?;
        Ok(Self {
            state: TxState::Started,
        })
    }

    fn finish(&mut self, conn: &Connection, stage: TxStage) -> TxResult<()> {
        if self.state != TxState::Started {
            return Err(TxError::InvalidState {
                stage,
                state: self.state,
            });
        }

        let (sql, next) = match stage {
            TxStage::Commit => ("COMMIT;", TxState::Committed),
            TxStage::Rollback => ("ROLLBACK;", TxState::RolledBack),
            TxStage::Begin => unreachable!("finish is only called for commit/rollback"),
        };

        conn.execute_batch(sql)
            .map_err(|source| TxError::Sqlite { stage, source })?;
        self.state = next;
        Ok(())
    }
}

/// Unit of work driven through an explicit transaction-manager handle.
pub struct ExplicitTransaction<'mgr> {
    manager: &'mgr dyn TransactionManager,
    handle: TransactionHandle,
}

/// The active demarcation for one coordinator invocation.
///
/// Modelled as a tagged variant over the shared capability set so further
/// demarcation strategies can be added without touching coordinator logic.
pub enum TransactionContext<'mgr> {
    Ambient(AmbientTransaction),
    Explicit(ExplicitTransaction<'mgr>),
}

impl<'mgr> TransactionContext<'mgr> {
    /// Opens an ambient-mode context by disabling auto-commit on the
    /// leased connection.
    pub fn ambient(conn: &Connection) -> TxResult<Self> {
        Ok(Self::Ambient(AmbientTransaction::begin(conn)?))
    }

    /// Opens an explicit-mode context by beginning a transaction on the
    /// supplied manager.
    pub fn explicit(manager: &'mgr dyn TransactionManager, conn: &Connection) -> TxResult<Self> {
        let handle = manager.begin(conn)?;
        Ok(Self::Explicit(ExplicitTransaction { manager, handle }))
    }

    /// Commits via the mechanism of the active mode.
    pub fn commit(&mut self, conn: &Connection) -> TxResult<()> {
        match self {
            Self::Ambient(ambient) => ambient.finish(conn, TxStage::Commit),
            Self::Explicit(explicit) => explicit.manager.commit(conn, &mut explicit.handle),
        }
    }

    /// Rolls back via the mechanism of the active mode.
    pub fn rollback(&mut self, conn: &Connection) -> TxResult<()> {
        match self {
            Self::Ambient(ambient) => ambient.finish(conn, TxStage::Rollback),
            Self::Explicit(explicit) => explicit.manager.rollback(conn, &mut explicit.handle),
        }
    }
}
