//! Transaction-manager collaborator for explicit demarcation.
//!
//! # Responsibility
//! - Hand out explicit transaction handles and drive their state machine.
//!
//! # Invariants
//! - Handle states move `Started -> Committed` or `Started -> RolledBack`
//!   and never leave a terminal state.

use super::{TxError, TxResult, TxStage};
use rusqlite::Connection;

/// Explicit transaction lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Started,
    Committed,
    RolledBack,
}

/// One explicit transaction, owned by the coordinator invocation that
/// began it and never shared across operations.
#[derive(Debug)]
pub struct TransactionHandle {
    state: TxState,
}

impl TransactionHandle {
    fn started() -> Self {
        Self {
            state: TxState::Started,
        }
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state != TxState::Started
    }

    fn ensure_started(&self, stage: TxStage) -> TxResult<()> {
        if self.state != TxState::Started {
            return Err(TxError::InvalidState {
                stage,
                state: self.state,
            });
        }
        Ok(())
    }
}

/// Begin/commit/rollback capability supplied by an external collaborator.
///
/// Held for the process lifetime and injected into the coordinator at
/// construction; implementations must tolerate concurrent callers, each
/// with their own connection and handle.
pub trait TransactionManager: Send + Sync {
    fn begin(&self, conn: &Connection) -> TxResult<TransactionHandle>;
    fn commit(&self, conn: &Connection, handle: &mut TransactionHandle) -> TxResult<()>;
    fn rollback(&self, conn: &Connection, handle: &mut TransactionHandle) -> TxResult<()>;
}

/// Transaction manager issuing SQLite statements on the caller's connection.
#[derive(Debug, Default)]
pub struct SqliteTransactionManager;

impl TransactionManager for SqliteTransactionManager {
    fn begin(&self, conn: &Connection) -> TxResult<TransactionHandle> {
        conn.execute_batch("BEGIN IMMEDIATE;")
            .map_err(|source| TxError::Sqlite {
                stage: TxStage::Begin,
                source,
            })?;
        Ok(TransactionHandle::started())
    }

    fn commit(&self, conn: &Connection, handle: &mut TransactionHandle) -> TxResult<()> {
        handle.ensure_started(TxStage::Commit)?;
        conn.execute_batch("COMMIT;")
            .map_err(|source| TxError::Sqlite {
                stage: TxStage::Commit,
                source,
            })?;
        handle.state = TxState::Committed;
        Ok(())
    }

    fn rollback(&self, conn: &Connection, handle: &mut TransactionHandle) -> TxResult<()> {
        handle.ensure_started(TxStage::Rollback)?;
        conn.execute_batch("ROLLBACK;")
            .map_err(|source| TxError::Sqlite {
                stage: TxStage::Rollback,
                source,
            })?;
        handle.state = TxState::RolledBack;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{SqliteTransactionManager, TransactionManager, TxState};
    use crate::txn::{TxError, TxStage};
    use rusqlite::Connection;

    #[test]
    fn handle_walks_begin_commit_states() {
        let conn = Connection::open_in_memory().unwrap();
        let manager = SqliteTransactionManager;

        let mut handle = manager.begin(&conn).unwrap();
        assert_eq!(handle.state(), TxState::Started);

        manager.commit(&conn, &mut handle).unwrap();
        assert_eq!(handle.state(), TxState::Committed);
        assert!(handle.is_terminal());
    }

    #[test]
    fn commit_after_rollback_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let manager = SqliteTransactionManager;

        let mut handle = manager.begin(&conn).unwrap();
        manager.rollback(&conn, &mut handle).unwrap();

        let err = manager.commit(&conn, &mut handle).unwrap_err();
        assert!(matches!(
            err,
            TxError::InvalidState {
                stage: TxStage::Commit,
                state: TxState::RolledBack,
            }
        ));
    }
}
