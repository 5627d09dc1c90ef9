//! Transaction demarcation over ambient and explicit unit-of-work styles.
//!
//! # Responsibility
//! - Define the {begin, commit, rollback} capability both demarcation
//!   variants implement.
//! - Keep the transaction-manager collaborator behind a trait seam.
//!
//! # Invariants
//! - A handle always reaches a terminal state (committed or rolled back)
//!   before it is discarded, also on failure paths.
//! - The demarcation choice is read once per operation and never changes
//!   mid-flight.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod context;
mod manager;

pub use context::{AmbientTransaction, ExplicitTransaction, TransactionContext};
pub use manager::{SqliteTransactionManager, TransactionHandle, TransactionManager, TxState};

pub type TxResult<T> = Result<T, TxError>;

/// Which unit-of-work style the caller requested for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demarcation {
    /// The surrounding execution environment owns the transaction boundary;
    /// the connection's own commit/rollback primitives finish the work.
    Ambient,
    /// This code begins, commits or rolls back via a transaction-manager
    /// handle.
    Explicit,
}

impl Display for Demarcation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ambient => write!(f, "ambient"),
            Self::Explicit => write!(f, "explicit"),
        }
    }
}

/// Transaction lifecycle step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStage {
    Begin,
    Commit,
    Rollback,
}

impl Display for TxStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Begin => write!(f, "begin"),
            Self::Commit => write!(f, "commit"),
            Self::Rollback => write!(f, "rollback"),
        }
    }
}

/// Failure of the transaction machinery itself, as opposed to a failure of
/// the writes running inside the transaction.
#[derive(Debug)]
pub enum TxError {
    Sqlite {
        stage: TxStage,
        source: rusqlite::Error,
    },
    /// A commit or rollback was attempted on a handle that already reached
    /// a terminal state.
    InvalidState { stage: TxStage, state: TxState },
}

impl TxError {
    pub fn stage(&self) -> TxStage {
        match self {
            Self::Sqlite { stage, .. } | Self::InvalidState { stage, .. } => *stage,
        }
    }
}

impl Display for TxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite { stage, source } => write!(f, "transaction {stage} failed: {source}"),
            Self::InvalidState { stage, state } => {
                write!(f, "transaction {stage} attempted in state {state:?}")
            }
        }
    }
}

impl Error for TxError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite { source, .. } => Some(source),
            Self::InvalidState { .. } => None,
        }
    }
}
