//! Dual-mode unit-of-work coordinator for employee mutations.
//!
//! # Responsibility
//! - Run create/update/delete as one atomic unit spanning the employee
//!   store and the activity log.
//! - Commit or roll back through the mechanism of the caller-selected
//!   demarcation mode.
//!
//! # Invariants
//! - Exactly one store write and one audit append per successful mutation;
//!   both become visible together or not at all.
//! - A write-path error is never swallowed: rollback runs first, then the
//!   original error surfaces with any rollback failure attached as
//!   secondary context.
//! - The leased connection is released on every exit path by drop scope.

use crate::audit::activity_log::{ActivityLog, AuditError};
use crate::db::{DataSource, DbError};
use crate::model::employee::Employee;
use crate::repo::employee_repo::{EmployeeRepository, RepoError, SqliteEmployeeRepository};
use crate::txn::{Demarcation, TransactionContext, TransactionManager, TxError, TxStage};
use log::{error, info};
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type UowResult<T> = Result<T, UowError>;

/// External collaborator that could not be acquired or looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    DataSource,
    TransactionManager,
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataSource => write!(f, "data source"),
            Self::TransactionManager => write!(f, "transaction manager"),
        }
    }
}

/// User-actionable classification of an integrity rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// The identifier is already present (duplicate create).
    DuplicateIdentifier,
    /// A dependent record restricts the deletion.
    DeleteRestricted,
    /// Constraint rejection that matches neither known case.
    Other,
}

/// Failure raised by one of the two writes inside the unit of work.
#[derive(Debug)]
pub enum WriteError {
    Store(RepoError),
    Audit(AuditError),
}

impl Display for WriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Audit(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Audit(err) => Some(err),
        }
    }
}

/// Classified failure of one coordinator invocation.
#[derive(Debug)]
pub enum UowError {
    /// Data source or transaction manager unavailable; no write happened
    /// and there was nothing to roll back.
    ResourceUnavailable {
        resource: ResourceKind,
        source: Option<DbError>,
    },
    /// The relational write was rejected by an integrity constraint; the
    /// transaction was rolled back.
    ConstraintViolation {
        kind: ConstraintKind,
        source: WriteError,
        rollback: Option<TxError>,
    },
    /// Any other store/log failure; the transaction was rolled back.
    WriteFailure {
        source: WriteError,
        rollback: Option<TxError>,
    },
    /// Begin/commit/rollback itself failed.
    TransactionManagement {
        stage: TxStage,
        source: TxError,
        rollback: Option<TxError>,
    },
}

impl UowError {
    /// Secondary rollback failure attached to the primary error, if any.
    pub fn rollback_failure(&self) -> Option<&TxError> {
        match self {
            Self::ResourceUnavailable { .. } => None,
            Self::ConstraintViolation { rollback, .. }
            | Self::WriteFailure { rollback, .. }
            | Self::TransactionManagement { rollback, .. } => rollback.as_ref(),
        }
    }
}

impl Display for UowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResourceUnavailable {
                resource,
                source: Some(source),
            } => write!(f, "{resource} unavailable: {source}")?,
            Self::ResourceUnavailable {
                resource,
                source: None,
            } => write!(f, "{resource} is not configured")?,
            Self::ConstraintViolation { kind, .. } => match kind {
                ConstraintKind::DuplicateIdentifier => {
                    write!(f, "employee number already in use")?;
                }
                ConstraintKind::DeleteRestricted => {
                    write!(f, "a dependent record restricts this deletion")?;
                }
                ConstraintKind::Other => {
                    write!(f, "an integrity constraint rejected the write")?;
                }
            },
            Self::WriteFailure { source, .. } => write!(f, "write failed: {source}")?,
            Self::TransactionManagement { stage, source, .. } => {
                write!(f, "transaction {stage} failed: {source}")?;
            }
        }

        if let Some(rollback) = self.rollback_failure() {
            write!(f, "; rollback also failed: {rollback}")?;
        }
        Ok(())
    }
}

impl Error for UowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ResourceUnavailable { source, .. } => {
                source.as_ref().map(|err| err as &(dyn Error + 'static))
            }
            Self::ConstraintViolation { source, .. } | Self::WriteFailure { source, .. } => {
                Some(source)
            }
            Self::TransactionManagement { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    fn op(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    fn audit_verb(self) -> &'static str {
        match self {
            Self::Create => "Added",
            Self::Update => "Updated",
            Self::Delete => "Deleted",
        }
    }
}

/// Coordinator running each mutation as `begin -> store write -> log append
/// -> commit`, with rollback on any failure after begin.
///
/// Collaborators are injected once at construction and held for the process
/// lifetime; each invocation leases its own connection and transaction
/// handle, so concurrent callers only contend inside the database itself.
pub struct UnitOfWorkCoordinator<D: DataSource, L: ActivityLog> {
    data_source: D,
    activity_log: L,
    tx_manager: Option<Box<dyn TransactionManager>>,
}

impl<D: DataSource, L: ActivityLog> UnitOfWorkCoordinator<D, L> {
    /// Creates a coordinator; pass `None` for the manager when explicit
    /// demarcation is not available in this deployment.
    pub fn new(
        data_source: D,
        activity_log: L,
        tx_manager: Option<Box<dyn TransactionManager>>,
    ) -> Self {
        Self {
            data_source,
            activity_log,
            tx_manager,
        }
    }

    /// Adds a new employee record.
    pub fn create(&self, employee: &Employee, mode: Demarcation) -> UowResult<()> {
        self.run(MutationKind::Create, employee, mode)
    }

    /// Rewrites an existing employee record, normalizing its text fields
    /// before the write.
    pub fn update(&self, employee: &Employee, mode: Demarcation) -> UowResult<()> {
        self.run(MutationKind::Update, employee, mode)
    }

    /// Removes the record identified by the employee's number.
    pub fn delete(&self, employee: &Employee, mode: Demarcation) -> UowResult<()> {
        self.run(MutationKind::Delete, employee, mode)
    }

    fn run(&self, kind: MutationKind, employee: &Employee, mode: Demarcation) -> UowResult<()> {
        let started_at = Instant::now();

        let conn = self.data_source.acquire().map_err(|source| {
            error!(
                "event=uow_acquire module=service status=error op={} mode={} error={}",
                kind.op(),
                mode,
                source
            );
            UowError::ResourceUnavailable {
                resource: ResourceKind::DataSource,
                source: Some(source),
            }
        })?;

        let mut ctx = self.open_context(mode, &conn)?;

        let outcome = match self.perform_writes(&conn, kind, employee) {
            Ok(()) => match ctx.commit(&conn) {
                Ok(()) => {
                    info!(
                        "event=uow_commit module=service status=ok op={} mode={} empno={} duration_ms={}",
                        kind.op(),
                        mode,
                        employee.empno.to_uppercase(),
                        started_at.elapsed().as_millis()
                    );
                    Ok(())
                }
                Err(source) => {
                    let rollback = ctx.rollback(&conn).err();
                    Err(UowError::TransactionManagement {
                        stage: TxStage::Commit,
                        source,
                        rollback,
                    })
                }
            },
            Err(write_err) => {
                let rollback = ctx.rollback(&conn).err();
                Err(classify_write_failure(write_err, rollback))
            }
        };

        if let Err(err) = &outcome {
            error!(
                "event=uow_rollback module=service status=error op={} mode={} empno={} duration_ms={} error={}",
                kind.op(),
                mode,
                employee.empno.to_uppercase(),
                started_at.elapsed().as_millis(),
                err
            );
        }

        // The connection lease ends here on every path.
        outcome
    }

    fn open_context<'mgr>(
        &'mgr self,
        mode: Demarcation,
        conn: &Connection,
    ) -> UowResult<TransactionContext<'mgr>> {
        let begun = match mode {
            Demarcation::Ambient => TransactionContext::ambient(conn),
            Demarcation::Explicit => {
                let Some(manager) = self.tx_manager.as_deref() else {
                    return Err(UowError::ResourceUnavailable {
                        resource: ResourceKind::TransactionManager,
                        source: None,
                    });
                };
                TransactionContext::explicit(manager, conn)
            }
        };

        begun.map_err(|source| UowError::TransactionManagement {
            stage: TxStage::Begin,
            source,
            rollback: None,
        })
    }

    fn perform_writes(
        &self,
        conn: &Connection,
        kind: MutationKind,
        employee: &Employee,
    ) -> Result<(), WriteError> {
        let repo = SqliteEmployeeRepository::new(conn);

        match kind {
            MutationKind::Create => repo.insert(employee).map_err(WriteError::Store)?,
            MutationKind::Update => repo.update(employee).map_err(WriteError::Store)?,
            MutationKind::Delete => repo.delete(&employee.empno).map_err(WriteError::Store)?,
        }

        let message = format!(
            "{} {} with last name: {}",
            kind.audit_verb(),
            employee.empno.to_uppercase(),
            employee.last_name.to_uppercase()
        );
        self.activity_log
            .append(conn, &message)
            .map_err(WriteError::Audit)?;

        Ok(())
    }
}

fn classify_write_failure(source: WriteError, rollback: Option<TxError>) -> UowError {
    match constraint_kind(&source) {
        Some(kind) => UowError::ConstraintViolation {
            kind,
            source,
            rollback,
        },
        None => UowError::WriteFailure { source, rollback },
    }
}

fn constraint_kind(err: &WriteError) -> Option<ConstraintKind> {
    let sqlite_err = match err {
        WriteError::Store(RepoError::Db(DbError::Sqlite(inner))) => inner,
        WriteError::Audit(AuditError::Db(DbError::Sqlite(inner))) => inner,
        _ => return None,
    };

    match sqlite_err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Some(match failure.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => ConstraintKind::DuplicateIdentifier,
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                | rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER => ConstraintKind::DeleteRestricted,
                _ => constraint_kind_from_message(message.as_deref()),
            })
        }
        _ => None,
    }
}

/// Fallback for drivers that report a bare constraint code: text matching
/// against the failure message, a known fragility.
fn constraint_kind_from_message(message: Option<&str>) -> ConstraintKind {
    match message {
        Some(text) if text.contains("UNIQUE") || text.contains("PRIMARY KEY") => {
            ConstraintKind::DuplicateIdentifier
        }
        Some(text) if text.contains("FOREIGN KEY") => ConstraintKind::DeleteRestricted,
        _ => ConstraintKind::Other,
    }
}
