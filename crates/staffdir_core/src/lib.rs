//! Core domain logic for the staffdir employee directory.
//! This crate is the single source of truth for unit-of-work invariants.

pub mod audit;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod txn;

pub use audit::activity_log::{ActivityLog, SqliteActivityLog, DEFAULT_QUEUE};
pub use db::{DataSource, SqliteDataSource};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::employee::{CurrencyCents, Employee, EmployeeValidationError};
pub use model::list_item::EmployeeListItem;
pub use repo::employee_repo::{
    EmployeeRepository, RepoError, RepoResult, SqliteEmployeeRepository,
};
pub use service::coordinator::{
    ConstraintKind, ResourceKind, UnitOfWorkCoordinator, UowError, UowResult, WriteError,
};
pub use service::query::{QueryService, SearchError, SearchOutcome, SearchResult};
pub use txn::{
    Demarcation, SqliteTransactionManager, TransactionContext, TransactionHandle,
    TransactionManager, TxError, TxStage, TxState,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
