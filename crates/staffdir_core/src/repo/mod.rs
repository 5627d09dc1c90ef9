//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite statement details from service orchestration.
//!
//! # Invariants
//! - Write paths must enforce `Employee::validate()` before persistence.
//! - Statement failures propagate unmodified; the repository never retries.

pub mod employee_repo;
