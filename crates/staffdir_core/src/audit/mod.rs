//! Audit trail written alongside employee mutations.
//!
//! # Responsibility
//! - Define the append-only activity-log contract.
//!
//! # Invariants
//! - Audit lines ride in the same transaction as the triggering write; a
//!   rolled-back mutation leaves no audit line behind.

pub mod activity_log;
