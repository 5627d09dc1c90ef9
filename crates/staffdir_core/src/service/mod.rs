//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, audit and transaction layers into the
//!   mutation and search entry points callers use.
//! - Keep presentation layers decoupled from storage details.

pub mod coordinator;
pub mod query;
