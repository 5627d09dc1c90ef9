//! Domain model for the employee directory.
//!
//! # Responsibility
//! - Define the canonical employee record used by repository and services.
//! - Keep presentation-only state out of the persisted shape.
//!
//! # Invariants
//! - Every persisted record is identified by a non-empty, uppercase `empno`.
//! - UI flags (`can_edit`/`can_delete`) live only on the boundary wrapper.

pub mod employee;
pub mod list_item;
