//! Boundary view wrapper for search-result rows.
//!
//! # Responsibility
//! - Carry per-row edit/delete UI state next to a core record.
//! - Keep that state out of the persisted employee shape.

use crate::model::employee::Employee;
use serde::{Deserialize, Serialize};

/// One search-result row as handed to a presentation layer.
///
/// The flags are in-memory only; they are never written to or read from
/// storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeListItem {
    pub employee: Employee,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl EmployeeListItem {
    /// Wraps a record with both row actions disabled, the state every row
    /// starts from until a caller selects it.
    pub fn new(employee: Employee) -> Self {
        Self {
            employee,
            can_edit: false,
            can_delete: false,
        }
    }
}

impl From<Employee> for EmployeeListItem {
    fn from(employee: Employee) -> Self {
        Self::new(employee)
    }
}
