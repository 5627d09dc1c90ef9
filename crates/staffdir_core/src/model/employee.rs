//! Employee domain record.
//!
//! # Responsibility
//! - Hold every persisted field of one employee row.
//! - Provide pre-write validation and case normalization.
//!
//! # Invariants
//! - `empno` is immutable for the lifetime of one operation and must pass
//!   `validate()` before any write.
//! - Currency amounts are integer cents and are never rounded by core code.
//! - Absent optional fields map to SQL NULL, not sentinel values.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Employee number shape accepted for writes: 1-6 alphanumeric characters.
static EMPNO_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z0-9]{1,6}$").expect("empno pattern must compile"));

/// Fixed-point currency amount in integer cents.
///
/// Kept as a type alias to make monetary intent explicit in signatures.
pub type CurrencyCents = i64;

/// Validation failure raised before any SQL is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    EmptyEmployeeNumber,
    InvalidEmployeeNumber { empno: String },
    EmptyLastName,
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEmployeeNumber => write!(f, "employee number must not be empty"),
            Self::InvalidEmployeeNumber { empno } => {
                write!(f, "employee number `{empno}` must be 1-6 alphanumeric characters")
            }
            Self::EmptyLastName => write!(f, "last name must not be empty"),
        }
    }
}

impl Error for EmployeeValidationError {}

/// Canonical persisted employee record.
///
/// This is the storage-facing shape: presentation concerns such as the
/// edit/delete affordance flags live on
/// [`crate::model::list_item::EmployeeListItem`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee number, uppercased before storage.
    pub empno: String,
    pub first_name: String,
    /// Single-character middle initial, when present.
    pub mid_init: Option<String>,
    pub last_name: String,
    pub job: Option<String>,
    pub phone_no: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    /// Education level, stored as a small integer.
    pub ed_level: i16,
    pub salary_cents: Option<CurrencyCents>,
    pub bonus_cents: Option<CurrencyCents>,
    pub comm_cents: Option<CurrencyCents>,
}

impl Employee {
    /// Creates a record with the mandatory identity fields set and every
    /// optional field absent.
    pub fn new(
        empno: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            empno: empno.into(),
            first_name: first_name.into(),
            mid_init: None,
            last_name: last_name.into(),
            job: None,
            phone_no: None,
            gender: None,
            birth_date: None,
            hire_date: None,
            ed_level: 0,
            salary_cents: None,
            bonus_cents: None,
            comm_cents: None,
        }
    }

    /// Checks write preconditions without touching storage.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.empno.trim().is_empty() {
            return Err(EmployeeValidationError::EmptyEmployeeNumber);
        }
        if !EMPNO_SHAPE.is_match(&self.empno) {
            return Err(EmployeeValidationError::InvalidEmployeeNumber {
                empno: self.empno.clone(),
            });
        }
        if self.last_name.trim().is_empty() {
            return Err(EmployeeValidationError::EmptyLastName);
        }
        Ok(())
    }

    /// Returns a copy with the identifying and categorical text fields
    /// uppercased, the normalization applied before every write.
    pub fn normalized(&self) -> Self {
        let mut employee = self.clone();
        employee.empno = employee.empno.to_uppercase();
        employee.first_name = employee.first_name.to_uppercase();
        employee.last_name = employee.last_name.to_uppercase();
        employee.mid_init = employee.mid_init.map(|value| value.to_uppercase());
        employee.job = employee.job.map(|value| value.to_uppercase());
        employee.gender = employee.gender.map(|value| value.to_uppercase());
        employee
    }
}

#[cfg(test)]
mod tests {
    use super::{Employee, EmployeeValidationError};

    #[test]
    fn validate_rejects_empty_empno() {
        let employee = Employee::new("", "ADA", "LOVELACE");
        assert_eq!(
            employee.validate(),
            Err(EmployeeValidationError::EmptyEmployeeNumber)
        );
    }

    #[test]
    fn validate_rejects_malformed_empno() {
        let employee = Employee::new("E-99!", "ADA", "LOVELACE");
        assert!(matches!(
            employee.validate(),
            Err(EmployeeValidationError::InvalidEmployeeNumber { .. })
        ));
    }

    #[test]
    fn validate_rejects_blank_last_name() {
        let employee = Employee::new("E1", "ADA", "  ");
        assert_eq!(
            employee.validate(),
            Err(EmployeeValidationError::EmptyLastName)
        );
    }

    #[test]
    fn normalized_uppercases_text_fields_only() {
        let mut employee = Employee::new("e9999", "ada", "lovelace");
        employee.job = Some("engineer".to_string());
        employee.gender = Some("f".to_string());
        employee.phone_no = Some("x1234".to_string());

        let normalized = employee.normalized();
        assert_eq!(normalized.empno, "E9999");
        assert_eq!(normalized.first_name, "ADA");
        assert_eq!(normalized.last_name, "LOVELACE");
        assert_eq!(normalized.job.as_deref(), Some("ENGINEER"));
        assert_eq!(normalized.gender.as_deref(), Some("F"));
        // Contact fields keep the caller's casing.
        assert_eq!(normalized.phone_no.as_deref(), Some("x1234"));
    }
}
