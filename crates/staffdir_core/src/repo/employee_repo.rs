//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the write and search statements over canonical `employees`
//!   storage.
//! - Keep the fixed column order of the wire contract in one place.
//!
//! # Invariants
//! - Write paths call `Employee::validate()` and normalize text fields to
//!   uppercase before SQL mutations.
//! - `work_dept` is always written as an explicit NULL.
//! - Search matches a case-insensitive last-name prefix ordered by
//!   last name, then employee number.

use crate::db::DbError;
use crate::model::employee::{Employee, EmployeeValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    birth_date,
    bonus_cents,
    comm_cents,
    ed_level,
    empno,
    first_name,
    hire_date,
    job,
    last_name,
    mid_init,
    phone_no,
    salary_cents,
    gender
FROM employees";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EmployeeValidationError),
    Db(DbError),
    NotFound(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(empno) => write!(f, "employee not found: {empno}"),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for employee persistence.
pub trait EmployeeRepository {
    fn insert(&self, employee: &Employee) -> RepoResult<()>;
    fn update(&self, employee: &Employee) -> RepoResult<()>;
    fn delete(&self, empno: &str) -> RepoResult<()>;
    fn find_by_last_name(&self, prefix: &str) -> RepoResult<Vec<Employee>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn insert(&self, employee: &Employee) -> RepoResult<()> {
        employee.validate()?;
        let employee = employee.normalized();

        self.conn.execute(
            "INSERT INTO employees (
                birth_date,
                bonus_cents,
                comm_cents,
                ed_level,
                empno,
                first_name,
                hire_date,
                job,
                last_name,
                mid_init,
                phone_no,
                salary_cents,
                gender,
                work_dept
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
            params![
                employee.birth_date,
                employee.bonus_cents,
                employee.comm_cents,
                employee.ed_level,
                employee.empno,
                employee.first_name,
                employee.hire_date,
                employee.job,
                employee.last_name,
                employee.mid_init,
                employee.phone_no,
                employee.salary_cents,
                employee.gender,
                // Department assignment is not modelled; always NULL.
                Option::<String>::None,
            ],
        )?;

        Ok(())
    }

    fn update(&self, employee: &Employee) -> RepoResult<()> {
        employee.validate()?;
        let employee = employee.normalized();

        let changed = self.conn.execute(
            "UPDATE employees
             SET
                birth_date = ?1,
                bonus_cents = ?2,
                comm_cents = ?3,
                ed_level = ?4,
                empno = ?5,
                first_name = ?6,
                hire_date = ?7,
                job = ?8,
                last_name = ?9,
                mid_init = ?10,
                phone_no = ?11,
                salary_cents = ?12,
                gender = ?13,
                work_dept = ?14
             WHERE empno = ?15;",
            params![
                employee.birth_date,
                employee.bonus_cents,
                employee.comm_cents,
                employee.ed_level,
                employee.empno,
                employee.first_name,
                employee.hire_date,
                employee.job,
                employee.last_name,
                employee.mid_init,
                employee.phone_no,
                employee.salary_cents,
                employee.gender,
                Option::<String>::None,
                employee.empno,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(employee.empno));
        }

        Ok(())
    }

    fn delete(&self, empno: &str) -> RepoResult<()> {
        if empno.trim().is_empty() {
            return Err(RepoError::Validation(
                EmployeeValidationError::EmptyEmployeeNumber,
            ));
        }

        let empno = empno.to_uppercase();
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE empno = ?1;", [&empno])?;

        if changed == 0 {
            return Err(RepoError::NotFound(empno));
        }

        Ok(())
    }

    fn find_by_last_name(&self, prefix: &str) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL}
             WHERE last_name LIKE ?1
             ORDER BY last_name, empno;"
        ))?;

        let pattern = format!("{}%", prefix.to_uppercase());
        let mut rows = stmt.query([&pattern])?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let empno: String = row.get("empno")?;
    if empno.trim().is_empty() {
        return Err(RepoError::InvalidData(
            "empty empno value in employees.empno".to_string(),
        ));
    }

    Ok(Employee {
        empno,
        first_name: row.get("first_name")?,
        mid_init: row.get("mid_init")?,
        last_name: row.get("last_name")?,
        job: row.get("job")?,
        phone_no: row.get("phone_no")?,
        gender: row.get("gender")?,
        birth_date: row.get("birth_date")?,
        hire_date: row.get("hire_date")?,
        ed_level: row.get("ed_level")?,
        salary_cents: row.get("salary_cents")?,
        bonus_cents: row.get("bonus_cents")?,
        comm_cents: row.get("comm_cents")?,
    })
}
