use rusqlite::Connection;
use staffdir_core::audit::activity_log::{ActivityLog, AuditResult};
use staffdir_core::{
    ConstraintKind, Demarcation, Employee, QueryService, ResourceKind, SqliteActivityLog,
    SqliteDataSource, SqliteTransactionManager, UnitOfWorkCoordinator, UowError,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BOTH_MODES: [Demarcation; 2] = [Demarcation::Ambient, Demarcation::Explicit];

fn scratch_path(dir: &TempDir, mode: Demarcation) -> PathBuf {
    dir.path().join(format!("staffdir-{mode}.db"))
}

fn coordinator(path: &Path) -> UnitOfWorkCoordinator<SqliteDataSource, SqliteActivityLog> {
    UnitOfWorkCoordinator::new(
        SqliteDataSource::new(path),
        SqliteActivityLog::default(),
        Some(Box::new(SqliteTransactionManager)),
    )
}

fn employee_count(path: &Path) -> i64 {
    let conn = Connection::open(path).unwrap();
    conn.query_row("SELECT COUNT(*) FROM employees;", [], |row| row.get(0))
        .unwrap()
}

fn audit_lines(path: &Path) -> Vec<(String, String)> {
    let conn = Connection::open(path).unwrap();
    let mut stmt = conn
        .prepare("SELECT queue, message FROM activity_log ORDER BY seq;")
        .unwrap();
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap();
    rows.map(Result::unwrap).collect()
}

fn sample_employee() -> Employee {
    let mut employee = Employee::new("e9999", "ada", "lovelace");
    employee.job = Some("engineer".to_string());
    employee.salary_cents = Some(5_250_075);
    employee
}

/// Activity log whose append always fails with a real driver error, used to
/// force a failure between the store write and the commit.
struct FailingLog;

impl ActivityLog for FailingLog {
    fn append(&self, conn: &Connection, _message: &str) -> AuditResult<()> {
        conn.execute("INSERT INTO no_such_table (v) VALUES (1);", [])?;
        Ok(())
    }
}

#[test]
fn successful_create_commits_store_and_audit_together() {
    let dir = TempDir::new().unwrap();

    for mode in BOTH_MODES {
        let path = scratch_path(&dir, mode);
        coordinator(&path).create(&sample_employee(), mode).unwrap();

        assert_eq!(employee_count(&path), 1, "mode {mode}");
        let lines = audit_lines(&path);
        assert_eq!(lines.len(), 1, "mode {mode}");
        assert_eq!(lines[0].0, "EMPLOG");
        assert_eq!(lines[0].1, "Added E9999 with last name: LOVELACE");
    }
}

#[test]
fn create_then_search_returns_single_uppercase_record() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, Demarcation::Ambient);

    coordinator(&path)
        .create(&sample_employee(), Demarcation::Ambient)
        .unwrap();

    let outcome = QueryService::new(SqliteDataSource::new(&path))
        .search("love")
        .unwrap();
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].empno, "E9999");
    assert_eq!(outcome.matches[0].first_name, "ADA");
    assert_eq!(outcome.matches[0].last_name, "LOVELACE");
}

#[test]
fn duplicate_create_fails_classified_and_keeps_first_row() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, Demarcation::Explicit);
    let coordinator = coordinator(&path);

    coordinator
        .create(&sample_employee(), Demarcation::Explicit)
        .unwrap();

    let mut second = sample_employee();
    second.first_name = "IMPOSTOR".to_string();
    let err = coordinator
        .create(&second, Demarcation::Explicit)
        .unwrap_err();

    assert!(matches!(
        err,
        UowError::ConstraintViolation {
            kind: ConstraintKind::DuplicateIdentifier,
            ..
        }
    ));

    assert_eq!(employee_count(&path), 1);
    let conn = Connection::open(&path).unwrap();
    let first_name: String = conn
        .query_row(
            "SELECT first_name FROM employees WHERE empno = 'E9999';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(first_name, "ADA");
    // Only the successful create left an audit line.
    assert_eq!(audit_lines(&path).len(), 1);
}

#[test]
fn forced_log_failure_rolls_back_store_write_in_both_modes() {
    let dir = TempDir::new().unwrap();

    for mode in BOTH_MODES {
        let path = scratch_path(&dir, mode);
        // Migrate the file first so assertions can query the schema.
        coordinator(&path)
            .create(&Employee::new("E0001", "GRACE", "HOPPER"), mode)
            .unwrap();

        let failing = UnitOfWorkCoordinator::new(
            SqliteDataSource::new(&path),
            FailingLog,
            Some(Box::new(SqliteTransactionManager)),
        );
        let err = failing.create(&sample_employee(), mode).unwrap_err();
        assert!(matches!(err, UowError::WriteFailure { .. }), "mode {mode}");

        // The rolled-back create is absent from both resources.
        assert_eq!(employee_count(&path), 1, "mode {mode}");
        assert_eq!(audit_lines(&path).len(), 1, "mode {mode}");
    }
}

#[test]
fn restricted_delete_leaves_row_and_audit_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, Demarcation::Ambient);
    let coordinator = coordinator(&path);
    let employee = sample_employee();

    coordinator.create(&employee, Demarcation::Ambient).unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO departments (dept_no, dept_name, manager_empno)
         VALUES ('D01', 'ENGINEERING', 'E9999');",
        [],
    )
    .unwrap();
    drop(conn);

    for mode in BOTH_MODES {
        let err = coordinator.delete(&employee, mode).unwrap_err();
        assert!(
            matches!(
                err,
                UowError::ConstraintViolation {
                    kind: ConstraintKind::DeleteRestricted,
                    ..
                }
            ),
            "mode {mode}"
        );
    }

    assert_eq!(employee_count(&path), 1);
    // No audit entry for a rolled-back delete.
    assert_eq!(audit_lines(&path).len(), 1);
}

#[test]
fn successful_delete_removes_row_and_logs_it() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, Demarcation::Explicit);
    let coordinator = coordinator(&path);
    let employee = sample_employee();

    coordinator.create(&employee, Demarcation::Explicit).unwrap();
    coordinator.delete(&employee, Demarcation::Explicit).unwrap();

    assert_eq!(employee_count(&path), 0);
    let lines = audit_lines(&path);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].1, "Deleted E9999 with last name: LOVELACE");
}

#[test]
fn update_then_search_never_returns_stale_values() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, Demarcation::Ambient);
    let coordinator = coordinator(&path);

    let mut employee = sample_employee();
    coordinator.create(&employee, Demarcation::Ambient).unwrap();

    employee.job = Some("manager".to_string());
    employee.salary_cents = Some(9_999_999);
    coordinator.update(&employee, Demarcation::Ambient).unwrap();

    let outcome = QueryService::new(SqliteDataSource::new(&path))
        .search("LOVELACE")
        .unwrap();
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].job.as_deref(), Some("MANAGER"));
    assert_eq!(outcome.matches[0].salary_cents, Some(9_999_999));

    let lines = audit_lines(&path);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].1, "Updated E9999 with last name: LOVELACE");
}

#[test]
fn explicit_mode_without_manager_fails_before_any_write() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, Demarcation::Explicit);

    let no_manager = UnitOfWorkCoordinator::new(
        SqliteDataSource::new(&path),
        SqliteActivityLog::default(),
        None,
    );
    let err = no_manager
        .create(&sample_employee(), Demarcation::Explicit)
        .unwrap_err();

    assert!(matches!(
        err,
        UowError::ResourceUnavailable {
            resource: ResourceKind::TransactionManager,
            source: None,
        }
    ));
    assert_eq!(employee_count(&path), 0);

    // Ambient mode on the same coordinator still works.
    no_manager
        .create(&sample_employee(), Demarcation::Ambient)
        .unwrap();
    assert_eq!(employee_count(&path), 1);
}

#[test]
fn unavailable_data_source_is_a_distinct_fatal_error() {
    let missing = Path::new("/nonexistent-staffdir-parent/staffdir.db");
    let coordinator = UnitOfWorkCoordinator::new(
        SqliteDataSource::new(missing),
        SqliteActivityLog::default(),
        Some(Box::new(SqliteTransactionManager)),
    );

    let err = coordinator
        .create(&sample_employee(), Demarcation::Ambient)
        .unwrap_err();
    assert!(matches!(
        err,
        UowError::ResourceUnavailable {
            resource: ResourceKind::DataSource,
            source: Some(_),
        }
    ));
}
