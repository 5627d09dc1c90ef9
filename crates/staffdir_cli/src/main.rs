//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `staffdir_core` wiring.
//! - Walk one create/search round trip against a throwaway database.

use staffdir_core::{
    Demarcation, Employee, QueryService, SqliteActivityLog, SqliteDataSource,
    SqliteTransactionManager, UnitOfWorkCoordinator,
};

fn main() {
    println!("staffdir_core version={}", staffdir_core::core_version());

    let log_dir = std::env::temp_dir().join(format!("staffdir-logs-{}", std::process::id()));
    if let Some(log_dir) = log_dir.to_str() {
        if let Err(err) = staffdir_core::init_logging(staffdir_core::default_log_level(), log_dir) {
            eprintln!("logging init failed: {err}");
        }
    }

    let db_path = std::env::temp_dir().join(format!("staffdir-smoke-{}.db", std::process::id()));
    let coordinator = UnitOfWorkCoordinator::new(
        SqliteDataSource::new(&db_path),
        SqliteActivityLog::default(),
        Some(Box::new(SqliteTransactionManager)),
    );

    let mut employee = Employee::new("e9999", "ada", "lovelace");
    employee.job = Some("engineer".to_string());

    if let Err(err) = coordinator.create(&employee, Demarcation::Explicit) {
        eprintln!("create failed: {err}");
        std::process::exit(1);
    }

    let query = QueryService::new(SqliteDataSource::new(&db_path));
    match query.search("love") {
        Ok(outcome) => {
            for item in outcome.into_list_items() {
                println!(
                    "match empno={} last_name={}",
                    item.employee.empno, item.employee.last_name
                );
            }
        }
        Err(err) => {
            eprintln!("search failed: {err}");
            std::process::exit(1);
        }
    }

    let _ = std::fs::remove_file(&db_path);
}
