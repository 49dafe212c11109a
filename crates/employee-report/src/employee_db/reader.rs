//! Row fetching and SQLite value conversion

use std::path::Path;
use std::time::Instant;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, params_from_iter};
use serde_json::Value;

use super::DbError;
use super::query::{EmployeeFilter, build_query};
use crate::masking::Record;

/// Open the database file read-only. A missing file is an error.
pub fn open_read_only(path: &Path) -> Result<Connection, DbError> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| DbError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert a SQLite cell to JSON
pub fn sqlite_value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::from(v),
        ValueRef::Real(v) => serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(format!("<BLOB {} bytes>", bytes.len())),
    }
}

/// Run the filtered employee query and zip each row with the column names.
///
/// The connection lives only for the duration of this call.
pub fn fetch_employees(
    path: &Path,
    table: &str,
    filter: &EmployeeFilter,
) -> Result<Vec<Record>, DbError> {
    let started_at = Instant::now();
    let query = build_query(table, filter)?;
    let conn = open_read_only(path)?;

    let mut stmt = conn.prepare(&query.sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = stmt.query(params_from_iter(query.params.iter()))?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Record::new();
        for (idx, name) in columns.iter().enumerate() {
            record.insert(name.clone(), sqlite_value_to_json(row.get_ref(idx)?));
        }
        records.push(record);
    }

    tracing::debug!(
        path = %path.display(),
        table,
        rows = records.len(),
        bound_params = query.params.len(),
        duration_ms = started_at.elapsed().as_millis() as u64,
        "Employee query complete"
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn fixture() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chinook.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE Employee_Demo (
                "Sr. No." INTEGER,
                "Employee Code" TEXT,
                "First Name" TEXT,
                "Middle Name" TEXT,
                "Last Name" TEXT,
                "PAN No." TEXT,
                "Salary" REAL,
                "date of joining" TEXT,
                "date of Resignation" TEXT
            );
            INSERT INTO Employee_Demo VALUES
                (1, 'EMP001', 'Asha', NULL, 'Rao', 'ABCDE1234F', 55000.5, '2022-12-31', NULL),
                (2, 'EMP002', 'Ravi', 'K', 'Iyer', 'BCDEF2345G', 61000, '2023-01-01', NULL),
                (3, 'EMP003', 'Meena', '', 'Das', 'CDEFG3456H', 48000, '2023-07-15 09:30:00', '2024-01-31'),
                (4, 'EMP004', 'John', 'Paul', 'Smith', 'DEFGH4567J', 72000, '2023-12-31', '2024-01-31'),
                (5, 'EMP005', 'Sara', NULL, 'Khan', 'EFGHI5678K', 50000, '2024-01-01', NULL);
            "#,
        )
        .unwrap();
        (dir, path)
    }

    fn codes(records: &[Record]) -> Vec<String> {
        records
            .iter()
            .map(|r| r["Employee Code"].as_str().unwrap().to_string())
            .collect()
    }

    fn filter(start: Option<&str>, end: Option<&str>, resigned: Option<&str>) -> EmployeeFilter {
        EmployeeFilter {
            start_date: start.map(String::from),
            end_date: end.map(String::from),
            resignation_date: resigned.map(String::from),
        }
    }

    #[test]
    fn test_value_conversion() {
        assert_eq!(sqlite_value_to_json(ValueRef::Null), Value::Null);
        assert_eq!(sqlite_value_to_json(ValueRef::Integer(42)), json!(42));
        assert_eq!(sqlite_value_to_json(ValueRef::Real(2.5)), json!(2.5));
        assert_eq!(sqlite_value_to_json(ValueRef::Real(f64::NAN)), Value::Null);
        assert_eq!(sqlite_value_to_json(ValueRef::Text(b"hello")), json!("hello"));
        assert_eq!(
            sqlite_value_to_json(ValueRef::Blob(&[1, 2, 3])),
            json!("<BLOB 3 bytes>")
        );
    }

    #[test]
    fn test_fetch_all_unfiltered() {
        let (_dir, path) = fixture();
        let records = fetch_employees(&path, "Employee_Demo", &EmployeeFilter::default()).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0]["Salary"], json!(55000.5));
        assert_eq!(records[0]["Sr. No."], json!(1));
        assert_eq!(records[0]["Middle Name"], Value::Null);
    }

    #[test]
    fn test_fetch_preserves_column_order() {
        let (_dir, path) = fixture();
        let records = fetch_employees(&path, "Employee_Demo", &EmployeeFilter::default()).unwrap();
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "Sr. No.",
                "Employee Code",
                "First Name",
                "Middle Name",
                "Last Name",
                "PAN No.",
                "Salary",
                "date of joining",
                "date of Resignation"
            ]
        );
    }

    #[test]
    fn test_joining_range_is_inclusive() {
        let (_dir, path) = fixture();
        let records = fetch_employees(
            &path,
            "Employee_Demo",
            &filter(Some("2023-01-01"), Some("2023-12-31"), None),
        )
        .unwrap();
        assert_eq!(codes(&records), vec!["EMP002", "EMP003", "EMP004"]);
    }

    #[test]
    fn test_resignation_date_equality() {
        let (_dir, path) = fixture();
        let records =
            fetch_employees(&path, "Employee_Demo", &filter(None, None, Some("2024-01-31")))
                .unwrap();
        assert_eq!(codes(&records), vec!["EMP003", "EMP004"]);
    }

    #[test]
    fn test_combined_filters() {
        let (_dir, path) = fixture();
        let records = fetch_employees(
            &path,
            "Employee_Demo",
            &filter(Some("2023-06-01"), Some("2023-12-31"), Some("2024-01-31")),
        )
        .unwrap();
        assert_eq!(codes(&records), vec!["EMP003", "EMP004"]);
    }

    #[test]
    fn test_malformed_date_matches_nothing() {
        let (_dir, path) = fixture();
        let records = fetch_employees(
            &path,
            "Employee_Demo",
            &filter(Some("not-a-date"), Some("2023-12-31"), None),
        )
        .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_table_is_error() {
        let (_dir, path) = fixture();
        let err = fetch_employees(&path, "Nope", &EmployeeFilter::default()).unwrap_err();
        assert!(matches!(err, DbError::Sqlite(_)));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = fetch_employees(
            &dir.path().join("missing.db"),
            "Employee_Demo",
            &EmployeeFilter::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DbError::Open { .. }));
        assert!(!dir.path().join("missing.db").exists());
    }

    #[test]
    fn test_read_only_connection() {
        let (_dir, path) = fixture();
        let conn = open_read_only(&path).unwrap();
        assert!(conn.execute("DELETE FROM Employee_Demo", []).is_err());
    }
}
