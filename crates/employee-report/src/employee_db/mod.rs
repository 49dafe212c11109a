//! Local SQLite employee table
//!
//! Each lookup opens the database file read-only, runs one parameterized
//! statement, and closes the connection before returning.

mod query;
mod reader;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use query::{
    END_DATE, EmployeeFilter, RESIGNATION_DATE, START_DATE, SqlQuery, build_query,
    quote_identifier,
};
pub use reader::{fetch_employees, open_read_only, sqlite_value_to_json};

use crate::config::EmployeeDbConfig;
use crate::masking::{Record, mask_record};

/// Employee database errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Blocking task failed: {0}")]
    Task(String),
}

/// Handle on the employee table; cheap to clone, holds no connection
#[derive(Debug, Clone)]
pub struct EmployeeDb {
    path: PathBuf,
    table: String,
}

impl EmployeeDb {
    #[must_use]
    pub fn new(config: &EmployeeDbConfig) -> Self {
        Self {
            path: config.path.clone(),
            table: config.table.clone(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Fetch matching rows and mask them, off the async executor
    pub async fn list_masked(&self, filter: EmployeeFilter) -> Result<Vec<Record>, DbError> {
        let path = self.path.clone();
        let table = self.table.clone();

        let records = tokio::task::spawn_blocking(move || fetch_employees(&path, &table, &filter))
            .await
            .map_err(|e| DbError::Task(e.to_string()))??;

        Ok(records.iter().map(mask_record).collect())
    }
}
