//! SQL construction for the employee table

use super::DbError;
use crate::constants::{COLUMN_DATE_OF_JOINING, COLUMN_DATE_OF_RESIGNATION};
use crate::params::RequestParams;

pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const RESIGNATION_DATE: &str = "resignation_date";

/// Maximum identifier length accepted for quoting
const MAX_IDENTIFIER_LENGTH: usize = 127;

/// Optional date constraints for the employee listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub resignation_date: Option<String>,
}

impl EmployeeFilter {
    #[must_use]
    pub fn from_params(params: &RequestParams) -> Self {
        Self {
            start_date: params.get_str(START_DATE),
            end_date: params.get_str(END_DATE),
            resignation_date: params.get_str(RESIGNATION_DATE),
        }
    }

    /// Joining-date range, only when both ends are given
    #[must_use]
    pub fn joining_range(&self) -> Option<(&str, &str)> {
        match (&self.start_date, &self.end_date) {
            (Some(start), Some(end)) => Some((start.as_str(), end.as_str())),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none() && self.resignation_date.is_none()
    }
}

/// SQL text with positional parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// Bracket-quote an identifier so names with spaces or mixed case stay valid
pub fn quote_identifier(name: &str) -> Result<String, DbError> {
    if name.is_empty() || name.len() > MAX_IDENTIFIER_LENGTH || name.contains(']') {
        return Err(DbError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("[{name}]"))
}

/// Build the employee listing query for `table`.
///
/// Values are always bound, never interpolated.
pub fn build_query(table: &str, filter: &EmployeeFilter) -> Result<SqlQuery, DbError> {
    let mut sql = format!("SELECT * FROM {} WHERE 1=1", quote_identifier(table)?);
    let mut params = Vec::new();

    if let Some((start, end)) = filter.joining_range() {
        sql.push_str(&format!(
            " AND date({}) BETWEEN date(?) AND date(?)",
            quote_identifier(COLUMN_DATE_OF_JOINING)?
        ));
        params.push(start.to_string());
        params.push(end.to_string());
    } else if filter.start_date.is_some() || filter.end_date.is_some() {
        tracing::debug!("Joining date range needs both start_date and end_date, ignoring");
    }

    if let Some(ref resigned) = filter.resignation_date {
        sql.push_str(&format!(
            " AND date({}) = date(?)",
            quote_identifier(COLUMN_DATE_OF_RESIGNATION)?
        ));
        params.push(resigned.clone());
    }

    Ok(SqlQuery { sql, params })
}
