//! Document store filter construction

use serde_json::{Number, Value};

use super::Query;
use crate::Error;
use crate::params::RequestParams;

pub const EMPLOYEE_ID: &str = "employeeId";
pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const DEPARTMENT: &str = "department";
pub const FULL_TIME: &str = "fullTime";
pub const HIRE_DATE: &str = "hireDate";
pub const SALARY: &str = "salary";
pub const HIRE_DATE_START: &str = "hireDateStart";
pub const HIRE_DATE_END: &str = "hireDateEnd";

/// Parameters that map one-to-one onto `equal` predicates, in emission order
pub const EQUALITY_FIELDS: &[&str] = &[
    EMPLOYEE_ID,
    FIRST_NAME,
    LAST_NAME,
    DEPARTMENT,
    FULL_TIME,
    HIRE_DATE,
];

/// Build the ordered predicate list for a request.
///
/// An exact `hireDate` together with `hireDateStart`/`hireDateEnd` is rejected.
/// `salary` is exact match only.
pub fn build_filters(params: &RequestParams) -> crate::Result<Vec<Query>> {
    if params.contains(HIRE_DATE)
        && (params.contains(HIRE_DATE_START) || params.contains(HIRE_DATE_END))
    {
        return Err(Error::InvalidFilter(format!(
            "{HIRE_DATE} cannot be combined with {HIRE_DATE_START} or {HIRE_DATE_END}"
        )));
    }

    let mut queries = Vec::new();

    for field in EQUALITY_FIELDS.iter().copied().chain([SALARY]) {
        if let Some(value) = params.get(field) {
            let values = equality_values(field, value);
            if values.is_empty() {
                tracing::debug!(field, "No usable candidate values, skipping");
                continue;
            }
            queries.push(Query::equal(field, values));
        }
    }

    if let Some(value) = params.get(HIRE_DATE_START).and_then(range_bound) {
        queries.push(Query::greater_than_equal(HIRE_DATE, value));
    }

    if let Some(value) = params.get(HIRE_DATE_END).and_then(range_bound) {
        queries.push(Query::less_than_equal(HIRE_DATE, value));
    }

    tracing::debug!(predicates = queries.len(), "Built document store filters");
    Ok(queries)
}

/// Candidate values for an `equal` predicate. Only non-empty scalars survive.
fn equality_values(field: &str, value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|v| is_usable_scalar(v))
            .map(|v| coerce(field, v))
            .collect(),
        other if is_usable_scalar(other) => vec![coerce(field, other)],
        _ => Vec::new(),
    }
}

/// A range bound is a single scalar; an array contributes its first scalar
fn range_bound(value: &Value) -> Option<Value> {
    match value {
        Value::Array(items) => items.iter().find(|v| is_usable_scalar(v)).cloned(),
        other if is_usable_scalar(other) => Some(other.clone()),
        _ => None,
    }
}

fn is_usable_scalar(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Number(_) | Value::Bool(_) => true,
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Query-string values arrive as text; give typed attributes their JSON type
fn coerce(field: &str, value: &Value) -> Value {
    let Value::String(text) = value else {
        return value.clone();
    };

    match field {
        FULL_TIME => match text.to_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => value.clone(),
        },
        SALARY => parse_number(text).map_or_else(|| value.clone(), Value::Number),
        _ => value.clone(),
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(Number::from(n));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}
