//! Request parameter extraction
//!
//! Parameters are gathered from the query string and, for POST requests, from
//! a JSON object body. Body keys override query-string keys of the same name.
//! A body that is missing, malformed, or not a JSON object contributes nothing
//! and never fails the request.

use axum::http::Method;
use serde_json::{Map, Value};

/// Optional named request parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    values: Map<String, Value>,
}

impl RequestParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a raw query string. The first occurrence of a key wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut values = Map::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            values
                .entry(key.into_owned())
                .or_insert_with(|| Value::String(value.into_owned()));
        }
        Self { values }
    }

    /// Build from a JSON body, degrading to an empty set on any parse problem
    #[must_use]
    pub fn from_json_body(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(values)) => Self { values },
            Ok(other) => {
                tracing::debug!(
                    kind = json_kind(&other),
                    "JSON body is not an object, ignoring"
                );
                Self::default()
            }
            Err(e) => {
                tracing::debug!(error = %e, "Malformed JSON body, treating as empty parameters");
                Self::default()
            }
        }
    }

    /// Combine query string and body according to the request method
    #[must_use]
    pub fn from_request(method: &Method, query: Option<&str>, body: &[u8]) -> Self {
        let from_query = query.map(Self::from_query).unwrap_or_default();
        if *method == Method::POST {
            from_query.merged_with(Self::from_json_body(body))
        } else {
            from_query
        }
    }

    /// Overlay `overrides` on top of `self`
    #[must_use]
    pub fn merged_with(mut self, overrides: Self) -> Self {
        for (key, value) in overrides.values {
            self.values.insert(key, value);
        }
        self
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Look up a parameter. JSON null, empty strings and empty arrays count
    /// as absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.values.get(name)? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::Array(items) if items.is_empty() => None,
            value => Some(value),
        }
    }

    /// Look up a scalar parameter as text
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Array(_) | Value::Object(_) | Value::Null => None,
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
