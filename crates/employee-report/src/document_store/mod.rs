//! Remote document store access
//!
//! - **`filter`**: turns request parameters into store predicates
//! - **`client`**: REST adapter for an Appwrite-compatible document database

mod client;
mod filter;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use client::AppwriteClient;
pub use filter::{
    EQUALITY_FIELDS, HIRE_DATE, HIRE_DATE_END, HIRE_DATE_START, SALARY, build_filters,
};

use crate::masking::{Record, mask_record};

/// Document store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store responded with status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Predicate operator understood by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryMethod {
    Equal,
    GreaterThanEqual,
    LessThanEqual,
    Limit,
}

/// One store query, serialized as the store's JSON query string
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub method: QueryMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub values: Vec<Value>,
}

impl Query {
    #[must_use]
    pub fn equal(attribute: &str, values: Vec<Value>) -> Self {
        Self {
            method: QueryMethod::Equal,
            attribute: Some(attribute.to_string()),
            values,
        }
    }

    #[must_use]
    pub fn greater_than_equal(attribute: &str, value: Value) -> Self {
        Self {
            method: QueryMethod::GreaterThanEqual,
            attribute: Some(attribute.to_string()),
            values: vec![value],
        }
    }

    #[must_use]
    pub fn less_than_equal(attribute: &str, value: Value) -> Self {
        Self {
            method: QueryMethod::LessThanEqual,
            attribute: Some(attribute.to_string()),
            values: vec![value],
        }
    }

    #[must_use]
    pub fn limit(limit: u32) -> Self {
        Self {
            method: QueryMethod::Limit,
            attribute: None,
            values: vec![Value::from(limit)],
        }
    }

    #[must_use]
    pub const fn is_range(&self) -> bool {
        matches!(
            self.method,
            QueryMethod::GreaterThanEqual | QueryMethod::LessThanEqual
        )
    }

    /// Wire form sent as a `queries[]` URL parameter
    pub fn to_query_string(&self) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// A page of documents plus the store's total match count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<Record>,
}

impl DocumentList {
    /// Masked copy suitable for returning to callers
    #[must_use]
    pub fn masked(&self) -> Self {
        Self {
            total: self.total,
            documents: self.documents.iter().map(mask_record).collect(),
        }
    }
}

/// Read access to a document collection
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    async fn list_documents(&self, queries: &[Query]) -> Result<DocumentList, StoreError>;
}
