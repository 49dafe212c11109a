use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

use crate::document_store::StoreError;
use crate::employee_db::DbError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Document store is not configured")]
    DocumentStoreNotConfigured,

    #[error("Document store error: {0}")]
    DocumentStore(#[from] StoreError),

    #[error("Employee database error: {0}")]
    EmployeeDb(#[from] DbError),
}

impl Error {
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    #[must_use]
    pub const fn is_invalid_filter(&self) -> bool {
        matches!(self, Self::InvalidFilter(_))
    }

    #[must_use]
    pub const fn is_document_store(&self) -> bool {
        matches!(
            self,
            Self::DocumentStore(_) | Self::DocumentStoreNotConfigured
        )
    }

    #[must_use]
    pub const fn is_employee_db(&self) -> bool {
        matches!(self, Self::EmployeeDb(_))
    }

    /// HTTP status reported to the caller
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed in the response body.
    ///
    /// Data-source failures collapse to a generic message; the cause is logged
    /// where the error crosses the HTTP boundary.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::DocumentStore(_) => "Failed to fetch documents from the document store".into(),
            Self::EmployeeDb(_) => "Failed to query employee database".into(),
            Self::Config(_) | Self::Transport(_) => "Internal server error".into(),
            Self::InvalidFilter(_) | Self::DocumentStoreNotConfigured => self.to_string(),
        }
    }
}

/// Uniform error body: `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
