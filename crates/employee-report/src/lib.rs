//! Read-only employee report API with PII field masking
//!
//! Two listings are served: one backed by a remote document collection and
//! one backed by a local SQLite table. Identifier, name and PAN fields are
//! masked in every record before it leaves the service.

pub mod config;
mod constants;
pub mod document_store;
pub mod employee_db;
mod error;
pub mod masking;
pub mod observability;
pub mod params;
pub mod server;
pub mod transport;

pub use config::{Config, ConfigBuilder, TelemetryConfig};
pub use document_store::{AppwriteClient, DocumentList, DocumentStore, Query, StoreError};
pub use employee_db::{DbError, EmployeeDb, EmployeeFilter};
pub use error::{Error, ErrorBody, Result};
pub use masking::{Record, SensitiveField, mask_record, mask_value};
pub use params::RequestParams;
pub use server::AppState;
pub use transport::{build_app, run_http};
