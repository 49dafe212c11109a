//! Request handlers and route table

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::Method;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use serde::Serialize;

use crate::config::Config;
use crate::constants::{
    ADVERTISED_ENDPOINTS, ROUTE_DOCUMENTS, ROUTE_EMPLOYEES, ROUTE_HEALTH, ROUTE_INDEX, STATUS_OK,
    WELCOME_MESSAGE,
};
use crate::document_store::{AppwriteClient, DocumentList, DocumentStore, build_filters};
use crate::employee_db::{EmployeeDb, EmployeeFilter};
use crate::masking::Record;
use crate::params::RequestParams;
use crate::{Error, Result};

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    document_store: Option<Arc<dyn DocumentStore>>,
    employee_db: EmployeeDb,
}

impl AppState {
    #[must_use]
    pub const fn new(employee_db: EmployeeDb) -> Self {
        Self {
            document_store: None,
            employee_db,
        }
    }

    #[must_use]
    pub fn with_document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.document_store = Some(store);
        self
    }

    /// Wire up both data sources from configuration.
    ///
    /// The document store is left unset when no endpoint is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let state = Self::new(EmployeeDb::new(config.employee_db()));

        match config.document_store() {
            Some(store_config) => {
                let client = AppwriteClient::new(store_config)?;
                tracing::info!(
                    collection_url = %client.collection_url(),
                    page_limit = ?store_config.page_limit,
                    "Document store configured"
                );
                Ok(state.with_document_store(Arc::new(client)))
            }
            None => {
                tracing::warn!(
                    "Document store endpoint not configured; {ROUTE_DOCUMENTS} will return errors"
                );
                Ok(state)
            }
        }
    }

    #[must_use]
    pub const fn has_document_store(&self) -> bool {
        self.document_store.is_some()
    }

    #[must_use]
    pub const fn employee_db(&self) -> &EmployeeDb {
        &self.employee_db
    }
}

/// Index response
#[derive(Debug, Serialize)]
struct IndexResponse {
    message: &'static str,
    endpoints: &'static [&'static str],
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Route table without middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(ROUTE_INDEX, get(index_handler))
        .route(ROUTE_DOCUMENTS, get(documents_handler).post(documents_handler))
        .route(ROUTE_EMPLOYEES, get(employees_handler).post(employees_handler))
        .route(ROUTE_HEALTH, get(health_handler))
        .with_state(state)
}

async fn index_handler() -> impl IntoResponse {
    Json(IndexResponse {
        message: WELCOME_MESSAGE,
        endpoints: ADVERTISED_ENDPOINTS,
    })
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: STATUS_OK,
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn documents_handler(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Json<DocumentList>> {
    let params = RequestParams::from_request(&method, query.as_deref(), &body);
    let filters = build_filters(&params)?;
    let store = state
        .document_store
        .as_ref()
        .ok_or(Error::DocumentStoreNotConfigured)?;

    let started_at = Instant::now();
    let list = match store.list_documents(&filters).await {
        Ok(list) => list,
        Err(e) => {
            #[cfg(feature = "metrics")]
            crate::observability::record_fetch_error("document_store", store_error_kind(&e));
            return Err(e.into());
        }
    };
    let elapsed = started_at.elapsed();

    #[cfg(feature = "metrics")]
    crate::observability::record_fetch("document_store", elapsed, list.documents.len() as u64);

    tracing::info!(
        predicates = filters.len(),
        total = list.total,
        returned = list.documents.len(),
        duration_ms = elapsed.as_millis() as u64,
        "Served document listing"
    );
    Ok(Json(list.masked()))
}

async fn employees_handler(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Json<Vec<Record>>> {
    let params = RequestParams::from_request(&method, query.as_deref(), &body);
    let filter = EmployeeFilter::from_params(&params);

    let started_at = Instant::now();
    let records = match state.employee_db.list_masked(filter).await {
        Ok(records) => records,
        Err(e) => {
            #[cfg(feature = "metrics")]
            crate::observability::record_fetch_error("employee_db", db_error_kind(&e));
            return Err(e.into());
        }
    };
    let elapsed = started_at.elapsed();

    #[cfg(feature = "metrics")]
    crate::observability::record_fetch("employee_db", elapsed, records.len() as u64);

    tracing::info!(
        rows = records.len(),
        duration_ms = elapsed.as_millis() as u64,
        "Served employee listing"
    );
    Ok(Json(records))
}

#[cfg(feature = "metrics")]
const fn store_error_kind(e: &crate::document_store::StoreError) -> &'static str {
    use crate::document_store::StoreError;
    match e {
        StoreError::Http(_) => "http",
        StoreError::Upstream { .. } => "upstream",
        StoreError::Decode(_) => "decode",
        StoreError::InvalidEndpoint(_) => "endpoint",
    }
}

#[cfg(feature = "metrics")]
const fn db_error_kind(e: &crate::employee_db::DbError) -> &'static str {
    use crate::employee_db::DbError;
    match e {
        DbError::Open { .. } => "open",
        DbError::Sqlite(_) => "sqlite",
        DbError::InvalidIdentifier(_) => "identifier",
        DbError::Task(_) => "task",
    }
}
