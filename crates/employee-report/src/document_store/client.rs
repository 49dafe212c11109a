//! REST adapter for an Appwrite-compatible document database

use std::num::NonZeroU32;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::{DocumentList, DocumentStore, Query, StoreError};
use crate::config::{ApiKey, DocumentStoreConfig};
use crate::constants::{HEADER_API_KEY, HEADER_PROJECT};

/// Error body returned by the store on non-2xx responses
#[derive(Debug, Deserialize)]
struct UpstreamError {
    #[serde(default)]
    message: Option<String>,
}

/// Document store client bound to one collection
#[derive(Clone)]
pub struct AppwriteClient {
    client: reqwest::Client,
    documents_url: Url,
    project_id: String,
    api_key: ApiKey,
    page_limit: Option<NonZeroU32>,
}

impl std::fmt::Debug for AppwriteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppwriteClient")
            .field("documents_url", &self.documents_url.as_str())
            .field("project_id", &self.project_id)
            .field("page_limit", &self.page_limit)
            .finish_non_exhaustive()
    }
}

impl AppwriteClient {
    pub fn new(config: &DocumentStoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            documents_url: documents_url(
                &config.endpoint,
                &config.database_id,
                &config.collection_id,
            )?,
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
            page_limit: config.page_limit,
        })
    }

    #[must_use]
    pub const fn collection_url(&self) -> &Url {
        &self.documents_url
    }

    fn request_url(&self, queries: &[Query]) -> Result<Url, StoreError> {
        let limit = self.page_limit.map(|n| Query::limit(n.get()));
        let mut url = self.documents_url.clone();

        let encoded = queries
            .iter()
            .chain(limit.iter())
            .map(Query::to_query_string)
            .collect::<Result<Vec<_>, _>>()?;

        if !encoded.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for query in &encoded {
                pairs.append_pair("queries[]", query);
            }
        }

        Ok(url)
    }
}

/// `{endpoint}/databases/{database}/collections/{collection}/documents`
fn documents_url(endpoint: &Url, database_id: &str, collection_id: &str) -> Result<Url, StoreError> {
    let mut url = endpoint.clone();
    url.set_query(None);
    url.path_segments_mut()
        .map_err(|()| StoreError::InvalidEndpoint(endpoint.to_string()))?
        .pop_if_empty()
        .extend([
            "databases",
            database_id,
            "collections",
            collection_id,
            "documents",
        ]);
    Ok(url)
}

#[async_trait]
impl DocumentStore for AppwriteClient {
    async fn list_documents(&self, queries: &[Query]) -> Result<DocumentList, StoreError> {
        let url = self.request_url(queries)?;
        tracing::debug!(
            collection_url = %self.documents_url,
            predicates = queries.len(),
            "Listing documents"
        );

        let response = self
            .client
            .get(url)
            .header(HEADER_PROJECT, &self.project_id)
            .header(HEADER_API_KEY, self.api_key.expose())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<UpstreamError>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });
            return Err(StoreError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let list: DocumentList = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        tracing::debug!(
            total = list.total,
            returned = list.documents.len(),
            "Documents fetched"
        );
        Ok(list)
    }
}
