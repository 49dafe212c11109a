//! TOML configuration file loading

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::builder::{ApiKey, ConfigBuilder};
use crate::Result;

/// Configuration file locations checked in order
const CONFIG_PATHS: &[&str] = &[
    "./employee-report.toml",
    "~/.config/employee-report/config.toml",
    "/etc/employee-report/config.toml",
];

/// Find the first existing configuration file
pub fn find_config_file() -> Option<PathBuf> {
    for path_str in CONFIG_PATHS {
        let path = if path_str.starts_with('~') {
            if let Ok(home) = std::env::var("HOME") {
                PathBuf::from(path_str.replacen('~', &home, 1))
            } else {
                continue;
            }
        } else {
            PathBuf::from(path_str)
        };

        if path.exists() {
            return Some(path);
        }
    }
    None
}

/// Load configuration from a TOML file
pub fn load_from_file(path: &Path, builder: ConfigBuilder) -> Result<ConfigBuilder> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::Error::Config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    let file_config: FileConfig = toml::from_str(&content).map_err(|e| {
        crate::Error::Config(format!(
            "Failed to parse config file {}: {}",
            path.display(),
            e
        ))
    })?;

    apply_file_config(builder, file_config)
}

fn apply_file_config(mut builder: ConfigBuilder, config: FileConfig) -> Result<ConfigBuilder> {
    // Server settings
    if let Some(server) = config.server {
        if let Some(host_str) = server.http_host {
            let host = host_str.parse::<IpAddr>().map_err(|e| {
                crate::Error::Config(format!("Invalid server.http_host {host_str:?}: {e}"))
            })?;
            builder = builder.http_host(host);
        }

        if let Some(port) = server.http_port {
            builder = builder.http_port(port);
        }

        if let Some(timeout) = server.request_timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(timeout));
        }

        if let Some(origin) = server.cors_origin {
            builder = builder.cors_origin(Some(origin));
        }
    }

    // Document store settings
    if let Some(store) = config.document_store {
        if let Some(url_str) = store.endpoint {
            let url = Url::parse(&url_str).map_err(|e| {
                crate::Error::Config(format!("Invalid document_store.endpoint: {e}"))
            })?;
            builder = builder.store_endpoint(url);
        }

        if let Some(project) = store.project_id {
            builder = builder.store_project_id(project);
        }

        if let Some(key) = store.api_key {
            builder = builder.store_api_key(ApiKey::new(key));
        }

        if let Some(db) = store.database_id {
            builder = builder.store_database_id(db);
        }

        if let Some(collection) = store.collection_id {
            builder = builder.store_collection_id(collection);
        }

        if let Some(timeout) = store.timeout_secs {
            builder = builder.store_timeout(Duration::from_secs(timeout));
        }

        if let Some(limit) = store.page_limit {
            builder = builder.store_page_limit(NonZeroU32::new(limit));
        }
    }

    // Employee database settings
    if let Some(db) = config.employee_db {
        if let Some(path) = db.path {
            builder = builder.db_path(path);
        }

        if let Some(table) = db.table {
            builder = builder.db_table(table);
        }
    }

    // Observability settings
    if let Some(obs) = config.observability {
        if let Some(name) = obs.service_name {
            builder = builder.service_name(name);
        }

        if let Some(level) = obs.log_level {
            builder = builder.log_level(level);
        }

        if let Some(json) = obs.json_logs {
            builder = builder.json_logs(json);
        }
    }

    Ok(builder)
}

/// Root configuration file structure
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    server: Option<ServerFileConfig>,
    document_store: Option<DocumentStoreFileConfig>,
    employee_db: Option<EmployeeDbFileConfig>,
    observability: Option<ObservabilityConfig>,
}

#[derive(Debug, Deserialize)]
struct ServerFileConfig {
    http_host: Option<String>,
    http_port: Option<u16>,
    request_timeout_secs: Option<u64>,
    cors_origin: Option<String>,
}

#[derive(Deserialize)]
struct DocumentStoreFileConfig {
    endpoint: Option<String>,
    project_id: Option<String>,
    api_key: Option<String>,
    database_id: Option<String>,
    collection_id: Option<String>,
    timeout_secs: Option<u64>,
    page_limit: Option<u32>,
}

impl std::fmt::Debug for DocumentStoreFileConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStoreFileConfig")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("database_id", &self.database_id)
            .field("collection_id", &self.collection_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("page_limit", &self.page_limit)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct EmployeeDbFileConfig {
    path: Option<PathBuf>,
    table: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObservabilityConfig {
    service_name: Option<String>,
    log_level: Option<String>,
    json_logs: Option<bool>,
}
