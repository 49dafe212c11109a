//! Environment variable loading for configuration

use std::env;
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use super::builder::{ApiKey, ConfigBuilder};
use crate::Result;

/// Environment variable names
mod vars {
    pub const HTTP_HOST: &str = "EMPLOYEE_REPORT_HTTP_HOST";
    pub const HTTP_PORT: &str = "EMPLOYEE_REPORT_HTTP_PORT";
    pub const REQUEST_TIMEOUT_SECS: &str = "EMPLOYEE_REPORT_REQUEST_TIMEOUT_SECS";
    pub const CORS_ORIGIN: &str = "EMPLOYEE_REPORT_CORS_ORIGIN";
    pub const APPWRITE_ENDPOINT: &str = "APPWRITE_ENDPOINT";
    pub const APPWRITE_PROJECT: &str = "APPWRITE_PROJECT";
    pub const APPWRITE_KEY: &str = "APPWRITE_KEY";
    pub const APPWRITE_DB_ID: &str = "APPWRITE_DB_ID";
    pub const APPWRITE_COLLECTION_ID: &str = "APPWRITE_COLLECTION_ID";
    pub const APPWRITE_TIMEOUT_SECS: &str = "APPWRITE_TIMEOUT_SECS";
    pub const APPWRITE_PAGE_LIMIT: &str = "APPWRITE_PAGE_LIMIT";
    pub const EMPLOYEE_DB_PATH: &str = "EMPLOYEE_DB_PATH";
    pub const EMPLOYEE_DB_TABLE: &str = "EMPLOYEE_DB_TABLE";
    pub const SERVICE_NAME: &str = "EMPLOYEE_REPORT_SERVICE_NAME";
    pub const RUST_LOG: &str = "RUST_LOG";
    pub const JSON_LOGS: &str = "EMPLOYEE_REPORT_JSON_LOGS";
}

/// Load configuration from environment variables
pub fn load_from_env(mut builder: ConfigBuilder) -> Result<ConfigBuilder> {
    // Server
    if let Ok(host_str) = env::var(vars::HTTP_HOST)
        && let Ok(host) = host_str.parse::<IpAddr>()
    {
        builder = builder.http_host(host);
    }

    if let Ok(port_str) = env::var(vars::HTTP_PORT)
        && let Ok(port) = port_str.parse::<u16>()
    {
        builder = builder.http_port(port);
    }

    if let Ok(timeout_str) = env::var(vars::REQUEST_TIMEOUT_SECS)
        && let Ok(secs) = timeout_str.parse::<u64>()
    {
        builder = builder.request_timeout(Duration::from_secs(secs));
    }

    if let Ok(origin) = env::var(vars::CORS_ORIGIN) {
        builder = builder.cors_origin(Some(origin));
    }

    // Document store
    if let Ok(url_str) = env::var(vars::APPWRITE_ENDPOINT) {
        let url = Url::parse(&url_str).map_err(|e| {
            crate::Error::Config(format!("Invalid {}: {}", vars::APPWRITE_ENDPOINT, e))
        })?;
        builder = builder.store_endpoint(url);
    }

    if let Ok(project) = env::var(vars::APPWRITE_PROJECT) {
        builder = builder.store_project_id(project);
    }

    if let Ok(key) = env::var(vars::APPWRITE_KEY) {
        builder = builder.store_api_key(ApiKey::new(key));
    }

    if let Ok(db) = env::var(vars::APPWRITE_DB_ID) {
        builder = builder.store_database_id(db);
    }

    if let Ok(collection) = env::var(vars::APPWRITE_COLLECTION_ID) {
        builder = builder.store_collection_id(collection);
    }

    if let Ok(timeout_str) = env::var(vars::APPWRITE_TIMEOUT_SECS)
        && let Ok(secs) = timeout_str.parse::<u64>()
    {
        builder = builder.store_timeout(Duration::from_secs(secs));
    }

    if let Ok(limit_str) = env::var(vars::APPWRITE_PAGE_LIMIT)
        && let Ok(limit) = limit_str.parse::<u32>()
    {
        builder = builder.store_page_limit(NonZeroU32::new(limit));
    }

    // Employee database
    if let Ok(path) = env::var(vars::EMPLOYEE_DB_PATH) {
        builder = builder.db_path(PathBuf::from(path));
    }

    if let Ok(table) = env::var(vars::EMPLOYEE_DB_TABLE) {
        builder = builder.db_table(table);
    }

    // Telemetry
    if let Ok(name) = env::var(vars::SERVICE_NAME) {
        builder = builder.service_name(name);
    }

    if let Ok(level) = env::var(vars::RUST_LOG) {
        builder = builder.log_level(level);
    }

    if let Ok(val) = env::var(vars::JSON_LOGS) {
        builder = builder.json_logs(parse_bool(&val));
    }

    Ok(builder)
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
