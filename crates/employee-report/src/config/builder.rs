//! Configuration builder

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::Error;
use crate::constants::{DEFAULT_COLLECTION_ID, DEFAULT_EMPLOYEE_DB_PATH, DEFAULT_EMPLOYEE_TABLE};

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub document_store: Option<DocumentStoreConfig>,
    pub employee_db: EmployeeDbConfig,
    pub telemetry: TelemetryConfig,
}

impl Config {
    #[must_use]
    pub const fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    #[must_use]
    pub const fn server(&self) -> &ServerConfig {
        &self.server
    }

    #[must_use]
    pub const fn document_store(&self) -> Option<&DocumentStoreConfig> {
        self.document_store.as_ref()
    }

    #[must_use]
    pub const fn employee_db(&self) -> &EmployeeDbConfig {
        &self.employee_db
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub http_host: IpAddr,
    pub http_port: u16,
    pub request_timeout: Duration,
    pub cors_origin: Option<String>,
}

impl ServerConfig {
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http_host, self.http_port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            http_port: 5000,
            request_timeout: Duration::from_secs(60),
            cors_origin: None,
        }
    }
}

/// Secret credential; never rendered by `Debug`
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    #[must_use]
    pub const fn new(key: String) -> Self {
        Self(key)
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Remote document store connection settings
#[derive(Debug, Clone)]
pub struct DocumentStoreConfig {
    pub endpoint: Url,
    pub project_id: String,
    pub api_key: ApiKey,
    pub database_id: String,
    pub collection_id: String,
    pub timeout: Duration,
    pub page_limit: Option<NonZeroU32>,
}

/// Local SQLite employee table settings
#[derive(Debug, Clone)]
pub struct EmployeeDbConfig {
    pub path: PathBuf,
    pub table: String,
}

impl Default for EmployeeDbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_EMPLOYEE_DB_PATH),
            table: DEFAULT_EMPLOYEE_TABLE.to_string(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub log_level: String,
    /// `log_level` came from the command line and takes priority over `RUST_LOG`
    pub log_level_forced: bool,
    pub json_logs: bool,
}

/// Configuration builder with fluent API
#[derive(Debug)]
pub struct ConfigBuilder {
    server: ServerConfig,
    store_endpoint: Option<Url>,
    store_project_id: Option<String>,
    store_api_key: Option<ApiKey>,
    store_database_id: Option<String>,
    store_collection_id: Option<String>,
    store_timeout: Duration,
    store_page_limit: Option<NonZeroU32>,
    db_path: Option<PathBuf>,
    db_table: Option<String>,
    telemetry: TelemetryConfig,
}

impl ConfigBuilder {
    const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

    #[must_use]
    pub const fn new() -> Self {
        Self {
            server: ServerConfig {
                http_host: IpAddr::V4(Ipv4Addr::LOCALHOST),
                http_port: 5000,
                request_timeout: Duration::from_secs(60),
                cors_origin: None,
            },
            store_endpoint: None,
            store_project_id: None,
            store_api_key: None,
            store_database_id: None,
            store_collection_id: None,
            store_timeout: Self::DEFAULT_STORE_TIMEOUT,
            store_page_limit: None,
            db_path: None,
            db_table: None,
            telemetry: TelemetryConfig {
                service_name: String::new(),
                log_level: String::new(),
                log_level_forced: false,
                json_logs: false,
            },
        }
    }

    #[must_use]
    pub const fn http_host(mut self, host: IpAddr) -> Self {
        self.server.http_host = host;
        self
    }

    #[must_use]
    pub const fn http_port(mut self, port: u16) -> Self {
        self.server.http_port = port;
        self
    }

    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.server.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn cors_origin(mut self, origin: Option<String>) -> Self {
        self.server.cors_origin = origin;
        self
    }

    // Document store

    #[must_use]
    pub fn store_endpoint(mut self, endpoint: Url) -> Self {
        self.store_endpoint = Some(endpoint);
        self
    }

    #[must_use]
    pub fn store_project_id(mut self, project_id: String) -> Self {
        self.store_project_id = Some(project_id);
        self
    }

    #[must_use]
    pub fn store_api_key(mut self, key: ApiKey) -> Self {
        self.store_api_key = Some(key);
        self
    }

    #[must_use]
    pub fn store_database_id(mut self, database_id: String) -> Self {
        self.store_database_id = Some(database_id);
        self
    }

    #[must_use]
    pub fn store_collection_id(mut self, collection_id: String) -> Self {
        self.store_collection_id = Some(collection_id);
        self
    }

    #[must_use]
    pub const fn store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn store_page_limit(mut self, limit: Option<NonZeroU32>) -> Self {
        self.store_page_limit = limit;
        self
    }

    // Employee database

    #[must_use]
    pub fn db_path(mut self, path: PathBuf) -> Self {
        self.db_path = Some(path);
        self
    }

    #[must_use]
    pub fn db_table(mut self, table: String) -> Self {
        self.db_table = Some(table);
        self
    }

    // Telemetry

    #[must_use]
    pub fn service_name(mut self, name: String) -> Self {
        self.telemetry.service_name = name;
        self
    }

    #[must_use]
    pub fn log_level(mut self, level: String) -> Self {
        self.telemetry.log_level = level;
        self
    }

    /// Set a log level that overrides `RUST_LOG` at logging init
    #[must_use]
    pub fn force_log_level(mut self, level: String) -> Self {
        self.telemetry.log_level = level;
        self.telemetry.log_level_forced = true;
        self
    }

    #[must_use]
    pub const fn json_logs(mut self, enabled: bool) -> Self {
        self.telemetry.json_logs = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> crate::Result<Config> {
        let document_store = match self.store_endpoint {
            Some(endpoint) => Some(DocumentStoreConfig {
                endpoint,
                project_id: required(self.store_project_id, "document_store.project_id")?,
                api_key: self
                    .store_api_key
                    .filter(|key| !key.expose().is_empty())
                    .ok_or_else(|| Error::Config("document_store.api_key is required".into()))?,
                database_id: required(self.store_database_id, "document_store.database_id")?,
                collection_id: self
                    .store_collection_id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| DEFAULT_COLLECTION_ID.to_string()),
                timeout: self.store_timeout,
                page_limit: self.store_page_limit,
            }),
            None => None,
        };

        let table = self
            .db_table
            .unwrap_or_else(|| DEFAULT_EMPLOYEE_TABLE.to_string());
        if table.is_empty() {
            return Err(Error::Config("employee_db.table must not be empty".into()));
        }

        let employee_db = EmployeeDbConfig {
            path: self
                .db_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EMPLOYEE_DB_PATH)),
            table,
        };

        // Apply defaults for telemetry
        let service_name = if self.telemetry.service_name.is_empty() {
            env!("CARGO_PKG_NAME").to_string()
        } else {
            self.telemetry.service_name
        };

        let log_level = if self.telemetry.log_level.is_empty() {
            "info".to_string()
        } else {
            self.telemetry.log_level
        };

        Ok(Config {
            server: self.server,
            document_store,
            employee_db,
            telemetry: TelemetryConfig {
                service_name,
                log_level,
                log_level_forced: self.telemetry.log_level_forced,
                json_logs: self.telemetry.json_logs,
            },
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn required(value: Option<String>, name: &str) -> crate::Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("{name} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Url {
        Url::parse("https://sgp.cloud.appwrite.io/v1").unwrap()
    }

    fn with_store() -> ConfigBuilder {
        ConfigBuilder::new()
            .store_endpoint(endpoint())
            .store_project_id("proj".to_string())
            .store_api_key(ApiKey::new("key-123".to_string()))
            .store_database_id("db".to_string())
    }

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::new().build().unwrap();

        assert_eq!(config.server.http_host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.server.http_port, 5000);
        assert_eq!(config.server.request_timeout, Duration::from_secs(60));
        assert!(config.server.cors_origin.is_none());
        assert!(config.document_store.is_none());
        assert_eq!(config.employee_db.path, PathBuf::from("Chinook.db"));
        assert_eq!(config.employee_db.table, "Employee_Demo");
    }

    #[test]
    fn test_builder_telemetry_defaults() {
        let config = ConfigBuilder::new().build().unwrap();

        assert_eq!(config.telemetry.service_name, "employee-report");
        assert_eq!(config.telemetry.log_level, "info");
        assert!(!config.telemetry.log_level_forced);
        assert!(!config.telemetry.json_logs);
    }

    #[test]
    fn test_builder_forced_log_level_replaces_earlier_level() {
        let config = ConfigBuilder::new()
            .log_level("warn".to_string())
            .force_log_level("debug".to_string())
            .build()
            .unwrap();

        assert_eq!(config.telemetry.log_level, "debug");
        assert!(config.telemetry.log_level_forced);
    }

    #[test]
    fn test_builder_telemetry_config() {
        let config = ConfigBuilder::new()
            .service_name("reports".to_string())
            .log_level("debug".to_string())
            .json_logs(true)
            .build()
            .unwrap();

        assert_eq!(config.telemetry.service_name, "reports");
        assert_eq!(config.telemetry.log_level, "debug");
        assert!(config.telemetry.json_logs);
    }

    #[test]
    fn test_builder_with_store() {
        let config = with_store()
            .store_page_limit(NonZeroU32::new(100))
            .build()
            .unwrap();
        let store = config.document_store().unwrap();

        assert_eq!(store.endpoint, endpoint());
        assert_eq!(store.project_id, "proj");
        assert_eq!(store.api_key.expose(), "key-123");
        assert_eq!(store.database_id, "db");
        assert_eq!(store.collection_id, "emp_table");
        assert_eq!(store.timeout, Duration::from_secs(10));
        assert_eq!(store.page_limit, NonZeroU32::new(100));
    }

    #[test]
    fn test_builder_store_requires_credentials() {
        let err = ConfigBuilder::new()
            .store_endpoint(endpoint())
            .store_database_id("db".to_string())
            .store_api_key(ApiKey::new("k".to_string()))
            .build()
            .unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("project_id"));

        let err = ConfigBuilder::new()
            .store_endpoint(endpoint())
            .store_project_id("proj".to_string())
            .store_database_id("db".to_string())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("api_key"));

        let err = ConfigBuilder::new()
            .store_endpoint(endpoint())
            .store_project_id("proj".to_string())
            .store_api_key(ApiKey::new(String::new()))
            .store_database_id("db".to_string())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn test_credentials_without_endpoint_are_ignored() {
        let config = ConfigBuilder::new()
            .store_project_id("proj".to_string())
            .store_api_key(ApiKey::new("k".to_string()))
            .build()
            .unwrap();
        assert!(config.document_store.is_none());
    }

    #[test]
    fn test_builder_employee_db() {
        let config = ConfigBuilder::new()
            .db_path(PathBuf::from("/data/hr.db"))
            .db_table("Staff".to_string())
            .build()
            .unwrap();

        assert_eq!(config.employee_db().path, PathBuf::from("/data/hr.db"));
        assert_eq!(config.employee_db().table, "Staff");
    }

    #[test]
    fn test_builder_rejects_empty_table() {
        let result = ConfigBuilder::new().db_table(String::new()).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_server() {
        let config = ConfigBuilder::new()
            .http_host(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
            .http_port(8080)
            .request_timeout(Duration::from_secs(5))
            .cors_origin(Some("https://hr.example.com".to_string()))
            .build()
            .unwrap();

        assert_eq!(
            config.server().socket_addr(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.server.request_timeout, Duration::from_secs(5));
        assert_eq!(
            config.server.cors_origin.as_deref(),
            Some("https://hr.example.com")
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = with_store().build().unwrap();
        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("Config"));
        assert!(debug_str.contains("ApiKey(***)"));
        assert!(!debug_str.contains("key-123"));
    }

    #[test]
    fn test_config_builder_default() {
        let builder1 = ConfigBuilder::new();
        let builder2 = ConfigBuilder::default();
        assert_eq!(builder1.server.http_port, builder2.server.http_port);
        assert_eq!(builder1.store_timeout, builder2.store_timeout);
        assert_eq!(
            ServerConfig::default().http_port,
            Config::builder().server.http_port
        );
    }

    #[test]
    fn test_employee_db_config_default() {
        let db = EmployeeDbConfig::default();
        assert_eq!(db.table, DEFAULT_EMPLOYEE_TABLE);
        assert_eq!(db.path, PathBuf::from(DEFAULT_EMPLOYEE_DB_PATH));
    }
}
