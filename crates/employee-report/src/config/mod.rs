//! Configuration management
//!
//! Supports configuration loading with precedence: CLI > env > file > defaults.
//! CLI flags are applied by the binary on the returned builder.

mod builder;
mod env;
mod file;

pub use builder::{
    ApiKey, Config, ConfigBuilder, DocumentStoreConfig, EmployeeDbConfig, ServerConfig,
    TelemetryConfig,
};

use crate::Result;

/// Load configuration with precedence: env > file > defaults
pub fn load_config() -> Result<ConfigBuilder> {
    let mut builder = ConfigBuilder::new();

    if let Some(path) = file::find_config_file() {
        tracing::info!("Loading configuration from {}", path.display());
        builder = file::load_from_file(&path, builder)?;
    }

    env::load_from_env(builder)
}

/// Load configuration from a specific file path
pub fn load_config_from_path(path: &std::path::Path) -> Result<ConfigBuilder> {
    let builder = file::load_from_file(path, ConfigBuilder::new())?;
    env::load_from_env(builder)
}
