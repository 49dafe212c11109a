use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use employee_report::config;
use employee_report::observability::init_observability;
use employee_report::{AppState, run_http};

#[derive(Parser, Debug)]
#[command(name = "employee-report")]
#[command(about = "Read-only employee report API with PII field masking", long_about = None)]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP bind host
    #[arg(long)]
    http_host: Option<IpAddr>,

    /// HTTP bind port
    #[arg(long)]
    http_port: Option<u16>,

    /// SQLite database file holding the employee table
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Employee table name
    #[arg(long)]
    db_table: Option<String>,

    /// Enable debug logging, overriding RUST_LOG
    #[arg(short, long)]
    verbose: bool,

    /// Enable JSON logging output
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration with precedence: env > file > defaults
    let mut builder = if let Some(ref path) = args.config {
        config::load_config_from_path(path)?
    } else {
        config::load_config()?
    };

    // CLI flags take priority over every other source
    if let Some(host) = args.http_host {
        builder = builder.http_host(host);
    }

    if let Some(port) = args.http_port {
        builder = builder.http_port(port);
    }

    if let Some(path) = args.db_path {
        builder = builder.db_path(path);
    }

    if let Some(table) = args.db_table {
        builder = builder.db_table(table);
    }

    if args.verbose {
        builder = builder.force_log_level("debug".to_string());
    }

    if args.json_logs {
        builder = builder.json_logs(true);
    }

    let config = builder.build()?;

    init_observability(&config.telemetry)?;

    tracing::info!(
        service = %config.telemetry.service_name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting employee report service"
    );
    tracing::info!("Employee database: {}", config.employee_db.path.display());
    tracing::info!("Employee table: {}", config.employee_db.table);
    tracing::info!("Request timeout: {:?}", config.server.request_timeout);

    let state = AppState::from_config(&config)?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received");
    };

    run_http(state, &config.server, shutdown)
        .await
        .map_err(Into::into)
}
