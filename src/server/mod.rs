// src/server/mod.rs
//! HTTP export service
//!
//! Exposes the export pipeline over HTTP:
//! - `GET /download?package_name=&package_version=` runs an export and streams
//!   the resulting `.unitypackage`
//! - `GET /health` for liveness checks
//!
//! Exports share one export root and output directory, so they run one at a
//! time on the blocking pool.

mod handlers;
mod routes;

pub use handlers::DownloadQuery;
pub use routes::create_router;

use crate::config::AppConfig;
use crate::error::Result as ExportResult;
use crate::export::{ExportPipeline, ExportReport, ExportRequest};
use crate::nuget::{FrameworkResolver, PackageFetcher};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,
    /// Root of the per-package export trees
    pub export_dir: PathBuf,
    /// Where archives are written before being streamed
    pub output_dir: PathBuf,
    pub resolver: FrameworkResolver,
    /// Clear `<export_dir>/<package>` before each export
    pub clean_export_dir: bool,
    /// Deadline for one export
    pub export_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            export_dir: PathBuf::from("./export"),
            output_dir: PathBuf::from("."),
            resolver: FrameworkResolver::default(),
            clean_export_dir: true,
            export_timeout: Duration::from_secs(600),
        }
    }
}

impl ServerConfig {
    /// Build from the `[export]` and `[server]` config sections
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        let bind_addr = config
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", config.server.bind))?;

        Ok(Self {
            bind_addr,
            export_dir: config.export.export_dir.clone(),
            output_dir: config.export.output_dir.clone(),
            resolver: config.resolver(),
            clean_export_dir: config.export.clean,
            export_timeout: config.server.export_timeout(),
        })
    }
}

/// Shared server state
pub struct ServerState {
    pub config: ServerConfig,
    pub fetcher: Arc<dyn PackageFetcher + Send + Sync>,
    /// Held for the whole export and until the archive has been opened
    pub export_lock: Arc<Mutex<()>>,
}

impl ServerState {
    pub fn new(config: ServerConfig, fetcher: Arc<dyn PackageFetcher + Send + Sync>) -> Self {
        Self {
            config,
            fetcher,
            export_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Run one export synchronously; callers must hold `export_lock`
    pub fn export(&self, request: &ExportRequest) -> ExportResult<ExportReport> {
        let mut pipeline = ExportPipeline::new(
            self.fetcher.as_ref(),
            &self.config.export_dir,
            &self.config.output_dir,
        )
        .with_resolver(self.config.resolver.clone());
        if !self.config.clean_export_dir {
            pipeline = pipeline.keep_existing_export();
        }
        pipeline.run(request)
    }
}

/// Start the export server
pub async fn run_server(
    config: ServerConfig,
    fetcher: Arc<dyn PackageFetcher + Send + Sync>,
) -> Result<()> {
    tracing::info!("Starting export server on {}", config.bind_addr);
    tracing::info!("Export directory: {:?}", config.export_dir);
    tracing::info!("Output directory: {:?}", config.output_dir);
    tracing::info!("Export timeout: {}s", config.export_timeout.as_secs());

    let bind_addr = config.bind_addr;
    let state = Arc::new(ServerState::new(config, fetcher));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    tracing::info!("Server is ready");

    axum::serve(listener, app).await?;
    Ok(())
}
