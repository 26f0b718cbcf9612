// src/commands/serve.rs

//! Run the HTTP export server

use anyhow::{Context, Result};
use nuget_unity::server::{run_server, ServerConfig};
use nuget_unity::{AppConfig, NugetCli};
use std::sync::Arc;
use tracing::info;

/// Environment variable holding the listen port
const PORT_ENV: &str = "PORT";

/// Bind address: `--bind`, then `0.0.0.0:$PORT`, then `[server].bind`
fn resolve_bind(bind: Option<String>, port: Option<String>, configured: &str) -> String {
    if let Some(bind) = bind {
        return bind;
    }
    match port.filter(|p| !p.trim().is_empty()) {
        Some(port) => format!("0.0.0.0:{}", port.trim()),
        None => configured.to_string(),
    }
}

/// Start the server and block until it exits
pub fn cmd_serve(config: &AppConfig, bind: Option<String>) -> Result<()> {
    let mut app_config = config.clone();
    app_config.server.bind = resolve_bind(
        bind,
        std::env::var(PORT_ENV).ok(),
        &config.server.bind,
    );
    let server_config = ServerConfig::from_app_config(&app_config)?;

    let fetcher = NugetCli::locate(config.nuget.executable.as_deref())
        .context("Cannot run the NuGet client")?;
    info!("Using nuget at {}", fetcher.executable().display());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(run_server(server_config, Arc::new(fetcher)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_bind() {
        assert_eq!(
            resolve_bind(Some("127.0.0.1:1".into()), Some("9000".into()), "0.0.0.0:8080"),
            "127.0.0.1:1"
        );
        assert_eq!(
            resolve_bind(None, Some("9000".into()), "0.0.0.0:8080"),
            "0.0.0.0:9000"
        );
        assert_eq!(resolve_bind(None, Some("".into()), "0.0.0.0:8080"), "0.0.0.0:8080");
        assert_eq!(resolve_bind(None, None, "127.0.0.1:8081"), "127.0.0.1:8081");
    }
}
