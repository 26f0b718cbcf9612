// src/config.rs
//! Configuration file parsing
//!
//! Optional TOML file with three sections:
//! - [export] - where export trees and archives go, framework preferences
//! - [nuget] - which `nuget` executable to run
//! - [server] - bind address and per-request deadline for `serve`
//!
//! Lookup order: `--config`, then `$NUGET_UNITY_CONFIG`, then
//! `<config dir>/nuget-unity/config.toml`. An explicitly named file must
//! exist; the default location is optional.

use crate::error::{Error, Result};
use crate::nuget::framework::{FrameworkResolver, FrameworkSelection};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "NUGET_UNITY_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub export: ExportSection,

    #[serde(default)]
    pub nuget: NugetSection,

    #[serde(default)]
    pub server: ServerSection,
}

/// Export settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    /// Root of the export trees (`<export_dir>/<package>/...`)
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// Where `<package>.unitypackage` is written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Framework selection mode
    #[serde(default)]
    pub selection: FrameworkSelection,

    /// Remove `<export_dir>/<package>` before exporting into it
    #[serde(default = "default_true")]
    pub clean: bool,

    /// Framework preference order; the built-in list when absent
    #[serde(default)]
    pub framework_priority: Option<Vec<String>>,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            output_dir: default_output_dir(),
            selection: FrameworkSelection::default(),
            clean: true,
            framework_priority: None,
        }
    }
}

/// NuGet client settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NugetSection {
    /// Path to `nuget`; looked up on PATH when absent
    #[serde(default)]
    pub executable: Option<PathBuf>,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Deadline for one export request
    #[serde(default = "default_export_timeout")]
    pub export_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            export_timeout_secs: default_export_timeout(),
        }
    }
}

impl ServerSection {
    pub fn export_timeout(&self) -> Duration {
        Duration::from_secs(self.export_timeout_secs)
    }
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("./export")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_export_timeout() -> u64 {
    600
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file that must exist
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// `<config dir>/nuget-unity/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("nuget-unity").join("config.toml"))
    }

    /// Resolve and load the configuration
    ///
    /// `explicit` is the `--config` flag. Falls back to defaults when no file
    /// is named and none exists at the default location.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Self::from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            let path = PathBuf::from(path);
            debug!("Loading config from ${} ({})", CONFIG_ENV, path.display());
            return Self::from_file(&path);
        }
        if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
            debug!("Loading config from {}", path.display());
            return Self::from_file(&path);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if let Some(priority) = &self.export.framework_priority
            && priority.iter().any(|f| f.trim().is_empty())
        {
            return Err(Error::Config(
                "export.framework_priority contains an empty entry".to_string(),
            ));
        }
        if self.server.export_timeout_secs == 0 {
            return Err(Error::Config(
                "server.export_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Framework resolver for the configured priority list
    pub fn resolver(&self) -> FrameworkResolver {
        match &self.export.framework_priority {
            Some(priority) => FrameworkResolver::new(priority.clone()),
            None => FrameworkResolver::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.export.export_dir, PathBuf::from("./export"));
        assert_eq!(config.export.output_dir, PathBuf::from("."));
        assert_eq!(config.export.selection, FrameworkSelection::Auto);
        assert!(config.export.clean);
        assert!(config.nuget.executable.is_none());
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.export_timeout(), Duration::from_secs(600));
        assert_eq!(config.resolver(), FrameworkResolver::default());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_toml_str(
            r#"
            [export]
            export_dir = "/tmp/unity-export"
            selection = "interactive"
            clean = false
            framework_priority = ["netstandard2.1", "netstandard2.0"]

            [nuget]
            executable = "/opt/nuget/nuget"

            [server]
            bind = "127.0.0.1:9000"
            export_timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.export.export_dir, PathBuf::from("/tmp/unity-export"));
        assert_eq!(config.export.selection, FrameworkSelection::Interactive);
        assert!(!config.export.clean);
        assert_eq!(config.resolver().priority(), ["netstandard2.1", "netstandard2.0"]);
        assert_eq!(config.nuget.executable, Some(PathBuf::from("/opt/nuget/nuget")));
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.server.export_timeout_secs, 30);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = AppConfig::from_toml_str("[export]\nexprot_dir = \"x\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(AppConfig::from_toml_str("[server]\nexport_timeout_secs = 0").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/nuget-unity.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[nuget]\nexecutable = \"nuget.exe\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.nuget.executable, Some(PathBuf::from("nuget.exe")));
    }
}
