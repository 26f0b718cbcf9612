// src/nuget/fetch.rs
//! Package fetcher seam
//!
//! The exporter never speaks the NuGet protocol itself. A `PackageFetcher`
//! is handed a package name, an optional version and an empty directory, and
//! is expected to leave `<dest>/<Name>.<Version>/lib/<framework>/...` behind.
//! `NugetCli` does this by shelling out to `nuget install`; tests use a
//! fetcher that writes the layout directly.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Version token meaning "whatever is newest"
pub const LATEST_VERSION: &str = "latest";

/// Normalize a user-supplied version: empty and `latest` mean unspecified
pub fn requested_version(version: Option<&str>) -> Option<&str> {
    version
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != LATEST_VERSION)
}

/// Populates a directory with an unpacked package
pub trait PackageFetcher {
    /// Fetch `name` (at `version`, if given) into `dest_dir`
    fn fetch(&self, name: &str, version: Option<&str>, dest_dir: &Path) -> Result<()>;
}

/// Fetcher backed by the `nuget` command-line client
#[derive(Debug, Clone)]
pub struct NugetCli {
    executable: PathBuf,
}

impl NugetCli {
    /// Use an explicit `nuget` executable
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Use the configured executable, or look `nuget` up on `PATH`
    pub fn locate(configured: Option<&Path>) -> Result<Self> {
        if let Some(path) = configured {
            return Ok(Self::new(path));
        }
        let found = which::which("nuget").map_err(|e| Error::ExternalTool {
            tool: "nuget".to_string(),
            reason: format!("executable not found on PATH: {}", e),
        })?;
        debug!("Using nuget at {}", found.display());
        Ok(Self::new(found))
    }

    /// Path of the executable this fetcher runs
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Arguments for `nuget install`
    pub fn install_args(name: &str, version: Option<&str>, dest_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "install".into(),
            name.into(),
            "-OutputDirectory".into(),
            dest_dir.as_os_str().to_os_string(),
        ];
        if let Some(version) = requested_version(version) {
            args.push("-Version".into());
            args.push(version.into());
        }
        args
    }
}

impl PackageFetcher for NugetCli {
    fn fetch(&self, name: &str, version: Option<&str>, dest_dir: &Path) -> Result<()> {
        let args = Self::install_args(name, version, dest_dir);
        info!(
            "Running {} install {} into {}",
            self.executable.display(),
            name,
            dest_dir.display()
        );

        // Progress from nuget goes straight to our stdout/stderr
        let status = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::ExternalTool {
                tool: self.executable.display().to_string(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::tool_status("nuget install", status));
        }
        Ok(())
    }
}
