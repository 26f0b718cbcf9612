// src/nuget/framework.rs
//! Target framework selection
//!
//! A NuGet package ships one directory per target framework under `lib/`
//! (`lib/net45`, `lib/netstandard2.0`, ...). Unity can only load a subset of
//! them, so the exporter walks a fixed preference list and takes the first
//! framework the package actually provides. Packages that only ship
//! frameworks outside the list still export: the lexicographically smallest
//! name is used as a best-effort fallback.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Preferred frameworks, broadest Unity compatibility first
pub const FRAMEWORK_PRIORITY: &[&str] = &[
    "netstandard2.0",
    "net45",
    "net46",
    "net47",
    "net48",
    "netstandard2.1",
];

/// Framework directory names found under a package's `lib/` root
pub type ProfileSet = BTreeSet<String>;

/// Picks a framework from a `ProfileSet` by priority list membership
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkResolver {
    priority: Vec<String>,
}

impl Default for FrameworkResolver {
    fn default() -> Self {
        Self::new(FRAMEWORK_PRIORITY.iter().map(|s| s.to_string()).collect())
    }
}

impl FrameworkResolver {
    /// Create a resolver with a custom priority list
    pub fn new(priority: Vec<String>) -> Self {
        Self { priority }
    }

    /// The priority list, in preference order
    pub fn priority(&self) -> &[String] {
        &self.priority
    }

    /// Choose a framework from the available set
    ///
    /// Returns the first priority entry present in `profiles`, otherwise the
    /// smallest member of `profiles`. Fails with `NotFound` on an empty set.
    pub fn resolve(&self, profiles: &ProfileSet) -> Result<String> {
        if let Some(preferred) = self.priority.iter().find(|p| profiles.contains(*p)) {
            debug!("Preferred framework {} is available", preferred);
            return Ok(preferred.clone());
        }

        // BTreeSet iterates in lexicographic order
        profiles
            .iter()
            .next()
            .cloned()
            .ok_or_else(|| Error::NotFound("no target frameworks available".to_string()))
    }
}

/// How the pipeline picks a framework when several are available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkSelection {
    /// Use the resolver's choice without asking
    #[default]
    Auto,
    /// Show a menu and let the user pick, defaulting to the resolver's choice
    Interactive,
}

/// Strategy seam for turning a `ProfileSet` into one framework name
pub trait FrameworkChooser {
    fn choose(&mut self, profiles: &ProfileSet, resolver: &FrameworkResolver) -> Result<String>;
}

/// Non-interactive chooser that defers to the resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoSelect;

impl FrameworkChooser for AutoSelect {
    fn choose(&mut self, profiles: &ProfileSet, resolver: &FrameworkResolver) -> Result<String> {
        resolver.resolve(profiles)
    }
}

/// List the framework directories under `<install_dir>/lib`
pub fn list_frameworks(install_dir: &Path) -> Result<ProfileSet> {
    let lib_path = install_dir.join("lib");
    if !lib_path.is_dir() {
        return Err(Error::NotFound(format!(
            "no lib directory in {}",
            install_dir.display()
        )));
    }

    let mut profiles = ProfileSet::new();
    for entry in fs::read_dir(&lib_path).map_err(|e| Error::io_at("failed to read", &lib_path, e))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            profiles.insert(entry.file_name().to_string_lossy().to_string());
        }
    }

    debug!("Found {} framework(s) under {}", profiles.len(), lib_path.display());
    Ok(profiles)
}
