// src/manifest/mod.rs
//! Unity package manifests
//!
//! Two small JSON documents are generated for every export:
//! - `package.json` - the Unity Package Manager descriptor
//! - `<module>-asmdef.asmdef` - an assembly definition that references the
//!   primary DLL so Unity scripts can use it
//!
//! Both are rendered with two-space indentation, fields in the order Unity
//! writes them, and no trailing newline. The output depends only on the
//! inputs, so repeated exports produce identical files.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Namespace prefix for generated package identifiers
pub const PACKAGE_NAMESPACE: &str = "com.nuget.";

/// Suffix appended to assembly definition names
pub const ASMDEF_SUFFIX: &str = "-asmdef";

/// Minimum Unity version declared in `package.json`
pub const UNITY_VERSION: &str = "2019.1";

/// File name of the package descriptor
pub const PACKAGE_DESCRIPTOR_FILE: &str = "package.json";

/// Lowercase a dotted NuGet id and turn dots into dashes
fn kebab(name: &str) -> String {
    name.replace('.', "-").to_lowercase()
}

/// `com.nuget.<name>` for a NuGet package id
pub fn package_identifier(package_name: &str) -> String {
    format!("{}{}", PACKAGE_NAMESPACE, kebab(package_name))
}

/// `<module>-asmdef` for an assembly name
pub fn module_identifier(module_name: &str) -> String {
    format!("{}{}", kebab(module_name), ASMDEF_SUFFIX)
}

/// `package.json` contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDescriptor {
    pub name: String,
    pub display_name: String,
    pub version: String,
    pub unity: String,
    pub description: String,
    pub dependencies: BTreeMap<String, String>,
}

impl PackageDescriptor {
    pub fn new(package_name: &str, version: &str) -> Self {
        Self {
            name: package_identifier(package_name),
            display_name: package_name.to_string(),
            version: version.to_string(),
            unity: UNITY_VERSION.to_string(),
            description: format!("Auto-generated package for {}", package_name),
            dependencies: BTreeMap::new(),
        }
    }

    pub fn render(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `.asmdef` contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    pub name: String,
    pub override_references: bool,
    pub precompiled_references: Vec<String>,
    pub auto_referenced: bool,
    pub no_engine_references: bool,
}

impl ModuleDescriptor {
    pub fn new(module_name: &str, binary_file_name: &str) -> Self {
        Self {
            name: module_identifier(module_name),
            override_references: true,
            precompiled_references: vec![binary_file_name.to_string()],
            auto_referenced: true,
            no_engine_references: false,
        }
    }

    /// File name Unity expects for this definition
    pub fn file_name(&self) -> String {
        format!("{}.asmdef", self.name)
    }

    pub fn render(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn write_document(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::io_at("failed to write", path, e))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Write `package.json` into `out_dir`
pub fn write_package_descriptor(package_name: &str, version: &str, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(PACKAGE_DESCRIPTOR_FILE);
    write_document(&path, &PackageDescriptor::new(package_name, version).render()?)?;
    Ok(path)
}

/// Write `<module>-asmdef.asmdef` into `out_dir`
pub fn write_module_descriptor(
    module_name: &str,
    binary_file_name: &str,
    out_dir: &Path,
) -> Result<PathBuf> {
    let descriptor = ModuleDescriptor::new(module_name, binary_file_name);
    let path = out_dir.join(descriptor.file_name());
    write_document(&path, &descriptor.render()?)?;
    Ok(path)
}
