// src/nuget/collect.rs
//! Copy a framework's DLLs into the export tree

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Files collected from a framework directory (non-recursive)
pub const BINARY_PATTERN: &str = "*.dll";

/// Outcome of copying one framework directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedBinaries {
    /// File name of the first DLL in listing order
    pub primary_file_name: Option<String>,
    /// `primary_file_name` without its extension; used as the assembly name
    pub primary_module_name: Option<String>,
    /// Number of files copied
    pub copied: usize,
}

impl CollectedBinaries {
    /// `(module_name, file_name)` when both are known and non-empty
    pub fn primary(&self) -> Option<(&str, &str)> {
        match (&self.primary_module_name, &self.primary_file_name) {
            (Some(module), Some(file)) if !module.is_empty() && !file.is_empty() => {
                Some((module.as_str(), file.as_str()))
            }
            _ => None,
        }
    }
}

/// Copy every `*.dll` in `profile_dir` into `dest_dir`
///
/// The primary module is taken from the first file in glob order. The glob
/// crate sorts its results, but case folding and collation still differ
/// between filesystems, so packages shipping several DLLs may report a
/// different primary module on different hosts.
///
/// Copying stops at the first failure; files copied before it are left in
/// place.
pub fn collect(profile_dir: &Path, dest_dir: &Path) -> Result<CollectedBinaries> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&profile_dir.to_string_lossy()),
        BINARY_PATTERN
    );

    let mut result = CollectedBinaries::default();

    for entry in glob::glob(&pattern)? {
        let source = entry?;
        if !source.is_file() {
            continue;
        }
        let Some(file_name) = source.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };

        if result.primary_file_name.is_none() {
            result.primary_module_name = source
                .file_stem()
                .map(|s| s.to_string_lossy().to_string());
            result.primary_file_name = Some(file_name.clone());
        }

        let dest = dest_dir.join(&file_name);
        debug!("Copying: {}", file_name);
        copy_file(&source, &dest)?;
        result.copied += 1;
    }

    info!(
        "Copied {} binaries from {}",
        result.copied,
        profile_dir.display()
    );
    Ok(result)
}

fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io_at("failed to create", parent, e))?;
    }
    fs::copy(src, dst).map_err(|e| Error::io_at("failed to copy", src, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_copies_all_dlls() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        fs::write(src.path().join("Foo.dll"), b"foo binary").unwrap();
        fs::write(src.path().join("Foo.Extra.dll"), b"extra binary").unwrap();
        fs::write(src.path().join("Foo.xml"), b"<doc/>").unwrap();

        let dest_dir = dst.path().join("Runtime");
        let result = collect(src.path(), &dest_dir).unwrap();

        assert_eq!(result.copied, 2);
        assert_eq!(fs::read(dest_dir.join("Foo.dll")).unwrap(), b"foo binary");
        assert_eq!(fs::read(dest_dir.join("Foo.Extra.dll")).unwrap(), b"extra binary");
        assert!(!dest_dir.join("Foo.xml").exists());
    }

    #[test]
    fn test_collect_primary_module() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("Newtonsoft.Json.dll"), b"x").unwrap();

        let result = collect(src.path(), dst.path()).unwrap();

        assert_eq!(result.primary_file_name.as_deref(), Some("Newtonsoft.Json.dll"));
        assert_eq!(result.primary_module_name.as_deref(), Some("Newtonsoft.Json"));
        assert_eq!(result.primary(), Some(("Newtonsoft.Json", "Newtonsoft.Json.dll")));
    }

    #[test]
    fn test_collect_is_not_recursive() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("nested")).unwrap();
        fs::write(src.path().join("nested/Inner.dll"), b"x").unwrap();

        let result = collect(src.path(), dst.path()).unwrap();
        assert_eq!(result.copied, 0);
    }

    #[test]
    fn test_collect_empty_directory() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        let result = collect(src.path(), dst.path()).unwrap();

        assert_eq!(result.copied, 0);
        assert!(result.primary().is_none());
    }

    #[test]
    fn test_collect_escapes_glob_characters_in_path() {
        let root = TempDir::new().unwrap();
        let src = root.path().join("lib").join("portable-net45+win8[x]");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("Odd.dll"), b"x").unwrap();

        let result = collect(&src, &root.path().join("out")).unwrap();
        assert_eq!(result.copied, 1);
    }
}
