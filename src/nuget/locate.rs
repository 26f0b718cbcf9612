// src/nuget/locate.rs
//! Find an installed package inside a fetcher's output directory

use crate::error::{Error, Result};
use crate::nuget::fetch::requested_version;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Version reported when neither the caller nor the directory name has one
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Suffix after `<name>.` in a directory name, compared case-insensitively
fn version_suffix<'a>(dir_name: &'a str, package_name: &str) -> Option<&'a str> {
    let name_len = package_name.len();
    let bytes = dir_name.as_bytes();
    if bytes.len() <= name_len + 1 {
        return None;
    }
    let matches =
        bytes[..name_len].eq_ignore_ascii_case(package_name.as_bytes()) && bytes[name_len] == b'.';
    // byte `name_len` is an ASCII '.', so the next index is a char boundary
    matches.then(|| &dir_name[name_len + 1..])
}

/// Locate `<search_root>/**/<name>.<version>`
///
/// `nuget install` also drops the package's dependencies next to it, and a
/// dependency can share the prefix (`Foo.` matches `Foo.Bar.1.0.0`). A match
/// whose suffix starts with a digit wins over one that does not; ties go to
/// the first match in sorted walk order.
pub fn find_installed_package_dir(package_name: &str, search_root: &Path) -> Result<PathBuf> {
    let mut fallback: Option<PathBuf> = None;

    let mut walker = WalkDir::new(search_root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let dir_name = entry.file_name().to_string_lossy();
        let Some(suffix) = version_suffix(&dir_name, package_name) else {
            continue;
        };

        if suffix.starts_with(|c: char| c.is_ascii_digit()) {
            debug!("Found installed package at {}", entry.path().display());
            return Ok(entry.path().to_path_buf());
        }
        if fallback.is_none() {
            fallback = Some(entry.path().to_path_buf());
        }
        walker.skip_current_dir();
    }

    fallback.ok_or_else(|| {
        Error::NotFound(format!(
            "could not find installed package directory for {}",
            package_name
        ))
    })
}

/// Resolve the version to record in `package.json`
///
/// An explicit version is kept as-is. Otherwise the version is read from the
/// install directory name (`Foo.13.0.3` -> `13.0.3`), falling back to
/// `DEFAULT_VERSION`.
pub fn infer_version(package_name: &str, requested: Option<&str>, install_dir: &Path) -> String {
    if let Some(version) = requested_version(requested) {
        return version.to_string();
    }

    install_dir
        .file_name()
        .map(|n| n.to_string_lossy())
        .and_then(|n| version_suffix(&n, package_name).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_VERSION.to_string())
}
