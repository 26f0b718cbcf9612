// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use nuget_unity::{Error, PackageFetcher, Result};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Fetcher that lays out a NuGet install tree instead of running `nuget`.
///
/// Produces `<dest>/<name>.<version>/lib/<framework>/<file>` for every
/// configured framework, with each file's content set to `<framework>/<file>`.
pub struct FakeFetcher {
    pub version: String,
    pub frameworks: Vec<(String, Vec<String>)>,
    /// Every destination passed to `fetch`
    pub seen: RefCell<Vec<PathBuf>>,
}

impl FakeFetcher {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            frameworks: Vec::new(),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn framework(mut self, name: &str, files: &[&str]) -> Self {
        self.frameworks.push((
            name.to_string(),
            files.iter().map(|f| f.to_string()).collect(),
        ));
        self
    }

    pub fn last_dest(&self) -> Option<PathBuf> {
        self.seen.borrow().last().cloned()
    }
}

impl PackageFetcher for FakeFetcher {
    fn fetch(&self, name: &str, _version: Option<&str>, dest_dir: &Path) -> Result<()> {
        self.seen.borrow_mut().push(dest_dir.to_path_buf());

        let install = dest_dir.join(format!("{}.{}", name, self.version));
        fs::create_dir_all(install.join("lib"))?;
        for (framework, files) in &self.frameworks {
            let dir = install.join("lib").join(framework);
            fs::create_dir_all(&dir)?;
            for file in files {
                fs::write(dir.join(file), format!("{}/{}", framework, file))?;
            }
        }
        Ok(())
    }
}

/// Fetcher that writes a partial download, then fails like a nuget error
pub struct FailingFetcher {
    pub seen: RefCell<Option<PathBuf>>,
}

impl FailingFetcher {
    pub fn new() -> Self {
        Self {
            seen: RefCell::new(None),
        }
    }
}

impl PackageFetcher for FailingFetcher {
    fn fetch(&self, name: &str, _version: Option<&str>, dest_dir: &Path) -> Result<()> {
        *self.seen.borrow_mut() = Some(dest_dir.to_path_buf());
        fs::write(dest_dir.join(format!("{}.partial", name)), b"partial")?;
        Err(Error::ExternalTool {
            tool: "nuget".to_string(),
            reason: "exited with status 1".to_string(),
        })
    }
}
