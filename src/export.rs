// src/export.rs

//! NuGet -> Unity export pipeline
//!
//! One run goes through these steps:
//! 1. fetch the package into a temporary directory
//! 2. locate the install directory and settle the version
//! 3. choose a target framework under `lib/`
//! 4. copy its DLLs to `<export_root>/<name>/Runtime`
//! 5. write `package.json` and, when a DLL was found, an `.asmdef`
//! 6. serialize `<export_root>/<name>` into `<output_dir>/<name>.unitypackage`
//!
//! The temporary directory is removed on every exit path, and a partially
//! written archive is deleted. The export tree is left as it is when a step
//! fails, so a failed run's tree must not be reused.

use crate::error::{Error, Result};
use crate::manifest;
use crate::nuget::{
    self, AutoSelect, CollectedBinaries, FrameworkChooser, FrameworkResolver, PackageFetcher,
};
use crate::unitypackage::{self, GuidGenerator, RandomGuids, UnityPackageWriter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Subdirectory of the export tree that receives the DLLs
pub const RUNTIME_DIR: &str = "Runtime";

/// Prefix for the temporary fetch directory
const TEMP_PREFIX: &str = "nuget_temp";

/// Accept only NuGet id characters (`[A-Za-z0-9._-]`)
///
/// Names become directory names, archive file names and the filename in a
/// `Content-Disposition` header, so separators, quotes and `..` are refused.
pub fn validate_package_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains("..")
        || !name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));
    if invalid {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

/// What to export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub package_name: String,
    /// Empty, `None` and `latest` all mean the newest version
    pub version: Option<String>,
}

impl ExportRequest {
    pub fn new(package_name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            package_name: package_name.into(),
            version,
        }
    }
}

/// Outcome of a successful export
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub package_name: String,
    /// Requested version, or the one inferred from the install directory
    pub version: String,
    pub framework: String,
    /// `<export_root>/<name>`
    pub plugin_dir: PathBuf,
    pub binaries: CollectedBinaries,
    /// Generated `.asmdef`, if a primary DLL was found
    pub asmdef: Option<PathBuf>,
    pub archive: PathBuf,
    /// Number of assets in the archive
    pub assets: usize,
}

/// Export pipeline bound to a fetcher and output locations
pub struct ExportPipeline<'a> {
    fetcher: &'a dyn PackageFetcher,
    export_root: PathBuf,
    output_dir: PathBuf,
    resolver: FrameworkResolver,
    chooser: Box<dyn FrameworkChooser + 'a>,
    guids: Box<dyn GuidGenerator + 'a>,
    clean_export_dir: bool,
    time_created: Option<i64>,
}

impl<'a> ExportPipeline<'a> {
    pub fn new(
        fetcher: &'a dyn PackageFetcher,
        export_root: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            export_root: export_root.into(),
            output_dir: output_dir.into(),
            resolver: FrameworkResolver::default(),
            chooser: Box::new(AutoSelect),
            guids: Box::new(RandomGuids::from_entropy()),
            clean_export_dir: true,
            time_created: None,
        }
    }

    pub fn with_resolver(mut self, resolver: FrameworkResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the automatic framework choice (e.g. with a menu)
    pub fn with_chooser(mut self, chooser: impl FrameworkChooser + 'a) -> Self {
        self.chooser = Box::new(chooser);
        self
    }

    pub fn with_guids(mut self, guids: impl GuidGenerator + 'a) -> Self {
        self.guids = Box::new(guids);
        self
    }

    /// Keep files left in `<export_root>/<name>` by an earlier run
    pub fn keep_existing_export(mut self) -> Self {
        self.clean_export_dir = false;
        self
    }

    /// Pin `timeCreated` in generated `.meta` records
    pub fn with_time_created(mut self, secs: i64) -> Self {
        self.time_created = Some(secs);
        self
    }

    /// Run the whole pipeline for one package
    pub fn run(&mut self, request: &ExportRequest) -> Result<ExportReport> {
        let name = request.package_name.trim();
        validate_package_name(name)?;

        // Dropped (and deleted) on every return below
        let temp_dir = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir()
            .map_err(|e| Error::io_at("failed to create temporary directory", std::env::temp_dir(), e))?;

        let plugin_dir = self.export_root.join(name);

        let requested = nuget::requested_version(request.version.as_deref());
        info!(
            "Downloading {} ({}) to temporary directory...",
            name,
            requested.unwrap_or(nuget::LATEST_VERSION)
        );
        self.fetcher.fetch(name, requested, temp_dir.path())?;

        let install_dir = nuget::find_installed_package_dir(name, temp_dir.path())?;
        let version = nuget::infer_version(name, request.version.as_deref(), &install_dir);

        let profiles = nuget::list_frameworks(&install_dir)?;
        if profiles.is_empty() {
            return Err(Error::NotFound(format!(
                "no target frameworks found under 'lib' for package {}",
                name
            )));
        }
        let framework = self.chooser.choose(&profiles, &self.resolver)?;
        info!("Using target framework: {}", framework);

        if self.clean_export_dir {
            remove_stale_export(&plugin_dir)?;
        }
        let runtime_dir = plugin_dir.join(RUNTIME_DIR);
        fs::create_dir_all(&runtime_dir)
            .map_err(|e| Error::io_at("failed to create plugin directory", &runtime_dir, e))?;

        let binaries = nuget::collect(&install_dir.join("lib").join(&framework), &runtime_dir)?;

        manifest::write_package_descriptor(name, &version, &plugin_dir)?;

        let asmdef = match binaries.primary() {
            Some((module, file)) => {
                let path = manifest::write_module_descriptor(module, file, &runtime_dir)?;
                info!("Created asmdef for: {}", module);
                Some(path)
            }
            None => {
                warn!("No DLLs found for {} in {}; skipping asmdef", name, framework);
                None
            }
        };

        info!(
            "Copied [{}] DLL(s) from '{}' to {}",
            binaries.copied,
            framework,
            plugin_dir.display()
        );

        fs::create_dir_all(&self.output_dir)
            .map_err(|e| Error::io_at("failed to create output directory", &self.output_dir, e))?;
        let archive = self.output_dir.join(unitypackage::archive_file_name(name));

        let mut writer = UnityPackageWriter::with_guids(&mut self.guids);
        if let Some(secs) = self.time_created {
            writer = writer.with_time_created(secs);
        }
        let summary = match writer.serialize(&plugin_dir, name, &archive) {
            Ok(summary) => summary,
            Err(e) => {
                // A truncated archive must not be mistaken for a good one
                let _ = fs::remove_file(&archive);
                return Err(e);
            }
        };

        if !archive.is_file() {
            return Err(Error::NotFound(format!(
                "archive {} missing after creation",
                archive.display()
            )));
        }

        info!("Unitypackage '{}' created successfully", archive.display());

        Ok(ExportReport {
            package_name: name.to_string(),
            version,
            framework,
            plugin_dir,
            binaries,
            asmdef,
            archive,
            assets: summary.assets,
        })
    }
}

fn remove_stale_export(plugin_dir: &Path) -> Result<()> {
    match fs::remove_dir_all(plugin_dir) {
        Ok(()) => {
            info!("Removed previous export at {}", plugin_dir.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io_at("failed to clear export directory", plugin_dir, e)),
    }
}
