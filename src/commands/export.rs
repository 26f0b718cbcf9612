// src/commands/export.rs

//! Export command
//!
//! Runs the full fetch/collect/pack pipeline for one package and prints a
//! short summary of what ended up in the archive.

use anyhow::{Context, Result};
use nuget_unity::prompt::get_user_input;
use nuget_unity::{
    AppConfig, ExportPipeline, ExportReport, ExportRequest, FrameworkSelection,
    InteractiveSelect, NugetCli,
};
use std::path::PathBuf;
use tracing::info;

/// Command-line overrides for the `[export]` and `[nuget]` config sections
#[derive(Debug, Default)]
pub struct ExportOptions {
    pub version: Option<String>,
    pub interactive: bool,
    pub export_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub nuget: Option<PathBuf>,
    pub keep_existing: bool,
}

/// Export a NuGet package to `<output_dir>/<name>.unitypackage`
pub fn cmd_export(config: &AppConfig, name: &str, options: ExportOptions) -> Result<()> {
    let nuget_path = options.nuget.as_deref().or(config.nuget.executable.as_deref());
    let fetcher = NugetCli::locate(nuget_path).context("Cannot run the NuGet client")?;
    info!("Using nuget at {}", fetcher.executable().display());

    let export_dir = options
        .export_dir
        .unwrap_or_else(|| config.export.export_dir.clone());
    let output_dir = options
        .output_dir
        .unwrap_or_else(|| config.export.output_dir.clone());

    let mut pipeline =
        ExportPipeline::new(&fetcher, export_dir, output_dir).with_resolver(config.resolver());
    if options.interactive || config.export.selection == FrameworkSelection::Interactive {
        pipeline = pipeline.with_chooser(InteractiveSelect::stdio());
    }
    if options.keep_existing || !config.export.clean {
        pipeline = pipeline.keep_existing_export();
    }

    let request = ExportRequest::new(name, options.version);
    let report = pipeline
        .run(&request)
        .with_context(|| format!("Failed to export {}", name))?;

    print_report(&report);
    Ok(())
}

/// Prompt for the package name and version, then export
pub fn cmd_export_interactive(config: &AppConfig, options: ExportOptions) -> Result<()> {
    println!("Welcome to the interactive NuGet to Unity package exporter!");

    let name = get_user_input("Enter the NuGet package name (e.g. Newtonsoft.Json)", "")
        .context("Failed to read package name")?;
    if name.is_empty() {
        anyhow::bail!("No package name given");
    }

    let version = match options.version.clone() {
        Some(v) => v,
        None => get_user_input("Enter the package version (or leave empty for latest)", "")
            .context("Failed to read package version")?,
    };

    cmd_export(
        config,
        &name,
        ExportOptions {
            version: Some(version),
            ..options
        },
    )
}

fn print_report(report: &ExportReport) {
    println!(
        "Exported {} {} ({})",
        report.package_name, report.version, report.framework
    );
    println!("  DLLs copied: {}", report.binaries.copied);
    if let Some((module, file)) = report.binaries.primary() {
        println!("  Primary assembly: {} ({})", module, file);
    }
    if let Some(asmdef) = &report.asmdef {
        println!("  Assembly definition: {}", asmdef.display());
    }
    println!("  Export tree: {}", report.plugin_dir.display());
    println!("  Archive: {} ({} assets)", report.archive.display(), report.assets);
    println!("Done.");
}
