// src/commands/pack.rs

//! Pack an existing export tree

use anyhow::{Context, Result};
use nuget_unity::unitypackage::{self, read_assets, UnityPackageWriter};
use std::path::{Path, PathBuf};
use tracing::info;

/// Serialize `export_dir` as `Assets/<name>/...`
pub fn cmd_pack(export_dir: &Path, name: &str, output: Option<PathBuf>, verify: bool) -> Result<()> {
    nuget_unity::validate_package_name(name)?;
    if !export_dir.is_dir() {
        anyhow::bail!("Export directory not found: {}", export_dir.display());
    }

    let out_file = output.unwrap_or_else(|| PathBuf::from(unitypackage::archive_file_name(name)));
    info!("Packing {} into {}", export_dir.display(), out_file.display());

    let summary = UnityPackageWriter::new()
        .serialize(export_dir, name, &out_file)
        .with_context(|| format!("Failed to write {}", out_file.display()))?;

    println!(
        "Wrote {} ({} assets, {} records)",
        summary.path.display(),
        summary.assets,
        summary.records()
    );

    if verify {
        let assets = read_assets(&out_file)
            .with_context(|| format!("Failed to read back {}", out_file.display()))?;
        if assets.len() != summary.assets {
            anyhow::bail!(
                "Archive holds {} assets, expected {}",
                assets.len(),
                summary.assets
            );
        }
        for asset in &assets {
            println!("  {}  {}", asset.guid, asset.pathname);
        }
        println!("Verified {} assets", assets.len());
    }

    Ok(())
}
