// src/commands/frameworks.rs

//! Show the target frameworks an installed package provides

use anyhow::{Context, Result};
use nuget_unity::nuget::list_frameworks;
use nuget_unity::AppConfig;
use std::path::Path;

/// List `<install_dir>/lib/*` and mark the one the resolver would pick
pub fn cmd_frameworks(config: &AppConfig, install_dir: &Path) -> Result<()> {
    let profiles = list_frameworks(install_dir)
        .with_context(|| format!("Failed to list frameworks in {}", install_dir.display()))?;

    if profiles.is_empty() {
        println!("No target frameworks under {}", install_dir.join("lib").display());
        return Ok(());
    }

    let selected = config.resolver().resolve(&profiles)?;

    println!("Target frameworks ({}):", profiles.len());
    for profile in &profiles {
        if *profile == selected {
            println!("  {} (selected)", profile);
        } else {
            println!("  {}", profile);
        }
    }

    Ok(())
}
