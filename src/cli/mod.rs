// src/cli/mod.rs
//! CLI definitions for nuget-unity
//!
//! Command implementations live in the `commands` module. Running with no
//! subcommand starts the interactive export, which prompts for the package
//! name and version.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nuget-unity")]
#[command(author = "nuget-unity Contributors")]
#[command(version)]
#[command(about = "Export NuGet packages as Unity .unitypackage archives", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "NUGET_UNITY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a NuGet package and export it as a .unitypackage
    Export {
        /// NuGet package id (prompted for when omitted)
        name: Option<String>,

        /// Package version (default: latest)
        #[arg(long)]
        version: Option<String>,

        /// Pick the target framework from a menu
        #[arg(short, long)]
        interactive: bool,

        /// Root directory for export trees
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Directory that receives the .unitypackage
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Path to the nuget executable
        #[arg(long)]
        nuget: Option<PathBuf>,

        /// Keep files from an earlier export of the same package
        #[arg(long)]
        keep_existing: bool,
    },

    /// List the target frameworks of an installed package
    Frameworks {
        /// Installed package directory (the one containing lib/)
        install_dir: PathBuf,
    },

    /// Pack an existing export tree into a .unitypackage
    Pack {
        /// Export tree to pack
        export_dir: PathBuf,

        /// Folder name under Assets/
        #[arg(short, long)]
        name: String,

        /// Output file (default: <name>.unitypackage)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Read the archive back and check every asset
        #[arg(long)]
        verify: bool,
    },

    /// Run the HTTP export server
    #[cfg(feature = "server")]
    Serve {
        /// Address to bind to (default: [server].bind, or 0.0.0.0:$PORT)
        #[arg(short, long)]
        bind: Option<String>,
    },
}
