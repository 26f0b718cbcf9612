// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::ExportOptions;
use nuget_unity::AppConfig;

fn main() {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Export {
            name,
            version,
            interactive,
            export_dir,
            output_dir,
            nuget,
            keep_existing,
        }) => {
            let options = ExportOptions {
                version,
                interactive,
                export_dir,
                output_dir,
                nuget,
                keep_existing,
            };
            match name {
                Some(name) => commands::cmd_export(&config, &name, options),
                None => commands::cmd_export_interactive(&config, options),
            }
        }
        Some(Commands::Frameworks { install_dir }) => {
            commands::cmd_frameworks(&config, &install_dir)
        }
        Some(Commands::Pack {
            export_dir,
            name,
            output,
            verify,
        }) => commands::cmd_pack(&export_dir, &name, output, verify),
        #[cfg(feature = "server")]
        Some(Commands::Serve { bind }) => commands::cmd_serve(&config, bind),
        None => commands::cmd_export_interactive(&config, ExportOptions::default()),
    }
}
