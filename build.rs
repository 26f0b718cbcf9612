// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: config file
fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_name("FILE")
        .global(true)
        .help("Configuration file (TOML); also read from NUGET_UNITY_CONFIG")
}

fn build_cli() -> Command {
    Command::new("nuget-unity")
        .version(env!("CARGO_PKG_VERSION"))
        .author("nuget-unity Contributors")
        .about("Export NuGet packages as Unity .unitypackage archives")
        .subcommand_required(false)
        .arg(config_arg())
        .subcommand(
            Command::new("export")
                .about("Fetch a NuGet package and export it as a .unitypackage")
                .arg(Arg::new("name").help("NuGet package id (prompted for when omitted)"))
                .arg(Arg::new("version").long("version").help("Package version (default: latest)"))
                .arg(
                    Arg::new("interactive")
                        .short('i')
                        .long("interactive")
                        .action(ArgAction::SetTrue)
                        .help("Pick the target framework from a menu"),
                )
                .arg(Arg::new("export_dir").long("export-dir").help("Root directory for export trees"))
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output-dir")
                        .help("Directory that receives the .unitypackage"),
                )
                .arg(Arg::new("nuget").long("nuget").help("Path to the nuget executable"))
                .arg(
                    Arg::new("keep_existing")
                        .long("keep-existing")
                        .action(ArgAction::SetTrue)
                        .help("Keep files from an earlier export of the same package"),
                ),
        )
        .subcommand(
            Command::new("frameworks")
                .about("List the target frameworks of an installed package")
                .arg(Arg::new("install_dir").required(true).help("Installed package directory")),
        )
        .subcommand(
            Command::new("pack")
                .about("Pack an existing export tree into a .unitypackage")
                .arg(Arg::new("export_dir").required(true).help("Export tree to pack"))
                .arg(Arg::new("name").short('n').long("name").required(true).help("Folder name under Assets/"))
                .arg(Arg::new("output").short('o').long("output").help("Output file"))
                .arg(
                    Arg::new("verify")
                        .long("verify")
                        .action(ArgAction::SetTrue)
                        .help("Read the archive back and check every asset"),
                ),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP export server")
                .arg(
                    Arg::new("bind")
                        .short('b')
                        .long("bind")
                        .help("Address to bind to (default: [server].bind, or 0.0.0.0:$PORT)"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("nuget-unity.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
