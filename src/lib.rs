// src/lib.rs

//! NuGet to Unity exporter
//!
//! Turns a NuGet package into a `.unitypackage` that Unity can import.
//!
//! # Architecture
//!
//! - Fetch: the `nuget` client installs the package into a temporary directory
//! - Resolve: one target framework is chosen from the package's `lib/` folders
//! - Collect: that framework's DLLs are copied into an export tree together
//!   with a generated `package.json` and `.asmdef`
//! - Serialize: the export tree is packed into a gzip'd tar of
//!   `<guid>/{asset, asset.meta, pathname}` records
//!
//! The `server` feature adds an HTTP endpoint that runs the same pipeline.

pub mod config;
mod error;
pub mod export;
pub mod manifest;
pub mod nuget;
pub mod prompt;
pub mod unitypackage;

#[cfg(feature = "server")]
pub mod server;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use export::{validate_package_name, ExportPipeline, ExportReport, ExportRequest};
pub use nuget::{
    AutoSelect, FrameworkChooser, FrameworkResolver, FrameworkSelection, NugetCli,
    PackageFetcher, ProfileSet,
};
pub use prompt::InteractiveSelect;
pub use unitypackage::{GuidGenerator, RandomGuids, UnityPackageWriter};
