// src/nuget/mod.rs
//! NuGet package handling
//!
//! Everything that touches an installed NuGet package on disk:
//! - `fetch` - the package fetcher seam and the `nuget` CLI implementation
//! - `locate` - finding the install directory and inferring its version
//! - `framework` - choosing a target framework under `lib/`
//! - `collect` - copying the chosen framework's DLLs into an export tree

pub mod collect;
pub mod fetch;
pub mod framework;
pub mod locate;

pub use collect::{collect, CollectedBinaries, BINARY_PATTERN};
pub use fetch::{requested_version, NugetCli, PackageFetcher, LATEST_VERSION};
pub use framework::{
    list_frameworks, AutoSelect, FrameworkChooser, FrameworkResolver, FrameworkSelection,
    ProfileSet, FRAMEWORK_PRIORITY,
};
pub use locate::{find_installed_package_dir, infer_version, DEFAULT_VERSION};
