// src/commands/mod.rs
//! Command handlers for the nuget-unity CLI

mod export;
mod frameworks;
mod pack;
#[cfg(feature = "server")]
mod serve;

pub use export::{cmd_export, cmd_export_interactive, ExportOptions};
pub use frameworks::cmd_frameworks;
pub use pack::cmd_pack;
#[cfg(feature = "server")]
pub use serve::cmd_serve;
