// src/error.rs

//! Error types for the exporter library

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort an export run
#[derive(Error, Debug)]
pub enum Error {
    /// Something the pipeline expected on disk is missing
    #[error("not found: {0}")]
    NotFound(String),

    /// Filesystem or stream failure with the path that caused it
    #[error("{context} '{}': {source}", .path.display())]
    IoAt {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem or stream failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Package name cannot be used as a directory or file name
    #[error("invalid package name: '{0}'")]
    InvalidName(String),

    /// The package fetcher subprocess failed
    #[error("{tool} failed: {reason}")]
    ExternalTool { tool: String, reason: String },

    /// Directory traversal failed
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid glob pattern built from a profile directory
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A globbed path could not be read
    #[error("glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// Manifest rendering failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an I/O error with the operation and path it came from
    pub fn io_at(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoAt {
            context,
            path: path.into(),
            source,
        }
    }

    /// Build an `ExternalTool` error from a non-success exit status
    pub fn tool_status(tool: impl Into<String>, status: ExitStatus) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            reason: match status.code() {
                Some(code) => format!("exited with status {}", code),
                None => "terminated by signal".to_string(),
            },
        }
    }

    /// True when the error belongs to the not-found class
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::IoAt { source, .. } | Self::Io(source) => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
