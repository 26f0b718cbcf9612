// src/server/handlers/mod.rs
//! HTTP request handlers for the export server

pub mod download;

pub use download::DownloadQuery;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}
