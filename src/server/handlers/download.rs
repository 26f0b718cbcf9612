// src/server/handlers/download.rs
//! Export-and-download endpoint
//!
//! `GET /download?package_name=<id>&package_version=<version>` runs a full
//! export and streams the archive back as an attachment. The archive is
//! unlinked as soon as it has been opened, so nothing is left in the output
//! directory once the response has been sent.
//!
//! `export_timeout` is measured from the arrival of the request and includes
//! the wait for the export lock. An export that outlives its request keeps
//! the lock until it finishes and its archive has been deleted.

use crate::error::Error;
use crate::export::{ExportReport, ExportRequest};
use crate::server::ServerState;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::fs::File;
use tokio::sync::OwnedMutexGuard;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::io::ReaderStream;

/// Query parameters for `/download`
#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    pub package_name: Option<String>,
    /// Empty or absent means `latest`
    pub package_version: Option<String>,
}

/// GET /download
pub async fn download(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    let Some(name) = query
        .package_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
    else {
        return (StatusCode::BAD_REQUEST, "package_name is required").into_response();
    };
    let request = ExportRequest::new(name.clone(), query.package_version);

    // One deadline covers both the wait for the lock and the export itself
    let deadline = Instant::now() + state.config.export_timeout;

    let queued = state.export_lock.clone().lock_owned();
    let guard = match tokio::time::timeout_at(deadline, queued).await {
        Ok(guard) => guard,
        Err(_) => {
            tracing::warn!(
                "Export of {} still queued after {:?}",
                name,
                state.config.export_timeout
            );
            return (StatusCode::GATEWAY_TIMEOUT, "Export timed out").into_response();
        }
    };

    // The guard travels into the blocking task and comes back with the
    // result, so it outlives a timed-out request.
    let task_state = Arc::clone(&state);
    let mut task = tokio::task::spawn_blocking(move || {
        let result = task_state.export(&request);
        (guard, result)
    });

    let (guard, result) = match tokio::time::timeout_at(deadline, &mut task).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            tracing::error!("Export task for {} failed: {}", name, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to export unitypackage")
                .into_response();
        }
        Err(_) => {
            tracing::error!(
                "Export of {} exceeded {:?}",
                name,
                state.config.export_timeout
            );
            tokio::spawn(discard_abandoned_export(name, task));
            return (StatusCode::GATEWAY_TIMEOUT, "Export timed out").into_response();
        }
    };

    let report = match result {
        Ok(report) => report,
        Err(Error::InvalidName(_)) => {
            return (StatusCode::BAD_REQUEST, "Invalid package_name").into_response();
        }
        Err(e) => {
            tracing::error!("Error exporting package {}: {}", name, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to export unitypackage")
                .into_response();
        }
    };

    let archive = report.archive;
    let file = match File::open(&archive).await {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (StatusCode::NOT_FOUND, "unitypackage not found").into_response();
        }
        Err(e) => {
            tracing::error!("Failed to open {}: {}", archive.display(), e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Unable to open unitypackage")
                .into_response();
        }
    };

    let metadata = match file.metadata().await {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("Failed to stat {}: {}", archive.display(), e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error accessing unitypackage: {}", e),
            )
                .into_response();
        }
    };

    // The open handle keeps the data readable after the unlink
    if let Err(e) = tokio::fs::remove_file(&archive).await {
        tracing::warn!("Failed to remove {}: {}", archive.display(), e);
    }
    drop(guard);

    let filename = archive
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("package.unitypackage")
        .to_string();

    tracing::info!("Serving {} ({} bytes)", filename, metadata.len());

    let body = Body::from_stream(ReaderStream::new(file));
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, metadata.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(body)
        .unwrap_or_else(|e| {
            tracing::error!("Failed to build response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}

/// Wait for an export whose request already timed out and delete its archive
///
/// The export lock is released only after the archive is gone, so the next
/// export of the same package cannot race with the removal.
async fn discard_abandoned_export(
    name: String,
    task: JoinHandle<(OwnedMutexGuard<()>, crate::error::Result<ExportReport>)>,
) {
    match task.await {
        Ok((guard, Ok(report))) => {
            match tokio::fs::remove_file(&report.archive).await {
                Ok(()) => tracing::info!(
                    "Removed archive of timed-out export {}",
                    report.archive.display()
                ),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("Failed to remove {}: {}", report.archive.display(), e),
            }
            drop(guard);
        }
        Ok((_guard, Err(e))) => {
            tracing::warn!("Timed-out export of {} later failed: {}", name, e);
        }
        Err(e) => tracing::error!("Timed-out export task for {} failed: {}", name, e),
    }
}
