// src/server/routes.rs
//! Axum router configuration for the export server

use crate::server::handlers::{download, health_check};
use crate::server::ServerState;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main application router
pub fn create_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/download", get(download::download))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::nuget::PackageFetcher;
    use crate::server::ServerConfig;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::fs;
    use std::path::Path;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;
    use tower::ServiceExt;

    /// Lays out `<dest>/<name>.3.1.0/lib/netstandard2.0/<name>.dll`
    struct StubFetcher;

    impl PackageFetcher for StubFetcher {
        fn fetch(&self, name: &str, _version: Option<&str>, dest_dir: &Path) -> Result<()> {
            let lib = dest_dir.join(format!("{}.3.1.0", name)).join("lib/netstandard2.0");
            fs::create_dir_all(&lib)?;
            fs::write(lib.join(format!("{}.dll", name)), b"MZ")?;
            Ok(())
        }
    }

    /// Always fails like a nuget run for an unknown package
    struct FailingFetcher;

    impl PackageFetcher for FailingFetcher {
        fn fetch(&self, _name: &str, _version: Option<&str>, _dest_dir: &Path) -> Result<()> {
            Err(crate::Error::ExternalTool {
                tool: "nuget".to_string(),
                reason: "exited with status 1".to_string(),
            })
        }
    }

    /// Like `StubFetcher`, after blocking for `delay`
    struct SlowFetcher {
        delay: Duration,
    }

    impl PackageFetcher for SlowFetcher {
        fn fetch(&self, name: &str, version: Option<&str>, dest_dir: &Path) -> Result<()> {
            std::thread::sleep(self.delay);
            StubFetcher.fetch(name, version, dest_dir)
        }
    }

    fn slow_app(work: &TempDir, delay: Duration, timeout: Duration) -> (Router, Arc<ServerState>) {
        let config = ServerConfig {
            export_dir: work.path().join("export"),
            output_dir: work.path().join("out"),
            export_timeout: timeout,
            ..ServerConfig::default()
        };
        let state = Arc::new(ServerState::new(config, Arc::new(SlowFetcher { delay })));
        (create_router(Arc::clone(&state)), state)
    }

    fn test_app(work: &TempDir, fetcher: Arc<dyn PackageFetcher + Send + Sync>) -> Router {
        let config = ServerConfig {
            export_dir: work.path().join("export"),
            output_dir: work.path().join("out"),
            ..ServerConfig::default()
        };
        create_router(Arc::new(ServerState::new(config, fetcher)))
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let work = TempDir::new().unwrap();
        let response = get(test_app(&work, Arc::new(StubFetcher)), "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_download_requires_package_name() {
        let work = TempDir::new().unwrap();

        let response = get(test_app(&work, Arc::new(StubFetcher)), "/download").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = get(test_app(&work, Arc::new(StubFetcher)), "/download?package_name=").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_rejects_path_traversal() {
        let work = TempDir::new().unwrap();
        let response = get(
            test_app(&work, Arc::new(StubFetcher)),
            "/download?package_name=..%2Fetc",
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_export_failure_is_500() {
        let work = TempDir::new().unwrap();
        let response = get(
            test_app(&work, Arc::new(FailingFetcher)),
            "/download?package_name=Missing",
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_download_streams_and_removes_archive() {
        let work = TempDir::new().unwrap();
        let response = get(
            test_app(&work, Arc::new(StubFetcher)),
            "/download?package_name=Foo&package_version=",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Foo.unitypackage\""
        );
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        // gzip magic
        assert_eq!(&body[..2], &[0x1f, 0x8b]);
        assert!(!work.path().join("out/Foo.unitypackage").exists());

        let saved = work.path().join("Foo.unitypackage");
        fs::write(&saved, &body).unwrap();
        let assets = crate::unitypackage::read_assets(&saved).unwrap();
        let mut pathnames: Vec<_> = assets.iter().map(|a| a.pathname.as_str()).collect();
        pathnames.sort();
        assert_eq!(
            pathnames,
            [
                "Assets/Foo/Runtime/Foo.dll",
                "Assets/Foo/Runtime/foo-asmdef.asmdef",
                "Assets/Foo/package.json",
            ]
        );
    }

    #[tokio::test]
    async fn test_download_rejects_header_metacharacters() {
        let work = TempDir::new().unwrap();
        let response = get(
            test_app(&work, Arc::new(StubFetcher)),
            "/download?package_name=Foo%22%3B%20x%3D%22y",
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
    }

    #[tokio::test]
    async fn test_download_times_out_with_504() {
        let work = TempDir::new().unwrap();
        let (app, _state) = slow_app(&work, Duration::from_millis(1500), Duration::from_millis(200));

        let started = Instant::now();
        let response = get(app, "/download?package_name=Foo").await;
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert!(started.elapsed() < Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_queued_download_times_out_while_waiting_for_lock() {
        let work = TempDir::new().unwrap();
        let (app, _state) = slow_app(&work, Duration::from_millis(1500), Duration::from_millis(200));

        let first = get(app.clone(), "/download?package_name=Foo").await;
        assert_eq!(first.status(), StatusCode::GATEWAY_TIMEOUT);

        // The first export still holds the lock
        let started = Instant::now();
        let second = get(app, "/download?package_name=Bar").await;
        assert_eq!(second.status(), StatusCode::GATEWAY_TIMEOUT);
        assert!(
            started.elapsed() < Duration::from_millis(1000),
            "queued request took {:?}",
            started.elapsed()
        );
    }

    #[tokio::test]
    async fn test_timed_out_export_archive_is_removed() {
        let work = TempDir::new().unwrap();
        let (app, state) = slow_app(&work, Duration::from_millis(500), Duration::from_millis(100));

        let response = get(app, "/download?package_name=Foo").await;
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        // Released only once the abandoned export has been cleaned up
        let _guard = state.export_lock.lock().await;
        assert!(work.path().join("export/Foo/package.json").is_file());
        assert!(!work.path().join("out/Foo.unitypackage").exists());
    }
}
