//! Shared utilities for registry and API integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use vhost_manager::api::{build_router, AppState};
use vhost_manager::{noop_reloader, LoadPolicy, Registry};

/// A registry writing into its own temp directory, with a noop reloader.
/// The directory lives as long as this struct.
pub struct TestRegistry {
    pub registry: Arc<Registry>,
    #[allow(dead_code)]
    pub dir: TempDir,
}

impl TestRegistry {
    #[allow(dead_code)]
    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.path().join("data.json")
    }

    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("nginx.conf")
    }

    /// A second registry instance over the same files, as a restarted
    /// daemon would construct it.
    #[allow(dead_code)]
    pub fn reopen(&self, policy: LoadPolicy) -> Registry {
        Registry::new(
            self.snapshot_path(),
            self.config_path(),
            noop_reloader(),
            policy,
        )
    }
}

pub fn test_registry() -> TestRegistry {
    let dir = TempDir::new().expect("create temp dir");
    let registry = Arc::new(Registry::new(
        dir.path().join("data.json"),
        dir.path().join("nginx.conf"),
        noop_reloader(),
        LoadPolicy::Preserve,
    ));
    TestRegistry { registry, dir }
}

/// Serve the API on an ephemeral port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_api(registry: Arc<Registry>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().unwrap();

    let app = build_router(AppState { registry });
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}
