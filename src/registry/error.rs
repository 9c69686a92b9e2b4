//! Registry error taxonomy.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by registry operations.
///
/// `Conflict` and `NotFound` describe the mutation itself; the remaining
/// variants come from the persist-and-reload step that follows every
/// mutating call. When both fail, the persistence error wins, since it
/// affects durability.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Create against a path that already exists.
    #[error("mapping for {path:?} already exists on host {host:?}")]
    Conflict { host: String, path: String },

    /// Modify/delete against a path (or host) that does not exist.
    #[error("no mapping for {path:?} on host {host:?}")]
    NotFound { host: String, path: String },

    /// Snapshot (de)serialization failed.
    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Reading or writing a registry file failed.
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The reload callback reported failure; the rendered config is on disk
    /// but the proxy may still run the previous one.
    #[error("proxy reload failed")]
    ReloadFailed,
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
