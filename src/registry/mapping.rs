//! Leaf data: one path → upstream association.

use serde::{Deserialize, Serialize};

/// One path's proxy target within a virtual host.
///
/// The serde field names are the snapshot file format; renaming them is a
/// breaking change for persisted data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Upstream URI requests are proxied to (e.g., "http://127.0.0.1:3000").
    pub upstream: String,

    /// Extra nginx directives inserted verbatim into the location block.
    #[serde(default)]
    pub custom_tags: String,

    /// Disabled mappings stay in the registry but are omitted from the
    /// rendered configuration.
    #[serde(default)]
    pub enabled: bool,
}

impl Mapping {
    /// Create an enabled mapping.
    pub fn new(upstream: impl Into<String>, custom_tags: impl Into<String>) -> Self {
        Self {
            upstream: upstream.into(),
            custom_tags: custom_tags.into(),
            enabled: true,
        }
    }
}
