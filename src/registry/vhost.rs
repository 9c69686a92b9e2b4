//! Per-host mapping set.
//!
//! # Responsibilities
//! - Own the path → Mapping set of one virtual host
//! - Insert/overwrite/move/remove mappings
//! - Flip enabled flags, per path or host-wide
//!
//! # Design Decisions
//! - Plain data, no lock: the Registry's coarse mutex serializes all access
//! - Paths live in a BTreeMap, so every traversal (rendering included) sees
//!   them in lexicographic order without a sort pass
//! - All write paths leave the touched mapping enabled; disabling is only
//!   ever done through `set_enabled`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::mapping::Mapping;

/// All mappings belonging to one virtual host.
///
/// `name` may be empty (the default server) and may carry a `:port` suffix,
/// as in `"example.com:8081"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualHost {
    pub name: String,
    pub paths: BTreeMap<String, Mapping>,
}

impl VirtualHost {
    /// Create an empty host.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            paths: BTreeMap::new(),
        }
    }

    /// Insert a new enabled mapping. Returns false without mutating
    /// anything when the path is already present.
    pub fn create(&mut self, path: &str, upstream: &str, custom_tags: &str) -> bool {
        if self.paths.contains_key(path) {
            return false;
        }
        self.paths
            .insert(path.to_string(), Mapping::new(upstream, custom_tags));
        true
    }

    /// Insert or overwrite a mapping. Overwriting a disabled mapping
    /// re-enables it.
    pub fn set(&mut self, path: &str, upstream: &str, custom_tags: &str) {
        self.paths
            .insert(path.to_string(), Mapping::new(upstream, custom_tags));
    }

    /// Move `old_path` to `new_path` with fresh target data. Returns false
    /// when `old_path` is absent. `new_path == old_path` is an in-place
    /// overwrite.
    pub fn modify(&mut self, old_path: &str, new_path: &str, upstream: &str, custom_tags: &str) -> bool {
        if self.paths.remove(old_path).is_none() {
            return false;
        }
        self.paths
            .insert(new_path.to_string(), Mapping::new(upstream, custom_tags));
        true
    }

    /// Remove a mapping. Returns false when the path is absent.
    pub fn delete(&mut self, path: &str) -> bool {
        self.paths.remove(path).is_some()
    }

    /// Flip the enabled flag of one mapping, or of every mapping in the
    /// host when `path` is empty. A miss is a no-op, not an error.
    pub fn set_enabled(&mut self, path: &str, enabled: bool) {
        if path.is_empty() {
            for mapping in self.paths.values_mut() {
                mapping.enabled = enabled;
            }
        } else if let Some(mapping) = self.paths.get_mut(path) {
            mapping.enabled = enabled;
        }
    }

    /// Defensive copy of all mappings.
    pub fn list(&self) -> BTreeMap<String, Mapping> {
        self.paths.clone()
    }

    /// Number of mappings in this host.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rejects_duplicate() {
        let mut host = VirtualHost::new("a.com");
        assert!(host.create("/x/", "http://1", ""));
        assert!(!host.create("/x/", "http://2", ""));

        // The losing create must not touch the existing mapping.
        let mapping = &host.paths["/x/"];
        assert_eq!(mapping.upstream, "http://1");
        assert!(mapping.enabled);
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn test_count_tracks_creates_and_deletes() {
        let mut host = VirtualHost::new("a.com");
        host.create("/a/", "http://1", "");
        host.create("/b/", "http://2", "");
        host.create("/a/", "http://3", ""); // rejected
        assert_eq!(host.len(), 2);

        assert!(host.delete("/a/"));
        assert!(!host.delete("/a/"));
        assert_eq!(host.len(), 1);
        assert!(!host.is_empty());

        assert!(host.delete("/b/"));
        assert!(host.is_empty());
    }

    #[test]
    fn test_set_overwrites_and_reenables() {
        let mut host = VirtualHost::new("a.com");
        host.create("/x/", "http://1", "");
        host.set_enabled("/x/", false);

        host.set("/x/", "http://2", "tag;");
        let mapping = &host.paths["/x/"];
        assert_eq!(mapping.upstream, "http://2");
        assert_eq!(mapping.custom_tags, "tag;");
        assert!(mapping.enabled);
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn test_modify_moves_path() {
        let mut host = VirtualHost::new("a.com");
        host.create("/x/", "http://old", "");

        assert!(host.modify("/x/", "/z/", "http://new", ""));
        assert_eq!(host.len(), 1);
        assert!(!host.paths.contains_key("/x/"));
        assert_eq!(host.paths["/z/"].upstream, "http://new");
        assert!(host.paths["/z/"].enabled);

        assert!(!host.modify("/missing/", "/w/", "http://new", ""));
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn test_set_enabled_empty_path_is_host_wide() {
        let mut host = VirtualHost::new("a.com");
        host.create("/x/", "http://1", "");
        host.create("/y/", "http://2", "");

        host.set_enabled("", false);
        assert!(host.paths.values().all(|m| !m.enabled));

        // Idempotent: a second disable changes nothing.
        host.set_enabled("", false);
        assert!(host.paths.values().all(|m| !m.enabled));

        host.set_enabled("", true);
        assert!(host.paths.values().all(|m| m.enabled));
    }

    #[test]
    fn test_set_enabled_miss_is_noop() {
        let mut host = VirtualHost::new("a.com");
        host.create("/x/", "http://1", "");
        host.set_enabled("/missing/", false);
        assert!(host.paths["/x/"].enabled);
    }

    #[test]
    fn test_list_is_a_copy() {
        let mut host = VirtualHost::new("a.com");
        host.create("/x/", "http://1", "");

        let mut listed = host.list();
        listed.get_mut("/x/").unwrap().enabled = false;
        assert!(host.paths["/x/"].enabled);
    }
}
