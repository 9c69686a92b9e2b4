//! Registry: the single source of truth for all virtual hosts.
//!
//! # Data Flow
//! ```text
//! HTTP handler / CLI
//!     → public Registry method (acquires the coarse lock)
//!     → *_locked internal (mutates the named VirtualHost)
//!     → save_locked(): snapshot JSON → rendered config → reload callback
//!     → defensive snapshot of the touched host(s) returned to the caller
//! ```
//!
//! # Design Decisions
//! - One process-wide mutex over the whole host map. The render step must
//!   see a consistent view of every host, so the lock spans the full
//!   mutate → persist → reload sequence
//! - Public methods never call other public methods; cross-calls go through
//!   the *_locked internals that assume the lock is held
//! - Every mutating entry point saves before releasing the lock, whether or
//!   not the mutation itself succeeded; a save failure outranks the
//!   mutation outcome in the returned error
//! - Failed saves are not rolled back: memory runs ahead of disk until the
//!   next successful save

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::error::RegistryError;
use super::vhost::VirtualHost;
use crate::reload::Reloader;
use crate::render;

/// What to do with persisted enabled flags when loading a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Keep the persisted flag, so save → load round-trips exactly.
    #[default]
    Preserve,
    /// Reset every mapping to disabled; operators re-enable explicitly.
    ForceDisabled,
}

/// Top-level store of all virtual hosts, with persistence and reload
/// orchestration.
pub struct Registry {
    snapshot_path: PathBuf,
    config_path: PathBuf,
    reload: Reloader,
    load_policy: LoadPolicy,
    hosts: Mutex<BTreeMap<String, VirtualHost>>,
}

impl Registry {
    /// Create an empty registry. Call [`Registry::load`] to populate it
    /// from the snapshot file.
    pub fn new(
        snapshot_path: impl Into<PathBuf>,
        config_path: impl Into<PathBuf>,
        reload: Reloader,
        load_policy: LoadPolicy,
    ) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            config_path: config_path.into(),
            reload,
            load_policy,
            hosts: Mutex::new(BTreeMap::new()),
        }
    }

    /// Replace the in-memory state with the persisted snapshot.
    ///
    /// A missing or unreadable snapshot is an error; whether that is fatal
    /// is the caller's call (the daemon treats it as fatal at startup).
    pub fn load(&self) -> Result<(), RegistryError> {
        let mut hosts = self.lock();

        let data = fs::read(&self.snapshot_path)
            .map_err(|e| RegistryError::io(&self.snapshot_path, e))?;
        let records: Vec<VirtualHost> = serde_json::from_slice(&data)?;

        let mut loaded = BTreeMap::new();
        for mut host in records {
            if self.load_policy == LoadPolicy::ForceDisabled {
                host.set_enabled("", false);
            }
            loaded.insert(host.name.clone(), host);
        }

        *hosts = loaded;
        tracing::info!(hosts = hosts.len(), "Loaded mapping snapshot");
        Ok(())
    }

    /// Defensive copy of every host and mapping.
    pub fn list(&self) -> BTreeMap<String, VirtualHost> {
        self.lock().clone()
    }

    /// Insert a new mapping; conflicts when the path already exists on the
    /// host. The host is created lazily when unknown.
    pub fn create(
        &self,
        name: &str,
        path: &str,
        upstream: &str,
        custom_tags: &str,
    ) -> Result<VirtualHost, RegistryError> {
        let mut hosts = self.lock();
        let host = hosts
            .entry(name.to_string())
            .or_insert_with(|| VirtualHost::new(name));
        let outcome = if host.create(path, upstream, custom_tags) {
            Ok(host.clone())
        } else {
            Err(RegistryError::Conflict {
                host: name.to_string(),
                path: path.to_string(),
            })
        };
        self.save_locked(&hosts)?;
        outcome
    }

    /// Insert or overwrite a mapping; never conflicts. Overwriting a
    /// disabled mapping re-enables it.
    pub fn set(
        &self,
        name: &str,
        path: &str,
        upstream: &str,
        custom_tags: &str,
    ) -> Result<VirtualHost, RegistryError> {
        let mut hosts = self.lock();
        let host = hosts
            .entry(name.to_string())
            .or_insert_with(|| VirtualHost::new(name));
        host.set(path, upstream, custom_tags);
        let snapshot = host.clone();
        self.save_locked(&hosts)?;
        Ok(snapshot)
    }

    /// Move an existing mapping to a (possibly identical) new path with
    /// fresh target data.
    pub fn modify(
        &self,
        name: &str,
        old_path: &str,
        new_path: &str,
        upstream: &str,
        custom_tags: &str,
    ) -> Result<VirtualHost, RegistryError> {
        let mut hosts = self.lock();
        let not_found = || RegistryError::NotFound {
            host: name.to_string(),
            path: old_path.to_string(),
        };
        let outcome = match hosts.get_mut(name) {
            Some(host) => {
                if host.modify(old_path, new_path, upstream, custom_tags) {
                    Ok(host.clone())
                } else {
                    Err(not_found())
                }
            }
            None => Err(not_found()),
        };
        self.save_locked(&hosts)?;
        outcome
    }

    /// Remove a mapping. A host whose last mapping was removed disappears
    /// from the registry entirely.
    pub fn delete(&self, name: &str, path: &str) -> Result<VirtualHost, RegistryError> {
        let mut hosts = self.lock();
        let outcome = Self::delete_locked(&mut hosts, name, path);
        self.save_locked(&hosts)?;
        outcome
    }

    /// Twin of [`Registry::delete`] on the upsert-style API surface, paired
    /// with [`Registry::set`]. Same removal semantics.
    pub fn unset(&self, name: &str, path: &str) -> Result<VirtualHost, RegistryError> {
        let mut hosts = self.lock();
        let outcome = Self::delete_locked(&mut hosts, name, path);
        self.save_locked(&hosts)?;
        outcome
    }

    /// Enable mappings. Empty `name`: every mapping of every host. Empty
    /// `path` only: every mapping of that host. Both non-empty: exactly one
    /// mapping. Misses are no-ops; the hosts addressed are still reported
    /// back as touched.
    pub fn enable(
        &self,
        name: &str,
        path: &str,
    ) -> Result<BTreeMap<String, VirtualHost>, RegistryError> {
        self.toggle(name, path, true)
    }

    /// Symmetric to [`Registry::enable`].
    pub fn disable(
        &self,
        name: &str,
        path: &str,
    ) -> Result<BTreeMap<String, VirtualHost>, RegistryError> {
        self.toggle(name, path, false)
    }

    fn toggle(
        &self,
        name: &str,
        path: &str,
        enabled: bool,
    ) -> Result<BTreeMap<String, VirtualHost>, RegistryError> {
        let mut hosts = self.lock();
        let touched = Self::toggle_locked(&mut hosts, name, path, enabled);
        self.save_locked(&hosts)?;
        Ok(touched)
    }

    fn toggle_locked(
        hosts: &mut BTreeMap<String, VirtualHost>,
        name: &str,
        path: &str,
        enabled: bool,
    ) -> BTreeMap<String, VirtualHost> {
        let mut touched = BTreeMap::new();

        if name.is_empty() {
            for (host_name, host) in hosts.iter_mut() {
                host.set_enabled("", enabled);
                touched.insert(host_name.clone(), host.clone());
            }
            return touched;
        }

        match hosts.get_mut(name) {
            Some(host) => {
                host.set_enabled(path, enabled);
                touched.insert(name.to_string(), host.clone());
            }
            // Unknown hosts are reported back but never registered: a host
            // with zero mappings must not reach the snapshot.
            None => {
                touched.insert(name.to_string(), VirtualHost::new(name));
            }
        }
        touched
    }

    fn delete_locked(
        hosts: &mut BTreeMap<String, VirtualHost>,
        name: &str,
        path: &str,
    ) -> Result<VirtualHost, RegistryError> {
        let not_found = || RegistryError::NotFound {
            host: name.to_string(),
            path: path.to_string(),
        };

        let host = hosts.get_mut(name).ok_or_else(not_found)?;
        if !host.delete(path) {
            return Err(not_found());
        }

        let snapshot = host.clone();
        if host.is_empty() {
            hosts.remove(name);
        }
        Ok(snapshot)
    }

    /// Persist and apply the current state: snapshot JSON, rendered nginx
    /// config, then the reload callback. Short-circuits on the first
    /// failure, leaving later steps unapplied.
    fn save_locked(&self, hosts: &BTreeMap<String, VirtualHost>) -> Result<(), RegistryError> {
        let records: Vec<&VirtualHost> = hosts.values().collect();
        let data = serde_json::to_vec(&records)?;
        write_atomic(&self.snapshot_path, &data)?;

        let config = render::render_all(hosts.values());
        write_atomic(&self.config_path, config.as_bytes())?;

        tracing::debug!(
            hosts = hosts.len(),
            snapshot = %self.snapshot_path.display(),
            config = %self.config_path.display(),
            "Saved registry state"
        );

        if !(self.reload)() {
            return Err(RegistryError::ReloadFailed);
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, VirtualHost>> {
        self.hosts.lock().expect("registry mutex poisoned")
    }
}

/// Write via a sibling temp file and rename, so a crash mid-write cannot
/// leave a torn file behind.
fn write_atomic(path: &Path, data: &[u8]) -> Result<(), RegistryError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, data).map_err(|e| RegistryError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| RegistryError::io(path, e))?;
    Ok(())
}
