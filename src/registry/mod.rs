//! Virtual-host registry subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler / CLI
//!     → store.rs (Registry: coarse lock, persistence, reload)
//!     → vhost.rs (VirtualHost: one host's mapping CRUD)
//!     → mapping.rs (Mapping: leaf data)
//!
//! After every mutating call, still under the same lock:
//!     store.rs serializes all hosts to the JSON snapshot,
//!     renders the nginx config (render module),
//!     and invokes the reload callback.
//! ```
//!
//! # Design Decisions
//! - One coarse mutex over the whole host map; see store.rs
//! - VirtualHost and Mapping are plain data: clonable, serializable,
//!   lock-free; defensive copies cross every API boundary
//! - Paths and hosts live in BTreeMaps so every traversal is ordered

pub mod error;
pub mod mapping;
pub mod store;
pub mod vhost;

pub use error::RegistryError;
pub use mapping::Mapping;
pub use store::{LoadPolicy, Registry};
pub use vhost::VirtualHost;
