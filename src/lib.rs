//! nginx Virtual-Host Manager Library

pub mod api;
pub mod registry;
pub mod reload;
pub mod render;

pub use registry::{LoadPolicy, Mapping, Registry, RegistryError, VirtualHost};
pub use reload::{nginx_reloader, noop_reloader, Reloader};
