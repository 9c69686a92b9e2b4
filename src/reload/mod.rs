//! Proxy reload callback.
//!
//! The registry treats reload as an injected `Fn() -> bool`: `true` means
//! the freshly rendered configuration was applied to the live proxy. The
//! production implementation shells out to `nginx -s reload`; the noop
//! variant backs `--debug` runs and tests.
//!
//! The callback runs synchronously while the registry lock is held, so
//! reload attempts are serialized with every other registry operation.

use std::process::{Command, Stdio};
use std::sync::Arc;

/// Callback invoked as the last step of every save.
pub type Reloader = Arc<dyn Fn() -> bool + Send + Sync>;

/// Reload nginx by signaling its master process. nginx's own output goes to
/// our stderr so reload diagnostics end up in the daemon log.
pub fn nginx_reloader() -> Reloader {
    Arc::new(|| {
        let status = Command::new("nginx")
            .args(["-s", "reload"])
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status();

        match status {
            Ok(status) if status.success() => true,
            Ok(status) => {
                tracing::error!(code = ?status.code(), "nginx reload exited with failure");
                false
            }
            Err(err) => {
                tracing::error!(error = %err, "cannot run nginx reload");
                false
            }
        }
    })
}

/// Always-succeeding reloader for debug runs and tests.
pub fn noop_reloader() -> Reloader {
    Arc::new(|| true)
}
