//! Deterministic nginx configuration rendering.
//!
//! # Responsibilities
//! - Turn a VirtualHost into an nginx `server` block
//! - Turn the whole host set into the config file body
//!
//! # Design Decisions
//! - Pure functions over registry data; no I/O here
//! - Output is byte-stable: paths arrive in lexicographic order from the
//!   host's BTreeMap, hosts in name order from the registry, so the same
//!   state always renders the same text
//! - Disabled mappings are omitted entirely

use crate::registry::VirtualHost;

/// Line-oriented writer with 4-space indent units.
struct ConfWriter {
    lines: Vec<String>,
}

impl ConfWriter {
    fn new() -> Self {
        Self { lines: Vec::new() }
    }

    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn indent(&mut self, line: &str, level: usize) {
        self.line(format!("{}{}", "    ".repeat(level), line));
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Render one host's `server` block.
///
/// The host name splits on `:` into server name and optional listen port
/// (default 80). An empty name renders as the default server. Each enabled
/// mapping becomes a `location` block carrying the proxy target, the shared
/// `proxy_params` include, and the verbatim custom tags; an empty tag
/// string still emits its (indented, blank) line.
pub fn render_host(host: &VirtualHost) -> String {
    let mut out = ConfWriter::new();
    out.line("server {");
    out.indent("client_max_body_size 250m;", 1);

    let (server_name, port) = split_listen(&host.name);
    if host.name.is_empty() {
        out.indent(&format!("listen {port} default_server;"), 1);
    } else {
        out.indent(&format!("server_name {server_name};"), 1);
        out.indent(&format!("listen {port};"), 1);
    }
    out.line("");

    for (path, mapping) in &host.paths {
        if !mapping.enabled {
            continue;
        }
        out.indent(&format!("location {path} {{"), 1);
        out.indent(&format!("proxy_pass {};", mapping.upstream), 2);
        out.indent("include proxy_params;", 2);
        out.indent(&mapping.custom_tags, 2);
        out.indent("}", 1);
        out.line("");
    }

    out.line("}");
    out.finish()
}

/// Render the config file body: every host block followed by a newline.
pub fn render_all<'a>(hosts: impl IntoIterator<Item = &'a VirtualHost>) -> String {
    let mut out = String::new();
    for host in hosts {
        out.push_str(&render_host(host));
        out.push('\n');
    }
    out
}

fn split_listen(name: &str) -> (&str, &str) {
    match name.split_once(':') {
        Some((server_name, port)) => (server_name, port),
        None => (name, "80"),
    }
}
