use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Log lines go to stdout. The filter is taken from `RUST_LOG` and falls back
/// to `info`, so the connection state and track lines are always visible.
pub fn init_log() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Join a server base URL and an absolute path without doubling or dropping
/// the `/` between them.
///
/// `endpoint_url("http://host:4000/", "api/whep")` and
/// `endpoint_url("http://host:4000", "/api/whep")` both give
/// `http://host:4000/api/whep`.
pub fn endpoint_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        return base.to_string();
    }

    format!("{base}/{path}")
}
