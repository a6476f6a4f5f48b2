use std::time::Duration;

/// Recommended floor for the per-line ceiling (spec §4.4: "at least
/// 64 KiB recommended").
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Immutable server configuration, resolved once at startup (spec §6).
/// No hot-reload: the service has no clustering or dynamic
/// reconfiguration non-goal to honor here, just a single process that
/// reads its flags once.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the line-protocol listener to.
    pub address: String,
    /// Per-read idle deadline; refreshed on every successful read.
    pub read_timeout: Duration,
    /// Bound on how long graceful shutdown waits for live handlers.
    pub shutdown_timeout: Duration,
    /// Ceiling on a single line's length before it is rejected and the
    /// connection closed.
    pub max_line_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: ":8080".to_string(),
            read_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}
