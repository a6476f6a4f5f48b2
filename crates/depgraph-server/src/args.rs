use std::time::Duration;

use clap::Parser;

use depgraph_transport::DEFAULT_MAX_LINE_LEN;

fn parse_duration_secs(raw: &str) -> Result<Duration, std::num::ParseIntError> {
    raw.parse::<u64>().map(Duration::from_secs)
}

/// Command-line surface for the `depgraphd` binary (spec §6). All
/// durations are given in whole seconds.
#[derive(Debug, Parser)]
#[command(name = "depgraphd", version, about = "Package dependency graph service")]
pub struct Args {
    /// Address the line-protocol listener binds to.
    #[arg(long, default_value = ":8080")]
    pub address: String,

    /// Disables the logging sink entirely.
    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Per-connection idle read deadline, in seconds.
    #[arg(long = "read-timeout", value_parser = parse_duration_secs, default_value = "30")]
    pub read_timeout: Duration,

    /// Bound on how long graceful shutdown waits for live handlers, in seconds.
    #[arg(long = "shutdown-timeout", value_parser = parse_duration_secs, default_value = "30")]
    pub shutdown_timeout: Duration,

    /// Address for the optional admin HTTP surface; omit to disable it.
    #[arg(long = "admin-address")]
    pub admin_address: Option<String>,

    /// Per-line length ceiling before a connection is closed.
    #[arg(long = "max-line-len", default_value_t = DEFAULT_MAX_LINE_LEN)]
    pub max_line_len: usize,
}
