//! Thin mapping from a parsed [`Command`] to a [`GraphStore`] call and
//! from the graph's answer to a wire response code (spec §4.3).

use crate::graph::{GraphStore, IndexOutcome, RemoveOutcome};
use crate::metrics::Metrics;
use crate::proto::{Command, ParseError, Tag};

/// One of the three bytes-on-the-wire replies (spec §4.4's response
/// tokens; the `\n` terminator is added by the Connection Handler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Fail,
    Error,
}

impl Reply {
    /// The exact bytes this reply puts on the wire, terminator included.
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            Reply::Ok => b"OK\n",
            Reply::Fail => b"FAIL\n",
            Reply::Error => b"ERROR\n",
        }
    }
}

/// Run one already-parsed command against the graph, bumping `metrics`
/// as spec §4.3 prescribes. [`dispatch_line`] is the usual entry point;
/// this is split out so callers that already have a [`Command`] (e.g.
/// tests) don't have to round-trip through bytes.
pub fn dispatch(graph: &GraphStore, metrics: &Metrics, cmd: &Command) -> Reply {
    let reply = match cmd.tag {
        Tag::Index => match graph.index(&cmd.name, cmd.deps.iter().cloned()) {
            IndexOutcome::Ok { newly_indexed } => {
                if newly_indexed {
                    metrics.inc_packages_indexed();
                }
                Reply::Ok
            }
            IndexOutcome::Fail => Reply::Fail,
        },
        Tag::Remove => match graph.remove(&cmd.name) {
            RemoveOutcome::Ok | RemoveOutcome::NotIndexed => Reply::Ok,
            RemoveOutcome::Blocked => Reply::Fail,
        },
        Tag::Query => {
            if graph.query(&cmd.name) {
                Reply::Ok
            } else {
                Reply::Fail
            }
        }
    };

    metrics.inc_commands_processed();
    reply
}

/// Parse and dispatch one raw wire line in a single call. A
/// [`ParseError`] never touches the graph and maps straight to
/// [`Reply::Error`].
pub fn dispatch_line(graph: &GraphStore, metrics: &Metrics, line: &[u8]) -> Reply {
    match crate::proto::parse(line) {
        Ok(cmd) => dispatch(graph, metrics, &cmd),
        Err(ParseError::MissingTerminator)
        | Err(ParseError::WrongFieldCount)
        | Err(ParseError::UnknownCommand)
        | Err(ParseError::EmptyName) => {
            metrics.inc_errors();
            Reply::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(s: &str) -> Vec<u8> {
        s.as_bytes().to_vec()
    }

    #[test]
    fn scenario_s1_leaf_first() {
        let g = GraphStore::new();
        let m = Metrics::new();
        assert_eq!(dispatch_line(&g, &m, &line("INDEX|a|\n")), Reply::Ok);
        assert_eq!(dispatch_line(&g, &m, &line("QUERY|a|\n")), Reply::Ok);
        assert_eq!(dispatch_line(&g, &m, &line("REMOVE|a|\n")), Reply::Ok);
        assert_eq!(dispatch_line(&g, &m, &line("QUERY|a|\n")), Reply::Fail);
    }

    #[test]
    fn scenario_s2_dependency_enforcement() {
        let g = GraphStore::new();
        let m = Metrics::new();
        assert_eq!(dispatch_line(&g, &m, &line("INDEX|b|a\n")), Reply::Fail);
        assert_eq!(dispatch_line(&g, &m, &line("INDEX|a|\n")), Reply::Ok);
        assert_eq!(dispatch_line(&g, &m, &line("INDEX|b|a\n")), Reply::Ok);
        assert_eq!(dispatch_line(&g, &m, &line("REMOVE|a|\n")), Reply::Fail);
        assert_eq!(dispatch_line(&g, &m, &line("REMOVE|b|\n")), Reply::Ok);
        assert_eq!(dispatch_line(&g, &m, &line("REMOVE|a|\n")), Reply::Ok);
    }

    #[test]
    fn scenario_s4_multiple_deps_trailing_comma() {
        let g = GraphStore::new();
        let m = Metrics::new();
        assert_eq!(dispatch_line(&g, &m, &line("INDEX|p|\n")), Reply::Ok);
        assert_eq!(dispatch_line(&g, &m, &line("INDEX|q|\n")), Reply::Ok);
        assert_eq!(dispatch_line(&g, &m, &line("INDEX|r|p,q,\n")), Reply::Ok);
        assert_eq!(dispatch_line(&g, &m, &line("QUERY|r|\n")), Reply::Ok);
    }

    #[test]
    fn scenario_s5_malformed_inputs_leave_graph_untouched() {
        let g = GraphStore::new();
        let m = Metrics::new();
        assert_eq!(dispatch_line(&g, &m, &line("BLINDEX|p|\n")), Reply::Error);
        assert_eq!(dispatch_line(&g, &m, &line("INDEX||\n")), Reply::Error);
        assert_eq!(dispatch_line(&g, &m, &line("INDEX|p\n")), Reply::Error);
        assert_eq!(
            dispatch_line(&g, &m, &line("INDEX|p|a|extra\n")),
            Reply::Error
        );
        assert_eq!(g.stats().indexed_count, 0);
    }

    #[test]
    fn scenario_s6_idempotent_remove() {
        let g = GraphStore::new();
        let m = Metrics::new();
        assert_eq!(dispatch_line(&g, &m, &line("REMOVE|ghost|\n")), Reply::Ok);
        assert_eq!(dispatch_line(&g, &m, &line("REMOVE|ghost|\n")), Reply::Ok);
    }

    #[test]
    fn packages_indexed_counts_only_new_members() {
        let g = GraphStore::new();
        let m = Metrics::new();
        dispatch_line(&g, &m, &line("INDEX|a|\n"));
        dispatch_line(&g, &m, &line("INDEX|a|\n")); // re-index, not new
        assert_eq!(m.snapshot(&g).packages_indexed_total, 1);
    }
}
