//! `depgraph-core`: the concurrency-safe package dependency graph and
//! the line-oriented wire protocol that drives it.
//!
//! This crate is deliberately free of any I/O. The [`graph`] module
//! owns the dual-index graph and its atomic mutation contracts; the
//! [`proto`] module is a pure parser; [`dispatch`] wires the two
//! together and drives the [`metrics`] counters. Everything that talks
//! to a socket — framing, timeouts, connection lifecycle — lives in
//! `depgraph-transport`.

pub mod dispatch;
pub mod graph;
pub mod metrics;
pub mod proto;

pub use dispatch::{dispatch, dispatch_line, Reply};
pub use graph::{GraphStats, GraphStore, IndexOutcome, PackageName, RemoveOutcome};
pub use metrics::{Metrics, MetricsSnapshot};
pub use proto::{parse, Command, ParseError, Tag};
