use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use depgraph_core::{dispatch_line, GraphStore, Metrics};

use crate::cancel::Cancellation;
use crate::config::ServerConfig;
use crate::logger::{Level, Logger};

/// Why a connection's read/dispatch/write loop stopped. Used only for
/// the handler's own bookkeeping (spec §4.4's terminal states); nothing
/// downstream observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClosedReason {
    Eof,
    ReadErr,
    WriteErr,
    Cancelled,
}

/// Drive one accepted connection through `Reading -> Parsing ->
/// Dispatching -> Writing -> Reading ...` until EOF, a read/write
/// error, a read timeout, or cancellation (spec §4.4). Failures here
/// never propagate to other connections or to the graph.
pub async fn handle_connection(
    conn_id: u64,
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    graph: Arc<GraphStore>,
    metrics: Arc<Metrics>,
    logger: Arc<dyn Logger>,
    cancel: Cancellation,
    config: Arc<ServerConfig>,
) {
    let mut buf: Vec<u8> = Vec::with_capacity(256);

    let reason = loop {
        if cancel.is_cancelled() {
            break ClosedReason::Cancelled;
        }

        match read_line(&mut stream, &mut buf, &config).await {
            ReadLineOutcome::Line(len) => {
                let line = &buf[..len];
                let reply = dispatch_line(&graph, &metrics, line);
                buf.drain(..len);

                if let Err(err) = stream.write_all(reply.as_bytes()).await {
                    logger.log(
                        Level::Warn,
                        &format!("conn {conn_id} ({peer_addr}): write failed: {err}"),
                    );
                    break ClosedReason::WriteErr;
                }
            }
            ReadLineOutcome::Overflow => {
                metrics.inc_errors();
                let _ = stream.write_all(depgraph_core::Reply::Error.as_bytes()).await;
                break ClosedReason::ReadErr;
            }
            ReadLineOutcome::Eof => break ClosedReason::Eof,
            ReadLineOutcome::TimedOut => {
                logger.log(
                    Level::Warn,
                    &format!("conn {conn_id} ({peer_addr}): read timed out, closing"),
                );
                break ClosedReason::ReadErr;
            }
            ReadLineOutcome::IoError(err) => {
                logger.log(
                    Level::Warn,
                    &format!("conn {conn_id} ({peer_addr}): read failed: {err}"),
                );
                break ClosedReason::ReadErr;
            }
        }
    };

    if reason == ClosedReason::Cancelled {
        logger.log(
            Level::Warn,
            &format!("conn {conn_id} ({peer_addr}): closing on shutdown signal"),
        );
    }

    let _ = stream.shutdown().await;
}

enum ReadLineOutcome {
    Line(usize),
    Overflow,
    Eof,
    TimedOut,
    IoError(std::io::Error),
}

/// Read until a `\n` appears in `buf`, refreshing the read deadline on
/// every successful chunk (spec §4.4). Bounded by `config.max_line_len`
/// so a client that never sends a delimiter cannot grow `buf` without
/// limit (the slowloris-style attack spec §8 property 7 guards
/// against).
///
/// Deliberately does *not* race cancellation here: spec §4.4 checks the
/// signal "before each read", i.e. between requests, not mid-read — a
/// request already arriving (or in flight) when shutdown is requested
/// still gets its response. A handler stuck past the shutdown deadline
/// is force-aborted by the Server Engine's drain, not by this function.
async fn read_line(
    stream: &mut TcpStream,
    buf: &mut Vec<u8>,
    config: &ServerConfig,
) -> ReadLineOutcome {
    // A pipelined client may have left a second complete line sitting
    // in `buf` already from the previous read; no socket I/O needed.
    if let Some(pos) = find_newline(buf, 0) {
        return line_or_overflow(pos, config);
    }

    let mut chunk = [0u8; 4096];
    loop {
        let outcome = timeout(config.read_timeout, stream.read(&mut chunk)).await;

        let n = match outcome {
            Ok(Ok(0)) => return ReadLineOutcome::Eof,
            Ok(Ok(n)) => n,
            Ok(Err(err)) => return ReadLineOutcome::IoError(err),
            Err(_elapsed) => return ReadLineOutcome::TimedOut,
        };

        let search_start = buf.len();
        buf.extend_from_slice(&chunk[..n]);

        // Check for a completed line before declaring overflow: a
        // pipelined buffer can hold one valid line followed by an
        // unterminated oversized tail, and that earlier line is still
        // dispatchable regardless of how much garbage follows it. Only
        // when no terminator has shown up yet does the *buffered*
        // length (with nothing to dispatch from it) decide overflow.
        if let Some(pos) = find_newline(buf, search_start) {
            return line_or_overflow(pos, config);
        }

        if buf.len() > config.max_line_len {
            return ReadLineOutcome::Overflow;
        }
    }
}

/// A `\n` was found at `pos`; the line it terminates is itself subject
/// to the length ceiling, independent of anything buffered after it.
fn line_or_overflow(pos: usize, config: &ServerConfig) -> ReadLineOutcome {
    let line_len = pos + 1;
    if line_len > config.max_line_len {
        ReadLineOutcome::Overflow
    } else {
        ReadLineOutcome::Line(line_len)
    }
}

fn find_newline(buf: &[u8], from: usize) -> Option<usize> {
    buf[from..].iter().position(|&b| b == b'\n').map(|p| p + from)
}
