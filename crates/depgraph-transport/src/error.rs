use std::io;

/// Infrastructural failures, as opposed to the logical outcomes
/// (`OK`/`FAIL`/`ERROR`) the protocol carries on the wire. Mirrors the
/// teacher's `CoreError` in spirit — a stable kind plus a source chain
/// — expressed as an ordinary `std::error::Error` via `thiserror`
/// since this crate targets `std`, not `no_std + alloc`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("listener accept loop failed fatally: {source}")]
    AcceptFatal {
        #[source]
        source: io::Error,
    },
}

/// Classifies an `accept()` failure as transient (log and keep
/// accepting, spec §4.5's "transient accept errors... loop continues")
/// or fatal (spec §6's "unrecoverable accept-loop error" -> non-zero
/// exit). Mirrors `spark-transport-tcp::error::categorize_io_error`'s
/// kind list: per-connection hiccups a peer can cause (a reset
/// connection, a backlog entry that's already gone by the time we
/// accept it, hitting a transient fd limit) are retryable; anything
/// else indicates the listener itself is broken.
pub(crate) fn is_transient_accept_error(err: &io::Error) -> bool {
    use io::ErrorKind;
    matches!(
        err.kind(),
        ErrorKind::WouldBlock
            | ErrorKind::Interrupted
            | ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_connection_hiccups_are_transient() {
        for kind in [
            io::ErrorKind::WouldBlock,
            io::ErrorKind::Interrupted,
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionAborted,
        ] {
            assert!(is_transient_accept_error(&io::Error::from(kind)));
        }
    }

    #[test]
    fn other_errors_are_fatal() {
        for kind in [
            io::ErrorKind::PermissionDenied,
            io::ErrorKind::Unsupported,
            io::ErrorKind::Other,
        ] {
            assert!(!is_transient_accept_error(&io::Error::from(kind)));
        }
    }
}
