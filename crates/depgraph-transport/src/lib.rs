//! Connection Handler and Server Engine (spec §4.4–§4.5): the tokio
//! plumbing that drives `depgraph-core`'s pure graph and protocol
//! logic over real sockets.

mod cancel;
mod config;
mod conn;
mod error;
mod logger;
mod server;

pub use cancel::Cancellation;
pub use config::{ServerConfig, DEFAULT_MAX_LINE_LEN};
pub use error::ServerError;
pub use logger::{Level, Logger, NullLogger, TracingLogger};
pub use server::Server;
