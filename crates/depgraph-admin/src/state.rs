use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use depgraph_core::{GraphStore, Metrics};

/// Everything the admin routes need, gathered behind `axum::extract::State`
/// rather than threaded through each handler's arguments individually.
#[derive(Clone)]
pub struct AdminState {
    pub graph: Arc<GraphStore>,
    pub metrics: Arc<Metrics>,
    pub ready: Arc<AtomicBool>,
    pub started_at: DateTime<Utc>,
    pub version: &'static str,
    pub logging_enabled: bool,
}

impl AdminState {
    pub fn new(
        graph: Arc<GraphStore>,
        metrics: Arc<Metrics>,
        ready: Arc<AtomicBool>,
        logging_enabled: bool,
    ) -> Self {
        Self {
            graph,
            metrics,
            ready,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
            logging_enabled,
        }
    }
}
