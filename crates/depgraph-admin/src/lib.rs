//! Admin HTTP surface (spec §6A): a small `axum` router exposing
//! `/healthz`, `/metrics`, and `/buildinfo` for operators. This is a
//! collaborator surface, not part of the wire protocol's invariants —
//! it never touches the graph lock, only reading the same atomic
//! counters and readiness flag the line-protocol server updates.

mod routes;
mod state;

pub use routes::router;
pub use state::AdminState;

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use depgraph_core::{GraphStore, Metrics};

    use super::*;

    fn test_state(ready: bool) -> AdminState {
        let ready_flag = Arc::new(AtomicBool::new(ready));
        AdminState::new(
            Arc::new(GraphStore::new()),
            Arc::new(Metrics::new()),
            ready_flag,
            true,
        )
    }

    #[tokio::test]
    async fn healthz_reports_503_before_ready_and_200_after() {
        let app = router(test_state(false));
        let resp = app
            .clone()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let app = router(test_state(true));
        let resp = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_reports_prometheus_text_with_counters() {
        let state = test_state(true);
        state.metrics.inc_connections();
        state.metrics.inc_packages_indexed();
        let app = router(state);

        let resp = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("depgraphd_connections_total 1"));
        assert!(text.contains("depgraphd_packages_indexed_total 1"));
    }

    #[tokio::test]
    async fn buildinfo_reports_version_and_timestamp() {
        let app = router(test_state(true));
        let resp = app
            .oneshot(Request::builder().uri("/buildinfo").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("version").is_some());
        assert!(json.get("started_at").is_some());
    }
}
