use crate::infra::{AppState, IntakeService};
use admission_intake::admission::admission_router;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_admission_routes(service: Arc<IntakeService>) -> axum::Router {
    admission_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::build_service;
    use admission_intake::config::IntakeConfig;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let service = build_service(&IntakeConfig::default()).expect("service builds");
        let recorder = PrometheusBuilder::new().build_recorder();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        };
        with_admission_routes(Arc::new(service)).layer(Extension(state))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let initializing = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route responds");
        assert_eq!(initializing.status(), StatusCode::SERVICE_UNAVAILABLE);

        let ready = app(true)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route responds");
        assert_eq!(ready.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn admission_routes_are_mounted() {
        let response = app(true)
            .oneshot(
                Request::get("/api/v1/admissions/rules")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route responds");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
