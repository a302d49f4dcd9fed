//! HTTP surface exercised in-process with `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use tower::ServiceExt;

use cephprom_core::{Label, MetricType, Registry};
use cephprom_exporter::app_state::AppState;
use cephprom_exporter::config::{load_from_str, ExporterConfig};
use cephprom_exporter::router::build_router;

fn app(registry: Arc<Registry>, cfg: ExporterConfig) -> Router {
    build_router(AppState::new(registry, cfg))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String, String) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

fn registry_with_osd_up() -> Arc<Registry> {
    let reg = Arc::new(Registry::new());
    reg.declare("ceph_osd_up", Some("Is the OSD up (1) or down (0)"), Some(MetricType::Gauge))
        .unwrap();
    reg.record_sample(
        "ceph_osd_up",
        vec![Label::new("fsid", "abc"), Label::new("osd", "3")],
        1.0,
        Some(Utc.timestamp_opt(1_500_000_000, 0).unwrap()),
    );
    reg
}

#[tokio::test]
async fn root_answers_ok() {
    let router = app(Arc::new(Registry::new()), ExporterConfig::default());
    let (status, content_type, body) = get(router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/plain; charset=utf-8");
    assert_eq!(body, "OK\n");
}

#[tokio::test]
async fn scrape_drains_pending_samples() {
    let reg = registry_with_osd_up();
    let router = app(Arc::clone(&reg), ExporterConfig::default());

    let (status, content_type, body) = get(router.clone(), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/plain; charset=utf-8; version=0.0.4");
    assert_eq!(
        body,
        "# HELP ceph_osd_up Is the OSD up (1) or down (0)\n\
         # TYPE ceph_osd_up gauge\n\
         ceph_osd_up{fsid=\"abc\",osd=\"3\"} 1 1500000000000\n"
    );

    let (_, _, again) = get(router, "/metrics").await;
    assert_eq!(again, "# HELP ceph_osd_up Is the OSD up (1) or down (0)\n# TYPE ceph_osd_up gauge\n");
}

#[tokio::test]
async fn metrics_path_is_configurable() {
    let cfg = load_from_str("version: 1\nexporter:\n  metrics_path: /ceph\n").unwrap();
    let router = app(registry_with_osd_up(), cfg);

    let (status, _, body) = get(router.clone(), "/ceph").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ceph_osd_up{"));

    let (status, _, _) = get(router, "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
