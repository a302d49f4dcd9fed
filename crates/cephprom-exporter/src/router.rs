//! Axum router wiring.
//!
//! `/` answers liveness probes; the configured metrics path serves the scrape.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    let metrics_path = state.cfg().exporter.metrics_path.clone();
    Router::new()
        .route("/", get(ops::root))
        .route(&metrics_path, get(ops::metrics))
        .with_state(state)
}
