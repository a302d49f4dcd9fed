//! Operational HTTP endpoints.
//!
//! - `/`        : liveness, always `OK`
//! - `/metrics` : Prometheus text format; each scrape drains pending samples

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const EXPOSITION_FORMAT: &str = "text/plain; charset=utf-8; version=0.0.4";

pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, [(CONTENT_TYPE, TEXT_PLAIN)], "OK\n")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.registry().render_all();
    tracing::debug!(bytes = body.len(), "scrape served");

    (StatusCode::OK, [(CONTENT_TYPE, EXPOSITION_FORMAT)], body).into_response()
}
