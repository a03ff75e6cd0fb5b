//! Test controls under `/__mock`

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::state::{Fault, MockState, RequestStats};

pub fn routes() -> Router<MockState> {
    Router::new()
        .route("/requests", get(stats).delete(reset))
        .route("/faults", delete(clear_faults).post(inject_fault))
        .route("/latency", put(set_latency))
}

/// GET /__mock/requests
async fn stats(State(state): State<MockState>) -> Json<RequestStats> {
    Json(state.stats().await)
}

/// DELETE /__mock/requests
async fn reset(State(state): State<MockState>) -> StatusCode {
    state.reset_counters().await;
    StatusCode::NO_CONTENT
}

/// POST /__mock/faults
async fn inject_fault(State(state): State<MockState>, Json(fault): Json<Fault>) -> StatusCode {
    state.inject_fault(fault).await;
    StatusCode::NO_CONTENT
}

/// DELETE /__mock/faults
async fn clear_faults(State(state): State<MockState>) -> StatusCode {
    state.clear_faults().await;
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
struct Latency {
    millis: u64,
}

/// PUT /__mock/latency
async fn set_latency(State(state): State<MockState>, Json(latency): Json<Latency>) -> StatusCode {
    state
        .set_latency(Duration::from_millis(latency.millis))
        .await;
    StatusCode::NO_CONTENT
}
