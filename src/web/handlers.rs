//! HTTP handlers for the `/v1` endpoints.
//!
//! Handlers only copy out whatever the sampler last published; they never
//! wait for a sample.

use crate::metrics::{ExtendedInfo, Reading};
use crate::state::{Health, SharedState};
use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest reading.
pub async fn get_current(State(state): State<SharedState>) -> Json<Reading> {
    Json(state.read_reading().await)
}

/// Rolling history, oldest first.
pub async fn get_history(State(state): State<SharedState>) -> Json<Vec<Reading>> {
    Json(state.history_snapshot().await)
}

/// Latest extended info.
pub async fn get_more_info(State(state): State<SharedState>) -> Json<ExtendedInfo> {
    Json(state.read_extended().await)
}

/// Body of `/v1/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: Health,
    pub consecutive_failures: u32,
    pub total_cycles: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    /// Milliseconds since the last successful sample
    pub stale_for_ms: Option<i64>,
    pub version: String,
}

/// Sampler health and staleness.
pub async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    let status = state.status().await;
    let stale_for_ms = status
        .stale_for(Utc::now())
        .map(|age| age.num_milliseconds().max(0));

    Json(HealthResponse {
        status: status.status,
        consecutive_failures: status.consecutive_failures,
        total_cycles: status.total_cycles,
        last_success: status.last_success,
        last_error: status.last_error,
        stale_for_ms,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
