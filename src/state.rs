//! Shared state published by the sampler and read by the HTTP layer.
//!
//! The sampler is the only writer. Every value sits behind its own
//! `RwLock`; readers copy out under a read guard and the sampler swaps under a
//! write guard, so a reader never sees a half-written value.

use crate::metrics::{ExtendedInfo, HistoryBuffer, Reading};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Handle shared between the sampler and the router.
pub type SharedState = Arc<StateStore>;

/// Sampler health as seen by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    /// No cycle has completed yet.
    Starting,
    Healthy,
    /// Too many consecutive failed cycles; published data is stale.
    Degraded,
}

/// Outcome bookkeeping for the sampling loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerStatus {
    pub status: Health,
    pub consecutive_failures: u32,
    /// Completed cycles, successful or not
    pub total_cycles: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl SamplerStatus {
    fn new() -> Self {
        Self {
            status: Health::Starting,
            consecutive_failures: 0,
            total_cycles: 0,
            last_success: None,
            last_error: None,
        }
    }

    /// Time since the last successful sample, `None` before the first one.
    pub fn stale_for(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.last_success.map(|at| now.signed_duration_since(at))
    }

    fn record_success(&mut self, at: DateTime<Utc>) {
        self.status = Health::Healthy;
        self.consecutive_failures = 0;
        self.total_cycles += 1;
        self.last_success = Some(at);
    }

    /// Returns `true` when this failure is the one that crosses the threshold.
    fn record_failure(&mut self, error: String, threshold: u32) -> bool {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.total_cycles += 1;
        self.last_error = Some(error);

        if self.consecutive_failures >= threshold && self.status != Health::Degraded {
            self.status = Health::Degraded;
            return true;
        }
        false
    }
}

/// The current reading, current extended info, the rolling history and the
/// sampler status.
#[derive(Debug)]
pub struct StateStore {
    current: RwLock<Reading>,
    extended: RwLock<ExtendedInfo>,
    history: RwLock<HistoryBuffer>,
    status: RwLock<SamplerStatus>,
}

impl StateStore {
    /// Create a store holding zero values.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Reading::default()),
            extended: RwLock::new(ExtendedInfo::default()),
            history: RwLock::new(HistoryBuffer::new()),
            status: RwLock::new(SamplerStatus::new()),
        }
    }

    /// Create a store already wrapped for sharing.
    pub fn shared() -> SharedState {
        Arc::new(Self::new())
    }

    pub async fn publish_reading(&self, reading: Reading) {
        *self.current.write().await = reading;
    }

    pub async fn publish_extended(&self, info: ExtendedInfo) {
        *self.extended.write().await = info;
    }

    pub async fn append_history(&self, reading: Reading) {
        self.history.write().await.append(reading);
    }

    pub async fn read_reading(&self) -> Reading {
        *self.current.read().await
    }

    pub async fn read_extended(&self) -> ExtendedInfo {
        self.extended.read().await.clone()
    }

    /// Oldest-first copy of the history.
    pub async fn history_snapshot(&self) -> Vec<Reading> {
        self.history.read().await.snapshot()
    }

    pub async fn status(&self) -> SamplerStatus {
        self.status.read().await.clone()
    }

    pub(crate) async fn record_success(&self, at: DateTime<Utc>) {
        self.status.write().await.record_success(at);
    }

    pub(crate) async fn record_failure(&self, error: String, threshold: u32) -> bool {
        self.status.write().await.record_failure(error, threshold)
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
