//! The background sampling loop.

use crate::error::{Result, SystemError};
use crate::metrics::MetricProvider;
use crate::state::SharedState;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};

/// Tunables for the sampling loop.
///
/// The cadence itself is fixed at [`crate::DEFAULT_INTERVAL_MS`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Consecutive failed cycles before the status turns degraded
    pub failure_threshold: u32,
    /// Refresh extended info every this many cycles
    pub extended_every: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: crate::DEFAULT_FAILURE_THRESHOLD,
            extended_every: 1,
        }
    }
}

impl SamplerConfig {
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    pub fn with_extended_every(mut self, cycles: u32) -> Self {
        self.extended_every = cycles;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.failure_threshold == 0 {
            return Err(SystemError::config_error("failure_threshold must be at least 1"));
        }
        if self.extended_every == 0 {
            return Err(SystemError::config_error("extended_every must be at least 1"));
        }
        Ok(())
    }
}

/// Drives a [`MetricProvider`] at a fixed cadence and publishes into the
/// shared state.
pub struct Sampler<P> {
    provider: P,
    state: SharedState,
    config: SamplerConfig,
    interval: Duration,
    cycle: u64,
}

impl<P: MetricProvider> Sampler<P> {
    pub fn new(provider: P, state: SharedState, config: SamplerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            provider,
            state,
            config,
            interval: Duration::from_millis(crate::DEFAULT_INTERVAL_MS),
            cycle: 0,
        })
    }

    /// Run one sampling cycle without the trailing sleep.
    ///
    /// A failed basic sample leaves the published reading and history alone.
    /// A failed extended sample only keeps the previous extended info.
    pub async fn run_cycle(&mut self) {
        let cycle = self.cycle;
        self.cycle += 1;

        match self.provider.sample_basic().await {
            Ok(reading) => {
                self.state.publish_reading(reading).await;
                self.state.append_history(reading).await;
                self.state.record_success(chrono::Utc::now()).await;
                debug!(
                    cycle,
                    cpu = reading.cpu_usage_percent,
                    mem = reading.mem_usage_percent,
                    "Published reading"
                );
            }
            Err(e) => {
                warn!(cycle, "Skipping sampling cycle: {}", e);
                let degraded = self
                    .state
                    .record_failure(e.to_string(), self.config.failure_threshold)
                    .await;
                if degraded {
                    error!(
                        "Sampler degraded after {} consecutive failures, serving stale data",
                        self.config.failure_threshold
                    );
                }
            }
        }

        if cycle % u64::from(self.config.extended_every) == 0 {
            match self.provider.sample_extended().await {
                Ok(info) => self.state.publish_extended(info).await,
                Err(e) => warn!(cycle, "Keeping previous extended info: {}", e),
            }
        }
    }

    /// Loop until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// The signal is only checked between cycles, so a cycle in progress always
    /// completes and publishes first.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Sampler started: {}ms interval, extended info every {} cycle(s)",
            self.interval.as_millis(),
            self.config.extended_every
        );

        loop {
            self.run_cycle().await;

            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = time::sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Sampler stopped after {} cycles", self.cycle);
    }
}
