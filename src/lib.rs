//! # hoststat - Host Utilization Sampler
//!
//! A background sampler of host CPU and memory utilization that keeps the
//! latest reading, a rolling history of the last 100 readings and extended
//! host facts, and serves them over a small read-only HTTP API.
//!
//! ## Features
//!
//! - **Fixed-cadence sampling**: CPU measured over a 500 ms window, then a 500 ms pause
//! - **Rolling history**: the last 100 readings, oldest first
//! - **Extended info**: cores, model, load averages, memory totals, host identity and disks
//! - **Resilient loop**: failed samples are skipped, stale data keeps being served
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hoststat::{start_web_server, Sampler, SamplerConfig, StateStore, SystemCollector, WebConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = StateStore::shared();
//!     let sampler = Sampler::new(SystemCollector::new()?, state.clone(), SamplerConfig::default())?;
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     tokio::spawn(sampler.run(shutdown_rx));
//!
//!     start_web_server(WebConfig::default(), state, std::future::pending()).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod metrics;
pub mod sampler;
pub mod state;
pub mod web;

// Re-export public API
pub use error::{Result, SystemError};
pub use metrics::{
    collector::SystemCollector,
    data::{CpuDetails, ExtendedInfo, MemoryDetails, Reading},
    history::HistoryBuffer,
    traits::MetricProvider,
};

#[cfg(feature = "host-info")]
pub use metrics::data::{DiskInfo, HostDetails};

pub use sampler::{Sampler, SamplerConfig};
pub use state::{Health, SamplerStatus, SharedState, StateStore};
pub use web::{create_app, start_web_server, WebConfig};

/// Pause between sampling cycles in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 500;

/// Window over which CPU usage is measured, in milliseconds
pub const CPU_SAMPLE_WINDOW_MS: u64 = 500;

/// Number of readings kept in the rolling history
pub const HISTORY_LENGTH: usize = 100;

/// Consecutive failed cycles before the sampler reports itself degraded
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;

/// The default web server port
pub const DEFAULT_WEB_PORT: u16 = 9527;
