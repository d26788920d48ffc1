//! Metric collection and the data it produces.
//!
//! This module holds the provider interface, the sysinfo-backed collector,
//! the published data structures and the rolling history buffer.

pub mod collector;
pub mod data;
pub mod history;
pub mod mock;
pub mod traits;

// Re-export commonly used items
pub use collector::SystemCollector;
pub use data::{ExtendedInfo, Reading};
pub use history::HistoryBuffer;
pub use traits::MetricProvider;
