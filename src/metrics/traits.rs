//! Traits for metric collection.

use crate::error::Result;
use crate::metrics::data::{ExtendedInfo, Reading};
use async_trait::async_trait;

/// Source of host utilization figures.
///
/// Every call performs a fresh query. Implementations must either return a
/// valid value or an error, never a guessed one.
#[async_trait]
pub trait MetricProvider: Send {
    /// Measure CPU and memory utilization.
    ///
    /// CPU usage is a rate, so this suspends for the measurement window
    /// (about 500 ms for the system collector) before returning.
    async fn sample_basic(&mut self) -> Result<Reading>;

    /// Collect processor, memory, host and disk facts.
    async fn sample_extended(&mut self) -> Result<ExtendedInfo>;
}

#[async_trait]
impl<P: MetricProvider + ?Sized> MetricProvider for Box<P> {
    async fn sample_basic(&mut self) -> Result<Reading> {
        (**self).sample_basic().await
    }

    async fn sample_extended(&mut self) -> Result<ExtendedInfo> {
        (**self).sample_extended().await
    }
}
