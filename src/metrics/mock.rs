//! Scripted metric provider for tests and demos.
//!
//! `MockProvider` replays a queue of readings and failures so the sampler can
//! be exercised without touching the host.

use crate::error::{Result, SystemError};
use crate::metrics::data::{ExtendedInfo, Reading};
use crate::metrics::traits::MetricProvider;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// One scripted outcome of `sample_basic`.
#[derive(Debug, Clone, PartialEq)]
pub enum MockSample {
    Reading(Reading),
    Fail(String),
}

/// Call counters, shared so they stay readable after the provider is moved
/// into a sampler.
#[derive(Debug, Default)]
pub struct MockCounters {
    basic: AtomicUsize,
    extended: AtomicUsize,
}

impl MockCounters {
    pub fn basic_calls(&self) -> usize {
        self.basic.load(Ordering::SeqCst)
    }

    pub fn extended_calls(&self) -> usize {
        self.extended.load(Ordering::SeqCst)
    }
}

/// Provider that replays a script.
///
/// Once the script runs out, `sample_basic` keeps returning the fallback
/// reading.
#[derive(Debug)]
pub struct MockProvider {
    script: VecDeque<MockSample>,
    fallback: Reading,
    extended: ExtendedInfo,
    fail_extended: bool,
    window: Duration,
    counters: Arc<MockCounters>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            fallback: Reading::default(),
            extended: ExtendedInfo::default(),
            fail_extended: false,
            window: Duration::ZERO,
            counters: Arc::new(MockCounters::default()),
        }
    }

    /// Queue successful readings.
    pub fn with_readings(mut self, readings: impl IntoIterator<Item = Reading>) -> Self {
        self.script.extend(readings.into_iter().map(MockSample::Reading));
        self
    }

    /// Queue `count` consecutive failures.
    pub fn with_failures(mut self, count: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        self.script
            .extend(std::iter::repeat(MockSample::Fail(message)).take(count));
        self
    }

    /// Reading returned after the script is exhausted.
    pub fn with_fallback(mut self, reading: Reading) -> Self {
        self.fallback = reading;
        self
    }

    pub fn with_extended(mut self, info: ExtendedInfo) -> Self {
        self.extended = info;
        self
    }

    /// Make every `sample_extended` call fail.
    pub fn failing_extended(mut self) -> Self {
        self.fail_extended = true;
        self
    }

    /// Simulated CPU measurement window.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn counters(&self) -> Arc<MockCounters> {
        Arc::clone(&self.counters)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricProvider for MockProvider {
    async fn sample_basic(&mut self) -> Result<Reading> {
        self.counters.basic.fetch_add(1, Ordering::SeqCst);
        if !self.window.is_zero() {
            tokio::time::sleep(self.window).await;
        }

        match self.script.pop_front() {
            Some(MockSample::Reading(reading)) => Ok(reading),
            Some(MockSample::Fail(message)) => Err(SystemError::provider_error(message)),
            None => Ok(self.fallback),
        }
    }

    async fn sample_extended(&mut self) -> Result<ExtendedInfo> {
        self.counters.extended.fetch_add(1, Ordering::SeqCst);
        if self.fail_extended {
            return Err(SystemError::provider_error("extended info unavailable"));
        }
        Ok(self.extended.clone())
    }
}
