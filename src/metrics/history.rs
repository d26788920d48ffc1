//! Fixed-capacity rolling window of readings.

use crate::metrics::data::Reading;
use crate::HISTORY_LENGTH;

/// The last [`HISTORY_LENGTH`] readings in chronological order.
///
/// Backed by a fixed array and a head index, so `append` is O(1). Every slot
/// starts as a zero reading, which means an unfilled slot cannot be told apart
/// from a genuine `{0, 0}` measurement.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    slots: [Reading; HISTORY_LENGTH],
    /// Index of the oldest entry.
    head: usize,
}

impl HistoryBuffer {
    /// Create a buffer filled with zero readings.
    pub fn new() -> Self {
        Self {
            slots: [Reading::default(); HISTORY_LENGTH],
            head: 0,
        }
    }

    /// Append a reading, evicting the oldest one.
    pub fn append(&mut self, reading: Reading) {
        self.slots[self.head] = reading;
        self.head = (self.head + 1) % HISTORY_LENGTH;
    }

    /// Copy out all readings, oldest first.
    pub fn snapshot(&self) -> Vec<Reading> {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer).copied().collect()
    }

    /// The most recently appended reading.
    pub fn latest(&self) -> Reading {
        self.slots[(self.head + HISTORY_LENGTH - 1) % HISTORY_LENGTH]
    }

    /// Always [`HISTORY_LENGTH`].
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Never true; every slot holds a reading.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}
