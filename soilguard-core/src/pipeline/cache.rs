//! Latest-reading cache shared with consumers
//!
//! The acquisition task publishes a fully formed [`SensorReading`] once per
//! cycle; web, publishing and recommendation tasks poll [`ReadingCache::latest`]
//! at arbitrary times. The slot is replaced under a write lock and copied out
//! under a read lock, so a reader gets cycle N or cycle N+1, never a mix.

use std::sync::{Arc, PoisonError, RwLock};

use crate::reading::SensorReading;

#[derive(Debug, Default)]
struct Slot {
    latest: Option<SensorReading>,
    published: u64,
}

/// Cloneable handle to the most recent published reading
#[derive(Debug, Clone, Default)]
pub struct ReadingCache {
    slot: Arc<RwLock<Slot>>,
}

impl ReadingCache {
    /// Cache with nothing published
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published reading
    pub fn publish(&self, reading: SensorReading) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.latest = Some(reading);
        slot.published += 1;
    }

    /// Copy of the most recent reading
    pub fn latest(&self) -> Option<SensorReading> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .latest
            .clone()
    }

    /// Cycle number of the most recent reading
    pub fn latest_cycle(&self) -> Option<u64> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .latest
            .as_ref()
            .map(|r| r.cycle)
    }

    /// Number of readings published so far
    pub fn published_cycles(&self) -> u64 {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).published
    }
}
