//! Hot-swappable calibration tables shared between tasks
//!
//! Every soil profile owns its own set of tables, one per channel, so lab
//! calibrations made for sand do not leak into loam readings and switching
//! the active profile switches calibration with it. A profile nobody
//! uploaded for calibrates as the identity.
//!
//! Each table is an immutable `Arc<CalibrationTable>`. An upload builds the
//! new table completely, then swaps the `Arc` under the lock. Readers clone
//! the `Arc` under the same lock and interpolate after releasing it, so a
//! reader sees either the old table or the new one and the lock is never
//! held across a computation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{CalibrationPoint, CalibrationTable, ExtrapolationPolicy};
use crate::{
    channel::{Channel, ChannelMap},
    errors::ConfigError,
    soil::SoilProfile,
};

type Tables = ChannelMap<Arc<CalibrationTable>>;

/// Cloneable handle to the active calibration tables of every profile
#[derive(Debug, Clone)]
pub struct CalibrationStore {
    profiles: Arc<Mutex<[Tables; SoilProfile::COUNT]>>,
}

impl Default for CalibrationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationStore {
    /// Store with identity tables on every profile and channel
    pub fn new() -> Self {
        let identity = Arc::new(CalibrationTable::empty());
        let profiles = core::array::from_fn(|_| ChannelMap::from_fn(|_| Arc::clone(&identity)));
        Self {
            profiles: Arc::new(Mutex::new(profiles)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, [Tables; SoilProfile::COUNT]> {
        // a panic elsewhere cannot leave a half-written Arc behind
        self.profiles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install a complete table for one channel of one profile
    pub fn replace(&self, profile: SoilProfile, channel: Channel, table: CalibrationTable) {
        let table = Arc::new(table);
        let points = table.len();
        self.lock()[profile.index()][channel] = table;
        log_info!(
            "calibration table for {} / {} replaced ({} points)",
            profile,
            channel,
            points
        );
    }

    /// Validate, build and install a table from uploaded points
    pub fn replace_points(
        &self,
        profile: SoilProfile,
        channel: Channel,
        points: &[CalibrationPoint],
    ) -> Result<(), ConfigError> {
        let table = CalibrationTable::from_points(points)?;
        self.replace(profile, channel, table);
        Ok(())
    }

    /// Reset one channel of a profile to the identity table
    pub fn clear(&self, profile: SoilProfile, channel: Channel) {
        self.replace(profile, channel, CalibrationTable::empty());
    }

    /// Reset every channel of a profile
    pub fn clear_profile(&self, profile: SoilProfile) {
        let identity = Arc::new(CalibrationTable::empty());
        self.lock()[profile.index()] = ChannelMap::from_fn(|_| Arc::clone(&identity));
        log_info!("calibration tables for {} cleared", profile);
    }

    /// Current table of one channel
    pub fn snapshot(&self, profile: SoilProfile, channel: Channel) -> Arc<CalibrationTable> {
        Arc::clone(&self.lock()[profile.index()][channel])
    }

    /// Current tables of all channels of a profile, taken under one lock
    pub fn snapshot_all(&self, profile: SoilProfile) -> Tables {
        self.lock()[profile.index()].clone()
    }

    /// Points in a channel's active table
    pub fn point_count(&self, profile: SoilProfile, channel: Channel) -> usize {
        self.snapshot(profile, channel).len()
    }

    /// True if any channel of the profile has a non-identity table
    pub fn is_calibrated(&self, profile: SoilProfile) -> bool {
        self.lock()[profile.index()].iter().any(|(_, table)| !table.is_empty())
    }

    /// Calibrate one value against the profile's current table
    pub fn calibrate(
        &self,
        profile: SoilProfile,
        channel: Channel,
        value: f32,
        policy: ExtrapolationPolicy,
    ) -> f32 {
        self.snapshot(profile, channel).interpolate(value, policy)
    }
}
