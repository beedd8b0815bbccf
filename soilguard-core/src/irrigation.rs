//! Irrigation event detection
//!
//! Watering shows up as a sharp rise of raw moisture above its recent
//! minimum. The detector keeps the last six raw moisture samples; a sample is
//! a spike when it exceeds the window minimum by at least the configured
//! threshold and is above 25 %. Two consecutive spikes mark an irrigation
//! event, and readings within the hold time of the last event carry the
//! `recent_irrigation` flag so consumers can discount the transient EC and
//! nutrient readings that follow watering.

use crate::{
    buffer::SampleWindow,
    constants::{buffers::IRRIGATION_WINDOW_SIZE, time::MS_PER_MINUTE},
    errors::ConfigError,
    time::Timestamp,
};

/// Moisture below which a rise is not treated as watering (%)
const MIN_IRRIGATED_MOISTURE_PCT: f32 = 25.0;

/// Consecutive spikes needed for an event
const SPIKES_PER_EVENT: u8 = 2;

/// Detector thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IrrigationConfig {
    /// Rise above the window minimum that counts as a spike (%)
    pub spike_threshold: f32,
    /// How long readings stay flagged after an event
    pub hold_minutes: u32,
}

impl Default for IrrigationConfig {
    fn default() -> Self {
        Self {
            spike_threshold: 8.0,
            hold_minutes: 20,
        }
    }
}

impl IrrigationConfig {
    /// Reject a non-positive spike threshold
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spike_threshold.is_finite() && self.spike_threshold > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidParameter {
                field: "irrigation.spike_threshold",
                reason: "must be positive",
            })
        }
    }
}

/// Tracks raw moisture and reports recent irrigation
#[derive(Debug, Clone)]
pub struct IrrigationDetector {
    config: IrrigationConfig,
    history: SampleWindow<IRRIGATION_WINDOW_SIZE>,
    consecutive_spikes: u8,
    last_event: Option<Timestamp>,
}

impl IrrigationDetector {
    /// Detector with empty history
    pub fn new(config: IrrigationConfig) -> Self {
        Self {
            config,
            history: SampleWindow::new(),
            consecutive_spikes: 0,
            last_event: None,
        }
    }

    /// Feed one raw moisture sample; returns the `recent_irrigation` flag
    ///
    /// Non-finite samples leave the history untouched.
    pub fn update(&mut self, moisture: f32, now: Timestamp) -> bool {
        if moisture.is_finite() {
            self.observe(moisture, now);
        }
        self.is_recent(now)
    }

    fn observe(&mut self, moisture: f32, now: Timestamp) {
        let spike = self.history.is_filled()
            && moisture > MIN_IRRIGATED_MOISTURE_PCT
            && self
                .history
                .bounds()
                .map_or(false, |(min, _)| moisture - min >= self.config.spike_threshold);

        self.consecutive_spikes = if spike { self.consecutive_spikes + 1 } else { 0 };
        if self.consecutive_spikes >= SPIKES_PER_EVENT {
            log_info!("irrigation detected at {} (moisture {})", now, moisture);
            self.last_event = Some(now);
            self.consecutive_spikes = 0;
        }

        self.history.push(moisture);
    }

    /// True while `now` is within the hold time of the last event
    pub fn is_recent(&self, now: Timestamp) -> bool {
        let hold_ms = u64::from(self.config.hold_minutes) * MS_PER_MINUTE;
        self.last_event
            .map_or(false, |event| now.saturating_sub(event) <= hold_ms)
    }

    /// Timestamp of the last detected event
    pub fn last_event(&self) -> Option<Timestamp> {
        self.last_event
    }
}

impl Default for IrrigationDetector {
    fn default() -> Self {
        Self::new(IrrigationConfig::default())
    }
}
