//! Per-cycle measurement record
//!
//! A [`SensorReading`] carries every intermediate value of every channel so
//! consumers can see what the sensor reported and what each stage did to it.
//! Readings with errors are still published; `valid` is false and the error
//! list says which checks failed.

use heapless::Vec;

use crate::{
    channel::{Channel, ChannelMap},
    constants::buffers::MAX_CYCLE_ERRORS,
    errors::{CheckStage, ErrorKind, RecordedError, ValidationError},
    soil::SoilProfile,
    time::Timestamp,
};

/// Values of one channel through the stages of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChannelReading {
    /// Sensor value
    pub raw: f32,
    /// Moving average
    pub filtered: f32,
    /// After compensation
    pub compensated: f32,
    /// After calibration, the published value
    pub calibrated: f32,
    /// Calibrated value of the previous cycle
    pub previous_calibrated: Option<f32>,
}

/// Everything the pipeline produced in one cycle
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SensorReading {
    /// Acquisition timestamp
    pub timestamp: Timestamp,
    /// Sequence number, starting at 1
    pub cycle: u64,
    /// Profile whose coefficients were applied
    pub profile: SoilProfile,
    /// Per-channel values
    pub channels: ChannelMap<ChannelReading>,
    /// False if any check failed
    pub valid: bool,
    /// Failed checks in detection order
    pub errors: Vec<RecordedError, MAX_CYCLE_ERRORS>,
    /// Irrigation detected within the hold window
    pub recent_irrigation: bool,
}

impl SensorReading {
    /// Empty reading for a cycle
    pub fn new(timestamp: Timestamp, cycle: u64, profile: SoilProfile) -> Self {
        Self {
            timestamp,
            cycle,
            profile,
            channels: ChannelMap::default(),
            valid: true,
            errors: Vec::new(),
            recent_irrigation: false,
        }
    }

    /// Attach an error and mark the reading invalid
    pub fn record(&mut self, stage: CheckStage, error: ValidationError) {
        self.valid = false;
        if self.errors.push(RecordedError { stage, error }).is_err() {
            log_warn!("cycle {}: error list full, dropping {:?}", self.cycle, error);
        }
    }

    /// Published value of a channel
    pub fn value(&self, channel: Channel) -> f32 {
        self.channels[channel].calibrated
    }

    /// Errors attached to one channel
    pub fn errors_for(&self, channel: Channel) -> impl Iterator<Item = &RecordedError> {
        self.errors
            .iter()
            .filter(move |e| e.error.channel() == Some(channel))
    }

    /// True if any error of `kind` was recorded
    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.error.kind() == kind)
    }

    /// True if `channel` has an error of `kind`
    pub fn channel_has_error(&self, channel: Channel, kind: ErrorKind) -> bool {
        self.errors_for(channel).any(|e| e.error.kind() == kind)
    }
}
