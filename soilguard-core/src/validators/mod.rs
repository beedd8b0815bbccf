//! Range and Delta Validation
//!
//! ## Overview
//!
//! Each channel is checked twice per cycle:
//!
//! 1. **Input check** (before compensation): the raw sample and the filtered
//!    value against the channel's physical range. Catches absurd sensor output
//!    such as a moisture reading of 1000 %.
//! 2. **Output check** (after calibration): the final value against the same
//!    range, then against the previous cycle's final value with the channel's
//!    delta threshold. Catches corrupted correction output and implausible
//!    jumps.
//!
//! A failed check never discards the value. The error is attached to the
//! published reading and the value is carried forward, so a single glitch
//! cannot stall the pipeline or freeze consumers on stale data.
//!
//! ## Delta Thresholds
//!
//! Thresholds are per channel and per cycle, not per second:
//!
//! | Channel     | Default | Reason                                   |
//! |-------------|---------|------------------------------------------|
//! | Temperature | 5 °C    | Soil has large thermal mass              |
//! | Moisture    | 20 %    | Irrigation can raise moisture quickly    |
//! | EC          | 500     | Fertigation pulses                       |
//! | pH          | 1.0     | Buffered medium, slow drift              |
//! | N / P / K   | 100     | Follows fertigation                      |
//!
//! ## Usage Example
//!
//! ```rust
//! use soilguard_core::{Channel, ErrorKind};
//! use soilguard_core::validators::{ChannelValidator, ValidationLimits};
//!
//! let validator = ChannelValidator::new(ValidationLimits::default());
//!
//! assert!(validator.check_range(Channel::Ph, 6.5).is_ok());
//!
//! let err = validator.check_range(Channel::Moisture, 228.0).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::OutOfPhysicalRange);
//!
//! let err = validator.check_delta(Channel::Ph, 8.0, 6.5).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ExcessiveDelta);
//! ```

mod limits;
mod utils;

pub use limits::{ValidationLimits, ValidationRange};
pub use utils::{check_delta, check_finite, check_range};

use crate::{
    channel::Channel,
    errors::{ValidationError, ValidationResult},
};

/// Checks channel values against configured limits
#[derive(Debug, Clone, Default)]
pub struct ChannelValidator {
    limits: ValidationLimits,
}

impl ChannelValidator {
    /// Validator with the given limits
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    /// Active limits
    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Install new limits
    pub fn set_limits(&mut self, limits: ValidationLimits) {
        self.limits = limits;
    }

    /// Value within the channel's physical range
    pub fn check_range(&self, channel: Channel, value: f32) -> ValidationResult<()> {
        let range = self.limits.ranges[channel];
        utils::check_range(channel, value, range.min, range.max)
    }

    /// Change from `previous` within the channel's delta threshold
    pub fn check_delta(&self, channel: Channel, value: f32, previous: f32) -> ValidationResult<()> {
        utils::check_delta(channel, value, previous, self.limits.max_delta[channel])
    }

    /// Pre-compensation check of one channel
    ///
    /// A non-finite raw sample yields `NonFinite`. Otherwise the raw sample is
    /// range-checked first and the filtered value only if the raw sample
    /// passed, so one channel reports at most one input error.
    pub fn check_input(&self, channel: Channel, raw: f32, filtered: f32) -> ValidationResult<()> {
        utils::check_finite(channel, raw)?;
        self.check_range(channel, raw)?;
        self.check_range(channel, filtered)
    }

    /// Post-calibration check of one channel
    ///
    /// Range and delta are independent, so both errors can be reported for the
    /// same value. The delta check is skipped when there is no previous value.
    pub fn check_output(
        &self,
        channel: Channel,
        value: f32,
        previous: Option<f32>,
    ) -> OutputCheck {
        OutputCheck {
            range: self.check_range(channel, value).err(),
            delta: previous.and_then(|prev| self.check_delta(channel, value, prev).err()),
        }
    }
}

/// Result of [`ChannelValidator::check_output`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutputCheck {
    /// Range failure, if any
    pub range: Option<ValidationError>,
    /// Delta failure, if any
    pub delta: Option<ValidationError>,
}

impl OutputCheck {
    /// True when neither check failed
    pub fn passed(&self) -> bool {
        self.range.is_none() && self.delta.is_none()
    }

    /// Failures in check order
    pub fn errors(&self) -> impl Iterator<Item = ValidationError> {
        self.range.into_iter().chain(self.delta)
    }
}
