//! Error Types for the Measurement Pipeline
//!
//! ## Design Philosophy
//!
//! Errors follow the same embedded constraints as the rest of the crate:
//!
//! 1. **Small Size**: every variant is a handful of `f32`s plus a channel tag,
//!    so a full cycle's error list fits in a fixed `heapless::Vec`.
//!
//! 2. **No Heap Allocation**: messages are `&'static str`, never `String`.
//!
//! 3. **Copy Semantics**: errors are copied into the published reading.
//!
//! ## Error Categories
//!
//! ### Measurement errors ([`ValidationError`])
//! Recovered locally. The cycle completes, the error is attached to the
//! published reading and the reading is flagged invalid:
//! - `NonFinite`: garbage sample (NaN, infinity) replaced by the previous
//!   filtered value
//! - `OutOfPhysicalRange`: raw or corrected value outside configured bounds
//! - `ExcessiveDelta`: implausible jump from the previous cycle
//! - `CompensationInputInvalid`: physically impossible coefficients or
//!   conditions; the uncorrected value is carried forward
//! - `UnknownSoilProfile`: configuration fallback to loam
//!
//! ### Caller errors
//! - [`ConfigError`]: configuration or calibration upload rejected before it
//!   is installed; the previous configuration stays active
//! - [`SourceError`]: acquisition failed, the cycle never starts
//!
//! ## Handling Strategy
//!
//! ```rust
//! use soilguard_core::{ErrorKind, SensorReading};
//!
//! fn publishable(reading: &SensorReading) -> bool {
//!     // Delta glitches are worth showing; range violations are not
//!     reading
//!         .errors
//!         .iter()
//!         .all(|e| e.error.kind() != ErrorKind::OutOfPhysicalRange)
//! }
//! ```

use thiserror_no_std::Error;

use crate::channel::Channel;

/// Result type for single validation checks
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Measurement errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ValidationError {
    /// Sample was NaN or infinite
    #[error("{channel}: sample is not a finite number")]
    NonFinite {
        /// Channel that delivered the sample
        channel: Channel,
    },

    /// Value outside the channel's configured physical bounds
    #[error("{channel}: value {value} outside range [{min}, {max}]")]
    OutOfPhysicalRange {
        /// Channel checked
        channel: Channel,
        /// Offending value
        value: f32,
        /// Configured lower bound
        min: f32,
        /// Configured upper bound
        max: f32,
    },

    /// Change from the previous cycle larger than the channel allows
    #[error("{channel}: change {previous} -> {value} exceeds {max_delta}")]
    ExcessiveDelta {
        /// Channel checked
        channel: Channel,
        /// Current calibrated value
        value: f32,
        /// Previous cycle's calibrated value
        previous: f32,
        /// Configured delta threshold
        max_delta: f32,
    },

    /// Compensation refused to run on non-physical inputs
    #[error("{channel}: compensation inputs invalid ({reason})")]
    CompensationInputInvalid {
        /// Channel whose correction was skipped
        channel: Channel,
        /// Which input was rejected
        reason: &'static str,
    },

    /// Configured soil profile is not defined; loam was used instead
    #[error("unknown soil profile {requested}, falling back to loam")]
    UnknownSoilProfile {
        /// Profile index that was requested
        requested: u8,
    },
}

/// Tag of a [`ValidationError`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ErrorKind {
    /// See [`ValidationError::NonFinite`]
    NonFinite,
    /// See [`ValidationError::OutOfPhysicalRange`]
    OutOfPhysicalRange,
    /// See [`ValidationError::ExcessiveDelta`]
    ExcessiveDelta,
    /// See [`ValidationError::CompensationInputInvalid`]
    CompensationInputInvalid,
    /// See [`ValidationError::UnknownSoilProfile`]
    UnknownSoilProfile,
}

impl ValidationError {
    /// Error tag
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NonFinite { .. } => ErrorKind::NonFinite,
            Self::OutOfPhysicalRange { .. } => ErrorKind::OutOfPhysicalRange,
            Self::ExcessiveDelta { .. } => ErrorKind::ExcessiveDelta,
            Self::CompensationInputInvalid { .. } => ErrorKind::CompensationInputInvalid,
            Self::UnknownSoilProfile { .. } => ErrorKind::UnknownSoilProfile,
        }
    }

    /// Channel the error refers to, `None` for configuration warnings
    pub fn channel(&self) -> Option<Channel> {
        match *self {
            Self::NonFinite { channel }
            | Self::OutOfPhysicalRange { channel, .. }
            | Self::ExcessiveDelta { channel, .. }
            | Self::CompensationInputInvalid { channel, .. } => Some(channel),
            Self::UnknownSoilProfile { .. } => None,
        }
    }
}

/// Pipeline stage that detected an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CheckStage {
    /// Raw / filtered input, before compensation
    Input,
    /// Compensation engine
    Compensation,
    /// Calibrated output
    Output,
    /// Configuration resolution
    Configuration,
}

/// Error attached to a published reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RecordedError {
    /// Where it was detected
    pub stage: CheckStage,
    /// What went wrong
    pub error: ValidationError,
}

/// Configuration rejected before installation
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Range lower bound above upper bound, or a non-finite bound
    #[error("{channel}: invalid range [{min}, {max}]")]
    InvalidRange {
        channel: Channel,
        min: f32,
        max: f32,
    },

    /// Delta threshold not positive and finite
    #[error("{channel}: delta threshold {threshold} must be positive")]
    InvalidDeltaThreshold {
        channel: Channel,
        threshold: f32,
    },

    /// Calibration point with NaN or infinite coordinates
    #[error("calibration point {index} is not finite")]
    NonFinitePoint {
        index: usize,
    },

    /// Two calibration points share a raw value
    #[error("calibration raw value {raw} appears twice")]
    DuplicateRawValue {
        raw: f32,
    },

    /// More points than the table can hold
    #[error("calibration table holds at most {capacity} points")]
    TooManyPoints {
        capacity: usize,
    },

    /// Scalar parameter out of its valid domain
    #[error("{field}: {reason}")]
    InvalidParameter {
        field: &'static str,
        reason: &'static str,
    },
}

/// Acquisition failure reported by a sensor source
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    /// No frame ready yet
    #[error("no frame ready")]
    NotReady,

    /// Sensor did not answer in time
    #[error("sensor response timed out")]
    Timeout,

    /// Frame failed its checksum
    #[error("frame checksum mismatch")]
    Crc,

    /// Fewer registers than requested
    #[error("short frame: expected {expected} registers, got {received}")]
    ShortFrame {
        expected: usize,
        received: usize,
    },

    /// Scripted source ran out of frames
    #[error("source exhausted")]
    Exhausted,

    /// Other transport failure
    #[error("bus error: {0}")]
    Bus(&'static str),
}

#[cfg(feature = "defmt")]
impl defmt::Format for ValidationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NonFinite { channel } => defmt::write!(fmt, "{}: non-finite sample", channel),
            Self::OutOfPhysicalRange { channel, value, min, max } => {
                defmt::write!(fmt, "{}: {} outside [{}, {}]", channel, value, min, max)
            }
            Self::ExcessiveDelta { channel, value, previous, max_delta } => {
                defmt::write!(fmt, "{}: {} -> {} exceeds {}", channel, previous, value, max_delta)
            }
            Self::CompensationInputInvalid { channel, reason } => {
                defmt::write!(fmt, "{}: compensation skipped ({=str})", channel, reason)
            }
            Self::UnknownSoilProfile { requested } => {
                defmt::write!(fmt, "unknown soil profile {}", requested)
            }
        }
    }
}
