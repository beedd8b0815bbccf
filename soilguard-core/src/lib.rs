//! Measurement pipeline for 7-in-1 soil sensors
//!
//! Turns raw sensor samples (temperature, moisture, EC, pH, N, P, K) into
//! validated, compensated and calibrated readings. Designed for edge devices
//! with limited resources.
//!
//! Key constraints:
//! - Runs on ESP32-class hardware; the pure stages build without `std`
//! - No heap allocation in the acquisition path
//! - Every cycle that obtains a frame publishes a reading, errors included
//!
//! ```text
//! source → moving average → compensation → calibration → validation → cache
//! ```
//!
//! ```rust
//! use soilguard_core::{Channel, ErrorKind, SensorReading};
//!
//! fn usable_ec(reading: &SensorReading) -> Option<f32> {
//!     let ec = Channel::ElectricalConductivity;
//!     let clean = !reading.channel_has_error(ec, ErrorKind::OutOfPhysicalRange);
//!     clean.then(|| reading.value(ec))
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod buffer;
pub mod calibration;
pub mod channel;
pub mod compensation;
pub mod config;
pub mod constants;
pub mod errors;
pub mod irrigation;
#[cfg(feature = "std")]
pub mod pipeline;
pub mod reading;
pub mod soil;
pub mod source;
pub mod time;
pub mod validators;

// Public API
pub use channel::{Channel, ChannelMap};
pub use config::PipelineConfig;
pub use errors::{
    CheckStage, ConfigError, ErrorKind, RecordedError, SourceError, ValidationError,
    ValidationResult,
};
pub use reading::{ChannelReading, SensorReading};
pub use soil::SoilProfile;

#[cfg(feature = "std")]
pub use calibration::CalibrationStore;
#[cfg(feature = "std")]
pub use pipeline::{CycleOutcome, CycleState, Pipeline, PipelineBuilder, ReadingCache};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
