//! Calibration Interpolator
//!
//! ## Overview
//!
//! Calibration is the empirical layer on top of compensation: operators
//! measure soil samples in a lab and upload `(raw, reference)` pairs per
//! channel. The calibrated value is the piecewise-linear interpolation of the
//! compensated value through that channel's table.
//!
//! ```text
//!  reference
//!     │               ●
//!     │            ╱
//!     │        ●           between points: linear interpolation
//!     │     ╱              outside: nearest edge slope (or clamp)
//!     │  ●
//!     │╱
//!     └──────────────────── raw
//! ```
//!
//! - An empty table is the identity.
//! - A single point shifts values by a constant offset.
//! - Outside the table's range the nearest edge segment's slope is continued
//!   by default. [`ExtrapolationPolicy::Clamp`] pins values to the edge point
//!   instead, for deployments that prefer it.
//!
//! ## Hot Swap
//!
//! Tables are immutable once built. With `std`, [`CalibrationStore`] holds
//! one `Arc` per soil profile and channel and replaces it wholesale on
//! upload, so an in-flight calibration never observes a mix of old and new
//! points. The pipeline calibrates against the tables of the reading's
//! profile.
//!
//! ## Usage Example
//!
//! ```rust
//! use soilguard_core::calibration::{CalibrationPoint, CalibrationTable, ExtrapolationPolicy};
//!
//! let table = CalibrationTable::from_points(&[
//!     CalibrationPoint::new(4.0, 4.2),
//!     CalibrationPoint::new(7.0, 7.1),
//!     CalibrationPoint::new(10.0, 9.8),
//! ])?;
//!
//! let ph = table.interpolate(6.0, ExtrapolationPolicy::EdgeSlope);
//! assert!((ph - 6.133).abs() < 1e-3);
//! # Ok::<(), soilguard_core::ConfigError>(())
//! ```

mod table;
#[cfg(feature = "std")]
mod store;

pub use table::{CalibrationPoint, CalibrationTable, ExtrapolationPolicy};
#[cfg(feature = "std")]
pub use store::CalibrationStore;
