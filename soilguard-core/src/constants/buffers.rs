//! Buffer Sizes and Fixed Capacities
//!
//! Every structure the acquisition cycle touches is pre-sized so that a cycle
//! never allocates.

/// Default moving-average window (samples per channel).
///
/// Five samples at the default 5 s interval smooth over ~25 s, short enough
/// to follow an irrigation front.
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Smallest moving-average window a deployment may configure.
pub const MIN_WINDOW_SIZE: usize = 5;

/// Largest moving-average window a deployment may configure.
///
/// Fifteen samples at the default interval span 75 s; longer windows lag
/// behind an irrigation event.
pub const MAX_WINDOW_SIZE: usize = 15;

/// Maximum points in one channel's calibration table.
///
/// Lab calibrations rarely use more than a dozen reference solutions.
pub const MAX_CALIBRATION_POINTS: usize = 32;

/// Capacity of the per-reading error list.
///
/// Worst case per channel: non-finite, input range, compensation, output
/// range, delta = 5 entries x 7 channels, plus one configuration warning.
pub const MAX_CYCLE_ERRORS: usize = 48;

/// Moisture history kept by the irrigation detector (samples).
pub const IRRIGATION_WINDOW_SIZE: usize = 6;
