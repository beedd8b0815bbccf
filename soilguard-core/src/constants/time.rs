//! Time-Related Constants

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = MS_PER_SECOND * SECONDS_PER_MINUTE as u64;

/// Default acquisition interval (milliseconds).
///
/// One sensor poll every 5 s keeps the RS-485 bus mostly idle while still
/// tracking irrigation events.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 5000;

/// Shortest acquisition interval accepted by configuration (milliseconds).
pub const MIN_SAMPLE_INTERVAL_MS: u64 = 1000;

/// Longest acquisition interval accepted by configuration (milliseconds).
pub const MAX_SAMPLE_INTERVAL_MS: u64 = 3_600_000;
