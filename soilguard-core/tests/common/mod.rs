//! Shared fixtures for integration tests
//!
//! - Reference frames at 25 °C / 40 % moisture, where compensation is a no-op
//! - A seeded fake sensor producing values in realistic ranges
//! - Pipeline constructors over fixed and scripted sources

#![allow(dead_code)]

use soilguard_core::{
    pipeline::{Pipeline, PipelineBuilder},
    source::{FixedSource, RawFrame},
    time::{FixedTime, Timestamp},
    Channel, ChannelMap, PipelineConfig, SourceError,
};

/// Reference frame: T0, reference moisture, plausible chemistry
pub const REFERENCE_VALUES: [f32; 7] = [25.0, 40.0, 1200.0, 6.5, 40.0, 20.0, 150.0];

/// Reference frame values as a channel map
pub fn reference_values() -> ChannelMap<f32> {
    ChannelMap::from_array(REFERENCE_VALUES)
}

/// Reference frame with one channel replaced
pub fn reference_with(channel: Channel, value: f32) -> ChannelMap<f32> {
    let mut values = reference_values();
    values[channel] = value;
    values
}

/// Frame at `timestamp`
pub fn frame(timestamp: Timestamp, values: ChannelMap<f32>) -> RawFrame {
    RawFrame::new(timestamp, values)
}

/// Pipeline over a constant reference source with window 5
pub fn reference_pipeline(config: PipelineConfig) -> Pipeline<FixedSource<FixedTime>, 5> {
    PipelineBuilder::new(FixedSource::new(reference_values(), FixedTime::new(0)))
        .config(config)
        .build()
        .expect("valid config")
}

/// Script entry helper
pub type ScriptEntry = Result<ChannelMap<f32>, SourceError>;

/// Seeded fake sensor with the value ranges of a healthy bed
///
/// Temperature 17–27 °C, moisture 30–70 %, EC 800–1200 µS/cm, pH 4.5–8.5,
/// N 20–40, P 10–20, K 15–25 mg/kg.
pub struct FakeSensor {
    seed: u32,
}

impl FakeSensor {
    const RANGES: [(f32, f32); 7] = [
        (17.0, 27.0),
        (30.0, 70.0),
        (800.0, 1200.0),
        (4.5, 8.5),
        (20.0, 40.0),
        (10.0, 20.0),
        (15.0, 25.0),
    ];

    /// Generator with a fixed seed
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    fn random_float(&mut self) -> f32 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        (self.seed >> 8) as f32 / 16777216.0
    }

    /// Next set of channel values
    pub fn next_values(&mut self) -> ChannelMap<f32> {
        ChannelMap::from_fn(|channel| {
            let (lo, hi) = Self::RANGES[channel.index()];
            lo + self.random_float() * (hi - lo)
        })
    }

    /// Script of `n` successful frames
    pub fn script(&mut self, n: usize) -> Vec<ScriptEntry> {
        (0..n).map(|_| Ok(self.next_values())).collect()
    }
}

/// Assert two floats agree within `tolerance`
pub fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
