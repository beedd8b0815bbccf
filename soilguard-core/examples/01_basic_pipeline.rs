//! Basic Pipeline Example
//!
//! Runs a sensor glitch through the measurement pipeline and prints what each
//! stage made of it.
//!
//! ## What You'll Learn
//!
//! - Building a pipeline over a sensor source
//! - Reading the published reading from the cache
//! - How errors are attached instead of dropping the cycle
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_basic_pipeline
//! ```

use soilguard_core::{
    pipeline::PipelineBuilder,
    soil::SoilProfile,
    source::{RawFrame, ScriptedSource},
    time::SteppedTime,
    Channel, ChannelMap, PipelineConfig, SensorReading,
};

fn print_reading(reading: &SensorReading) {
    println!(
        "cycle {:>2} @ {:>6} ms  valid={}  irrigation={}",
        reading.cycle, reading.timestamp, reading.valid, reading.recent_irrigation
    );
    for (channel, entry) in reading.channels.iter() {
        println!(
            "  {:<12} raw {:>8.2}  filtered {:>8.2}  compensated {:>8.2}  final {:>8.2} {}",
            channel.name(),
            entry.raw,
            entry.filtered,
            entry.compensated,
            entry.calibrated,
            channel.unit()
        );
    }
    for recorded in reading.errors.iter() {
        println!("  ! {:?}: {}", recorded.stage, recorded.error);
    }
    println!();
}

fn main() {
    println!("SoilGuard Basic Pipeline Example");
    println!("================================\n");

    let moisture = [10.0, 20.0, 30.0, 40.0, 50.0, 1000.0];
    let script: Vec<_> = moisture
        .iter()
        .map(|&m| Ok(ChannelMap::from_array([25.0, m, 1200.0, 6.5, 40.0, 20.0, 150.0])))
        .collect();

    let source = ScriptedSource::new(&script, SteppedTime::new(0, 5_000));
    let mut pipeline = PipelineBuilder::<_, 5>::new(source)
        .config(PipelineConfig::for_profile(SoilProfile::Sand))
        .build()
        .expect("default configuration is valid");
    let cache = pipeline.cache().clone();

    while let soilguard_core::CycleOutcome::Published { .. } = pipeline.run_cycle() {
        if let Some(reading) = cache.latest() {
            print_reading(&reading);
        }
    }

    // Frames from elsewhere (a replay file, a bus driver) go straight in
    let frame = RawFrame::new(
        30_000,
        ChannelMap::from_array([31.0, 45.0, 1500.0, 7.2, 50.0, 25.0, 180.0]),
    );
    let reading = pipeline.process_frame(frame);
    println!(
        "replayed frame: EC {:.0} -> {:.0} µS/cm",
        reading.channels[Channel::ElectricalConductivity].raw,
        reading.value(Channel::ElectricalConductivity)
    );
}
