//! Calibration Upload Example
//!
//! Runs the acquisition loop on its own thread while another thread uploads
//! a pH calibration table and a third polls the published reading.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_calibration_upload
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use soilguard_core::{
    calibration::CalibrationPoint,
    pipeline::PipelineBuilder,
    source::FixedSource,
    time::SystemTime,
    Channel, ChannelMap, PipelineConfig, SoilProfile,
};

fn main() {
    println!("SoilGuard Calibration Upload Example");
    println!("====================================\n");

    let values = ChannelMap::from_array([22.0, 38.0, 950.0, 6.0, 35.0, 18.0, 120.0]);
    let config = PipelineConfig {
        sample_interval_ms: 1_000,
        ..PipelineConfig::for_profile(SoilProfile::Loam)
    };
    let mut pipeline = PipelineBuilder::<_, 5>::new(FixedSource::new(values, SystemTime))
        .config(config)
        .build()
        .expect("default configuration is valid");

    let cache = pipeline.cache().clone();
    let store = pipeline.calibration().clone();
    let stop = Arc::new(AtomicBool::new(false));

    let acquisition = {
        let stop = Arc::clone(&stop);
        thread::spawn(move || pipeline.run_periodic(&stop))
    };

    let reader = {
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            while !stop.load(Ordering::Acquire) {
                if let Some(reading) = cache.latest() {
                    println!(
                        "cycle {:>3}: pH compensated {:.3} -> calibrated {:.3}",
                        reading.cycle,
                        reading.channels[Channel::Ph].compensated,
                        reading.value(Channel::Ph),
                    );
                }
                thread::sleep(Duration::from_millis(500));
            }
        })
    };

    thread::sleep(Duration::from_millis(2_500));
    println!("-- uploading loam pH table --");
    let upload = store.replace_points(
        SoilProfile::Loam,
        Channel::Ph,
        &[
            CalibrationPoint::new(4.0, 4.2),
            CalibrationPoint::new(7.0, 7.1),
            CalibrationPoint::new(10.0, 9.8),
        ],
    );
    if let Err(err) = upload {
        println!("upload rejected: {err}");
    }
    let points = store.point_count(SoilProfile::Loam, Channel::Ph);
    println!("active loam pH table has {points} points");

    thread::sleep(Duration::from_millis(2_500));
    stop.store(true, Ordering::Release);

    let cycles = acquisition.join().expect("acquisition thread");
    reader.join().expect("reader thread");
    println!("\n{cycles} readings published");
}

