//! End-to-end behaviour of the measurement pipeline

mod common;

use soilguard_core::{
    calibration::{CalibrationPoint, CalibrationStore, ExtrapolationPolicy},
    compensation::{bulk_from_fluid, CompensationEngine, EnvironmentalConditions},
    pipeline::{CycleOutcome, PipelineBuilder},
    soil::{SoilProfile, SoilProfileRegistry},
    source::{ScriptedSource, SensorSource},
    time::SteppedTime,
    Channel, CheckStage, ErrorKind, PipelineConfig, SourceError,
};

use common::*;

#[test]
fn sand_reference_conditions_leave_ec_unchanged() {
    let mut pipeline = reference_pipeline(PipelineConfig::for_profile(SoilProfile::Sand));

    let outcome = pipeline.run_cycle();
    assert_eq!(outcome, CycleOutcome::Published { valid: true, errors: 0 });

    let reading = pipeline.cache().latest().expect("published");
    let ec = reading.channels[Channel::ElectricalConductivity];
    assert_eq!(ec.raw, 1200.0);
    assert_eq!(ec.compensated, 1200.0);
    assert_eq!(ec.calibrated, 1200.0);
    assert_eq!(reading.profile, SoilProfile::Sand);
}

#[test]
fn moisture_glitch_is_averaged_flagged_and_published() {
    let mut pipeline = reference_pipeline(PipelineConfig::for_profile(SoilProfile::Sand));

    let mut last = None;
    for (i, moisture) in [10.0, 20.0, 30.0, 40.0, 50.0].into_iter().enumerate() {
        last = Some(pipeline.process_frame(frame(
            i as u64 * 5_000,
            reference_with(Channel::Moisture, moisture),
        )));
    }
    let reading = last.expect("five cycles");
    assert_eq!(reading.channels[Channel::Moisture].filtered, 30.0);

    let reading = pipeline.process_frame(frame(25_000, reference_with(Channel::Moisture, 1000.0)));

    assert_eq!(reading.channels[Channel::Moisture].filtered, 228.0);
    assert!(!reading.valid);
    assert!(reading.errors.iter().any(|e| {
        e.stage == CheckStage::Input
            && e.error.channel() == Some(Channel::Moisture)
            && e.error.kind() == ErrorKind::OutOfPhysicalRange
    }));

    // still the latest published reading
    let cached = pipeline.cache().latest().expect("published");
    assert_eq!(cached.cycle, 6);
    assert_eq!(cached, reading);
}

#[test]
fn out_of_range_raw_always_recorded() {
    for (channel, value) in [
        (Channel::Temperature, -60.0),
        (Channel::ElectricalConductivity, 25_000.0),
        (Channel::Ph, 14.5),
        (Channel::Potassium, 12_000.0),
    ] {
        let mut pipeline = reference_pipeline(PipelineConfig::default());
        let reading = pipeline.process_frame(frame(0, reference_with(channel, value)));

        assert!(
            reading.channel_has_error(channel, ErrorKind::OutOfPhysicalRange),
            "{channel}"
        );
        assert_eq!(pipeline.cache().published_cycles(), 1);
    }
}

#[test]
fn ph_table_interpolates_in_pipeline() {
    let store = CalibrationStore::new();
    store
        .replace_points(
            SoilProfile::Loam,
            Channel::Ph,
            &[
                CalibrationPoint::new(4.0, 4.2),
                CalibrationPoint::new(7.0, 7.1),
                CalibrationPoint::new(10.0, 9.8),
            ],
        )
        .unwrap();

    let mut pipeline = PipelineBuilder::<_, 5>::new(soilguard_core::source::FixedSource::new(
        reference_with(Channel::Ph, 6.0),
        soilguard_core::time::FixedTime::new(0),
    ))
    .calibration(store)
    .build()
    .unwrap();

    pipeline.run_cycle();
    let reading = pipeline.cache().latest().unwrap();
    assert_eq!(reading.channels[Channel::Ph].compensated, 6.0);
    assert_close(reading.value(Channel::Ph), 6.1333, 1e-3);
}

#[test]
fn clamp_policy_pins_low_readings() {
    let mut config = PipelineConfig::default();
    config.extrapolation = ExtrapolationPolicy::Clamp;

    let mut pipeline = reference_pipeline(config);
    pipeline
        .calibration()
        .replace_points(
            SoilProfile::Loam,
            Channel::ElectricalConductivity,
            &[CalibrationPoint::new(1500.0, 1450.0), CalibrationPoint::new(3000.0, 2950.0)],
        )
        .unwrap();

    pipeline.run_cycle();
    let reading = pipeline.cache().latest().unwrap();
    assert_eq!(reading.value(Channel::ElectricalConductivity), 1450.0);
}

#[test]
fn edge_slope_extends_low_readings() {
    let mut pipeline = reference_pipeline(PipelineConfig::default());
    pipeline
        .calibration()
        .replace_points(
            SoilProfile::Loam,
            Channel::ElectricalConductivity,
            &[CalibrationPoint::new(1500.0, 1450.0), CalibrationPoint::new(3000.0, 2950.0)],
        )
        .unwrap();

    pipeline.run_cycle();
    let reading = pipeline.cache().latest().unwrap();
    assert_close(reading.value(Channel::ElectricalConductivity), 1150.0, 1e-2);
}

#[test]
fn archie_round_trip_through_engine() {
    let engine = CompensationEngine::default();
    let registry = SoilProfileRegistry::builtin();

    for profile in SoilProfile::ALL {
        for (temperature, moisture) in [(10.0, 12.0), (10.0, 20.0), (25.0, 40.0), (32.0, 65.0)] {
            let env = EnvironmentalConditions::new(temperature, moisture, profile);
            let archie = registry.coefficients_for(profile);
            let bulk = bulk_from_fluid(1000.0, &env, &archie, engine.config());

            let outcome = engine.compensate(Channel::ElectricalConductivity, bulk, &env);
            assert!(outcome.error.is_none());
            assert_close(outcome.value, 1000.0, 0.05);
        }
    }
}

#[test]
fn excessive_delta_flagged_after_first_cycle() {
    let mut pipeline = reference_pipeline(PipelineConfig::default());
    pipeline.process_frame(frame(0, reference_values()));

    // pH average moves from 6.5 to (6.5 + 9.5) / 2 = 8.0
    let reading = pipeline.process_frame(frame(5_000, reference_with(Channel::Ph, 9.5)));

    let delta: Vec<_> = reading
        .errors_for(Channel::Ph)
        .filter(|e| e.error.kind() == ErrorKind::ExcessiveDelta)
        .collect();
    assert_eq!(delta.len(), 1);
    assert_eq!(delta[0].stage, CheckStage::Output);
    assert_eq!(reading.channels[Channel::Ph].previous_calibrated, Some(6.5));
    assert_eq!(reading.value(Channel::Ph), 8.0);
}

#[test]
fn scripted_outage_never_leaves_a_gap() {
    let mut sensor = FakeSensor::new(7);
    let script = vec![
        Ok(sensor.next_values()),
        Err(SourceError::Timeout),
        Ok(sensor.next_values()),
    ];
    let source = ScriptedSource::new(&script, SteppedTime::new(0, 5_000));
    let mut pipeline = PipelineBuilder::<_, 5>::new(source).build().unwrap();
    let cache = pipeline.cache().clone();

    assert!(matches!(pipeline.run_cycle(), CycleOutcome::Published { .. }));
    assert_eq!(pipeline.run_cycle(), CycleOutcome::NotStarted(SourceError::Timeout));
    assert_eq!(cache.latest().map(|r| r.cycle), Some(1));

    assert!(matches!(pipeline.run_cycle(), CycleOutcome::Published { .. }));
    let reading = cache.latest().unwrap();
    assert_eq!(reading.cycle, 2);
    assert_eq!(reading.timestamp, 10_000);

    assert_eq!(pipeline.run_cycle(), CycleOutcome::NotStarted(SourceError::Exhausted));
    assert_eq!(pipeline.source_mut().poll_frame(), Err(nb::Error::Other(SourceError::Exhausted)));
}

#[test]
fn irrigation_flag_published() {
    let mut pipeline = reference_pipeline(PipelineConfig::default());
    let minute = 60_000;

    for i in 0..6 {
        let values = reference_with(Channel::Moisture, 22.0);
        let reading = pipeline.process_frame(frame(i * minute, values));
        assert!(!reading.recent_irrigation);
    }
    pipeline.process_frame(frame(6 * minute, reference_with(Channel::Moisture, 35.0)));
    let wet = reference_with(Channel::Moisture, 38.0);
    let reading = pipeline.process_frame(frame(7 * minute, wet));
    assert!(reading.recent_irrigation);

    let later = pipeline.process_frame(frame(40 * minute, wet));
    assert!(!later.recent_irrigation);
}

#[test]
fn fake_sensor_run_stays_in_range() {
    let mut sensor = FakeSensor::new(42);
    let script = sensor.script(50);
    let source = ScriptedSource::new(&script, SteppedTime::new(0, 5_000));
    let mut pipeline = PipelineBuilder::<_, 5>::new(source).build().unwrap();

    for cycle in 1..=50 {
        match pipeline.run_cycle() {
            CycleOutcome::Published { .. } => {}
            other => panic!("unexpected outcome {other:?}"),
        }

        // averaging can still move a channel past its delta threshold
        let reading = pipeline.cache().latest().unwrap();
        assert_eq!(reading.cycle, cycle);
        for kind in [
            ErrorKind::NonFinite,
            ErrorKind::OutOfPhysicalRange,
            ErrorKind::CompensationInputInvalid,
        ] {
            assert!(!reading.has_error(kind), "cycle {cycle}: {kind:?}");
        }
        for (channel, entry) in reading.channels.iter() {
            assert!(entry.calibrated.is_finite(), "cycle {cycle}: {channel}");
            assert!(entry.compensated >= 0.0 || channel == Channel::Temperature);
        }
    }
}

#[test]
fn wet_loam_potassium_stays_positive_and_valid() {
    let mut pipeline = reference_pipeline(PipelineConfig::default());
    let mut values = reference_with(Channel::Moisture, 70.0);
    values[Channel::Potassium] = 20.0;

    let reading = pipeline.process_frame(frame(0, values));
    assert!(reading.valid, "{:?}", reading.errors);
    assert_close(reading.value(Channel::Potassium), 15.2, 1e-3);
}

#[test]
fn dry_clay_ec_only_temperature_corrected() {
    let mut pipeline = reference_pipeline(PipelineConfig::for_profile(SoilProfile::Clay));
    let mut values = reference_with(Channel::Moisture, 5.0);
    values[Channel::ElectricalConductivity] = 500.0;

    let reading = pipeline.process_frame(frame(0, values));
    assert!(reading.valid, "{:?}", reading.errors);
    assert_eq!(reading.value(Channel::ElectricalConductivity), 500.0);
}
