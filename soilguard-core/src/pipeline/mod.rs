//! Acquisition Pipeline Orchestrator
//!
//! ## Overview
//!
//! One acquisition task drives the pipeline end-to-end on a fixed interval.
//! Each cycle walks the stages strictly in order:
//!
//! ```text
//! Idle → Buffering → Compensating → Calibrating → Validating → Published
//!          │              │              │             │           │
//!     moving average  physics model  lab table    range+delta  cache swap
//!     + input check
//! ```
//!
//! Errors found on the way are attached to the reading and never stop the
//! cycle: a non-finite sample proceeds with the substituted value, an
//! out-of-range value is carried forward, and a rejected compensation input
//! leaves the filtered value in place. Every cycle that obtains a frame
//! publishes exactly one reading.
//!
//! A cycle whose source fails never starts. Nothing is published and the
//! previous reading stays visible to consumers.
//!
//! ## Shared State
//!
//! | Structure          | Writer            | Readers                     |
//! |--------------------|-------------------|-----------------------------|
//! | Sample windows     | acquisition task  | none                        |
//! | Previous values    | acquisition task  | none                        |
//! | Calibration tables | upload handler    | acquisition task (snapshot) |
//! | Reading cache      | acquisition task  | any number of consumers     |
//!
//! Calibration tables are kept per soil profile; each cycle snapshots the set
//! belonging to the profile of its reading.
//!
//! ## Usage Example
//!
//! ```rust
//! use soilguard_core::{Channel, ChannelMap, PipelineConfig};
//! use soilguard_core::pipeline::{CycleOutcome, PipelineBuilder};
//! use soilguard_core::soil::SoilProfile;
//! use soilguard_core::source::FixedSource;
//! use soilguard_core::time::FixedTime;
//!
//! let values = ChannelMap::from_array([25.0, 40.0, 1200.0, 6.5, 40.0, 20.0, 150.0]);
//! let source = FixedSource::new(values, FixedTime::new(0));
//!
//! let mut pipeline = PipelineBuilder::<_, 5>::new(source)
//!     .config(PipelineConfig::for_profile(SoilProfile::Sand))
//!     .build()?;
//! let cache = pipeline.cache().clone();
//!
//! assert!(matches!(pipeline.run_cycle(), CycleOutcome::Published { valid: true, .. }));
//!
//! let reading = cache.latest().unwrap();
//! assert_eq!(reading.value(Channel::ElectricalConductivity), 1200.0);
//! # Ok::<(), soilguard_core::ConfigError>(())
//! ```

mod builder;
mod cache;

pub use builder::PipelineBuilder;
pub use cache::ReadingCache;

use core::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::{
    buffer::SampleBuffer,
    calibration::CalibrationStore,
    channel::{Channel, ChannelMap},
    compensation::{CompensationEngine, EnvironmentalConditions},
    config::PipelineConfig,
    constants::buffers::DEFAULT_WINDOW_SIZE,
    errors::{CheckStage, ConfigError, SourceError, ValidationError},
    irrigation::IrrigationDetector,
    reading::SensorReading,
    soil::SoilProfile,
    source::{RawFrame, SensorSource},
    time::month_of,
    validators::ChannelValidator,
};

/// Longest sleep between stop-flag checks in [`Pipeline::run_periodic`]
pub const STOP_POLL: Duration = Duration::from_millis(50);

/// Stage the orchestrator is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Waiting for the next cycle
    Idle,
    /// Pushing raw samples and checking input
    Buffering,
    /// Applying physics corrections
    Compensating,
    /// Applying calibration tables
    Calibrating,
    /// Checking final values
    Validating,
    /// Reading swapped into the cache
    Published,
}

/// Result of one [`Pipeline::run_cycle`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// A reading was published
    Published {
        /// Validity flag of the reading
        valid: bool,
        /// Number of errors attached
        errors: usize,
    },
    /// The source produced no frame; nothing was published
    NotStarted(SourceError),
}

/// Measurement pipeline over a sensor source, averaging `W` samples
pub struct Pipeline<S, const W: usize = DEFAULT_WINDOW_SIZE> {
    source: S,
    config: PipelineConfig,
    validator: ChannelValidator,
    engine: CompensationEngine,
    calibration: CalibrationStore,
    cache: ReadingCache,
    buffer: SampleBuffer<W>,
    irrigation: IrrigationDetector,
    previous: ChannelMap<Option<f32>>,
    profile_warning: Option<ValidationError>,
    state: CycleState,
    cycle_count: u64,
}

impl<S: SensorSource, const W: usize> Pipeline<S, W> {
    /// Builder over a source
    pub fn builder(source: S) -> PipelineBuilder<S, W> {
        PipelineBuilder::new(source)
    }

    /// Current stage
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Cycles published so far
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Moving-average window size
    pub const fn window_size(&self) -> usize {
        W
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Cache consumers read from
    pub fn cache(&self) -> &ReadingCache {
        &self.cache
    }

    /// Calibration tables, for upload handlers
    pub fn calibration(&self) -> &CalibrationStore {
        &self.calibration
    }

    /// Sample source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Install a new configuration
    ///
    /// Window contents and previous values are kept, so filtering and delta
    /// checks continue across the change. The profile given here replaces any
    /// profile chosen by index.
    pub fn reconfigure(&mut self, config: PipelineConfig) -> Result<(), ConfigError> {
        config.validate()?;

        self.validator.set_limits(config.limits);
        self.engine = CompensationEngine::new(self.engine.registry().clone(), config.compensation);
        if config.irrigation != self.config.irrigation {
            self.irrigation = IrrigationDetector::new(config.irrigation);
        }
        self.profile_warning = None;
        self.config = config;

        log_info!("pipeline reconfigured, profile {}", self.config.soil_profile);
        Ok(())
    }

    /// Select the soil profile from a stored configuration index
    ///
    /// An unknown index selects loam; every following reading records
    /// `UnknownSoilProfile` until a valid profile is selected.
    pub fn select_profile_index(&mut self, index: u8) -> SoilProfile {
        let (profile, warning) = SoilProfile::from_index_or_loam(index);
        if warning.is_some() {
            log_warn!("unknown soil profile index {}, using loam", index);
        }
        self.config.soil_profile = profile;
        self.profile_warning = warning;
        profile
    }

    /// Acquire one frame and run it through every stage
    pub fn run_cycle(&mut self) -> CycleOutcome {
        match self.source.poll_frame() {
            Ok(frame) => {
                let reading = self.process_frame(frame);
                CycleOutcome::Published {
                    valid: reading.valid,
                    errors: reading.errors.len(),
                }
            }
            Err(err) => {
                let err = match err {
                    nb::Error::WouldBlock => SourceError::NotReady,
                    nb::Error::Other(err) => err,
                };
                log_debug!("cycle skipped: {}", err);
                self.state = CycleState::Idle;
                CycleOutcome::NotStarted(err)
            }
        }
    }

    /// Run the stages on an already acquired frame and publish the result
    pub fn process_frame(&mut self, frame: RawFrame) -> SensorReading {
        self.state = CycleState::Idle;
        let cycle = self.cycle_count + 1;
        let profile = self.config.soil_profile;
        let mut reading = SensorReading::new(frame.timestamp, cycle, profile);

        self.buffer_stage(&frame, &mut reading);
        self.compensation_stage(&mut reading);
        self.calibration_stage(&mut reading);
        self.validation_stage(&mut reading);

        if !reading.valid {
            log_warn!("cycle {} published with {} errors", cycle, reading.errors.len());
        }

        self.cache.publish(reading.clone());
        self.cycle_count = cycle;
        self.state = CycleState::Published;
        reading
    }

    fn buffer_stage(&mut self, frame: &RawFrame, reading: &mut SensorReading) {
        self.state = CycleState::Buffering;

        for channel in Channel::ALL {
            let raw = frame.values[channel];
            let filtered = self.buffer.push(channel, raw).value;

            let entry = &mut reading.channels[channel];
            entry.raw = raw;
            entry.filtered = filtered;

            if let Err(err) = self.validator.check_input(channel, raw, filtered) {
                reading.record(CheckStage::Input, err);
            }
        }

        reading.recent_irrigation = self
            .irrigation
            .update(frame.values[Channel::Moisture], frame.timestamp);
    }

    fn compensation_stage(&mut self, reading: &mut SensorReading) {
        self.state = CycleState::Compensating;

        let lookup = self.engine.profile(reading.profile);
        if let Some(warning) = self.profile_warning {
            reading.record(CheckStage::Configuration, warning);
        } else if lookup.fell_back {
            reading.record(
                CheckStage::Configuration,
                ValidationError::UnknownSoilProfile {
                    requested: reading.profile.index() as u8,
                },
            );
        }

        if !self.config.compensation_enabled {
            for (_, entry) in reading.channels.iter_mut() {
                entry.compensated = entry.filtered;
            }
            return;
        }

        let parameters = lookup.parameters;
        let mut env = EnvironmentalConditions::new(
            reading.channels[Channel::Temperature].filtered,
            reading.channels[Channel::Moisture].filtered,
            reading.profile,
        )
        .with_month(month_of(reading.timestamp));

        // temperature and moisture first: the other channels are compensated
        // against their corrected values
        for channel in [Channel::Temperature, Channel::Moisture] {
            let outcome = self.engine.compensate_with(
                channel,
                reading.channels[channel].filtered,
                &env,
                &parameters,
            );
            reading.channels[channel].compensated = outcome.value;
            if let Some(err) = outcome.error {
                reading.record(CheckStage::Compensation, err);
            }
        }
        env.temperature = reading.channels[Channel::Temperature].compensated;
        env.moisture = reading.channels[Channel::Moisture].compensated;

        for channel in Channel::ALL.into_iter().skip(2) {
            let outcome = self.engine.compensate_with(
                channel,
                reading.channels[channel].filtered,
                &env,
                &parameters,
            );
            reading.channels[channel].compensated = outcome.value;
            if let Some(err) = outcome.error {
                reading.record(CheckStage::Compensation, err);
            }
        }
    }

    fn calibration_stage(&mut self, reading: &mut SensorReading) {
        self.state = CycleState::Calibrating;

        if !self.config.calibration_enabled {
            for (_, entry) in reading.channels.iter_mut() {
                entry.calibrated = entry.compensated;
            }
            return;
        }

        // one snapshot for the whole cycle; uploads land on the next cycle
        let tables = self.calibration.snapshot_all(reading.profile);
        let policy = self.config.extrapolation;
        for (channel, entry) in reading.channels.iter_mut() {
            entry.calibrated = tables[channel].interpolate(entry.compensated, policy);
        }
    }

    fn validation_stage(&mut self, reading: &mut SensorReading) {
        self.state = CycleState::Validating;

        for channel in Channel::ALL {
            let calibrated = reading.channels[channel].calibrated;
            let previous = self.previous[channel];

            let check = self.validator.check_output(channel, calibrated, previous);
            for err in check.errors() {
                reading.record(CheckStage::Output, err);
            }

            reading.channels[channel].previous_calibrated = previous;
            self.previous[channel] = Some(calibrated);
        }
    }

    /// Run cycles every `sample_interval_ms` until `stop` is set
    ///
    /// The interval is read from the active configuration before each wait.
    /// The stop flag is checked at least every [`STOP_POLL`] while waiting.
    /// Returns the number of cycles that published a reading.
    pub fn run_periodic(&mut self, stop: &AtomicBool) -> u64 {
        let mut published = 0;

        while !stop.load(Ordering::Acquire) {
            let started = Instant::now();
            if let CycleOutcome::Published { .. } = self.run_cycle() {
                published += 1;
            }

            let deadline = started + Duration::from_millis(self.config.sample_interval_ms);
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() || stop.load(Ordering::Acquire) {
                    break;
                }
                std::thread::sleep(remaining.min(STOP_POLL));
            }
        }

        log_info!("periodic acquisition stopped after {} readings", published);
        published
    }
}
