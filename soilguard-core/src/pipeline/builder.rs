//! Pipeline builder
//!
//! Collects the source, configuration and shared handles, validates the
//! configuration and assembles a [`Pipeline`]. Shared handles that are not
//! supplied are created fresh, and the caller can fetch them from the built
//! pipeline to hand to other tasks.

use super::{CycleState, Pipeline};
use crate::{
    buffer::SampleBuffer,
    calibration::CalibrationStore,
    channel::ChannelMap,
    compensation::CompensationEngine,
    config::PipelineConfig,
    constants::buffers::{DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE, MIN_WINDOW_SIZE},
    errors::ConfigError,
    irrigation::IrrigationDetector,
    soil::SoilProfileRegistry,
    source::SensorSource,
    validators::ChannelValidator,
};

use super::ReadingCache;

/// Builder for [`Pipeline`]
///
/// The window size `W` must lie in `5..=15`; anything else fails to build:
///
/// ```compile_fail
/// use soilguard_core::{ChannelMap, pipeline::PipelineBuilder};
/// use soilguard_core::{source::FixedSource, time::FixedTime};
///
/// let source = FixedSource::new(ChannelMap::splat(1.0), FixedTime::new(0));
/// let _ = PipelineBuilder::<_, 20>::new(source).build();
/// ```
pub struct PipelineBuilder<S, const W: usize = DEFAULT_WINDOW_SIZE> {
    source: S,
    config: PipelineConfig,
    registry: SoilProfileRegistry,
    calibration: Option<CalibrationStore>,
    cache: Option<ReadingCache>,
}

impl<S: SensorSource, const W: usize> PipelineBuilder<S, W> {
    const WINDOW_IN_RANGE: () = assert!(
        W >= MIN_WINDOW_SIZE && W <= MAX_WINDOW_SIZE,
        "moving-average window must hold 5..=15 samples"
    );

    /// Builder over a source with default configuration
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: PipelineConfig::default(),
            registry: SoilProfileRegistry::builtin(),
            calibration: None,
            cache: None,
        }
    }

    /// Use this configuration
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom soil registry
    pub fn registry(mut self, registry: SoilProfileRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Share an existing calibration store
    pub fn calibration(mut self, store: CalibrationStore) -> Self {
        self.calibration = Some(store);
        self
    }

    /// Publish into an existing cache
    pub fn cache(mut self, cache: ReadingCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Validate the configuration and build the pipeline
    pub fn build(self) -> Result<Pipeline<S, W>, ConfigError> {
        #[allow(clippy::let_unit_value)]
        let () = Self::WINDOW_IN_RANGE;

        self.config.validate()?;

        log_info!(
            "pipeline ready: profile {}, window {}, compensation {}, calibration {}",
            self.config.soil_profile,
            W,
            self.config.compensation_enabled,
            self.config.calibration_enabled
        );

        Ok(Pipeline {
            source: self.source,
            validator: ChannelValidator::new(self.config.limits),
            engine: CompensationEngine::new(self.registry, self.config.compensation),
            irrigation: IrrigationDetector::new(self.config.irrigation),
            config: self.config,
            calibration: self.calibration.unwrap_or_default(),
            cache: self.cache.unwrap_or_default(),
            buffer: SampleBuffer::new(),
            previous: ChannelMap::splat(None),
            profile_warning: None,
            state: CycleState::Idle,
            cycle_count: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::soil::SoilProfile;
    use crate::source::FixedSource;
    use crate::time::FixedTime;

    fn source() -> FixedSource<FixedTime> {
        FixedSource::new(ChannelMap::splat(1.0), FixedTime::new(0))
    }

    #[test]
    fn builds_with_defaults() {
        let pipeline: Pipeline<_> = PipelineBuilder::new(source()).build().unwrap();
        assert_eq!(pipeline.state(), CycleState::Idle);
        assert_eq!(pipeline.cycle_count(), 0);
        assert_eq!(pipeline.window_size(), DEFAULT_WINDOW_SIZE);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = PipelineConfig::default();
        config.limits = config.limits.with_max_delta(Channel::Moisture, -1.0);

        let result = PipelineBuilder::<_, 5>::new(source()).config(config).build();
        assert!(matches!(result, Err(ConfigError::InvalidDeltaThreshold { .. })));
    }

    #[test]
    fn shares_supplied_handles() {
        let cache = ReadingCache::new();
        let store = CalibrationStore::new();

        let pipeline = PipelineBuilder::<_, 10>::new(source())
            .cache(cache.clone())
            .calibration(store.clone())
            .build()
            .unwrap();

        store.clear(SoilProfile::Loam, Channel::Ph);
        assert_eq!(pipeline.cache().published_cycles(), cache.published_cycles());
        assert_eq!(pipeline.window_size(), 10);
    }

    #[test]
    fn window_bounds_inclusive() {
        let narrow = PipelineBuilder::<_, MIN_WINDOW_SIZE>::new(source()).build().unwrap();
        let wide = PipelineBuilder::<_, MAX_WINDOW_SIZE>::new(source()).build().unwrap();
        assert_eq!(narrow.window_size(), 5);
        assert_eq!(wide.window_size(), 15);
    }
}
