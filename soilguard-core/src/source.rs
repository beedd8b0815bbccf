//! Sensor Sources
//!
//! ## Overview
//!
//! The pipeline needs exactly one capability from the outside world: a raw
//! value for every channel, once per cycle. [`SensorSource`] models that
//! capability; the pipeline is generic over it and never knows whether it is
//! talking to the RS-485 sensor or to a simulation.
//!
//! | Source             | Use                                              |
//! |--------------------|--------------------------------------------------|
//! | [`BusSource`]      | Reads the sensor's holding registers              |
//! | [`FixedSource`]    | Same frame every cycle (bench setups, demos)     |
//! | [`ScriptedSource`] | Replays a recorded sequence, then reports exhaustion |
//!
//! Sources are pull-based and non-blocking through `nb::Result`:
//! `WouldBlock` means no frame is ready yet and `Other` carries a transport
//! failure. Either way the cycle never starts and the previously published
//! reading stays visible.
//!
//! ## Register Decoding
//!
//! | Channel     | Address | Scale    | Signed |
//! |-------------|---------|----------|--------|
//! | pH          | 0x0006  | 0.01     | no     |
//! | Moisture    | 0x0012  | 0.1 %    | no     |
//! | Temperature | 0x0013  | 0.1 °C   | yes    |
//! | EC          | 0x0015  | 1 µS/cm  | no     |
//! | N / P / K   | 0x001E–0x0020 | 1 mg/kg | no |
//!
//! ## Usage Example
//!
//! ```rust
//! use soilguard_core::{Channel, ChannelMap};
//! use soilguard_core::source::{FixedSource, SensorSource};
//! use soilguard_core::time::FixedTime;
//!
//! let values = ChannelMap::from_array([22.5, 40.0, 1200.0, 6.5, 40.0, 20.0, 150.0]);
//! let mut source = FixedSource::new(values, FixedTime::new(1_000));
//!
//! let frame = source.poll_frame().unwrap();
//! assert_eq!(frame.timestamp, 1_000);
//! assert_eq!(frame.values[Channel::ElectricalConductivity], 1200.0);
//! ```

use crate::{
    channel::{Channel, ChannelMap},
    constants::sensors::*,
    errors::SourceError,
    time::{TimeSource, Timestamp},
};

/// One raw value per channel, stamped with the acquisition time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFrame {
    /// Acquisition time
    pub timestamp: Timestamp,
    /// Raw value of every channel
    pub values: ChannelMap<f32>,
}

impl RawFrame {
    /// Frame from values and a timestamp
    pub const fn new(timestamp: Timestamp, values: ChannelMap<f32>) -> Self {
        Self { timestamp, values }
    }
}

/// Capability to produce one raw frame per cycle
pub trait SensorSource {
    /// Fetch the next frame
    fn poll_frame(&mut self) -> nb::Result<RawFrame, SourceError>;
}

impl<S: SensorSource + ?Sized> SensorSource for &mut S {
    fn poll_frame(&mut self) -> nb::Result<RawFrame, SourceError> {
        (**self).poll_frame()
    }
}

/// Holding register address of a channel
pub const fn register_address(channel: Channel) -> u16 {
    match channel {
        Channel::Temperature => REG_SOIL_TEMPERATURE,
        Channel::Moisture => REG_SOIL_MOISTURE,
        Channel::ElectricalConductivity => REG_CONDUCTIVITY,
        Channel::Ph => REG_PH,
        Channel::Nitrogen => REG_NITROGEN,
        Channel::Phosphorus => REG_PHOSPHORUS,
        Channel::Potassium => REG_POTASSIUM,
    }
}

/// Raw register words of one sensor read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterFrame {
    /// Register word per channel
    pub words: ChannelMap<u16>,
}

impl RegisterFrame {
    /// Frame from register words
    pub const fn new(words: ChannelMap<u16>) -> Self {
        Self { words }
    }

    /// Engineering value of one channel
    pub fn decode_channel(&self, channel: Channel) -> f32 {
        let word = self.words[channel];
        match channel {
            Channel::Temperature => word as i16 as f32 * TEMP_REGISTER_SCALE,
            Channel::Moisture => word as f32 * MOISTURE_REGISTER_SCALE,
            Channel::ElectricalConductivity => word as f32 * EC_REGISTER_SCALE,
            Channel::Ph => word as f32 * PH_REGISTER_SCALE,
            Channel::Nitrogen | Channel::Phosphorus | Channel::Potassium => {
                word as f32 * NPK_REGISTER_SCALE
            }
        }
    }

    /// Engineering values of all channels
    pub fn decode(&self) -> ChannelMap<f32> {
        ChannelMap::from_fn(|channel| self.decode_channel(channel))
    }
}

/// Transport seam for the field bus
///
/// Implemented by the Modbus RTU driver on hardware and by mocks in tests.
pub trait RegisterReader {
    /// Read one holding register
    fn read_holding(&mut self, address: u16) -> nb::Result<u16, SourceError>;
}

/// Source reading the sensor over a [`RegisterReader`]
///
/// All seven registers must be read for a frame; the first failure aborts
/// the read.
pub struct BusSource<R, T> {
    reader: R,
    clock: T,
}

impl<R: RegisterReader, T: TimeSource> BusSource<R, T> {
    /// Source over a register reader, stamped by `clock`
    pub fn new(reader: R, clock: T) -> Self {
        Self { reader, clock }
    }

    /// Read all registers of one frame
    pub fn read_registers(&mut self) -> nb::Result<RegisterFrame, SourceError> {
        let mut words = ChannelMap::splat(0u16);
        for channel in Channel::ALL {
            words[channel] = self.reader.read_holding(register_address(channel))?;
        }
        Ok(RegisterFrame::new(words))
    }

    /// Underlying reader
    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

impl<R: RegisterReader, T: TimeSource> SensorSource for BusSource<R, T> {
    fn poll_frame(&mut self) -> nb::Result<RawFrame, SourceError> {
        let registers = self.read_registers()?;
        Ok(RawFrame::new(self.clock.now(), registers.decode()))
    }
}

/// Source returning the same values every cycle
#[derive(Debug, Clone)]
pub struct FixedSource<T> {
    values: ChannelMap<f32>,
    clock: T,
}

impl<T: TimeSource> FixedSource<T> {
    /// Constant source stamped by `clock`
    pub fn new(values: ChannelMap<f32>, clock: T) -> Self {
        Self { values, clock }
    }

    /// Change the value reported for one channel
    pub fn set(&mut self, channel: Channel, value: f32) {
        self.values[channel] = value;
    }
}

impl<T: TimeSource> SensorSource for FixedSource<T> {
    fn poll_frame(&mut self) -> nb::Result<RawFrame, SourceError> {
        Ok(RawFrame::new(self.clock.now(), self.values))
    }
}

/// Source replaying a recorded sequence of frames
///
/// Each entry is either a frame's values or a transport error. After the
/// last entry every poll returns [`SourceError::Exhausted`].
pub struct ScriptedSource<'a, T> {
    script: &'a [Result<ChannelMap<f32>, SourceError>],
    position: usize,
    clock: T,
}

impl<'a, T: TimeSource> ScriptedSource<'a, T> {
    /// Replay `script`, stamping frames from `clock`
    pub fn new(script: &'a [Result<ChannelMap<f32>, SourceError>], clock: T) -> Self {
        Self {
            script,
            position: 0,
            clock,
        }
    }

    /// Entries not yet replayed
    pub fn remaining(&self) -> usize {
        self.script.len() - self.position
    }

    /// Start over
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

impl<T: TimeSource> SensorSource for ScriptedSource<'_, T> {
    fn poll_frame(&mut self) -> nb::Result<RawFrame, SourceError> {
        let entry = self
            .script
            .get(self.position)
            .ok_or(nb::Error::Other(SourceError::Exhausted))?;
        self.position += 1;

        // the clock ticks for failed polls too, like a real acquisition slot
        let timestamp = self.clock.now();
        match entry {
            Ok(values) => Ok(RawFrame::new(timestamp, *values)),
            Err(err) => Err(nb::Error::Other(*err)),
        }
    }
}
