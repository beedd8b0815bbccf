//! Measurement channels of the 7-in-1 sensor
//!
//! The channel set is closed: the sensor exposes exactly seven quantities and
//! every per-channel structure in the crate is a fixed array indexed by
//! [`Channel`] through [`ChannelMap`].

use core::ops::{Index, IndexMut};

/// One physical quantity measured by the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Channel {
    /// Soil temperature (°C)
    Temperature,
    /// Volumetric soil moisture (%)
    Moisture,
    /// Bulk electrical conductivity (µS/cm)
    ElectricalConductivity,
    /// Soil pH
    Ph,
    /// Nitrogen (mg/kg)
    Nitrogen,
    /// Phosphorus (mg/kg)
    Phosphorus,
    /// Potassium (mg/kg)
    Potassium,
}

impl Channel {
    /// Number of channels
    pub const COUNT: usize = 7;

    /// All channels in register order
    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::Temperature,
        Channel::Moisture,
        Channel::ElectricalConductivity,
        Channel::Ph,
        Channel::Nitrogen,
        Channel::Phosphorus,
        Channel::Potassium,
    ];

    /// Position of this channel in every per-channel array
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable lowercase name, as used by calibration uploads and payloads
    pub const fn name(self) -> &'static str {
        match self {
            Channel::Temperature => "temperature",
            Channel::Moisture => "moisture",
            Channel::ElectricalConductivity => "ec",
            Channel::Ph => "ph",
            Channel::Nitrogen => "nitrogen",
            Channel::Phosphorus => "phosphorus",
            Channel::Potassium => "potassium",
        }
    }

    /// Display unit
    pub const fn unit(self) -> &'static str {
        match self {
            Channel::Temperature => "°C",
            Channel::Moisture => "%",
            Channel::ElectricalConductivity => "µS/cm",
            Channel::Ph => "pH",
            Channel::Nitrogen | Channel::Phosphorus | Channel::Potassium => "mg/kg",
        }
    }

    /// True for the three nutrient channels
    pub const fn is_nutrient(self) -> bool {
        matches!(self, Channel::Nitrogen | Channel::Phosphorus | Channel::Potassium)
    }

    /// Look a channel up by its [`name`](Self::name)
    pub fn from_name(name: &str) -> Option<Channel> {
        Channel::ALL.iter().copied().find(|c| c.name() == name)
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Channel {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.name())
    }
}

/// Fixed array holding one `T` per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelMap<T> {
    values: [T; Channel::COUNT],
}

impl<T> ChannelMap<T> {
    /// Build from a function of the channel
    pub fn from_fn(mut f: impl FnMut(Channel) -> T) -> Self {
        Self {
            values: core::array::from_fn(|i| f(Channel::ALL[i])),
        }
    }

    /// Wrap an array already in register order
    pub const fn from_array(values: [T; Channel::COUNT]) -> Self {
        Self { values }
    }

    /// Iterate `(channel, value)` pairs in register order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.iter().copied().zip(self.values.iter())
    }

    /// Mutable iteration in register order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Channel, &mut T)> {
        Channel::ALL.iter().copied().zip(self.values.iter_mut())
    }

    /// Apply `f` to every entry
    pub fn map<U>(&self, mut f: impl FnMut(Channel, &T) -> U) -> ChannelMap<U> {
        ChannelMap::from_fn(|c| f(c, &self.values[c.index()]))
    }

    /// Underlying array
    pub fn as_array(&self) -> &[T; Channel::COUNT] {
        &self.values
    }
}

impl<T: Copy> ChannelMap<T> {
    /// Same value for every channel
    pub const fn splat(value: T) -> Self {
        Self {
            values: [value; Channel::COUNT],
        }
    }
}

impl<T: Default> Default for ChannelMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<Channel> for ChannelMap<T> {
    type Output = T;

    fn index(&self, channel: Channel) -> &T {
        &self.values[channel.index()]
    }
}

impl<T> IndexMut<Channel> for ChannelMap<T> {
    fn index_mut(&mut self, channel: Channel) -> &mut T {
        &mut self.values[channel.index()]
    }
}
