//! Piecewise-linear calibration tables

use heapless::Vec;

use crate::{constants::buffers::MAX_CALIBRATION_POINTS, errors::ConfigError};

/// One lab measurement: what the pipeline produced and what it should be
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationPoint {
    /// Compensated value reported by the pipeline
    pub raw: f32,
    /// Reference instrument value
    pub reference: f32,
}

impl CalibrationPoint {
    /// Point from raw and reference values
    pub const fn new(raw: f32, reference: f32) -> Self {
        Self { raw, reference }
    }
}

/// Behaviour outside the table's raw range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExtrapolationPolicy {
    /// Continue the nearest edge segment's slope
    #[default]
    EdgeSlope,
    /// Pin to the nearest point's reference value
    Clamp,
}

/// Calibration points of one channel, sorted by strictly increasing raw value
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CalibrationTable {
    points: Vec<CalibrationPoint, MAX_CALIBRATION_POINTS>,
}

impl CalibrationTable {
    /// Empty table, calibration is the identity
    pub const fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Build a table from unordered points
    ///
    /// Points are sorted by raw value. Non-finite coordinates, repeated raw
    /// values and more than [`MAX_CALIBRATION_POINTS`] points are rejected.
    pub fn from_points(points: &[CalibrationPoint]) -> Result<Self, ConfigError> {
        if points.len() > MAX_CALIBRATION_POINTS {
            return Err(ConfigError::TooManyPoints {
                capacity: MAX_CALIBRATION_POINTS,
            });
        }

        if let Some(index) = points
            .iter()
            .position(|p| !p.raw.is_finite() || !p.reference.is_finite())
        {
            return Err(ConfigError::NonFinitePoint { index });
        }

        let mut sorted: Vec<CalibrationPoint, MAX_CALIBRATION_POINTS> = Vec::new();
        sorted
            .extend_from_slice(points)
            .map_err(|_| ConfigError::TooManyPoints {
                capacity: MAX_CALIBRATION_POINTS,
            })?;
        // all coordinates are finite, so total_cmp orders them numerically
        sorted.sort_unstable_by(|a, b| a.raw.total_cmp(&b.raw));

        if let Some(pair) = sorted.windows(2).find(|pair| pair[0].raw >= pair[1].raw) {
            return Err(ConfigError::DuplicateRawValue { raw: pair[1].raw });
        }

        Ok(Self { points: sorted })
    }

    /// Points in ascending raw order
    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True for the identity table
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Map a compensated value through the table
    pub fn interpolate(&self, value: f32, policy: ExtrapolationPolicy) -> f32 {
        let points = self.points.as_slice();

        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return value,
        };

        if points.len() == 1 {
            return match policy {
                ExtrapolationPolicy::EdgeSlope => value + (first.reference - first.raw),
                ExtrapolationPolicy::Clamp => first.reference,
            };
        }

        if value < first.raw {
            return match policy {
                ExtrapolationPolicy::EdgeSlope => lerp(points[0], points[1], value),
                ExtrapolationPolicy::Clamp => first.reference,
            };
        }

        if value >= last.raw {
            return match policy {
                ExtrapolationPolicy::EdgeSlope if value > last.raw => {
                    lerp(points[points.len() - 2], last, value)
                }
                _ => last.reference,
            };
        }

        // first.raw <= value < last.raw, so 1 <= upper < len
        let upper = points.partition_point(|p| p.raw <= value);
        lerp(points[upper - 1], points[upper], value)
    }
}

fn lerp(a: CalibrationPoint, b: CalibrationPoint, value: f32) -> f32 {
    a.reference + (value - a.raw) / (b.raw - a.raw) * (b.reference - a.reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ph_table() -> CalibrationTable {
        CalibrationTable::from_points(&[
            CalibrationPoint::new(10.0, 9.8),
            CalibrationPoint::new(4.0, 4.2),
            CalibrationPoint::new(7.0, 7.1),
        ])
        .unwrap()
    }

    #[test]
    fn points_sorted_on_build() {
        let table = ph_table();
        let raws: std::vec::Vec<f32> = table.points().iter().map(|p| p.raw).collect();
        assert_eq!(raws, vec![4.0, 7.0, 10.0]);
    }

    #[test]
    fn empty_table_is_identity() {
        let table = CalibrationTable::empty();
        assert_eq!(table.interpolate(1234.5, ExtrapolationPolicy::EdgeSlope), 1234.5);
        assert_eq!(table.interpolate(-3.0, ExtrapolationPolicy::Clamp), -3.0);
    }

    #[test]
    fn interpolates_between_points() {
        let value = ph_table().interpolate(6.0, ExtrapolationPolicy::EdgeSlope);
        let expected = 4.2 + (6.0 - 4.0) / (7.0 - 4.0) * (7.1 - 4.2);
        assert!((value - expected).abs() < 1e-5);
        assert!((value - 6.1333).abs() < 1e-3);
    }

    #[test]
    fn exact_points_map_to_reference() {
        let table = ph_table();
        for p in table.points() {
            assert_eq!(table.interpolate(p.raw, ExtrapolationPolicy::EdgeSlope), p.reference);
        }
    }

    #[test]
    fn edge_slope_below_range() {
        // slope of first segment is 2.9 / 3
        let value = ph_table().interpolate(1.0, ExtrapolationPolicy::EdgeSlope);
        let expected = 4.2 - 3.0 * (2.9 / 3.0);
        assert!((value - expected).abs() < 1e-5);
        assert!(value < 4.2);
    }

    #[test]
    fn edge_slope_above_range() {
        // last segment slope is 2.7 / 3 = 0.9
        let value = ph_table().interpolate(13.0, ExtrapolationPolicy::EdgeSlope);
        assert!((value - 12.5).abs() < 1e-4);
    }

    #[test]
    fn clamp_pins_to_edges() {
        let table = ph_table();
        assert_eq!(table.interpolate(1.0, ExtrapolationPolicy::Clamp), 4.2);
        assert_eq!(table.interpolate(13.0, ExtrapolationPolicy::Clamp), 9.8);
        assert!((table.interpolate(6.0, ExtrapolationPolicy::Clamp) - 6.1333).abs() < 1e-3);
    }

    #[test]
    fn single_point_table() {
        let table = CalibrationTable::from_points(&[CalibrationPoint::new(100.0, 110.0)]).unwrap();
        assert_eq!(table.interpolate(50.0, ExtrapolationPolicy::EdgeSlope), 60.0);
        assert_eq!(table.interpolate(50.0, ExtrapolationPolicy::Clamp), 110.0);
    }

    #[test]
    fn duplicate_raw_rejected() {
        let result = CalibrationTable::from_points(&[
            CalibrationPoint::new(1.0, 1.0),
            CalibrationPoint::new(2.0, 2.5),
            CalibrationPoint::new(1.0, 1.5),
        ]);
        assert_eq!(result, Err(ConfigError::DuplicateRawValue { raw: 1.0 }));
    }

    #[test]
    fn non_finite_rejected() {
        let result = CalibrationTable::from_points(&[
            CalibrationPoint::new(1.0, 1.0),
            CalibrationPoint::new(2.0, f32::NAN),
        ]);
        assert_eq!(result, Err(ConfigError::NonFinitePoint { index: 1 }));
    }

    #[test]
    fn capacity_enforced() {
        let points: std::vec::Vec<CalibrationPoint> = (0..=MAX_CALIBRATION_POINTS)
            .map(|i| CalibrationPoint::new(i as f32, i as f32))
            .collect();
        assert_eq!(
            CalibrationTable::from_points(&points),
            Err(ConfigError::TooManyPoints { capacity: MAX_CALIBRATION_POINTS })
        );
    }
}
