//! Shared checks used by the channel validator
//!
//! All functions are pure and allocation-free. They take the channel only to
//! tag the error they return.

use crate::{
    channel::Channel,
    errors::{ValidationError, ValidationResult},
};

/// Reject NaN and infinite values
pub fn check_finite(channel: Channel, value: f32) -> ValidationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { channel })
    }
}

/// Check that a value is within `[min, max]`, both bounds inclusive
pub fn check_range(channel: Channel, value: f32, min: f32, max: f32) -> ValidationResult<()> {
    if value < min || value > max {
        Err(ValidationError::OutOfPhysicalRange {
            channel,
            value,
            min,
            max,
        })
    } else {
        Ok(())
    }
}

/// Check that `|value - previous|` does not exceed `max_delta`
///
/// A delta exactly equal to the threshold passes.
pub fn check_delta(
    channel: Channel,
    value: f32,
    previous: f32,
    max_delta: f32,
) -> ValidationResult<()> {
    if (value - previous).abs() > max_delta {
        Err(ValidationError::ExcessiveDelta {
            channel,
            value,
            previous,
            max_delta,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check() {
        assert!(check_range(Channel::Ph, 7.0, 0.0, 14.0).is_ok());
        assert!(check_range(Channel::Ph, -0.1, 0.0, 14.0).is_err());
        assert!(check_range(Channel::Ph, 14.1, 0.0, 14.0).is_err());
    }

    #[test]
    fn range_bounds_inclusive() {
        assert!(check_range(Channel::Moisture, 0.0, 0.0, 100.0).is_ok());
        assert!(check_range(Channel::Moisture, 100.0, 0.0, 100.0).is_ok());
    }

    #[test]
    fn delta_at_threshold_passes() {
        assert!(check_delta(Channel::Temperature, 25.0, 20.0, 5.0).is_ok());

        let err = check_delta(Channel::Temperature, 25.5, 20.0, 5.0).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ExcessiveDelta {
                channel: Channel::Temperature,
                value: 25.5,
                previous: 20.0,
                max_delta: 5.0,
            }
        );
    }

    #[test]
    fn delta_is_symmetric() {
        assert!(check_delta(Channel::Ph, 5.0, 7.0, 1.0).is_err());
        assert!(check_delta(Channel::Ph, 7.0, 5.0, 1.0).is_err());
    }

    #[test]
    fn finite_check() {
        assert!(check_finite(Channel::Nitrogen, 5.0).is_ok());
        assert!(check_finite(Channel::Nitrogen, f32::NAN).is_err());
        assert!(check_finite(Channel::Nitrogen, f32::NEG_INFINITY).is_err());
    }
}
