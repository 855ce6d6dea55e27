//! Raw position to percentage mapping
//!
//! Pure integer arithmetic with truncating division, so the mapped value of a
//! raw count is the same on every target.

use crate::calibration::CalibrationRecord;
use crate::params::encoder::REFERENCE_MAX;

/// Output range of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// 0..=100 (throttle, brake)
    Unipolar,
    /// -100..=100 split at the calibrated center (steering)
    Bipolar,
}

impl Polarity {
    /// Nominal output bounds (low, high)
    pub const fn bounds(self) -> (i32, i32) {
        match self {
            Polarity::Unipolar => (0, 100),
            Polarity::Bipolar => (-100, 100),
        }
    }

    /// Record used when nothing valid is stored
    pub const fn default_record(self) -> CalibrationRecord {
        match self {
            Polarity::Unipolar => CalibrationRecord::new(0, REFERENCE_MAX, 0),
            Polarity::Bipolar => CalibrationRecord::new(0, REFERENCE_MAX, REFERENCE_MAX / 2),
        }
    }

    /// Clamp a percentage into the nominal bounds
    #[inline]
    pub fn clamp(self, value: i32) -> i32 {
        let (low, high) = self.bounds();
        value.clamp(low, high)
    }
}

/// Map a raw position through a calibration record
///
/// * invalid record (marker mismatch) -> 0
/// * raw is clamped into `[min, max]` first
/// * unipolar: `[min, max]` -> `[0, 100]`
/// * bipolar: `[min, center]` -> `[-100, 0]`, `[center, max]` -> `[0, 100]`;
///   a zero-width half maps to 0
///
/// The result is clamped to the polarity bounds once more.
pub fn map_to_percent(raw: i32, record: &CalibrationRecord, polarity: Polarity) -> i32 {
    if !record.is_valid() {
        return 0;
    }

    // clamp() panics on min > max; only a hand-built record can get here
    if record.min > record.max {
        return 0;
    }

    let clamped = raw.clamp(record.min, record.max);

    let value = match polarity {
        Polarity::Unipolar => {
            if record.max == record.min {
                0
            } else {
                interpolate(clamped, record.min, record.max, 0, 100)
            }
        }
        Polarity::Bipolar => {
            let center = record.center;
            if clamped < center {
                if center == record.min {
                    0
                } else {
                    interpolate(clamped, record.min, center, -100, 0)
                }
            } else if record.max == center {
                0
            } else {
                interpolate(clamped, center, record.max, 0, 100)
            }
        }
    };

    polarity.clamp(value)
}

/// Linear re-scale `[in_min, in_max]` -> `[out_min, out_max]`, truncating
///
/// Widened to i64 so full-range i32 spans cannot overflow. `in_min != in_max`.
#[inline]
fn interpolate(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    let num = (x as i64 - in_min as i64) * (out_max as i64 - out_min as i64);
    let den = in_max as i64 - in_min as i64;
    (num / den + out_min as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_record_maps_to_zero() {
        let record = CalibrationRecord::unset();
        for raw in [i32::MIN, -600, -1, 0, 1, 300, 600, 1000, i32::MAX] {
            assert_eq!(map_to_percent(raw, &record, Polarity::Unipolar), 0);
            assert_eq!(map_to_percent(raw, &record, Polarity::Bipolar), 0);
        }
    }

    #[test]
    fn test_unipolar_scenario() {
        let record = CalibrationRecord::new(0, 600, 0);
        assert_eq!(map_to_percent(0, &record, Polarity::Unipolar), 0);
        assert_eq!(map_to_percent(300, &record, Polarity::Unipolar), 50);
        assert_eq!(map_to_percent(600, &record, Polarity::Unipolar), 100);
        assert_eq!(map_to_percent(700, &record, Polarity::Unipolar), 100);
        assert_eq!(map_to_percent(-50, &record, Polarity::Unipolar), 0);
    }

    #[test]
    fn test_bipolar_scenario() {
        let record = CalibrationRecord::new(0, 600, 300);
        assert_eq!(map_to_percent(0, &record, Polarity::Bipolar), -100);
        assert_eq!(map_to_percent(300, &record, Polarity::Bipolar), 0);
        assert_eq!(map_to_percent(600, &record, Polarity::Bipolar), 100);
        assert_eq!(map_to_percent(150, &record, Polarity::Bipolar), -50);
        assert_eq!(map_to_percent(450, &record, Polarity::Bipolar), 50);
        assert_eq!(map_to_percent(-900, &record, Polarity::Bipolar), -100);
        assert_eq!(map_to_percent(900, &record, Polarity::Bipolar), 100);
    }

    #[test]
    fn test_unipolar_endpoints_and_monotonic() {
        for (min, max) in [(0, 600), (-250, 50), (17, 18), (-1_000_000, 1_000_000)] {
            let record = CalibrationRecord::new(min, max, 0);
            assert_eq!(map_to_percent(min, &record, Polarity::Unipolar), 0);
            assert_eq!(map_to_percent(max, &record, Polarity::Unipolar), 100);

            let step = ((max - min) / 97).max(1);
            let mut prev = i32::MIN;
            let mut raw = min - 3 * step;
            while raw <= max + 3 * step {
                let value = map_to_percent(raw, &record, Polarity::Unipolar);
                assert!(value >= prev, "not monotonic at raw={}", raw);
                assert!((0..=100).contains(&value));
                prev = value;
                raw += step;
            }
        }
    }

    #[test]
    fn test_bipolar_endpoints_and_monotonic() {
        for (min, max, center) in [(0, 600, 300), (-400, 200, -50), (10, 20, 11)] {
            let record = CalibrationRecord::new(min, max, center);
            assert_eq!(map_to_percent(min, &record, Polarity::Bipolar), -100);
            assert_eq!(map_to_percent(center, &record, Polarity::Bipolar), 0);
            assert_eq!(map_to_percent(max, &record, Polarity::Bipolar), 100);

            let mut prev = i32::MIN;
            for raw in (min - 20)..=(max + 20) {
                let value = map_to_percent(raw, &record, Polarity::Bipolar);
                assert!(value >= prev, "not monotonic at raw={}", raw);
                assert!((-100..=100).contains(&value));
                prev = value;
            }
        }
    }

    #[test]
    fn test_bipolar_center_at_min() {
        let record = CalibrationRecord::new(0, 600, 0);
        // Left half has zero width; raw never goes below center after clamping
        assert_eq!(map_to_percent(-10, &record, Polarity::Bipolar), 0);
        assert_eq!(map_to_percent(0, &record, Polarity::Bipolar), 0);
        assert_eq!(map_to_percent(300, &record, Polarity::Bipolar), 50);
        assert_eq!(map_to_percent(600, &record, Polarity::Bipolar), 100);
    }

    #[test]
    fn test_bipolar_center_at_max() {
        let record = CalibrationRecord::new(0, 600, 600);
        assert_eq!(map_to_percent(0, &record, Polarity::Bipolar), -100);
        assert_eq!(map_to_percent(300, &record, Polarity::Bipolar), -50);
        // Right half has zero width
        assert_eq!(map_to_percent(600, &record, Polarity::Bipolar), 0);
        assert_eq!(map_to_percent(900, &record, Polarity::Bipolar), 0);
    }

    #[test]
    fn test_full_span_does_not_overflow() {
        let record = CalibrationRecord::new(i32::MIN, i32::MAX, 0);
        assert_eq!(map_to_percent(i32::MIN, &record, Polarity::Unipolar), 0);
        assert_eq!(map_to_percent(i32::MAX, &record, Polarity::Unipolar), 100);
        assert_eq!(map_to_percent(i32::MIN, &record, Polarity::Bipolar), -100);
        assert_eq!(map_to_percent(0, &record, Polarity::Bipolar), 0);
        assert_eq!(map_to_percent(i32::MAX, &record, Polarity::Bipolar), 100);
    }

    #[test]
    fn test_default_records() {
        let unipolar = Polarity::Unipolar.default_record();
        assert_eq!((unipolar.min, unipolar.max, unipolar.center), (0, 600, 0));
        assert!(unipolar.verify().is_ok());

        let bipolar = Polarity::Bipolar.default_record();
        assert_eq!((bipolar.min, bipolar.max, bipolar.center), (0, 600, 300));
        assert!(bipolar.verify().is_ok());
    }

    #[test]
    fn test_polarity_clamp() {
        assert_eq!(Polarity::Unipolar.clamp(-5), 0);
        assert_eq!(Polarity::Unipolar.clamp(105), 100);
        assert_eq!(Polarity::Bipolar.clamp(-105), -100);
        assert_eq!(Polarity::Bipolar.clamp(42), 42);
    }
}
