//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and convert it to i64, returning `None` for non-finite or
/// out-of-range values.
#[must_use]
pub fn round_f64_to_i64(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    cast::<f64, i64>(value.round())
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Map a unit-interval roll onto `0..span`, saturating at the upper bound.
#[must_use]
pub fn unit_to_offset(roll: f64, span: u64) -> u64 {
    if span == 0 {
        return 0;
    }
    let roll = if roll.is_finite() {
        roll.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let scaled = (roll * cast::<u64, f64>(span).unwrap_or(0.0)).floor();
    cast::<f64, u64>(scaled).unwrap_or(0).min(span - 1)
}

/// Clamp an i64 into the i32 range.
#[must_use]
pub fn saturate_i64_to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_rejects_non_finite() {
        assert_eq!(round_f64_to_i64(1.6), Some(2));
        assert_eq!(round_f64_to_i64(-2.4), Some(-2));
        assert_eq!(round_f64_to_i64(f64::NAN), None);
        assert_eq!(round_f64_to_i64(f64::INFINITY), None);
        assert_eq!(round_f64_to_i64(1e30), None);
    }

    #[test]
    fn unit_offsets_stay_in_span() {
        assert_eq!(unit_to_offset(0.0, 36), 0);
        assert_eq!(unit_to_offset(0.999_999, 36), 35);
        assert_eq!(unit_to_offset(1.0, 36), 35);
        assert_eq!(unit_to_offset(f64::NAN, 10), 0);
        assert_eq!(unit_to_offset(0.5, 0), 0);
    }

    #[test]
    fn saturating_narrowing() {
        assert_eq!(saturate_i64_to_i32(42), 42);
        assert_eq!(saturate_i64_to_i32(i64::MAX), i32::MAX);
        assert_eq!(saturate_i64_to_i32(i64::MIN), i32::MIN);
    }
}
