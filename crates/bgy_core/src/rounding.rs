//! Integer-first rounding helpers. Every derived figure in a report goes through here,
//! so no floating-point value ever reaches a count, mean or share.

use crate::errors::CoreError;

/// `round_half_up(num / den)` on non-negative integers.
///
/// 33/16 → 2, 24/16 → 2 (1.5 rounds up), 40/16 → 3 (2.5 rounds up).
pub fn div_round_half_up(num: u64, den: u64) -> Result<u64, CoreError> {
    if den == 0 {
        return Err(CoreError::InvalidRatio);
    }
    let (n, d) = (u128::from(num), u128::from(den));
    let q = (2 * n + d) / (2 * d);
    u64::try_from(q).map_err(|_| CoreError::InvalidRatio)
}

/// Share `part / whole` in tenths of a percent, rounded half up (125 == 12.5%).
pub fn percent_tenths(part: u64, whole: u64) -> Result<u64, CoreError> {
    if whole == 0 {
        return Err(CoreError::InvalidRatio);
    }
    let scaled = u128::from(part) * 1000;
    let w = u128::from(whole);
    let q = (2 * scaled + w) / (2 * w);
    u64::try_from(q).map_err(|_| CoreError::InvalidRatio)
}

/// Render tenths as a one-decimal string: 125 → "12.5", 0 → "0.0".
pub fn format_tenths(tenths: u64) -> String {
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_rounds_half_up() {
        assert_eq!(div_round_half_up(33, 16), Ok(2));
        assert_eq!(div_round_half_up(24, 16), Ok(2));
        assert_eq!(div_round_half_up(40, 16), Ok(3));
        assert_eq!(div_round_half_up(0, 16), Ok(0));
        assert_eq!(div_round_half_up(7, 2), Ok(4));
    }

    #[test]
    fn zero_denominator_is_an_error() {
        assert_eq!(div_round_half_up(1, 0), Err(CoreError::InvalidRatio));
        assert_eq!(percent_tenths(1, 0), Err(CoreError::InvalidRatio));
    }

    #[test]
    fn no_overflow_near_max() {
        assert_eq!(div_round_half_up(u64::MAX, 1), Ok(u64::MAX));
        assert_eq!(percent_tenths(u64::MAX, u64::MAX), Ok(1000));
    }

    #[test]
    fn shares_in_tenths() {
        assert_eq!(percent_tenths(1, 8), Ok(125));
        assert_eq!(percent_tenths(1, 3), Ok(333));
        assert_eq!(percent_tenths(2, 3), Ok(667));
        assert_eq!(format_tenths(125), "12.5");
        assert_eq!(format_tenths(1000), "100.0");
        assert_eq!(format_tenths(0), "0.0");
    }
}
