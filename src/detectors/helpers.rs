//! Shared thresholds and comparison helpers for the detector families.
//!
//! All thresholds are fixed constants. The doji and small-body thresholds are
//! independent of each other even though both measure body against range.

use crate::OHLC;

// ============================================================
// THRESHOLDS
// ============================================================

/// Body is small: body / range < SMALL_BODY_RATIO (star middle bars)
pub const SMALL_BODY_RATIO: f64 = 0.1;
/// Body is doji-like: body / range < DOJI_BODY_RATIO
pub const DOJI_BODY_RATIO: f64 = 0.05;
/// Hammer / shooting star: dominant shadow must exceed body * LONG_SHADOW_FACTOR
pub const LONG_SHADOW_FACTOR: f64 = 2.0;
/// Hammer / shooting star: opposite shadow must stay under body * SHORT_SHADOW_FACTOR
pub const SHORT_SHADOW_FACTOR: f64 = 0.5;
/// Tweezers: relative difference of the matched extremes must stay under this
pub const TWEEZER_TOLERANCE: f64 = 0.001;

// ============================================================
// HELPER FUNCTIONS
// ============================================================

/// Relative difference of two prices against their mean.
///
/// A zero mean yields NaN, which fails every `<` comparison downstream.
#[inline]
pub fn relative_diff(a: f64, b: f64) -> f64 {
    (a - b).abs() / ((a + b) / 2.0)
}

/// Midpoint of a bar's body.
#[inline]
pub fn body_midpoint<T: OHLC>(bar: &T) -> f64 {
    (bar.open() + bar.close()) / 2.0
}

/// Previous bar at `index - back`, or `None` when the history is too short.
#[inline]
pub fn lookback<T>(bars: &[T], index: usize, back: usize) -> Option<&T> {
    index.checked_sub(back).and_then(|i| bars.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_diff_is_symmetric() {
        assert!((relative_diff(100.0, 100.05) - relative_diff(100.05, 100.0)).abs() < 1e-12);
        assert!(relative_diff(100.0, 100.05) < TWEEZER_TOLERANCE);
        assert!(relative_diff(100.0, 101.0) > TWEEZER_TOLERANCE);
    }

    #[test]
    fn relative_diff_of_zeros_is_nan() {
        assert!(relative_diff(0.0, 0.0).is_nan());
    }

    #[test]
    fn lookback_guards_history() {
        let bars = [1, 2, 3];
        assert_eq!(lookback(&bars, 0, 1), None);
        assert_eq!(lookback(&bars, 2, 2), Some(&1));
        assert_eq!(lookback(&bars, 1, 1), Some(&1));
    }
}
