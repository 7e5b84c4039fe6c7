//! Single-bar candlestick pattern detectors
//!
//! Patterns: doji, hammer, shootingStar

use super::helpers::{DOJI_BODY_RATIO, LONG_SHADOW_FACTOR, SHORT_SHADOW_FACTOR};
use crate::{OHLCExt, PatternDetector, PatternName, OHLC};

// ============================================================
// DOJI
// ============================================================

/// Doji - open and close nearly equal relative to the bar's range
#[derive(Debug, Clone, Copy, Default)]
pub struct DojiDetector;

impl PatternDetector for DojiDetector {
    fn name(&self) -> PatternName {
        PatternName::Doji
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
        bars.get(index)
            .is_some_and(|bar| bar.is_small_body(DOJI_BODY_RATIO))
    }
}

// ============================================================
// HAMMER FAMILY
// ============================================================

/// Hammer - bullish body sitting on a long lower shadow
#[derive(Debug, Clone, Copy, Default)]
pub struct HammerDetector;

impl PatternDetector for HammerDetector {
    fn name(&self) -> PatternName {
        PatternName::Hammer
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
        let Some(bar) = bars.get(index) else {
            return false;
        };
        if !bar.is_bullish() {
            return false;
        }

        let body = bar.body();
        bar.lower_shadow() > body * LONG_SHADOW_FACTOR
            && bar.upper_shadow() < body * SHORT_SHADOW_FACTOR
    }
}

/// Shooting Star - bearish body hanging under a long upper shadow
#[derive(Debug, Clone, Copy, Default)]
pub struct ShootingStarDetector;

impl PatternDetector for ShootingStarDetector {
    fn name(&self) -> PatternName {
        PatternName::ShootingStar
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
        let Some(bar) = bars.get(index) else {
            return false;
        };
        if !bar.is_bearish() {
            return false;
        }

        let body = bar.body();
        bar.upper_shadow() > body * LONG_SHADOW_FACTOR
            && bar.lower_shadow() < body * SHORT_SHADOW_FACTOR
    }
}
