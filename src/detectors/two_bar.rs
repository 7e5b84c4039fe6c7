//! Two-bar candlestick pattern detectors
//!
//! Patterns: bullishEngulfing, bearishEngulfing, bullishHarami, bearishHarami,
//! tweezersTop, tweezersBottom
//!
//! Engulfing and harami share their boolean conditions pairwise
//! (bullishEngulfing == bearishHarami, bearishEngulfing == bullishHarami).
//! They stay separate detectors in separate categories and may fire together.

use super::helpers::{lookback, relative_diff, TWEEZER_TOLERANCE};
use crate::{OHLCExt, PatternDetector, PatternName, OHLC};

/// Fetch `(previous, current)` for a two-bar pattern ending at `index`.
#[inline]
fn pair<T>(bars: &[T], index: usize) -> Option<(&T, &T)> {
    Some((lookback(bars, index, 1)?, bars.get(index)?))
}

/// Bearish bar followed by a bullish bar opening below the prior close and
/// closing above the prior open.
#[inline]
fn opens_below_closes_above<T: OHLC>(prev: &T, curr: &T) -> bool {
    prev.is_bearish()
        && curr.is_bullish()
        && curr.open() < prev.close()
        && curr.close() > prev.open()
}

/// Bullish bar followed by a bearish bar opening above the prior close and
/// closing below the prior open.
#[inline]
fn opens_above_closes_below<T: OHLC>(prev: &T, curr: &T) -> bool {
    prev.is_bullish()
        && curr.is_bearish()
        && curr.open() > prev.close()
        && curr.close() < prev.open()
}

// ============================================================
// ENGULFING
// ============================================================

/// Bullish Engulfing
#[derive(Debug, Clone, Copy, Default)]
pub struct BullishEngulfingDetector;

impl PatternDetector for BullishEngulfingDetector {
    fn name(&self) -> PatternName {
        PatternName::BullishEngulfing
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
        pair(bars, index).is_some_and(|(prev, curr)| opens_below_closes_above(prev, curr))
    }
}

/// Bearish Engulfing
#[derive(Debug, Clone, Copy, Default)]
pub struct BearishEngulfingDetector;

impl PatternDetector for BearishEngulfingDetector {
    fn name(&self) -> PatternName {
        PatternName::BearishEngulfing
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
        pair(bars, index).is_some_and(|(prev, curr)| opens_above_closes_below(prev, curr))
    }
}

// ============================================================
// HARAMI
// ============================================================

/// Bullish Harami
#[derive(Debug, Clone, Copy, Default)]
pub struct BullishHaramiDetector;

impl PatternDetector for BullishHaramiDetector {
    fn name(&self) -> PatternName {
        PatternName::BullishHarami
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
        let Some((prev, curr)) = pair(bars, index) else {
            return false;
        };

        prev.is_bearish()
            && curr.is_bullish()
            && curr.open() > prev.close()
            && curr.close() < prev.open()
    }
}

/// Bearish Harami
#[derive(Debug, Clone, Copy, Default)]
pub struct BearishHaramiDetector;

impl PatternDetector for BearishHaramiDetector {
    fn name(&self) -> PatternName {
        PatternName::BearishHarami
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
        let Some((prev, curr)) = pair(bars, index) else {
            return false;
        };

        prev.is_bullish()
            && curr.is_bearish()
            && curr.open() < prev.close()
            && curr.close() > prev.open()
    }
}

// ============================================================
// TWEEZERS
// ============================================================

/// Tweezers Top - bullish then bearish bar with matching highs
#[derive(Debug, Clone, Copy, Default)]
pub struct TweezersTopDetector;

impl PatternDetector for TweezersTopDetector {
    fn name(&self) -> PatternName {
        PatternName::TweezersTop
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
        let Some((prev, curr)) = pair(bars, index) else {
            return false;
        };

        prev.is_bullish()
            && curr.is_bearish()
            && relative_diff(curr.high(), prev.high()) < TWEEZER_TOLERANCE
    }
}

/// Tweezers Bottom - bearish then bullish bar with matching lows
#[derive(Debug, Clone, Copy, Default)]
pub struct TweezersBottomDetector;

impl PatternDetector for TweezersBottomDetector {
    fn name(&self) -> PatternName {
        PatternName::TweezersBottom
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
        let Some((prev, curr)) = pair(bars, index) else {
            return false;
        };

        prev.is_bearish()
            && curr.is_bullish()
            && relative_diff(curr.low(), prev.low()) < TWEEZER_TOLERANCE
    }
}
