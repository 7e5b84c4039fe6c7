//! Three-bar candlestick pattern detectors
//!
//! Patterns: morningStar, eveningStar, threeWhiteSoldiers, threeBlackCrows

use super::helpers::{body_midpoint, lookback, SMALL_BODY_RATIO};
use crate::{OHLCExt, PatternDetector, PatternName, OHLC};

/// Fetch `(first, middle, last)` for a three-bar pattern ending at `index`.
#[inline]
fn triple<T>(bars: &[T], index: usize) -> Option<(&T, &T, &T)> {
  Some((lookback(bars, index, 2)?, lookback(bars, index, 1)?, bars.get(index)?))
}

// ============================================================
// STARS
// ============================================================

/// Morning Star - bearish bar, small-bodied pause, bullish recovery past the
/// first bar's body midpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct MorningStarDetector;

impl PatternDetector for MorningStarDetector {
  fn name(&self) -> PatternName {
    PatternName::MorningStar
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
    let Some((first, middle, last)) = triple(bars, index) else {
      return false;
    };

    first.is_bearish()
      && middle.is_small_body(SMALL_BODY_RATIO)
      && last.is_bullish()
      && last.close() > body_midpoint(first)
  }
}

/// Evening Star - mirror of the morning star at a top
#[derive(Debug, Clone, Copy, Default)]
pub struct EveningStarDetector;

impl PatternDetector for EveningStarDetector {
  fn name(&self) -> PatternName {
    PatternName::EveningStar
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
    let Some((first, middle, last)) = triple(bars, index) else {
      return false;
    };

    first.is_bullish()
      && middle.is_small_body(SMALL_BODY_RATIO)
      && last.is_bearish()
      && last.close() < body_midpoint(first)
  }
}

// ============================================================
// THREE WHITE SOLDIERS / THREE BLACK CROWS
// ============================================================

/// Three White Soldiers - three bullish bars with rising opens and closes
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeWhiteSoldiersDetector;

impl PatternDetector for ThreeWhiteSoldiersDetector {
  fn name(&self) -> PatternName {
    PatternName::ThreeWhiteSoldiers
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
    let Some((b1, b2, b3)) = triple(bars, index) else {
      return false;
    };
    if !(b1.is_bullish() && b2.is_bullish() && b3.is_bullish()) {
      return false;
    }

    b3.open() > b2.open() && b2.open() > b1.open() && b3.close() > b2.close() && b2.close() > b1.close()
  }
}

/// Three Black Crows - three bearish bars with falling opens and closes
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeBlackCrowsDetector;

impl PatternDetector for ThreeBlackCrowsDetector {
  fn name(&self) -> PatternName {
    PatternName::ThreeBlackCrows
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
    let Some((b1, b2, b3)) = triple(bars, index) else {
      return false;
    };
    if !(b1.is_bearish() && b2.is_bearish() && b3.is_bearish()) {
      return false;
    }

    b3.open() < b2.open() && b2.open() < b1.open() && b3.close() < b2.close() && b2.close() < b1.close()
  }
}
