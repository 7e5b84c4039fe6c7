//! # candlemark - candlestick pattern recognition
//!
//! Scans an ordered OHLC bar series against a fixed catalog of named
//! candlestick patterns and returns one event per bar that matched anything.
//!
//! ## Quick Start
//!
//! ```rust
//! use candlemark::prelude::*;
//!
//! let bars = vec![
//!     Bar::new(1, 101.0, 101.0, 97.0, 98.0),
//!     Bar::new(2, 97.5, 102.0, 97.0, 101.5),
//! ];
//!
//! let events = detect(&bars, DetectionOptions::default()).unwrap();
//! assert_eq!(events[0].index, 1);
//! assert!(events[0].patterns.contains_key(&PatternName::BullishEngulfing));
//! ```
//!
//! ## Categories
//!
//! Every pattern belongs to `common` or `advanced`. Disabling a category in
//! [`DetectionOptions`] removes its detectors from evaluation entirely.

use std::{collections::BTreeMap, fmt, str::FromStr};

use tracing::{debug, trace, warn};

pub mod annotate;
pub mod detectors;

pub mod prelude {
    pub use crate::{
        // Collaborator helpers
        annotate::{describe, display_name, group_by_category, merge_by_time, PatternGroup},
        // Entry point
        detect,
        // Detectors
        detectors::*,
        // Parallel
        scan_parallel,
        // Types
        Bar,
        // Engine
        BuiltinDetector,
        CatalogEntry,
        Category,
        DetectionOptions,
        EngineBuilder,
        EngineConfig,
        OHLCExt,
        PatternDetector,
        PatternEngine,
        // Errors
        PatternError,
        PatternEvent,
        PatternInfo,
        PatternName,
        Result,
        ScanError,
        ScanResult,
        Sentiment,
        CATALOG,
        OHLC,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors that can occur during pattern detection
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: &'static str },

    #[error("Unknown pattern name: {0}")]
    UnknownPattern(String),
}

// ============================================================
// OHLC TRAITS
// ============================================================

/// Core bar data trait
pub trait OHLC {
    fn time(&self) -> i64;
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
}

impl<T: OHLC + ?Sized> OHLC for &T {
    fn time(&self) -> i64 {
        (**self).time()
    }

    fn open(&self) -> f64 {
        (**self).open()
    }

    fn high(&self) -> f64 {
        (**self).high()
    }

    fn low(&self) -> f64 {
        (**self).low()
    }

    fn close(&self) -> f64 {
        (**self).close()
    }
}

/// Extension trait with computed shape properties for bar data
pub trait OHLCExt: OHLC {
    #[inline]
    fn body(&self) -> f64 {
        (self.close() - self.open()).abs()
    }

    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    /// Distance from the top of the body to the high
    #[inline]
    fn upper_shadow(&self) -> f64 {
        self.high() - self.open().max(self.close())
    }

    /// Distance from the bottom of the body to the low
    #[inline]
    fn lower_shadow(&self) -> f64 {
        self.open().min(self.close()) - self.low()
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    #[inline]
    fn is_bearish(&self) -> bool {
        self.close() < self.open()
    }

    /// Body as a fraction of the full range.
    ///
    /// Not guarded: a zero-range bar yields NaN or infinity.
    #[inline]
    fn body_ratio(&self) -> f64 {
        self.body() / self.range()
    }

    /// `body / range < threshold`. False for a zero-range bar.
    #[inline]
    fn is_small_body(&self, threshold: f64) -> bool {
        self.body_ratio() < threshold
    }

    /// Validate bar consistency
    fn validate(&self) -> Result<()> {
        let prices = [self.open(), self.high(), self.low(), self.close()];
        if prices.iter().any(|p| p.is_nan()) {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "NaN in OHLC",
            });
        }
        if prices.iter().any(|p| p.is_infinite()) {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "Infinite value in OHLC",
            });
        }
        if self.high() < self.low() {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "high < low",
            });
        }
        if self.high() == self.low() {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "zero range",
            });
        }
        if self.open().max(self.close()) > self.high() || self.open().min(self.close()) < self.low()
        {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "body outside high-low range",
            });
        }
        Ok(())
    }
}

impl<T: OHLC + ?Sized> OHLCExt for T {}

/// A single OHLC sample
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }
}

impl OHLC for Bar {
    fn time(&self) -> i64 {
        self.time
    }

    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }
}

// ============================================================
// PATTERN METADATA
// ============================================================

/// Selection bucket a pattern belongs to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Common,
    Advanced,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Common => "common",
            Category::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directional bias implied by a pattern
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Bullish => "bullish",
            Sentiment::Bearish => "bearish",
            Sentiment::Neutral => "neutral",
        }
    }

    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Sentiment::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Sentiment::Bearish)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a catalog pattern.
///
/// Variant order is catalog order, so ordered maps keyed by `PatternName`
/// iterate in evaluation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum PatternName {
    Doji,
    Hammer,
    ShootingStar,
    BullishEngulfing,
    BearishEngulfing,
    MorningStar,
    EveningStar,
    ThreeWhiteSoldiers,
    ThreeBlackCrows,
    BullishHarami,
    BearishHarami,
    TweezersTop,
    TweezersBottom,
}

impl PatternName {
    /// All names in catalog order
    pub const ALL: [PatternName; 13] = [
        PatternName::Doji,
        PatternName::Hammer,
        PatternName::ShootingStar,
        PatternName::BullishEngulfing,
        PatternName::BearishEngulfing,
        PatternName::MorningStar,
        PatternName::EveningStar,
        PatternName::ThreeWhiteSoldiers,
        PatternName::ThreeBlackCrows,
        PatternName::BullishHarami,
        PatternName::BearishHarami,
        PatternName::TweezersTop,
        PatternName::TweezersBottom,
    ];

    /// Returns the string identifier
    pub fn as_str(self) -> &'static str {
        match self {
            PatternName::Doji => "doji",
            PatternName::Hammer => "hammer",
            PatternName::ShootingStar => "shootingStar",
            PatternName::BullishEngulfing => "bullishEngulfing",
            PatternName::BearishEngulfing => "bearishEngulfing",
            PatternName::MorningStar => "morningStar",
            PatternName::EveningStar => "eveningStar",
            PatternName::ThreeWhiteSoldiers => "threeWhiteSoldiers",
            PatternName::ThreeBlackCrows => "threeBlackCrows",
            PatternName::BullishHarami => "bullishHarami",
            PatternName::BearishHarami => "bearishHarami",
            PatternName::TweezersTop => "tweezersTop",
            PatternName::TweezersBottom => "tweezersBottom",
        }
    }

    /// Catalog row for this name
    #[inline]
    pub fn entry(self) -> &'static CatalogEntry {
        &CATALOG[self as usize]
    }

    pub fn category(self) -> Category {
        self.entry().category
    }

    pub fn sentiment(self) -> Sentiment {
        self.entry().sentiment
    }

    /// Number of bars the pattern spans (current bar plus lookback)
    pub fn min_bars(self) -> usize {
        self.entry().detector.min_bars()
    }

    pub fn info(self) -> PatternInfo {
        let entry = self.entry();
        PatternInfo {
            category: entry.category,
            sentiment: entry.sentiment,
        }
    }
}

impl fmt::Display for PatternName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternName {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self> {
        PatternName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| PatternError::UnknownPattern(s.to_string()))
    }
}

/// Static metadata attached to a detected pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PatternInfo {
    pub category: Category,
    pub sentiment: Sentiment,
}

/// Patterns found at a single bar
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PatternEvent {
    pub index: usize,
    pub time: i64,
    pub patterns: BTreeMap<PatternName, PatternInfo>,
}

impl PatternEvent {
    /// Pattern names in catalog order
    pub fn names(&self) -> impl Iterator<Item = PatternName> + '_ {
        self.patterns.keys().copied()
    }

    pub fn contains(&self, name: PatternName) -> bool {
        self.patterns.contains_key(&name)
    }
}

// ============================================================
// PATTERN DETECTOR TRAIT
// ============================================================

/// A single named predicate over a bar series.
///
/// `detect` evaluates the pattern ending at `index` and returns false when the
/// required history is not available.
pub trait PatternDetector: Send + Sync {
    fn name(&self) -> PatternName;
    fn min_bars(&self) -> usize;
    fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool;
}

// ============================================================
// BUILTIN DETECTORS - generated via macro
// ============================================================

use detectors::*;

/// Macro to generate BuiltinDetector enum without boilerplate
macro_rules! define_builtin_detectors {
    (
        $(
            $variant:ident($detector:ty)
        ),* $(,)?
    ) => {
        /// All builtin detectors - enum dispatch, no vtable
        #[derive(Debug, Clone, Copy)]
        pub enum BuiltinDetector {
            $($variant($detector)),*
        }

        impl BuiltinDetector {
            #[inline]
            pub fn detect<T: OHLC>(&self, bars: &[T], index: usize) -> bool {
                match self {
                    $(Self::$variant(d) => PatternDetector::detect(d, bars, index)),*
                }
            }

            #[inline]
            pub fn name(&self) -> PatternName {
                match self {
                    $(Self::$variant(d) => PatternDetector::name(d)),*
                }
            }

            #[inline]
            pub fn min_bars(&self) -> usize {
                match self {
                    $(Self::$variant(d) => PatternDetector::min_bars(d)),*
                }
            }
        }
    };
}

define_builtin_detectors! {
    // Single bar
    Doji(DojiDetector),
    Hammer(HammerDetector),
    ShootingStar(ShootingStarDetector),

    // Two bar
    BullishEngulfing(BullishEngulfingDetector),
    BearishEngulfing(BearishEngulfingDetector),
    BullishHarami(BullishHaramiDetector),
    BearishHarami(BearishHaramiDetector),
    TweezersTop(TweezersTopDetector),
    TweezersBottom(TweezersBottomDetector),

    // Three bar
    MorningStar(MorningStarDetector),
    EveningStar(EveningStarDetector),
    ThreeWhiteSoldiers(ThreeWhiteSoldiersDetector),
    ThreeBlackCrows(ThreeBlackCrowsDetector),
}

// ============================================================
// CATALOG
// ============================================================

/// One catalog row: a named predicate with its fixed category and sentiment
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: PatternName,
    pub category: Category,
    pub sentiment: Sentiment,
    pub detector: BuiltinDetector,
}

impl CatalogEntry {
    const fn new(
        name: PatternName,
        category: Category,
        sentiment: Sentiment,
        detector: BuiltinDetector,
    ) -> Self {
        Self {
            name,
            category,
            sentiment,
            detector,
        }
    }
}

/// The fixed pattern catalog, in evaluation order.
///
/// Row position must equal the `PatternName` discriminant.
pub static CATALOG: [CatalogEntry; 13] = {
    use BuiltinDetector as D;
    use Category::*;
    use PatternName as N;
    use Sentiment::*;

    [
        CatalogEntry::new(N::Doji, Common, Neutral, D::Doji(DojiDetector)),
        CatalogEntry::new(N::Hammer, Common, Bullish, D::Hammer(HammerDetector)),
        CatalogEntry::new(N::ShootingStar, Common, Bearish, D::ShootingStar(ShootingStarDetector)),
        CatalogEntry::new(
            N::BullishEngulfing,
            Common,
            Bullish,
            D::BullishEngulfing(BullishEngulfingDetector),
        ),
        CatalogEntry::new(
            N::BearishEngulfing,
            Common,
            Bearish,
            D::BearishEngulfing(BearishEngulfingDetector),
        ),
        CatalogEntry::new(N::MorningStar, Common, Bullish, D::MorningStar(MorningStarDetector)),
        CatalogEntry::new(N::EveningStar, Common, Bearish, D::EveningStar(EveningStarDetector)),
        CatalogEntry::new(
            N::ThreeWhiteSoldiers,
            Advanced,
            Bullish,
            D::ThreeWhiteSoldiers(ThreeWhiteSoldiersDetector),
        ),
        CatalogEntry::new(
            N::ThreeBlackCrows,
            Advanced,
            Bearish,
            D::ThreeBlackCrows(ThreeBlackCrowsDetector),
        ),
        CatalogEntry::new(N::BullishHarami, Advanced, Bullish, D::BullishHarami(BullishHaramiDetector)),
        CatalogEntry::new(N::BearishHarami, Advanced, Bearish, D::BearishHarami(BearishHaramiDetector)),
        CatalogEntry::new(N::TweezersTop, Advanced, Bearish, D::TweezersTop(TweezersTopDetector)),
        CatalogEntry::new(
            N::TweezersBottom,
            Advanced,
            Bullish,
            D::TweezersBottom(TweezersBottomDetector),
        ),
    ]
};

// ============================================================
// PATTERN ENGINE
// ============================================================

/// Which catalog categories are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DetectionOptions {
    pub common: bool,
    pub advanced: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            common: true,
            advanced: true,
        }
    }
}

impl DetectionOptions {
    #[inline]
    pub fn enables(&self, category: Category) -> bool {
        match category {
            Category::Common => self.common,
            Category::Advanced => self.advanced,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub options: DetectionOptions,
    /// Reject malformed bars with [`PatternError::InvalidBar`] before scanning
    pub validate_data: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            options: DetectionOptions::default(),
            validate_data: true,
        }
    }
}

/// Main pattern detection engine. Immutable once built.
#[derive(Debug, Clone)]
pub struct PatternEngine {
    entries: Vec<&'static CatalogEntry>,
    config: EngineConfig,
}

impl Default for PatternEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PatternEngine {
    pub fn new(config: EngineConfig) -> Self {
        let entries = CATALOG
            .iter()
            .filter(|entry| config.options.enables(entry.category))
            .collect();
        Self { entries, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Catalog entries this engine evaluates, in evaluation order
    pub fn catalog(&self) -> impl Iterator<Item = &'static CatalogEntry> + '_ {
        self.entries.iter().copied()
    }

    /// Patterns matching at a single bar index.
    ///
    /// Returns an empty map when nothing matches or `index` is out of range.
    pub fn detect_at<T: OHLC>(&self, bars: &[T], index: usize) -> BTreeMap<PatternName, PatternInfo> {
        let mut patterns = BTreeMap::new();
        if index >= bars.len() {
            return patterns;
        }

        for entry in &self.entries {
            if index + 1 >= entry.detector.min_bars() && entry.detector.detect(bars, index) {
                trace!(index, pattern = %entry.name, "pattern matched");
                patterns.insert(
                    entry.name,
                    PatternInfo {
                        category: entry.category,
                        sentiment: entry.sentiment,
                    },
                );
            }
        }

        patterns
    }

    /// Scan all bars and return one event per bar with at least one match.
    pub fn detect<T: OHLC>(&self, bars: &[T]) -> Result<Vec<PatternEvent>> {
        if self.config.validate_data {
            self.validate_bars(bars)?;
        }

        let events: Vec<PatternEvent> = bars
            .iter()
            .enumerate()
            .filter_map(|(index, bar)| {
                let patterns = self.detect_at(bars, index);
                (!patterns.is_empty()).then(|| PatternEvent {
                    index,
                    time: bar.time(),
                    patterns,
                })
            })
            .collect();

        debug!(
            bars = bars.len(),
            events = events.len(),
            common = self.config.options.common,
            advanced = self.config.options.advanced,
            "pattern scan complete"
        );

        Ok(events)
    }

    fn validate_bars<T: OHLC>(&self, bars: &[T]) -> Result<()> {
        for (i, bar) in bars.iter().enumerate() {
            bar.validate().map_err(|e| {
                let e = match e {
                    PatternError::InvalidBar { reason, .. } => {
                        PatternError::InvalidBar { index: i, reason }
                    }
                    other => other,
                };
                warn!(error = %e, "rejecting bar series");
                e
            })?;
        }
        Ok(())
    }
}

/// Scan `bars` with a default engine restricted to `options`.
pub fn detect<T: OHLC>(bars: &[T], options: DetectionOptions) -> Result<Vec<PatternEvent>> {
    EngineBuilder::new().options(options).build().detect(bars)
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating PatternEngine instances
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable/disable common patterns
    pub fn common(mut self, enable: bool) -> Self {
        self.config.options.common = enable;
        self
    }

    /// Enable/disable advanced patterns
    pub fn advanced(mut self, enable: bool) -> Self {
        self.config.options.advanced = enable;
        self
    }

    /// Replace both category flags
    pub fn options(mut self, options: DetectionOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Enable/disable data validation
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.config.validate_data = enable;
        self
    }

    /// Build the engine
    pub fn build(self) -> PatternEngine {
        PatternEngine::new(self.config)
    }
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

/// Result of scanning a single instrument
#[derive(Debug)]
pub struct ScanResult {
    pub symbol: String,
    pub events: Vec<PatternEvent>,
}

/// Error from scanning a single instrument
#[derive(Debug)]
pub struct ScanError {
    pub symbol: String,
    pub error: PatternError,
}

/// Parallel scanning of multiple instruments
pub fn scan_parallel<'a, T, I>(
    engine: &PatternEngine,
    instruments: I,
) -> (Vec<ScanResult>, Vec<ScanError>)
where
    T: OHLC + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, bars)| {
            engine
                .detect(bars)
                .map(|events| ScanResult {
                    symbol: symbol.to_string(),
                    events,
                })
                .map_err(|error| ScanError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    debug!(
        scanned = successes.len(),
        failed = errors.len(),
        "parallel scan complete"
    );

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================
