//! Integration tests for candlemark pattern detection.
//!
//! These tests validate the catalog rules and the public API.

use candlemark::prelude::*;

/// Build a series with one-minute timestamps from (open, high, low, close) rows
fn bars(ohlc: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
    ohlc.iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| Bar::new(1_700_000_000_000 + i as i64 * 60_000, o, h, l, c))
        .collect()
}

fn only_common() -> DetectionOptions {
    DetectionOptions {
        common: true,
        advanced: false,
    }
}

fn only_advanced() -> DetectionOptions {
    DetectionOptions {
        common: false,
        advanced: true,
    }
}

fn event_at(events: &[PatternEvent], index: usize) -> Option<&PatternEvent> {
    events.iter().find(|e| e.index == index)
}

// ============================================================
// SINGLE BAR PATTERN TESTS
// ============================================================

#[test]
fn test_hammer_single_bar() {
    let series = bars(&[(100.0, 101.0, 90.0, 101.0)]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].index, 0);
    assert_eq!(events[0].time, series[0].time);
    assert_eq!(
        events[0].patterns.get(&PatternName::Hammer),
        Some(&PatternInfo {
            category: Category::Common,
            sentiment: Sentiment::Bullish,
        })
    );
}

#[test]
fn test_hammer_rejections() {
    // Bearish, long upper shadow, short lower shadow
    let series = bars(&[
        (101.0, 101.0, 90.0, 100.0),
        (100.0, 110.0, 95.0, 102.0),
        (100.0, 102.0, 98.0, 101.0),
    ]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    assert!(events.iter().all(|e| !e.contains(PatternName::Hammer)));
}

#[test]
fn test_doji_detection() {
    let series = bars(&[(100.0, 105.0, 95.0, 100.2)]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].names().collect::<Vec<_>>(), [PatternName::Doji]);
    assert_eq!(events[0].patterns[&PatternName::Doji].sentiment, Sentiment::Neutral);
}

#[test]
fn test_doji_threshold_is_strict() {
    // body / range = 0.06: small, but not a doji
    let series = bars(&[(100.0, 105.0, 95.0, 100.6)]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    assert!(events.iter().all(|e| !e.contains(PatternName::Doji)));
}

#[test]
fn test_shooting_star_detection() {
    let series = bars(&[(101.0, 110.0, 99.8, 100.0)]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].names().collect::<Vec<_>>(),
        [PatternName::ShootingStar]
    );
    assert!(events[0].patterns[&PatternName::ShootingStar]
        .sentiment
        .is_bearish());
}

// ============================================================
// TWO BAR PATTERN TESTS
// ============================================================

#[test]
fn test_bullish_engulfing_detection() {
    let series = bars(&[(101.0, 101.0, 97.0, 98.0), (97.5, 102.0, 97.0, 101.5)]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    let event = event_at(&events, 1).expect("event at index 1");
    assert_eq!(
        event.patterns[&PatternName::BullishEngulfing].sentiment,
        Sentiment::Bullish
    );
    assert!(event_at(&events, 0).is_none());
}

#[test]
fn test_bearish_engulfing_detection() {
    let series = bars(&[(98.0, 101.5, 97.5, 101.0), (101.5, 102.0, 97.0, 97.5)]);

    let events = detect(&series, only_common()).unwrap();
    let event = event_at(&events, 1).expect("event at index 1");
    assert_eq!(
        event.names().collect::<Vec<_>>(),
        [PatternName::BearishEngulfing]
    );
}

#[test]
fn test_engulfing_twin_harami_is_advanced() {
    // Same boolean shape as bearishEngulfing, reported under the advanced category
    let series = bars(&[(98.0, 101.5, 97.5, 101.0), (101.5, 102.0, 97.0, 97.5)]);

    let events = detect(&series, only_advanced()).unwrap();
    let event = event_at(&events, 1).expect("event at index 1");
    assert_eq!(event.names().collect::<Vec<_>>(), [PatternName::BullishHarami]);
    assert_eq!(
        event.patterns[&PatternName::BullishHarami],
        PatternInfo {
            category: Category::Advanced,
            sentiment: Sentiment::Bullish,
        }
    );

    let both = detect(&series, DetectionOptions::default()).unwrap();
    let event = event_at(&both, 1).expect("event at index 1");
    assert!(event.contains(PatternName::BearishEngulfing));
    assert!(event.contains(PatternName::BullishHarami));
}

#[test]
fn test_tweezers_top_detection() {
    let series = bars(&[(100.0, 105.0, 99.0, 104.0), (104.5, 105.05, 101.0, 102.0)]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    let event = event_at(&events, 1).expect("event at index 1");
    assert_eq!(event.names().collect::<Vec<_>>(), [PatternName::TweezersTop]);
    assert_eq!(event.patterns[&PatternName::TweezersTop].category, Category::Advanced);
}

#[test]
fn test_tweezers_top_tolerance() {
    // Highs 105.0 and 105.2 differ by ~0.19%
    let series = bars(&[(100.0, 105.0, 99.0, 104.0), (104.5, 105.2, 101.0, 102.0)]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    assert!(events.iter().all(|e| !e.contains(PatternName::TweezersTop)));
}

#[test]
fn test_tweezers_bottom_alongside_engulfing() {
    let series = bars(&[(101.0, 101.0, 97.0, 98.0), (97.5, 102.0, 97.0, 101.5)]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    let event = event_at(&events, 1).expect("event at index 1");
    assert_eq!(
        event.names().collect::<Vec<_>>(),
        [
            PatternName::BullishEngulfing,
            PatternName::BearishHarami,
            PatternName::TweezersBottom
        ]
    );
}

// ============================================================
// THREE BAR PATTERN TESTS
// ============================================================

#[test]
fn test_three_white_soldiers_detection() {
    let series = bars(&[
        (100.0, 103.0, 99.0, 102.0),
        (102.0, 105.0, 101.0, 104.0),
        (104.0, 107.0, 103.0, 106.0),
    ]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    let event = event_at(&events, 2).expect("event at index 2");
    assert_eq!(
        event.patterns[&PatternName::ThreeWhiteSoldiers].sentiment,
        Sentiment::Bullish
    );
}

#[test]
fn test_three_white_soldiers_needs_rising_opens() {
    let series = bars(&[
        (100.0, 103.0, 99.0, 102.0),
        (100.0, 105.0, 99.0, 104.0),
        (104.0, 107.0, 103.0, 106.0),
    ]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    assert!(events
        .iter()
        .all(|e| !e.contains(PatternName::ThreeWhiteSoldiers)));
}

#[test]
fn test_three_black_crows_detection() {
    let series = bars(&[
        (110.0, 111.0, 107.0, 108.0),
        (108.0, 109.0, 105.0, 106.0),
        (106.0, 107.0, 103.0, 104.0),
    ]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    let event = event_at(&events, 2).expect("event at index 2");
    assert_eq!(event.names().collect::<Vec<_>>(), [PatternName::ThreeBlackCrows]);

    let common = detect(&series, only_common()).unwrap();
    assert!(common.is_empty());
}

#[test]
fn test_morning_star_detection() {
    let series = bars(&[
        (110.0, 111.0, 99.0, 100.0),
        (98.9, 100.0, 98.0, 99.0),
        (99.5, 107.0, 99.0, 106.0),
    ]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    let event = event_at(&events, 2).expect("event at index 2");
    assert_eq!(event.names().collect::<Vec<_>>(), [PatternName::MorningStar]);
}

#[test]
fn test_morning_star_needs_recovery_past_midpoint() {
    // Last close 104 stays below the first body's midpoint of 105
    let series = bars(&[
        (110.0, 111.0, 99.0, 100.0),
        (98.9, 100.0, 98.0, 99.0),
        (99.5, 105.0, 99.0, 104.0),
    ]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    assert!(events.iter().all(|e| !e.contains(PatternName::MorningStar)));
}

#[test]
fn test_evening_star_detection() {
    let series = bars(&[
        (100.0, 111.0, 99.0, 110.0),
        (111.0, 114.0, 109.0, 111.2),
        (110.5, 111.0, 103.0, 104.0),
    ]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    let event = event_at(&events, 2).expect("event at index 2");
    assert!(event.contains(PatternName::EveningStar));
    assert_eq!(
        event.patterns[&PatternName::EveningStar].sentiment,
        Sentiment::Bearish
    );
}

// ============================================================
// ENGINE BEHAVIOUR
// ============================================================

#[test]
fn test_empty_input() {
    let series: Vec<Bar> = vec![];
    for options in [DetectionOptions::default(), only_common(), only_advanced()] {
        assert!(detect(&series, options).unwrap().is_empty());
    }
}

#[test]
fn test_everything_disabled() {
    let series = bars(&[(100.0, 101.0, 90.0, 101.0)]);
    let options = DetectionOptions {
        common: false,
        advanced: false,
    };
    assert!(detect(&series, options).unwrap().is_empty());
}

#[test]
fn test_result_is_sparse_and_ordered() {
    let series = bars(&[
        (100.0, 101.0, 90.0, 101.0), // hammer
        (100.0, 103.0, 99.0, 102.0), // nothing
        (101.0, 110.0, 99.8, 100.0), // shooting star
    ]);

    let events = detect(&series, DetectionOptions::default()).unwrap();
    let indices: Vec<_> = events.iter().map(|e| e.index).collect();
    assert_eq!(indices, [0, 2]);
    assert_eq!(events[1].time, series[2].time);
}

#[test]
fn test_zero_range_bar_rejected() {
    let series = bars(&[(100.0, 101.0, 90.0, 101.0), (100.0, 100.0, 100.0, 100.0)]);

    let err = detect(&series, DetectionOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        PatternError::InvalidBar {
            index: 1,
            reason: "zero range"
        }
    ));
}

#[test]
fn test_zero_range_bar_lenient() {
    let series = bars(&[(100.0, 101.0, 90.0, 101.0), (100.0, 100.0, 100.0, 100.0)]);

    let engine = EngineBuilder::new().validate_data(false).build();
    let events = engine.detect(&series).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].index, 0);
    assert!(engine.detect_at(&series, 1).is_empty());
}

#[test]
fn test_custom_bar_type() {
    struct Kline {
        open_time: i64,
        o: f64,
        h: f64,
        l: f64,
        c: f64,
    }

    impl OHLC for Kline {
        fn time(&self) -> i64 {
            self.open_time
        }

        fn open(&self) -> f64 {
            self.o
        }

        fn high(&self) -> f64 {
            self.h
        }

        fn low(&self) -> f64 {
            self.l
        }

        fn close(&self) -> f64 {
            self.c
        }
    }

    let klines = [Kline {
        open_time: 42,
        o: 100.0,
        h: 101.0,
        l: 90.0,
        c: 101.0,
    }];

    let events = PatternEngine::default().detect(&klines).unwrap();
    assert_eq!(events[0].time, 42);
    assert!(events[0].contains(PatternName::Hammer));
}

// ============================================================
// SERIALIZATION
// ============================================================

#[test]
fn test_event_json_shape() {
    let series = bars(&[(100.0, 101.0, 90.0, 101.0)]);
    let events = detect(&series, DetectionOptions::default()).unwrap();

    let value = serde_json::to_value(&events).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "index": 0,
            "time": series[0].time,
            "patterns": {
                "hammer": { "category": "common", "sentiment": "bullish" }
            }
        }])
    );
}

#[test]
fn test_options_from_partial_json() {
    let options: DetectionOptions = serde_json::from_str(r#"{"advanced": false}"#).unwrap();
    assert_eq!(options, only_common());

    let options: DetectionOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options, DetectionOptions::default());
}

#[test]
fn test_bar_from_json() {
    let bar: Bar = serde_json::from_str(
        r#"{"time": 1700000000000, "open": 100.0, "high": 101.0, "low": 90.0, "close": 101.0}"#,
    )
    .unwrap();
    assert_eq!(bar, Bar::new(1_700_000_000_000, 100.0, 101.0, 90.0, 101.0));
}

// ============================================================
// COLLABORATOR HELPERS
// ============================================================

#[test]
fn test_merge_by_time_after_detect() {
    // Two distinct bars stamped with the same time
    let mut series = bars(&[
        (100.0, 101.0, 90.0, 101.0),
        (101.0, 101.0, 97.0, 98.0),
        (97.5, 102.0, 97.0, 101.5),
    ]);
    series[2].time = series[0].time;

    // hammer at 0, tweezersTop at 1 (matching highs), engulfing at 2
    let events = detect(&series, DetectionOptions::default()).unwrap();
    assert_eq!(events.len(), 3);

    let merged = merge_by_time(&events);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].index, 0);
    assert_eq!(merged[1].names().collect::<Vec<_>>(), [PatternName::TweezersTop]);
    assert!(merged[0].contains(PatternName::Hammer));
    assert!(merged[0].contains(PatternName::BullishEngulfing));
    assert!(merged[0].contains(PatternName::TweezersBottom));
}

#[test]
fn test_tooltip_lines() {
    let series = bars(&[(101.0, 101.0, 97.0, 98.0), (97.5, 102.0, 97.0, 101.5)]);
    let events = detect(&series, DetectionOptions::default()).unwrap();

    let lines: Vec<String> = events[0]
        .patterns
        .iter()
        .map(|(name, info)| describe(*name, info))
        .collect();
    assert_eq!(
        lines,
        [
            "Bullish Engulfing (bullish, common)",
            "Bearish Harami (bearish, advanced)",
            "Tweezers Bottom (bullish, advanced)",
        ]
    );
}
