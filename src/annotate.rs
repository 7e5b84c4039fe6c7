//! Helpers for consumers that decorate a chart with detected patterns.
//!
//! The engine never emits two events for one index, but two bars can carry the
//! same timestamp. [`merge_by_time`] folds such events together so a marker
//! layer keyed by time loses nothing.

use std::collections::HashMap;

use crate::{Category, PatternEvent, PatternInfo, PatternName, Sentiment};

/// Merge events sharing a `time`, unioning their pattern maps.
///
/// The merged event keeps the index of the first event seen for that time.
/// Output order is order of first appearance.
pub fn merge_by_time(events: &[PatternEvent]) -> Vec<PatternEvent> {
    let mut merged: Vec<PatternEvent> = Vec::with_capacity(events.len());
    let mut slots: HashMap<i64, usize> = HashMap::with_capacity(events.len());

    for event in events {
        match slots.get(&event.time) {
            Some(&slot) => {
                merged[slot]
                    .patterns
                    .extend(event.patterns.iter().map(|(name, info)| (*name, *info)));
            }
            None => {
                slots.insert(event.time, merged.len());
                merged.push(event.clone());
            }
        }
    }

    merged
}

/// Patterns of one event sharing a category and sentiment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternGroup {
    pub category: Category,
    pub sentiment: Sentiment,
    pub names: Vec<PatternName>,
}

const CATEGORY_ORDER: [Category; 2] = [Category::Common, Category::Advanced];
const SENTIMENT_ORDER: [Sentiment; 3] = [Sentiment::Bullish, Sentiment::Bearish, Sentiment::Neutral];

/// Bucket an event's patterns by (category, sentiment).
///
/// Buckets come out common before advanced, then bullish, bearish, neutral.
/// Empty buckets are skipped.
pub fn group_by_category(event: &PatternEvent) -> Vec<PatternGroup> {
    let mut groups = Vec::new();

    for category in CATEGORY_ORDER {
        for sentiment in SENTIMENT_ORDER {
            let names: Vec<PatternName> = event
                .patterns
                .iter()
                .filter(|(_, info)| info.category == category && info.sentiment == sentiment)
                .map(|(name, _)| *name)
                .collect();

            if !names.is_empty() {
                groups.push(PatternGroup {
                    category,
                    sentiment,
                    names,
                });
            }
        }
    }

    groups
}

/// Human-readable name: `shootingStar` -> `Shooting Star`
pub fn display_name(name: PatternName) -> String {
    let raw = name.as_str();
    let mut out = String::with_capacity(raw.len() + 4);

    for (i, ch) in raw.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_ascii_uppercase() {
            out.push(' ');
            out.push(ch);
        } else {
            out.push(ch);
        }
    }

    out
}

/// One-line tooltip text: `Shooting Star (bearish, common)`
pub fn describe(name: PatternName, info: &PatternInfo) -> String {
    format!("{} ({}, {})", display_name(name), info.sentiment, info.category)
}
