//! Candlestick pattern detectors
//!
//! # Pattern Families
//!
//! - **Single-bar (3)**: Doji, Hammer, Shooting Star
//! - **Two-bar (6)**: Engulfing, Harami, Tweezers (bullish and bearish each)
//! - **Three-bar (4)**: Morning/Evening Star, Three White Soldiers, Three Black Crows

pub mod helpers;
pub mod single_bar;
pub mod three_bar;
pub mod two_bar;

// Re-export all detectors for convenience
pub use helpers::*;
pub use single_bar::*;
pub use three_bar::*;
pub use two_bar::*;
