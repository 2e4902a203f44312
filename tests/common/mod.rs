//! Common test utilities for packet decoding integration tests
//!
//! Every parser built here uses a clock frozen at 2024-03-15 12:00:00 UTC so
//! that timestamp-carrying packets decode to the same epoch on every run.

#![allow(dead_code)]

use aprs_parser::{AprsParser, DecodedPacket, FixedClock, ParseFailure, ParseOptions};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

pub fn frozen_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

/// Parser with default options and the frozen clock
pub fn parser() -> AprsParser {
    parser_with(ParseOptions::default())
}

pub fn parser_with(options: ParseOptions) -> AprsParser {
    AprsParser::new(options).with_clock(Arc::new(FixedClock(frozen_now())))
}

pub fn decode(line: &str) -> Result<DecodedPacket, ParseFailure> {
    parser().parse(line)
}

pub fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("value should be present");
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}
