//! APRS timestamps (`DDHHMMz`, `DDHHMM/`, `HHMMSSh`) and the clock they are
//! anchored to.
//!
//! None of the on-air forms carry a year, and the `h` form has no date at
//! all, so every decode needs the current UTC time. The clock is a trait so
//! tests can pin it.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::error::DecodeError;

/// Source of the current UTC time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A decoded timestamp field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    /// The seven characters as received, e.g. `092345z`
    pub raw: String,
    /// Seconds since the UNIX epoch, 0 when the form is unknown or the date
    /// does not exist
    pub epoch: i64,
}

/// Decode the 7-character timestamp at the start of `body`.
///
/// Returns the timestamp and the rest of the body. A prefix that is not six
/// digits plus a form character is an error; an unknown form character is
/// not, it just yields an epoch of 0.
pub fn decode<'a>(body: &'a str, clock: &dyn Clock) -> Result<(Timestamp, &'a str), DecodeError> {
    let bytes = body.as_bytes();
    if bytes.len() < 7 || !bytes[..6].iter().all(u8::is_ascii_digit) {
        return Err(DecodeError::InvalidTimestamp);
    }

    let form = body[6..].chars().next().ok_or(DecodeError::InvalidTimestamp)?;
    if form == '\n' {
        return Err(DecodeError::InvalidTimestamp);
    }
    let end = 6 + form.len_utf8();

    let digits = &bytes[..6];
    let pair = |i: usize| u32::from(digits[i] - b'0') * 10 + u32::from(digits[i + 1] - b'0');
    let now = clock.now();

    let epoch = match form {
        // hhmmss, zulu
        'h' => at(now.year(), now.month(), now.day(), pair(0), pair(2), pair(4)),
        // ddhhmm, zulu or local; the minute is not carried over
        'z' | '/' => at(now.year(), now.month(), pair(0), pair(2), 0, 0),
        _ => 0,
    };

    let timestamp = Timestamp {
        raw: body[..end].to_string(),
        epoch,
    };

    Ok((timestamp, &body[end..]))
}

/// Decode the `MMDDHHMM` field of a positionless weather report against the
/// current UTC year. Impossible dates yield 0.
pub fn decode_month_day(digits: &str, clock: &dyn Clock) -> i64 {
    let bytes = digits.as_bytes();
    if bytes.len() != 8 || !bytes.iter().all(u8::is_ascii_digit) {
        return 0;
    }
    let pair = |i: usize| u32::from(bytes[i] - b'0') * 10 + u32::from(bytes[i + 1] - b'0');

    at(clock.now().year(), pair(0), pair(2), pair(4), pair(6), 0)
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> i64 {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|naive| Utc.from_utc_datetime(&naive).timestamp())
        .unwrap_or(0)
}
