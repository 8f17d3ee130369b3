use crate::error::{Error, Result};
use std::fmt::Display;

use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<FixedOffset>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Local::now().into())
    }

    /// The current time, expressed in the given offset.
    pub fn now_in(offset: FixedOffset) -> Self {
        Self(Utc::now().with_timezone(&offset))
    }

    /// Build a timestamp from unix seconds and an offset.
    pub fn from_unix(seconds: i64, offset: FixedOffset) -> Option<Self> {
        offset.timestamp_opt(seconds, 0).single().map(Self)
    }
}

/// Parse a `+HHMM` / `-HHMM` timezone offset.
pub fn parse_offset(s: &str) -> Result<FixedOffset> {
    let invalid = || Error::Usage(format!("invalid timezone offset '{s}', expected +HHMM or -HHMM"));

    let (sign, digits) = match s.as_bytes() {
        [b'+', rest @ ..] => (1, rest),
        [b'-', rest @ ..] => (-1, rest),
        _ => return Err(invalid()),
    };
    if digits.len() != 4 || !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    let value = |range: std::ops::Range<usize>| {
        digits[range]
            .iter()
            .fold(0i32, |acc, d| acc * 10 + i32::from(d - b'0'))
    };
    let (hours, minutes) = (value(0..2), value(2..4));
    if minutes >= 60 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%s %z"))
    }
}
