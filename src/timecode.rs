/*!
 * Millisecond time codes used by SubRip time stamp lines.
 *
 * Parsing is deliberately lenient: only the layout of the separators is
 * checked, numeric fields go through [`parse_or_zero`]. A malformed field
 * such as `0x:12:03,000` silently becomes zero, which may hide corrupted
 * timings in the input.
 */

use std::fmt;
use std::str::FromStr;

use crate::errors::TimeCodeError;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// A timestamp in whole milliseconds since zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeCode(u32);

impl TimeCode {
    /// Zero timestamp
    pub const ZERO: TimeCode = TimeCode(0);

    /// Create a time code from a raw millisecond count
    pub const fn from_millis(ms: u32) -> Self {
        TimeCode(ms)
    }

    /// Create a time code from its components, saturating at `u32::MAX`
    pub fn from_parts(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Self {
        let total = hours
            .saturating_mul(60)
            .saturating_add(minutes)
            .saturating_mul(60)
            .saturating_add(seconds)
            .saturating_mul(MS_PER_SECOND)
            .saturating_add(millis);
        TimeCode(u32::try_from(total).unwrap_or(u32::MAX))
    }

    /// Raw millisecond count
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Parse `H+:MM:SS,mmm`.
    ///
    /// The first two `:` found anywhere in the text delimit hours, minutes and
    /// seconds, the first `,` after them delimits milliseconds. Fields may have
    /// any width. Fails only when that `,` is missing.
    pub fn parse(text: &str) -> Result<Self, TimeCodeError> {
        let mut first_colon = None;
        let mut second_colon = None;
        let mut comma = None;

        for (i, byte) in text.bytes().enumerate() {
            match (first_colon, second_colon) {
                (None, _) if byte == b':' => first_colon = Some(i),
                (Some(_), None) if byte == b':' => second_colon = Some(i),
                (Some(_), Some(_)) if byte == b',' => {
                    comma = Some(i);
                    break;
                }
                _ => {}
            }
        }

        let (Some(c1), Some(c2), Some(comma)) = (first_colon, second_colon, comma) else {
            return Err(TimeCodeError::MissingMillisSeparator(text.to_string()));
        };

        let hours = parse_or_zero(&text[..c1]);
        let minutes = parse_or_zero(&text[c1 + 1..c2]);
        let seconds = parse_or_zero(&text[c2 + 1..comma]);
        let millis = parse_or_zero(&text[comma + 1..]);

        Ok(Self::from_parts(hours, minutes, seconds, millis))
    }

    /// Hours component (not capped at 99)
    pub fn hours(self) -> u64 {
        u64::from(self.0) / MS_PER_HOUR
    }

    /// Minutes within the hour
    pub fn minutes(self) -> u64 {
        (u64::from(self.0) % MS_PER_HOUR) / MS_PER_MINUTE
    }

    /// Seconds within the minute
    pub fn seconds(self) -> u64 {
        (u64::from(self.0) % MS_PER_MINUTE) / MS_PER_SECOND
    }

    /// Milliseconds within the second
    pub fn millis(self) -> u64 {
        u64::from(self.0) % MS_PER_SECOND
    }
}

/// Best-effort base-10 parse.
///
/// Skips leading whitespace and an optional `+`, then reads digits up to the
/// first non-digit. Empty or non-numeric input yields zero, overflow saturates.
pub fn parse_or_zero(text: &str) -> u64 {
    let trimmed = text.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);

    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit - b'0'))
        })
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.millis()
        )
    }
}

impl FromStr for TimeCode {
    type Err = TimeCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u32> for TimeCode {
    fn from(ms: u32) -> Self {
        TimeCode(ms)
    }
}
