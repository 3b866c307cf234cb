use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::error::TitlerError;

/// A span of time with millisecond precision.
///
/// Subtitle timecodes are millisecond-accurate and GIF delays are whole
/// centiseconds, so integer milliseconds represent both without rounding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Duration {
    millis: u64,
}

impl Duration {
    pub const ZERO: Duration = Duration { millis: 0 };

    /// Create a duration from milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self { millis: ms }
    }

    /// Create a duration from whole seconds.
    pub const fn from_secs(s: u64) -> Self {
        Self { millis: s * 1000 }
    }

    /// Create a duration from centiseconds (the GIF frame delay unit).
    pub const fn from_centis(cs: u64) -> Self {
        Self { millis: cs * 10 }
    }

    /// Get duration as milliseconds.
    pub const fn as_millis(&self) -> u64 {
        self.millis
    }
}

impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration::from_millis(self.millis.saturating_add(rhs.millis))
    }
}

/// Parses either a unit-suffixed duration (`1m30s`, `1500ms`, `1.5s`, `2h`,
/// `250us`, bare `0`) or a SubRip timecode (`00:01:30,000`). A leading `+`
/// is allowed; negative durations are rejected. Sub-millisecond parts are
/// rounded to the nearest millisecond.
impl FromStr for Duration {
    type Err = TitlerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('-') {
            return Err(TitlerError::InvalidArgument(format!(
                "negative duration '{}' is not supported",
                s
            )));
        }
        let s = s.strip_prefix('+').unwrap_or(s);
        if s == "0" {
            return Ok(Duration::ZERO);
        }
        if s.contains(':') {
            return Timestamp::from_timecode(s)
                .map(|ts| Duration::from_millis(ts.as_millis()))
                .ok_or_else(|| {
                    TitlerError::InvalidArgument(format!("invalid timecode '{}'", s))
                });
        }
        parse_unit_duration(s)
            .ok_or_else(|| TitlerError::InvalidArgument(format!("invalid duration '{}'", s)))
    }
}

fn parse_unit_duration(s: &str) -> Option<Duration> {
    if s.is_empty() {
        return None;
    }
    let mut total = 0.0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_len == 0 {
            return None;
        }
        let value: f64 = rest[..num_len].parse().ok()?;
        rest = &rest[num_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "h" => 3_600_000.0,
            "m" => 60_000.0,
            "s" => 1_000.0,
            "ms" => 1.0,
            "us" | "µs" | "μs" => 0.001,
            "ns" => 0.000_001,
            _ => return None,
        };
        rest = &rest[unit_len..];
        total += value * scale;
    }
    Some(Duration::from_millis(total.round() as u64))
}

/// A point on the caption timeline, in milliseconds from the start of the
/// subtitle file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Timestamp {
    millis: u64,
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp { millis: 0 };

    pub const fn from_millis(ms: u64) -> Self {
        Self { millis: ms }
    }

    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Parse a SubRip timecode: `HH:MM:SS,mmm` (a `.` before the
    /// milliseconds is tolerated).
    pub fn from_timecode(s: &str) -> Option<Self> {
        let (hms, ms) = s.trim().split_once([',', '.'])?;
        let mut parts = hms.split(':');
        let hours = parse_digits(parts.next()?, 1..=3)?;
        let minutes = parse_digits(parts.next()?, 2..=2)?;
        let seconds = parse_digits(parts.next()?, 2..=2)?;
        if parts.next().is_some() || minutes > 59 || seconds > 59 {
            return None;
        }
        let millis = parse_digits(ms, 3..=3)?;
        Some(Self::from_millis(
            hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis,
        ))
    }
}

fn parse_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<u64> {
    if !len.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl From<Duration> for Timestamp {
    fn from(d: Duration) -> Self {
        Timestamp::from_millis(d.as_millis())
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;
    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp::from_millis(self.millis.saturating_add(rhs.as_millis()))
    }
}

impl AddAssign<Duration> for Timestamp {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_ms = self.millis;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let ms = total_ms % 1_000;
        write!(f, "{:02}:{:02}:{:02},{:03}", hours, minutes, secs, ms)
    }
}
