//! Clip-time codec.
//!
//! Decoding accepts the SMIL clock-value grammar: full clock values
//! (`H+:MM:SS.fff`), partial clock values (`MM:SS.fff`) and timecounts
//! (`12.5`, `12.5s`, `1.2min`, `500ms`, `0.5h`). Encoding always emits the
//! canonical zero-padded `HH:MM:SS.mmm`.

use crate::error::{Result, SmilError};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

static FULL_CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):([0-5]\d):([0-5]\d)(?:\.(\d+))?$").expect("Invalid regex")
});

static PARTIAL_CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-5]?\d):([0-5]\d)(?:\.(\d+))?$").expect("Invalid regex")
});

static TIMECOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+))?(h|min|s|ms)?$").expect("Invalid regex")
});

/// A non-negative offset into an audio clip, with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeCode {
    total_ms: u64,
}

impl TimeCode {
    pub const ZERO: TimeCode = TimeCode { total_ms: 0 };

    pub fn from_millis(total_ms: u64) -> Self {
        Self { total_ms }
    }

    pub fn from_hms(hours: u64, minutes: u64, seconds: u64, milliseconds: u64) -> Self {
        Self::from_millis(((hours * 60 + minutes) * 60 + seconds) * 1000 + milliseconds)
    }

    /// Like [`from_hms`](Self::from_hms), `None` if the total overflows.
    pub fn checked_from_hms(
        hours: u64,
        minutes: u64,
        seconds: u64,
        milliseconds: u64,
    ) -> Option<Self> {
        let total_ms = hours
            .checked_mul(60)?
            .checked_add(minutes)?
            .checked_mul(60)?
            .checked_add(seconds)?
            .checked_mul(1000)?
            .checked_add(milliseconds)?;
        Some(Self::from_millis(total_ms))
    }

    /// Decode a clip-time string in any accepted notation.
    pub fn parse(s: &str) -> Result<Self> {
        parse_clock_value(s).ok_or_else(|| SmilError::MalformedTime(s.to_string()))
    }

    pub fn as_millis(&self) -> u64 {
        self.total_ms
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.total_ms)
    }

    pub fn hours(&self) -> u64 {
        self.total_ms / 3_600_000
    }

    pub fn minutes(&self) -> u64 {
        (self.total_ms / 60_000) % 60
    }

    pub fn seconds(&self) -> u64 {
        (self.total_ms / 1000) % 60
    }

    pub fn milliseconds(&self) -> u64 {
        self.total_ms % 1000
    }

    /// `HH:MM:SS,mmm` as used by SubRip.
    pub fn to_srt(&self) -> String {
        format!(
            "{:02}:{:02}:{:02},{:03}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.milliseconds()
        )
    }
}

/// Canonical `HH:MM:SS.mmm`; this is also the WebVTT timestamp form.
impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.milliseconds()
        )
    }
}

impl std::str::FromStr for TimeCode {
    type Err = SmilError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Duration> for TimeCode {
    fn from(d: Duration) -> Self {
        Self::from_millis(d.as_millis() as u64)
    }
}

impl From<TimeCode> for Duration {
    fn from(tc: TimeCode) -> Self {
        tc.as_duration()
    }
}

fn parse_clock_value(s: &str) -> Option<TimeCode> {
    let t = s.trim();

    if let Some(caps) = FULL_CLOCK.captures(t) {
        let hours: u64 = caps[1].parse().ok()?;
        let minutes: u64 = caps[2].parse().ok()?;
        let seconds: u64 = caps[3].parse().ok()?;
        let millis = scaled_millis("0", caps.get(4).map(|m| m.as_str()), 1000)?;
        return TimeCode::checked_from_hms(hours, minutes, seconds, millis);
    }

    if let Some(caps) = PARTIAL_CLOCK.captures(t) {
        let minutes: u64 = caps[1].parse().ok()?;
        let seconds: u64 = caps[2].parse().ok()?;
        let millis = scaled_millis("0", caps.get(3).map(|m| m.as_str()), 1000)?;
        return TimeCode::checked_from_hms(0, minutes, seconds, millis);
    }

    if let Some(caps) = TIMECOUNT.captures(t) {
        let unit_ms = match caps.get(3).map(|m| m.as_str()) {
            Some("h") => 3_600_000,
            Some("min") => 60_000,
            Some("ms") => 1,
            _ => 1000,
        };
        let total_ms = scaled_millis(&caps[1], caps.get(2).map(|m| m.as_str()), unit_ms)?;
        return Some(TimeCode::from_millis(total_ms));
    }

    None
}

/// `whole.frac` units of `unit_ms` each, in milliseconds.
///
/// Computed in integers; sub-millisecond remainders round half up.
fn scaled_millis(whole: &str, frac: Option<&str>, unit_ms: u64) -> Option<u64> {
    let whole: u64 = whole.parse().ok()?;
    let mut total_ms = whole.checked_mul(unit_ms)?;

    if let Some(frac) = frac {
        // Digits past 18 cannot move the result by a millisecond.
        let digits = &frac[..frac.len().min(18)];
        let numerator = digits.parse::<u128>().ok()? * u128::from(unit_ms);
        let denominator = 10u128.pow(digits.len() as u32);
        let frac_ms = (numerator + denominator / 2) / denominator;
        total_ms = total_ms.checked_add(u64::try_from(frac_ms).ok()?)?;
    }

    Some(total_ms)
}
