//! Timestamp arithmetic for LRC time tags.
//!
//! Two textual forms are used: the short `MM:SS.ff` form found inside lyric
//! files (minutes may exceed 59) and the normalized `HH:MM:SS.ff` form used
//! while applying offsets.

use std::fmt;
use std::str::FromStr;

use crate::error::{LrcShiftError, Result};

const CENTIS_PER_MINUTE: f64 = 6_000.0;
const CENTIS_PER_HOUR: f64 = 360_000.0;

/// `MM:SS.ff` timestamp as written in LRC files
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortTimestamp {
    pub minutes: i64,
    pub seconds: f64,
}

/// `HH:MM:SS.ff` timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HmsTimestamp {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: f64,
}

impl ShortTimestamp {
    pub fn new(minutes: i64, seconds: f64) -> Self {
        Self { minutes, seconds }
    }

    /// Split the minute count into hours and minutes, seconds unchanged
    pub fn to_normalized(&self) -> HmsTimestamp {
        HmsTimestamp {
            hours: self.minutes / 60,
            minutes: self.minutes % 60,
            seconds: self.seconds,
        }
    }
}

impl HmsTimestamp {
    pub const ZERO: HmsTimestamp = HmsTimestamp {
        hours: 0,
        minutes: 0,
        seconds: 0.0,
    };

    pub fn new(hours: i64, minutes: i64, seconds: f64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Fold hours back into the minute count
    pub fn to_short(&self) -> ShortTimestamp {
        ShortTimestamp {
            minutes: self.hours.saturating_mul(60).saturating_add(self.minutes),
            seconds: self.seconds,
        }
    }

    pub fn total_seconds(&self) -> f64 {
        self.hours as f64 * 3600.0 + self.minutes as f64 * 60.0 + self.seconds
    }

    /// Shift by a signed number of seconds.
    ///
    /// The result is rounded to hundredths. Hours use floor division while
    /// minutes and seconds are taken from truncating remainders, so a
    /// negative total yields negative fields instead of being clamped.
    /// The arithmetic stays in floating point so oversized minute fields
    /// lose precision rather than overflow.
    pub fn apply_offset(&self, offset_seconds: f64) -> HmsTimestamp {
        let total = self.total_seconds() + offset_seconds;
        let centis = (total * 100.0).round();

        let hours = centis.div_euclid(CENTIS_PER_HOUR) as i64;
        let minutes = (centis % CENTIS_PER_HOUR).div_euclid(CENTIS_PER_MINUTE) as i64;
        // `+ 0.0` turns a negative zero remainder into 0.0
        let seconds = (centis % CENTIS_PER_MINUTE) / 100.0 + 0.0;

        HmsTimestamp {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.hours < 0 || self.minutes < 0 || self.seconds < 0.0
    }
}

fn parse_whole(field: &str, raw: &str) -> Result<i64> {
    let field = field.trim();
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LrcShiftError::InvalidTimestamp(raw.to_string()));
    }
    field
        .parse()
        .map_err(|_| LrcShiftError::InvalidTimestamp(raw.to_string()))
}

fn parse_seconds(field: &str, raw: &str) -> Result<f64> {
    let field = field.trim();
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(LrcShiftError::InvalidTimestamp(raw.to_string()));
    }
    field
        .parse()
        .map_err(|_| LrcShiftError::InvalidTimestamp(raw.to_string()))
}

impl FromStr for ShortTimestamp {
    type Err = LrcShiftError;

    fn from_str(s: &str) -> Result<Self> {
        let (minutes, seconds) = s
            .split_once(':')
            .ok_or_else(|| LrcShiftError::InvalidTimestamp(s.to_string()))?;

        Ok(Self {
            minutes: parse_whole(minutes, s)?,
            seconds: parse_seconds(seconds, s)?,
        })
    }
}

impl FromStr for HmsTimestamp {
    type Err = LrcShiftError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let [hours, minutes, seconds] = parts.as_slice() else {
            return Err(LrcShiftError::InvalidTimestamp(s.to_string()));
        };

        Ok(Self {
            hours: parse_whole(hours, s)?,
            minutes: parse_whole(minutes, s)?,
            seconds: parse_seconds(seconds, s)?,
        })
    }
}

impl fmt::Display for ShortTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:05.2}", self.minutes, self.seconds)
    }
}

impl fmt::Display for HmsTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:05.2}", self.hours, self.minutes, self.seconds)
    }
}

/// `MM:SS.ff` -> `HH:MM:SS.ff`
pub fn to_normalized(short: &str) -> Result<String> {
    Ok(short.parse::<ShortTimestamp>()?.to_normalized().to_string())
}

/// `HH:MM:SS.ff` -> `MM:SS.ff`
pub fn to_short(normalized: &str) -> Result<String> {
    Ok(normalized.parse::<HmsTimestamp>()?.to_short().to_string())
}

/// Shift a normalized timestamp string by `offset_seconds`
pub fn apply_offset(normalized: &str, offset_seconds: f64) -> Result<String> {
    Ok(normalized
        .parse::<HmsTimestamp>()?
        .apply_offset(offset_seconds)
        .to_string())
}
