//! Line-by-line timestamp shifting for LRC text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::warn;

use crate::error::{LrcShiftError, Result};
use crate::timestamp::{HmsTimestamp, ShortTimestamp};

/// Timestamp tag at the very start of a line
static LEADING_TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([0-9]+:[0-9]{1,2}(?:\.[0-9]+)?)\]").expect("valid leading timestamp pattern")
});

/// Timestamp tag anywhere in the text
static ANY_TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[[0-9]+:[0-9]{1,2}(?:\.[0-9]+)?\]").expect("valid timestamp pattern")
});

/// Requested time shift
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Offset {
    /// No offset requested; text passes through untouched
    Unset,
    Seconds(f64),
}

impl Offset {
    /// Parse a command-line offset.
    ///
    /// A missing value or the literal `0` means no shift at all. Values that
    /// are not numbers become a zero shift unless `strict` is set, in which
    /// case they are rejected.
    pub fn parse(raw: Option<&str>, strict: bool) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Offset::Unset);
        };
        if raw == "0" {
            return Ok(Offset::Unset);
        }

        match raw.trim().parse::<f64>() {
            Ok(seconds) if seconds.is_finite() => Ok(Offset::Seconds(seconds)),
            _ if strict => Err(LrcShiftError::InvalidOffset(raw.to_string())),
            _ => {
                warn!("Offset '{}' is not a number, treating it as 0", raw);
                Ok(Offset::Seconds(0.0))
            }
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Offset::Unset)
    }

    pub fn seconds(&self) -> f64 {
        match self {
            Offset::Unset => 0.0,
            Offset::Seconds(s) => *s,
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.seconds())
    }
}

/// Shift a single `MM:SS.ff` token; results before zero render as `00:00.00`
pub fn shift_token(token: &str, offset_seconds: f64) -> Result<String> {
    let shifted = token
        .parse::<ShortTimestamp>()?
        .to_normalized()
        .apply_offset(offset_seconds);

    let shifted = if shifted.is_negative() {
        HmsTimestamp::ZERO
    } else {
        shifted
    };

    Ok(shifted.to_short().to_string())
}

fn shift_line(line: &str, offset_seconds: f64) -> Result<String> {
    let Some(caps) = LEADING_TIMESTAMP.captures(line) else {
        return Ok(line.to_string());
    };

    let tag_end = caps.get(0).map_or(0, |m| m.end());
    let shifted = shift_token(&caps[1], offset_seconds)?;

    Ok(format!("[{}]{}", shifted, &line[tag_end..]))
}

/// Rewrite the leading timestamp of every line by `offset`.
///
/// Lines are split on `\n` and joined back the same way, so the line
/// terminator layout (including a missing final newline) is preserved.
pub fn apply_offset(text: &str, offset: Offset) -> Result<String> {
    if offset.is_unset() {
        return Ok(text.to_string());
    }

    let seconds = offset.seconds();
    let lines = text
        .split('\n')
        .map(|line| shift_line(line, seconds))
        .collect::<Result<Vec<_>>>()?;

    Ok(lines.join("\n"))
}

/// First and last timestamp tags of a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampRange {
    pub first: String,
    pub last: String,
}

impl TimestampRange {
    pub fn of(text: &str) -> Option<Self> {
        let mut tags = ANY_TIMESTAMP.find_iter(text);
        let first = tags.next()?;
        let last = tags.last().unwrap_or(first);

        Some(Self {
            first: first.as_str().to_string(),
            last: last.as_str().to_string(),
        })
    }
}

/// Before/after view of a shift
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftSummary {
    pub offset: Offset,
    pub before: Option<TimestampRange>,
    pub after: Option<TimestampRange>,
}

impl ShiftSummary {
    pub fn new(original: &str, shifted: &str, offset: Offset) -> Self {
        Self {
            offset,
            before: TimestampRange::of(original),
            after: TimestampRange::of(shifted),
        }
    }

    pub fn has_timestamps(&self) -> bool {
        self.before.is_some() && self.after.is_some()
    }
}

impl fmt::Display for ShiftSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.before, &self.after) {
            (Some(before), Some(after)) => write!(
                f,
                "{} {}\n -> {} \n{} {}",
                before.first, before.last, self.offset, after.first, after.last
            ),
            _ => write!(f, "no timestamps present (offset {})", self.offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_forward() {
        let out = apply_offset("[01:12.05]Hello", Offset::Seconds(2.0)).unwrap();
        assert_eq!(out, "[01:14.05]Hello");
    }

    #[test]
    fn test_shift_backward_across_minute() {
        let out = apply_offset("[01:12.05]Hello", Offset::Seconds(-15.0)).unwrap();
        assert_eq!(out, "[00:57.05]Hello");
    }

    #[test]
    fn test_shift_across_hour_keeps_short_form() {
        let out = apply_offset("[59:58.00]late", Offset::Seconds(3.5)).unwrap();
        assert_eq!(out, "[60:01.50]late");
    }

    #[test]
    fn test_result_before_zero_renders_as_zero() {
        let out = apply_offset("[00:03.00]intro", Offset::Seconds(-10.0)).unwrap();
        assert_eq!(out, "[00:00.00]intro");
    }

    #[test]
    fn test_oversized_minute_field_is_shifted_without_overflow() {
        let out = apply_offset("[200000000000000000:00.00]x", Offset::Seconds(1.0)).unwrap();
        assert!(out.starts_with('['));
        assert!(out.ends_with("]x"));

        let too_long = format!("[{}:00.00]x", "9".repeat(30));
        assert!(matches!(
            apply_offset(&too_long, Offset::Seconds(1.0)),
            Err(LrcShiftError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_unset_offset_passes_text_through() {
        let text = "[1:2.5]odd format\r\n[ti:Title]";
        assert_eq!(apply_offset(text, Offset::Unset).unwrap(), text);
    }

    #[test]
    fn test_zero_seconds_normalizes_tokens() {
        let out = apply_offset("[1:2.5]odd format", Offset::Seconds(0.0)).unwrap();
        assert_eq!(out, "[01:02.50]odd format");
    }

    #[test]
    fn test_only_leading_tags_change() {
        let text = "[ti:Some Title]\n[ar:Artist]\n\nplain line [00:05.00]\n[00:10.00]first\r\n[00:12.30][00:40.00]chorus\n";
        let out = apply_offset(text, Offset::Seconds(1.0)).unwrap();
        assert_eq!(
            out,
            "[ti:Some Title]\n[ar:Artist]\n\nplain line [00:05.00]\n[00:11.00]first\r\n[00:13.30][00:40.00]chorus\n"
        );
    }

    #[test]
    fn test_trailing_newline_is_preserved() {
        assert_eq!(apply_offset("[00:01.00]a", Offset::Seconds(1.0)).unwrap(), "[00:02.00]a");
        assert_eq!(apply_offset("[00:01.00]a\n", Offset::Seconds(1.0)).unwrap(), "[00:02.00]a\n");
    }

    #[test]
    fn test_offset_parse() {
        assert_eq!(Offset::parse(None, false).unwrap(), Offset::Unset);
        assert_eq!(Offset::parse(Some("0"), false).unwrap(), Offset::Unset);
        assert_eq!(Offset::parse(Some("0.0"), false).unwrap(), Offset::Seconds(0.0));
        assert_eq!(Offset::parse(Some("-2.14"), false).unwrap(), Offset::Seconds(-2.14));
        assert_eq!(Offset::parse(Some("soon"), false).unwrap(), Offset::Seconds(0.0));
        assert!(matches!(
            Offset::parse(Some("soon"), true),
            Err(LrcShiftError::InvalidOffset(_))
        ));
        assert!(Offset::parse(Some("inf"), true).is_err());
    }

    #[test]
    fn test_summary_reports_first_and_last() {
        let before = "[00:01.00]a\n[00:05.00]b\n[00:09.50]c";
        let after = apply_offset(before, Offset::Seconds(2.0)).unwrap();
        let summary = ShiftSummary::new(before, &after, Offset::Seconds(2.0));

        assert_eq!(summary.before.as_ref().unwrap().first, "[00:01.00]");
        assert_eq!(summary.before.as_ref().unwrap().last, "[00:09.50]");
        assert_eq!(summary.after.as_ref().unwrap().last, "[00:11.50]");
        assert_eq!(summary.to_string(), "[00:01.00] [00:09.50]\n -> 2 \n[00:03.00] [00:11.50]");
    }

    #[test]
    fn test_summary_without_timestamps() {
        let summary = ShiftSummary::new("just words", "just words", Offset::Seconds(1.0));
        assert!(!summary.has_timestamps());
        assert_eq!(summary.to_string(), "no timestamps present (offset 1)");
    }

    #[test]
    fn test_single_timestamp_is_both_first_and_last() {
        let range = TimestampRange::of("[00:07.25]only").unwrap();
        assert_eq!(range.first, range.last);
    }
}
