//! Night window model.
//!
//! A night window is a recurring local wall-clock range such as 22:00–06:00.
//! The window is parsed once into a [`WindowShape`] so that membership checks
//! never re-compare strings.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Whether a night window stays inside one calendar day or wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowShape {
    /// `start <= end`: night is `[start, end)`.
    Contained,
    /// `start > end`: night is `[start, 24:00) ∪ [00:00, end)`.
    WrapsMidnight,
}

/// The raw `HH:MM` form of a night window, as found in configuration and requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightWindowSpec {
    /// Local start time, `HH:MM`.
    pub start: String,
    /// Local end time, `HH:MM`.
    pub end: String,
}

/// A validated, recurring nightly window in local wall-clock time.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::{NightWindow, WindowShape};
///
/// let window = NightWindow::parse("22:00", "06:00").unwrap();
/// assert_eq!(window.shape(), WindowShape::WrapsMidnight);
/// assert!(window.contains_minute(23 * 60));
/// assert!(window.contains_minute(5 * 60 + 59));
/// assert!(!window.contains_minute(6 * 60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NightWindowSpec", into = "NightWindowSpec")]
pub struct NightWindow {
    start_minute: u32,
    end_minute: u32,
    shape: WindowShape,
}

impl NightWindow {
    /// Parses a window from two `HH:MM` strings.
    ///
    /// Returns a `Configuration` error if either string is not a valid time.
    /// A window whose start equals its end is contained and empty.
    pub fn parse(start: &str, end: &str) -> EngineResult<Self> {
        let start = parse_hh_mm("night_window.start", start)?;
        let end = parse_hh_mm("night_window.end", end)?;
        Ok(Self::from_times(start, end))
    }

    /// Builds a window from two local times. Seconds are ignored.
    pub fn from_times(start: NaiveTime, end: NaiveTime) -> Self {
        let start_minute = start.hour() * 60 + start.minute();
        let end_minute = end.hour() * 60 + end.minute();
        let shape = if start_minute <= end_minute {
            WindowShape::Contained
        } else {
            WindowShape::WrapsMidnight
        };
        Self {
            start_minute,
            end_minute,
            shape,
        }
    }

    /// Returns the window's shape.
    pub fn shape(&self) -> WindowShape {
        self.shape
    }

    /// Minute-of-day at which the window opens.
    pub fn start_minute(&self) -> u32 {
        self.start_minute
    }

    /// Minute-of-day at which the window closes.
    pub fn end_minute(&self) -> u32 {
        self.end_minute
    }

    /// Returns true if the given minute-of-day (0..1440) falls inside the window.
    pub fn contains_minute(&self, minute_of_day: u32) -> bool {
        let minute = minute_of_day % MINUTES_PER_DAY;
        match self.shape {
            WindowShape::Contained => minute >= self.start_minute && minute < self.end_minute,
            WindowShape::WrapsMidnight => minute >= self.start_minute || minute < self.end_minute,
        }
    }

    /// Returns true if the given local time falls inside the window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.contains_minute(time.hour() * 60 + time.minute())
    }

    /// The minutes-of-day at which night membership can change.
    pub fn boundaries(&self) -> [u32; 2] {
        [self.start_minute, self.end_minute]
    }

    /// Length of the window in minutes over one 24-hour cycle.
    pub fn length_minutes(&self) -> u32 {
        match self.shape {
            WindowShape::Contained => self.end_minute - self.start_minute,
            WindowShape::WrapsMidnight => MINUTES_PER_DAY - self.start_minute + self.end_minute,
        }
    }
}

impl Default for NightWindow {
    /// 22:00–06:00.
    fn default() -> Self {
        Self {
            start_minute: 22 * 60,
            end_minute: 6 * 60,
            shape: WindowShape::WrapsMidnight,
        }
    }
}

impl TryFrom<NightWindowSpec> for NightWindow {
    type Error = EngineError;

    fn try_from(spec: NightWindowSpec) -> Result<Self, Self::Error> {
        NightWindow::parse(&spec.start, &spec.end)
    }
}

impl From<NightWindow> for NightWindowSpec {
    fn from(window: NightWindow) -> Self {
        NightWindowSpec {
            start: format_minute(window.start_minute),
            end: format_minute(window.end_minute),
        }
    }
}

fn parse_hh_mm(field: &str, value: &str) -> EngineResult<NaiveTime> {
    let trimmed = value.trim();
    // NaiveTime accepts "9:00"; the wire format is strictly two-digit.
    if trimmed.len() != 5 {
        return Err(EngineError::configuration(
            field,
            format!("expected HH:MM, got '{}'", value),
        ));
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M").map_err(|e| {
        EngineError::configuration(field, format!("expected HH:MM, got '{}': {}", value, e))
    })
}

fn format_minute(minute_of_day: u32) -> String {
    format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapping_window() {
        let window = NightWindow::parse("22:00", "06:00").unwrap();
        assert_eq!(window.shape(), WindowShape::WrapsMidnight);
        assert_eq!(window.start_minute(), 1320);
        assert_eq!(window.end_minute(), 360);
        assert_eq!(window.length_minutes(), 480);
    }

    #[test]
    fn test_parse_contained_window() {
        let window = NightWindow::parse("00:00", "05:30").unwrap();
        assert_eq!(window.shape(), WindowShape::Contained);
        assert!(window.contains_minute(0));
        assert!(window.contains_minute(5 * 60 + 29));
        assert!(!window.contains_minute(5 * 60 + 30));
        assert!(!window.contains_minute(23 * 60));
    }

    #[test]
    fn test_wrapping_membership_edges() {
        let window = NightWindow::default();
        assert!(!window.contains_minute(21 * 60 + 59));
        assert!(window.contains_minute(22 * 60));
        assert!(window.contains_minute(0));
        assert!(window.contains_minute(5 * 60 + 59));
        assert!(!window.contains_minute(6 * 60));
        assert!(!window.contains_minute(12 * 60));
    }

    #[test]
    fn test_contains_local_time_ignores_seconds() {
        let window = NightWindow::default();
        let t = |h, m, s| NaiveTime::from_hms_opt(h, m, s).unwrap();
        assert!(window.contains(t(22, 0, 0)));
        assert!(window.contains(t(5, 59, 59)));
        assert!(!window.contains(t(6, 0, 30)));
        assert!(!window.contains(t(21, 59, 59)));
    }

    #[test]
    fn test_equal_start_and_end_is_empty() {
        let window = NightWindow::parse("06:00", "06:00").unwrap();
        assert_eq!(window.shape(), WindowShape::Contained);
        assert_eq!(window.length_minutes(), 0);
        assert!((0..MINUTES_PER_DAY).all(|m| !window.contains_minute(m)));
    }

    #[test]
    fn test_rejects_malformed_times() {
        for bad in ["25:00", "22", "ab:cd", "9:00", "22:60", ""] {
            let err = NightWindow::parse(bad, "06:00").unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::Configuration, "{}", bad);
        }
    }

    #[test]
    fn test_serde_uses_hh_mm_strings() {
        let window: NightWindow =
            serde_json::from_str(r#"{"start":"22:30","end":"05:00"}"#).unwrap();
        assert_eq!(window.start_minute(), 22 * 60 + 30);
        let json = serde_json::to_value(window).unwrap();
        assert_eq!(json, serde_json::json!({"start": "22:30", "end": "05:00"}));
    }

    #[test]
    fn test_serde_rejects_invalid_window() {
        let result: Result<NightWindow, _> =
            serde_json::from_str(r#"{"start":"nope","end":"05:00"}"#);
        assert!(result.is_err());
    }
}
