//! Shift model.
//!
//! This module defines the [`Shift`] struct for representing a crew member's
//! work shift at a site. Instants are stored in UTC; the shift's IANA zone
//! decides the local calendar used for night, weekend and holiday checks.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

fn default_time_zone() -> Tz {
    Tz::UTC
}

/// Represents a work shift.
///
/// An open shift (`end` is `None`) is still running: its minutes can be
/// classified against a simulated "now", but it has no computable pay.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::Shift;
/// use chrono::{TimeZone, Utc};
///
/// let shift = Shift {
///     id: "shift_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     site_id: None,
///     start: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
///     end: Some(Utc.with_ymd_and_hms(2024, 5, 1, 16, 0, 0).unwrap()),
///     break_minutes: 60,
///     time_zone: chrono_tz::UTC,
/// };
/// assert!(!shift.is_open());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: String,
    /// The employee who worked the shift.
    pub employee_id: String,
    /// The site the shift was worked at.
    #[serde(default)]
    pub site_id: Option<String>,
    /// When the shift started.
    pub start: DateTime<Utc>,
    /// When the shift ended, if it has.
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// Total unpaid break minutes taken during the shift.
    #[serde(default)]
    pub break_minutes: i64,
    /// The IANA timezone of the site.
    #[serde(default = "default_time_zone")]
    pub time_zone: Tz,
}

impl Shift {
    /// Returns true while the shift has no end.
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// The end to classify against: the recorded end, or `now` for an open shift.
    pub fn effective_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end.unwrap_or(now)
    }

    /// The local calendar date on which the shift started.
    ///
    /// ```
    /// use timesheet_engine::models::Shift;
    /// use chrono::{NaiveDate, TimeZone, Utc};
    ///
    /// let shift = Shift {
    ///     id: "s1".to_string(),
    ///     employee_id: "e1".to_string(),
    ///     site_id: None,
    ///     // 23:30 UTC is already the next day in Moscow.
    ///     start: Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap(),
    ///     end: None,
    ///     break_minutes: 0,
    ///     time_zone: chrono_tz::Europe::Moscow,
    /// };
    /// assert_eq!(shift.local_start_date(), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
    /// ```
    pub fn local_start_date(&self) -> NaiveDate {
        self.start.with_timezone(&self.time_zone).date_naive()
    }

    /// Returns the local day of the week on which the shift started.
    pub fn local_start_weekday(&self) -> Weekday {
        self.start.with_timezone(&self.time_zone).weekday()
    }

    /// Returns true if the shift started on a local Saturday or Sunday.
    pub fn starts_on_weekend(&self) -> bool {
        matches!(self.local_start_weekday(), Weekday::Sat | Weekday::Sun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn make_shift(start: DateTime<Utc>, end: Option<DateTime<Utc>>, tz: Tz) -> Shift {
        Shift {
            id: "shift_001".to_string(),
            employee_id: "emp_001".to_string(),
            site_id: Some("site_north".to_string()),
            start,
            end,
            break_minutes: 0,
            time_zone: tz,
        }
    }

    #[test]
    fn test_effective_end_uses_recorded_end() {
        let end = utc(2024, 5, 1, 16, 0);
        let shift = make_shift(utc(2024, 5, 1, 8, 0), Some(end), Tz::UTC);
        assert_eq!(shift.effective_end(utc(2030, 1, 1, 0, 0)), end);
    }

    #[test]
    fn test_effective_end_uses_now_for_open_shift() {
        let now = utc(2024, 5, 1, 10, 15);
        let shift = make_shift(utc(2024, 5, 1, 8, 0), None, Tz::UTC);
        assert!(shift.is_open());
        assert_eq!(shift.effective_end(now), now);
    }

    #[test]
    fn test_weekend_uses_local_calendar() {
        // Friday 2024-05-03 23:00 UTC is Saturday 01:00 in Berlin (CEST).
        let shift = make_shift(utc(2024, 5, 3, 23, 0), None, chrono_tz::Europe::Berlin);
        assert_eq!(shift.local_start_weekday(), Weekday::Sat);
        assert!(shift.starts_on_weekend());

        let utc_shift = make_shift(utc(2024, 5, 3, 23, 0), None, Tz::UTC);
        assert_eq!(utc_shift.local_start_weekday(), Weekday::Fri);
        assert!(!utc_shift.starts_on_weekend());
    }

    #[test]
    fn test_deserialization_defaults() {
        let json = r#"{
            "id": "shift_001",
            "employee_id": "emp_001",
            "start": "2024-05-01T08:00:00Z"
        }"#;
        let shift: Shift = serde_json::from_str(json).unwrap();
        assert!(shift.is_open());
        assert_eq!(shift.break_minutes, 0);
        assert_eq!(shift.time_zone, Tz::UTC);
        assert!(shift.site_id.is_none());
    }

    #[test]
    fn test_deserialization_with_zone() {
        let json = r#"{
            "id": "shift_002",
            "employee_id": "emp_001",
            "start": "2024-05-01T08:00:00+03:00",
            "end": "2024-05-01T17:00:00+03:00",
            "break_minutes": 45,
            "time_zone": "Europe/Moscow"
        }"#;
        let shift: Shift = serde_json::from_str(json).unwrap();
        assert_eq!(shift.start, utc(2024, 5, 1, 5, 0));
        assert_eq!(shift.time_zone, chrono_tz::Europe::Moscow);
        assert_eq!(shift.break_minutes, 45);
    }

    #[test]
    fn test_shift_serialization_round_trip() {
        let shift = make_shift(
            utc(2024, 5, 1, 8, 0),
            Some(utc(2024, 5, 1, 16, 0)),
            chrono_tz::Asia::Almaty,
        );
        let json = serde_json::to_string(&shift).unwrap();
        let deserialized: Shift = serde_json::from_str(&json).unwrap();
        assert_eq!(shift, deserialized);
    }
}
