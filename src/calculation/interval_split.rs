//! Night/weekend interval splitting.
//!
//! This module partitions a work interval into day and night minutes, and
//! tags weekend minutes, using the local calendar of an IANA timezone. The
//! interval is walked in chunks that never cross a local hour boundary or a
//! night-window boundary, so every chunk has a single weekday and a single
//! night/day classification.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::NightWindow;

const SECONDS_PER_HOUR: i64 = 3600;

/// A half-open span of time `[start, end)`.
///
/// # Example
///
/// ```
/// use timesheet_engine::calculation::WorkInterval;
/// use chrono::{TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 5, 1, 22, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2024, 5, 2, 6, 0, 0).unwrap();
/// let interval = WorkInterval::new(start, end).unwrap();
/// assert_eq!(interval.duration_minutes(), 480);
///
/// assert!(WorkInterval::new(end, start).is_err());
/// assert!(WorkInterval::new(start, start).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkInterval {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

impl WorkInterval {
    /// Creates an interval, rejecting `end <= start` with `InvalidRange`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> EngineResult<Self> {
        if end <= start {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Whole minutes between start and end (zero if end is not after start).
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }
}

/// Minutes of an interval by classification.
///
/// `day_minutes + night_minutes` is always the interval's total. Weekend
/// minutes overlap either bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitMinutes {
    /// Minutes outside the night window.
    pub day_minutes: i64,
    /// Minutes inside the night window.
    pub night_minutes: i64,
    /// Minutes on a local Saturday or Sunday.
    pub weekend_minutes: i64,
}

impl SplitMinutes {
    /// Day plus night minutes.
    pub fn total_minutes(&self) -> i64 {
        self.day_minutes + self.night_minutes
    }
}

/// Splits an interval into day, night and weekend minutes.
///
/// Each chunk is classified by the local time of its start instant:
/// - **night** if the local time-of-day is inside `night_window`
/// - **day** otherwise
/// - **weekend** additionally, if the local weekday is Saturday or Sunday
///
/// Chunks end at the next local hour boundary, the next night-window
/// boundary, or the end of the interval, whichever comes first. Seconds are
/// accumulated and converted to whole minutes once at the end; day minutes
/// are derived as `total - night` so the two always partition the total.
/// An interval with `end <= start` yields all zeros.
///
/// # Examples
///
/// ```
/// use timesheet_engine::calculation::{split_interval, WorkInterval};
/// use timesheet_engine::models::NightWindow;
/// use chrono::{TimeZone, Utc};
///
/// let window = NightWindow::parse("22:00", "06:00").unwrap();
///
/// // 20:00 → 08:00 UTC: 22:00–06:00 is night, the four hours around it are day.
/// let interval = WorkInterval::new(
///     Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap(),
/// )
/// .unwrap();
/// let split = split_interval(&interval, &window, chrono_tz::UTC);
/// assert_eq!(split.night_minutes, 480);
/// assert_eq!(split.day_minutes, 240);
/// assert_eq!(split.weekend_minutes, 0);
/// ```
pub fn split_interval(interval: &WorkInterval, night_window: &NightWindow, tz: Tz) -> SplitMinutes {
    let mut night_seconds: i64 = 0;
    let mut weekend_seconds: i64 = 0;
    let mut total_seconds: i64 = 0;

    let mut cursor = interval.start;
    while cursor < interval.end {
        let local = cursor.with_timezone(&tz);
        let chunk_end = (cursor + duration_to_next_boundary(&local, night_window)).min(interval.end);
        let seconds = (chunk_end - cursor).num_seconds();

        let is_night = night_window.contains(local.time());
        let is_weekend = matches!(local.weekday(), Weekday::Sat | Weekday::Sun);

        total_seconds += seconds;
        if is_night {
            night_seconds += seconds;
        }
        if is_weekend {
            weekend_seconds += seconds;
        }

        cursor = chunk_end;
    }

    let total_minutes = total_seconds / 60;
    let night_minutes = night_seconds / 60;
    SplitMinutes {
        day_minutes: total_minutes - night_minutes,
        night_minutes,
        weekend_minutes: weekend_seconds / 60,
    }
}

/// Time from `local` to the next local hour boundary or night-window
/// boundary inside the current hour. Always positive.
fn duration_to_next_boundary(local: &DateTime<Tz>, night_window: &NightWindow) -> Duration {
    let into_hour = i64::from(local.minute()) * 60 + i64::from(local.second());
    let nanos = i64::from(local.nanosecond() % 1_000_000_000);
    let mut seconds_ahead = SECONDS_PER_HOUR - into_hour;

    let minute_of_day = local.hour() * 60 + local.minute();
    for boundary in night_window.boundaries() {
        if boundary / 60 == local.hour() && boundary > minute_of_day {
            let ahead = i64::from(boundary - minute_of_day) * 60 - i64::from(local.second());
            seconds_ahead = seconds_ahead.min(ahead);
        }
    }

    Duration::seconds(seconds_ahead) - Duration::nanoseconds(nanos)
}
