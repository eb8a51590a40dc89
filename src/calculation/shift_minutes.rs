//! Shift-minutes classification.
//!
//! Runs the interval splitter over a single shift, deducts breaks, applies
//! optional rounding and derives overtime minutes from the per-shift
//! threshold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{Settings, Shift};

use super::interval_split::{SplitMinutes, WorkInterval, split_interval};
use super::rounding::apply_rounding;

/// The minute buckets of one shift after break deduction.
///
/// Invariants: every field is non-negative, `overtime_minutes <= total_minutes`
/// and `night_minutes <= total_minutes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedMinutes {
    /// Worked minutes after break deduction (and rounding, if configured).
    pub total_minutes: i64,
    /// Worked minutes above the overtime threshold.
    pub overtime_minutes: i64,
    /// Night minutes, capped at `total_minutes`.
    pub night_minutes: i64,
}

/// The classified minutes together with the raw split they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftMinutesDetail {
    /// The effective end used for classification.
    pub effective_end: DateTime<Utc>,
    /// The raw day/night/weekend split before break deduction.
    pub split: SplitMinutes,
    /// Break minutes actually deducted (negative input clamps to zero).
    pub break_minutes: i64,
    /// Worked minutes after break deduction, before rounding.
    pub unrounded_minutes: i64,
    /// The final buckets.
    pub minutes: ClassifiedMinutes,
}

/// Classifies a shift's minutes, using the current time as the end of an
/// open shift.
///
/// See [`classify_at`].
pub fn classify(shift: &Shift, settings: &Settings) -> EngineResult<ClassifiedMinutes> {
    classify_at(shift, settings, Utc::now())
}

/// Classifies a shift's minutes, using `now` as the end of an open shift.
///
/// 1. The effective end is `shift.end`, or `now` if the shift is open.
/// 2. An effective end at or before the start fails with `InvalidRange`.
/// 3. The interval is split with the settings' night window in the shift's zone.
/// 4. Break minutes (clamped to >= 0) are subtracted; the total clamps at 0.
/// 5. If the settings carry a rounding rule, the total is rounded with it.
/// 6. Night minutes are capped at the total rather than prorated.
/// 7. Overtime is whatever the total exceeds the threshold by.
///
/// # Examples
///
/// ```
/// use timesheet_engine::calculation::classify_at;
/// use timesheet_engine::models::{Settings, Shift};
/// use chrono::{TimeZone, Utc};
///
/// let shift = Shift {
///     id: "s1".to_string(),
///     employee_id: "e1".to_string(),
///     site_id: None,
///     start: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
///     end: Some(Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap()),
///     break_minutes: 0,
///     time_zone: chrono_tz::UTC,
/// };
/// let minutes = classify_at(&shift, &Settings::default(), Utc::now()).unwrap();
/// assert_eq!(minutes.total_minutes, 720);
/// assert_eq!(minutes.overtime_minutes, 240);
/// assert_eq!(minutes.night_minutes, 0);
/// ```
pub fn classify_at(
    shift: &Shift,
    settings: &Settings,
    now: DateTime<Utc>,
) -> EngineResult<ClassifiedMinutes> {
    classify_detailed(shift, settings, now).map(|detail| detail.minutes)
}

/// Like [`classify_at`], but also returns the intermediate values.
pub fn classify_detailed(
    shift: &Shift,
    settings: &Settings,
    now: DateTime<Utc>,
) -> EngineResult<ShiftMinutesDetail> {
    let effective_end = shift.effective_end(now);
    let interval = WorkInterval::new(shift.start, effective_end).map_err(|err| {
        tracing::debug!(shift_id = %shift.id, error = %err, "Rejected shift range");
        err
    })?;

    let split = split_interval(&interval, settings.night_window(), shift.time_zone);

    let break_minutes = shift.break_minutes.max(0);
    let unrounded_minutes = (split.total_minutes() - break_minutes).max(0);
    let total_minutes = match settings.rounding() {
        Some(rule) => apply_rounding(unrounded_minutes, rule).max(0),
        None => unrounded_minutes,
    };

    let night_minutes = split.night_minutes.min(total_minutes);
    let overtime_minutes = (total_minutes - settings.overtime_threshold_minutes()).max(0);

    Ok(ShiftMinutesDetail {
        effective_end,
        split,
        break_minutes,
        unrounded_minutes,
        minutes: ClassifiedMinutes {
            total_minutes,
            overtime_minutes,
            night_minutes,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{NightWindow, RoundingMode, RoundingRule, RoundingUnit};
    use chrono::{Duration, TimeZone};
    use chrono_tz::Tz;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn make_shift(start: DateTime<Utc>, end: Option<DateTime<Utc>>, break_minutes: i64) -> Shift {
        Shift {
            id: "shift_001".to_string(),
            employee_id: "emp_001".to_string(),
            site_id: None,
            start,
            end,
            break_minutes,
            time_zone: Tz::UTC,
        }
    }

    fn now() -> DateTime<Utc> {
        utc(2030, 1, 1, 0, 0)
    }

    #[test]
    fn test_break_is_subtracted() {
        let shift = make_shift(utc(2024, 5, 1, 8, 0), Some(utc(2024, 5, 1, 16, 0)), 60);
        let minutes = classify_at(&shift, &Settings::default(), now()).unwrap();
        assert_eq!(minutes.total_minutes, 420);
        assert_eq!(minutes.overtime_minutes, 0);
        assert_eq!(minutes.night_minutes, 0);
    }

    #[test]
    fn test_overtime_beyond_threshold() {
        let shift = make_shift(utc(2024, 5, 1, 8, 0), Some(utc(2024, 5, 1, 20, 0)), 0);
        let minutes = classify_at(&shift, &Settings::default(), now()).unwrap();
        assert_eq!(minutes.total_minutes, 720);
        assert_eq!(minutes.overtime_minutes, 240);
    }

    #[test]
    fn test_classify_closed_shift_ignores_clock() {
        // 20:00 → 08:00 across the default window with a 45 minute break.
        let shift = make_shift(utc(2024, 5, 1, 20, 0), Some(utc(2024, 5, 2, 8, 0)), 45);
        let minutes = classify(&shift, &Settings::default()).unwrap();
        assert_eq!(minutes.total_minutes, 675);
        assert_eq!(minutes.overtime_minutes, 195);
        assert_eq!(minutes.night_minutes, 480);
        assert_eq!(minutes, classify_at(&shift, &Settings::default(), now()).unwrap());
    }

    #[test]
    fn test_classify_open_shift_runs_to_current_time() {
        let start = Utc::now() - Duration::hours(2);
        let shift = make_shift(start, None, 0);
        let minutes = classify(&shift, &Settings::default()).unwrap();
        assert!(minutes.total_minutes >= 119);
    }

    #[test]
    fn test_zero_length_shift_is_invalid_range() {
        let at = utc(2024, 5, 1, 8, 0);
        let shift = make_shift(at, Some(at), 0);
        let err = classify_at(&shift, &Settings::default(), now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }

    #[test]
    fn test_negative_duration_is_invalid_range() {
        let shift = make_shift(utc(2024, 5, 1, 12, 0), Some(utc(2024, 5, 1, 10, 0)), 0);
        let err = classify_at(&shift, &Settings::default(), now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }

    #[test]
    fn test_open_shift_uses_now() {
        let start = utc(2024, 5, 1, 8, 0);
        let shift = make_shift(start, None, 0);
        let minutes = classify_at(&shift, &Settings::default(), start + Duration::minutes(95)).unwrap();
        assert_eq!(minutes.total_minutes, 95);
    }

    #[test]
    fn test_open_shift_with_now_before_start_is_invalid() {
        let start = utc(2024, 5, 1, 8, 0);
        let shift = make_shift(start, None, 0);
        let err = classify_at(&shift, &Settings::default(), start - Duration::minutes(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }

    #[test]
    fn test_break_longer_than_shift_clamps_to_zero() {
        let shift = make_shift(utc(2024, 5, 1, 22, 0), Some(utc(2024, 5, 1, 23, 0)), 90);
        let minutes = classify_at(&shift, &Settings::default(), now()).unwrap();
        assert_eq!(minutes, ClassifiedMinutes::default());
    }

    #[test]
    fn test_negative_break_is_ignored() {
        let shift = make_shift(utc(2024, 5, 1, 8, 0), Some(utc(2024, 5, 1, 9, 0)), -30);
        let minutes = classify_at(&shift, &Settings::default(), now()).unwrap();
        assert_eq!(minutes.total_minutes, 60);
    }

    #[test]
    fn test_night_is_capped_not_prorated() {
        // 22:00 → 06:00 is all night; a 60 minute break caps night at 420.
        let shift = make_shift(utc(2024, 5, 1, 22, 0), Some(utc(2024, 5, 2, 6, 0)), 60);
        let minutes = classify_at(&shift, &Settings::default(), now()).unwrap();
        assert_eq!(minutes.total_minutes, 420);
        assert_eq!(minutes.night_minutes, 420);

        // 18:00 → 02:00 has 240 night; a 60 minute break leaves night untouched.
        let shift = make_shift(utc(2024, 5, 1, 18, 0), Some(utc(2024, 5, 2, 2, 0)), 60);
        let minutes = classify_at(&shift, &Settings::default(), now()).unwrap();
        assert_eq!(minutes.total_minutes, 420);
        assert_eq!(minutes.night_minutes, 240);
    }

    #[test]
    fn test_custom_threshold_and_window() {
        let settings = Settings::new(NightWindow::parse("21:00", "05:00").unwrap(), 600, None).unwrap();
        let shift = make_shift(utc(2024, 5, 1, 12, 0), Some(utc(2024, 5, 2, 0, 0)), 30);
        let minutes = classify_at(&shift, &settings, now()).unwrap();
        assert_eq!(minutes.total_minutes, 690);
        assert_eq!(minutes.overtime_minutes, 90);
        assert_eq!(minutes.night_minutes, 180);
    }

    #[test]
    fn test_rounding_applies_after_break_deduction() {
        let rule = RoundingRule {
            unit: RoundingUnit::FifteenMinutes,
            mode: RoundingMode::Nearest,
        };
        let settings = Settings::new(NightWindow::default(), 480, Some(rule)).unwrap();
        // 08:03 → 16:10 is 487 minutes; minus 30 break is 457 → 450.
        let shift = make_shift(utc(2024, 5, 1, 8, 3), Some(utc(2024, 5, 1, 16, 10)), 30);
        let detail = classify_detailed(&shift, &settings, now()).unwrap();
        assert_eq!(detail.unrounded_minutes, 457);
        assert_eq!(detail.minutes.total_minutes, 450);
        assert_eq!(detail.minutes.overtime_minutes, 0);
    }

    #[test]
    fn test_detail_reports_raw_split() {
        let shift = make_shift(utc(2024, 5, 4, 20, 0), Some(utc(2024, 5, 5, 8, 0)), 45);
        let detail = classify_detailed(&shift, &Settings::default(), now()).unwrap();
        assert_eq!(detail.split.night_minutes, 480);
        assert_eq!(detail.split.day_minutes, 240);
        assert_eq!(detail.split.weekend_minutes, 720);
        assert_eq!(detail.break_minutes, 45);
        assert_eq!(detail.minutes.total_minutes, 675);
        assert_eq!(detail.minutes.overtime_minutes, 195);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let shift = make_shift(utc(2024, 5, 1, 8, 0), None, 15);
        let before = shift.clone();
        let _ = classify_at(&shift, &Settings::default(), utc(2024, 5, 1, 9, 0)).unwrap();
        assert_eq!(shift, before);
    }
}
