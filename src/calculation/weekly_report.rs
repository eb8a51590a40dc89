//! Weekly overtime summary.
//!
//! Aggregates closed shift calculations into a seven-day week starting at a
//! given local date, then runs the overtime allocator over the week.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::OvertimePolicy;

use super::overtime::{OvertimeSplit, daily_overtime, weekly_overtime};
use super::rounding::apply_rounding;
use super::shift_pay::ShiftCalculation;

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// One local day of a weekly summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    /// The local date.
    pub date: NaiveDate,
    /// Number of closed shifts that started on this date.
    pub shift_count: usize,
    /// Worked minutes, summed over the day's shifts.
    pub worked_minutes: i64,
    /// Worked minutes after the policy's rounding rule.
    pub rounded_minutes: i64,
    /// `rounded_minutes` in hours.
    pub hours: Decimal,
    /// The day split at the policy's daily threshold.
    pub daily: OvertimeSplit,
    /// Pay for the day's shifts.
    pub gross_pay: Decimal,
}

/// A week of shift calculations with the overtime policy applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// First local date of the week.
    pub week_start: NaiveDate,
    /// Last local date of the week (inclusive).
    pub week_end: NaiveDate,
    /// Seven days, starting at `week_start`.
    pub days: Vec<DaySummary>,
    /// Hours worked on each of the seven days.
    pub hours_by_day: [Decimal; 7],
    /// Sum of `hours_by_day`.
    pub total_hours: Decimal,
    /// The week split by the policy's weekly threshold and mode.
    pub weekly: OvertimeSplit,
    /// Sum of the per-day overtime at the policy's daily threshold.
    pub daily_overtime_hours: Decimal,
    /// Pay for every shift in the week.
    pub gross_pay: Decimal,
    /// Number of shifts counted in the week.
    pub shifts_included: usize,
    /// Open shifts left out of the week.
    pub open_shifts_excluded: usize,
    /// Closed shifts whose local start date falls outside the week.
    pub shifts_outside_week: usize,
}

/// Summarizes a week of shift calculations.
///
/// Shifts are grouped by the local date they started on. Open shifts and
/// shifts outside `week_start ..= week_start + 6` are counted but not
/// summed. Each day's worked minutes are rounded with the policy's rounding
/// rule before being converted to hours.
///
/// # Errors
///
/// Propagates allocator errors; with validated inputs none are expected.
/// Returns `Configuration` if the week would run past the end of the
/// supported calendar.
///
/// # Example
///
/// ```
/// use timesheet_engine::calculation::{calculate_shift, summarize_week};
/// use timesheet_engine::models::{OvertimePolicy, RatePlan, Settings, Shift};
/// use chrono::{Duration, NaiveDate, TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let plan = RatePlan::builder("standard", "RUB", Decimal::from(600)).build().unwrap();
/// let monday = Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap();
///
/// let calcs: Vec<_> = (0..5)
///     .map(|day| {
///         let start = monday + Duration::days(day);
///         let shift = Shift {
///             id: format!("shift_{day}"),
///             employee_id: "emp_001".to_string(),
///             site_id: None,
///             start,
///             end: Some(start + Duration::hours(9)),
///             break_minutes: 0,
///             time_zone: chrono_tz::UTC,
///         };
///         calculate_shift(&shift, &Settings::default(), &plan, &[], Utc::now(), 1)
///             .unwrap()
///             .calculation
///     })
///     .collect();
///
/// let week_start = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
/// let summary = summarize_week(&calcs, &OvertimePolicy::default(), week_start).unwrap();
/// assert_eq!(summary.total_hours, Decimal::from(45));
/// assert_eq!(summary.weekly.overtime, Decimal::from(5));
/// ```
pub fn summarize_week(
    calculations: &[ShiftCalculation],
    policy: &OvertimePolicy,
    week_start: NaiveDate,
) -> EngineResult<WeeklySummary> {
    let week_end = week_start
        .checked_add_days(Days::new(6))
        .ok_or_else(|| EngineError::configuration("week_start", format!("{} is out of range", week_start)))?;

    let mut worked_minutes = [0i64; 7];
    let mut shift_counts = [0usize; 7];
    let mut gross_by_day = [Decimal::ZERO; 7];
    let mut open_shifts_excluded = 0usize;
    let mut shifts_outside_week = 0usize;

    for calc in calculations {
        if calc.is_open {
            open_shifts_excluded += 1;
            continue;
        }
        let offset = (calc.local_date - week_start).num_days();
        if !(0..7).contains(&offset) {
            shifts_outside_week += 1;
            continue;
        }
        let day = offset as usize;
        worked_minutes[day] += calc.minutes.total_minutes;
        shift_counts[day] += 1;
        gross_by_day[day] = gross_by_day[day]
            .checked_add(calc.amount())
            .ok_or_else(|| EngineError::overflow("gross_pay"))?;
    }

    let rule = policy.rounding_rule();
    let mut days = Vec::with_capacity(7);
    let mut hours_by_day = [Decimal::ZERO; 7];
    let mut daily_overtime_hours = Decimal::ZERO;

    for (day, date) in week_start.iter_days().take(7).enumerate() {
        let rounded_minutes = apply_rounding(worked_minutes[day], rule).max(0);
        let hours = Decimal::from(rounded_minutes) / MINUTES_PER_HOUR;
        let daily = daily_overtime(hours, policy.daily_threshold_hours())?;

        hours_by_day[day] = hours;
        daily_overtime_hours += daily.overtime;
        days.push(DaySummary {
            date,
            shift_count: shift_counts[day],
            worked_minutes: worked_minutes[day],
            rounded_minutes,
            hours,
            daily,
            gross_pay: gross_by_day[day],
        });
    }

    let gross_pay = gross_by_day
        .iter()
        .try_fold(Decimal::ZERO, |sum, day| sum.checked_add(*day))
        .ok_or_else(|| EngineError::overflow("gross_pay"))?;

    let weekly = weekly_overtime(&hours_by_day, policy.weekly_threshold_hours(), policy.mode())?;
    let shifts_included: usize = shift_counts.iter().sum();

    tracing::debug!(
        week_start = %week_start,
        shifts_included,
        open_shifts_excluded,
        shifts_outside_week,
        overtime = %weekly.overtime,
        "Week summarized"
    );

    Ok(WeeklySummary {
        week_start,
        week_end,
        days,
        hours_by_day,
        total_hours: weekly.total(),
        weekly,
        daily_overtime_hours,
        gross_pay,
        shifts_included,
        open_shifts_excluded,
        shifts_outside_week,
    })
}
