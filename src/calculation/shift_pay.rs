//! Shift pay orchestration.
//!
//! This module ties the classification and pay steps together for a single
//! shift: split and classify the minutes, resolve the weekend flag and any
//! holiday from the shift's local start date, then price the result with a
//! rate plan. Every decision is recorded as an [`AuditStep`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditWarning, Holiday, MinBreakRule, RatePlan, Settings, Shift, find_holiday,
};

use super::interval_split::SplitMinutes;
use super::pay::{PayBreakdown, PayContext, PremiumMinutes, calculate_pay_breakdown};
use super::shift_minutes::{ClassifiedMinutes, classify_detailed};

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Warning code emitted when a shift's break is shorter than required.
pub const MIN_BREAK_WARNING_CODE: &str = "MIN_BREAK_NOT_MET";

/// The classified and priced result of one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCalculation {
    /// The shift this calculation is for.
    pub shift_id: String,
    /// The employee who worked the shift.
    pub employee_id: String,
    /// The site the shift was worked at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    /// The local calendar date the shift started on.
    pub local_date: NaiveDate,
    /// Whether the shift was still open; open shifts carry no pay.
    pub is_open: bool,
    /// The end used for classification (`now` for open shifts).
    pub effective_end: DateTime<Utc>,
    /// The raw day/night/weekend split before break deduction.
    pub split: SplitMinutes,
    /// Break minutes deducted.
    pub break_minutes: i64,
    /// The final minute buckets.
    pub minutes: ClassifiedMinutes,
    /// Whether the weekend multiplier applies.
    pub is_weekend: bool,
    /// Holiday multiplier, if the local start date is a holiday.
    #[serde(default)]
    pub holiday_multiplier: Option<Decimal>,
    /// The pay breakdown; `None` for open shifts.
    #[serde(default)]
    pub pay: Option<PayBreakdown>,
}

impl ShiftCalculation {
    /// The shift's pay amount, or zero for an open shift.
    pub fn amount(&self) -> Decimal {
        self.pay.as_ref().map_or(Decimal::ZERO, |pay| pay.amount)
    }
}

/// A shift calculation together with the audit steps that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCalculationResult {
    /// The calculation.
    pub calculation: ShiftCalculation,
    /// Audit steps, numbered from the `step_number` passed in.
    pub audit_steps: Vec<AuditStep>,
}

/// Classifies and prices a single shift.
///
/// Weekend status and holiday lookup use the local date and weekday of the
/// shift's start in its own zone, so an overnight Friday shift is a weekday
/// shift even if it runs into Saturday. An open shift is classified against
/// `now` and returned without pay.
///
/// # Errors
///
/// Returns `InvalidRange` if the effective end is not after the start.
///
/// # Examples
///
/// ```
/// use timesheet_engine::calculation::calculate_shift;
/// use timesheet_engine::models::{RatePlan, Settings, Shift};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
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
/// let plan = RatePlan::builder("standard", "RUB", Decimal::from(600)).build().unwrap();
///
/// let result = calculate_shift(&shift, &Settings::default(), &plan, &[], Utc::now(), 1).unwrap();
/// assert_eq!(result.calculation.minutes.total_minutes, 420);
/// assert_eq!(result.calculation.amount(), Decimal::from_str("4200.00").unwrap());
/// ```
pub fn calculate_shift(
    shift: &Shift,
    settings: &Settings,
    rate_plan: &RatePlan,
    holidays: &[Holiday],
    now: DateTime<Utc>,
    step_number: u32,
) -> EngineResult<ShiftCalculationResult> {
    let detail = classify_detailed(shift, settings, now)?;
    let minutes = detail.minutes;
    let mut steps = Vec::new();
    let mut next_step = step_number;
    let mut push = |rule_id: &str,
                    rule_name: &str,
                    input: serde_json::Value,
                    output: serde_json::Value,
                    reasoning: String| {
        steps.push(AuditStep {
            step_number: next_step,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            shift_id: Some(shift.id.clone()),
            input,
            output,
            reasoning,
        });
        next_step += 1;
    };

    let window = settings.night_window();
    push(
        "interval_split",
        "Day/Night/Weekend Split",
        serde_json::json!({
            "start": shift.start,
            "end": detail.effective_end,
            "open": shift.is_open(),
            "time_zone": shift.time_zone.name(),
            "night_window": window,
        }),
        serde_json::json!({
            "day_minutes": detail.split.day_minutes,
            "night_minutes": detail.split.night_minutes,
            "weekend_minutes": detail.split.weekend_minutes,
        }),
        format!(
            "{} minutes on the clock in {}: {} day, {} night, {} on a weekend",
            detail.split.total_minutes(),
            shift.time_zone.name(),
            detail.split.day_minutes,
            detail.split.night_minutes,
            detail.split.weekend_minutes
        ),
    );

    push(
        "break_deduction",
        "Break Deduction",
        serde_json::json!({
            "clocked_minutes": detail.split.total_minutes(),
            "break_minutes": shift.break_minutes,
        }),
        serde_json::json!({ "worked_minutes": detail.unrounded_minutes }),
        if shift.break_minutes < 0 {
            format!(
                "Negative break of {} minutes ignored; {} minutes worked",
                shift.break_minutes, detail.unrounded_minutes
            )
        } else {
            format!(
                "{} - {} break = {} minutes worked",
                detail.split.total_minutes(),
                detail.break_minutes,
                detail.unrounded_minutes
            )
        },
    );

    if let Some(rule) = settings.rounding() {
        push(
            "minute_rounding",
            "Minute Rounding",
            serde_json::json!({
                "minutes": detail.unrounded_minutes,
                "unit": rule.unit,
                "mode": rule.mode,
            }),
            serde_json::json!({ "minutes": minutes.total_minutes }),
            format!(
                "{} minutes rounded to {}",
                detail.unrounded_minutes, minutes.total_minutes
            ),
        );
    }

    push(
        "overtime_threshold",
        "Shift Overtime and Night Minutes",
        serde_json::json!({
            "total_minutes": minutes.total_minutes,
            "threshold_minutes": settings.overtime_threshold_minutes(),
            "raw_night_minutes": detail.split.night_minutes,
        }),
        serde_json::json!({
            "overtime_minutes": minutes.overtime_minutes,
            "night_minutes": minutes.night_minutes,
        }),
        if minutes.overtime_minutes > 0 {
            format!(
                "{} minutes exceeds the {} minute threshold by {}",
                minutes.total_minutes,
                settings.overtime_threshold_minutes(),
                minutes.overtime_minutes
            )
        } else {
            format!(
                "{} minutes is within the {} minute threshold",
                minutes.total_minutes,
                settings.overtime_threshold_minutes()
            )
        },
    );

    let local_date = shift.local_start_date();
    let is_weekend = shift.starts_on_weekend();
    let holiday = find_holiday(holidays, local_date);
    let holiday_multiplier = holiday.map(|h| h.multiplier);

    push(
        "calendar_context",
        "Weekend and Holiday Detection",
        serde_json::json!({
            "local_date": local_date,
            "weekday": shift.local_start_weekday().to_string(),
        }),
        serde_json::json!({
            "is_weekend": is_weekend,
            "holiday": holiday.map(|h| h.name.clone()),
            "holiday_multiplier": holiday_multiplier.map(|m| m.to_string()),
        }),
        match holiday {
            Some(h) => format!(
                "{} is a holiday ({}) with multiplier {}",
                local_date,
                h.name.as_deref().unwrap_or("unnamed"),
                h.multiplier
            ),
            None if is_weekend => format!("{} is a weekend day", local_date),
            None => format!("{} is a regular weekday", local_date),
        },
    );

    let pay = if shift.is_open() {
        push(
            "pay_calculation",
            "Pay Calculation",
            serde_json::json!({ "open": true }),
            serde_json::json!({ "amount": null }),
            "Shift is still open; pay is computed once it ends".to_string(),
        );
        None
    } else {
        let breakdown = calculate_pay_breakdown(
            minutes.total_minutes,
            rate_plan,
            PremiumMinutes::from(&minutes),
            PayContext {
                is_weekend,
                holiday_multiplier,
            },
        )?;
        push(
            "pay_calculation",
            "Pay Calculation",
            serde_json::json!({
                "rate_plan_id": rate_plan.id(),
                "base_rate_hourly": rate_plan.base_rate_hourly().to_string(),
                "total_minutes": minutes.total_minutes,
                "overtime_minutes": minutes.overtime_minutes,
                "night_minutes": minutes.night_minutes,
                "overtime_multiplier": rate_plan.overtime_multiplier().to_string(),
                "night_multiplier": rate_plan.night_multiplier().to_string(),
                "weekend_multiplier": breakdown.weekend_multiplier.to_string(),
                "holiday_multiplier": breakdown.holiday_multiplier.to_string(),
            }),
            serde_json::json!({
                "base": breakdown.base.to_string(),
                "overtime_bonus": breakdown.overtime_bonus.to_string(),
                "night_bonus": breakdown.night_bonus.to_string(),
                "amount": breakdown.amount.to_string(),
                "currency": breakdown.currency,
            }),
            format!(
                "{} {} for {} minutes ({} overtime, {} night)",
                breakdown.amount,
                breakdown.currency,
                minutes.total_minutes,
                minutes.overtime_minutes,
                minutes.night_minutes
            ),
        );
        Some(breakdown)
    };

    tracing::debug!(
        shift_id = %shift.id,
        total_minutes = minutes.total_minutes,
        overtime_minutes = minutes.overtime_minutes,
        night_minutes = minutes.night_minutes,
        is_weekend,
        "Shift calculated"
    );

    Ok(ShiftCalculationResult {
        calculation: ShiftCalculation {
            shift_id: shift.id.clone(),
            employee_id: shift.employee_id.clone(),
            site_id: shift.site_id.clone(),
            local_date,
            is_open: shift.is_open(),
            effective_end: detail.effective_end,
            split: detail.split,
            break_minutes: detail.break_minutes,
            minutes,
            is_weekend,
            holiday_multiplier,
            pay,
        },
        audit_steps: steps,
    })
}

/// Checks a shift's break against minimum break rules.
///
/// A rule applies once `worked_minutes` exceeds `after_hours`; it is violated
/// when the shift's break is shorter than `min_minutes`. One warning is
/// returned per violated rule. The check never changes pay.
///
/// ```
/// use timesheet_engine::calculation::check_min_breaks;
/// use timesheet_engine::models::{MinBreakRule, Shift};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let shift = Shift {
///     id: "shift_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     site_id: None,
///     start: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
///     end: Some(Utc.with_ymd_and_hms(2024, 5, 1, 16, 0, 0).unwrap()),
///     break_minutes: 15,
///     time_zone: chrono_tz::UTC,
/// };
/// let rules = [MinBreakRule { after_hours: Decimal::from(6), min_minutes: 30 }];
///
/// let warnings = check_min_breaks(&shift, 465, &rules);
/// assert_eq!(warnings.len(), 1);
/// ```
pub fn check_min_breaks(
    shift: &Shift,
    worked_minutes: i64,
    rules: &[MinBreakRule],
) -> Vec<AuditWarning> {
    let worked_hours = Decimal::from(worked_minutes) / MINUTES_PER_HOUR;
    let break_minutes = shift.break_minutes.max(0);

    rules
        .iter()
        .filter(|rule| worked_hours > rule.after_hours && break_minutes < rule.min_minutes)
        .map(|rule| AuditWarning {
            code: MIN_BREAK_WARNING_CODE.to_string(),
            message: format!(
                "Shift '{}' worked {} hours with a {} minute break; at least {} minutes required after {} hours",
                shift.id,
                worked_hours.round_dp(2).normalize(),
                break_minutes,
                rule.min_minutes,
                rule.after_hours
            ),
            severity: "low".to_string(),
            shift_id: Some(shift.id.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{NightWindow, RoundingMode, RoundingRule, RoundingUnit};
    use chrono::{Duration, TimeZone};
    use chrono_tz::Tz;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn make_shift(start: DateTime<Utc>, end: Option<DateTime<Utc>>, break_minutes: i64) -> Shift {
        Shift {
            id: "shift_001".to_string(),
            employee_id: "emp_001".to_string(),
            site_id: Some("site_north".to_string()),
            start,
            end,
            break_minutes,
            time_zone: Tz::UTC,
        }
    }

    fn field_crew_plan() -> RatePlan {
        RatePlan::builder("field_crew", "RUB", dec("600"))
            .overtime_multiplier(dec("1.5"))
            .night_multiplier(dec("1.4"))
            .weekend_multiplier(dec("2"))
            .build()
            .unwrap()
    }

    fn now() -> DateTime<Utc> {
        utc(2030, 1, 1, 0, 0)
    }

    #[test]
    fn test_weekday_shift_pay() {
        // Wednesday 08:00-20:00: 720 minutes, 240 overtime.
        let shift = make_shift(utc(2024, 5, 1, 8, 0), Some(utc(2024, 5, 1, 20, 0)), 0);
        let result = calculate_shift(&shift, &Settings::default(), &field_crew_plan(), &[], now(), 1).unwrap();
        let calc = result.calculation;

        assert!(!calc.is_weekend);
        assert_eq!(calc.holiday_multiplier, None);
        assert_eq!(calc.minutes.overtime_minutes, 240);
        // 7200 base + 240 * 10 * 0.5 = 1200
        assert_eq!(calc.amount(), dec("8400.00"));
        assert_eq!(calc.site_id.as_deref(), Some("site_north"));
    }

    #[test]
    fn test_saturday_night_shift_uses_weekend_multiplier() {
        // Saturday 20:00 → Sunday 08:00 with 45 minute break.
        let shift = make_shift(utc(2024, 5, 4, 20, 0), Some(utc(2024, 5, 5, 8, 0)), 45);
        let result = calculate_shift(&shift, &Settings::default(), &field_crew_plan(), &[], now(), 1).unwrap();
        let calc = result.calculation;

        assert!(calc.is_weekend);
        assert_eq!(calc.minutes.total_minutes, 675);
        assert_eq!(calc.minutes.overtime_minutes, 195);
        assert_eq!(calc.minutes.night_minutes, 480);
        // per minute at weekend x2 = 20
        // base 675*20 = 13500, ot 195*20*0.5 = 1950, night 480*20*0.4 = 3840
        assert_eq!(calc.amount(), dec("19290.00"));
    }

    #[test]
    fn test_friday_overnight_is_weekday() {
        let shift = make_shift(utc(2024, 5, 3, 22, 0), Some(utc(2024, 5, 4, 6, 0)), 0);
        let result = calculate_shift(&shift, &Settings::default(), &field_crew_plan(), &[], now(), 1).unwrap();
        assert!(!result.calculation.is_weekend);
        assert_eq!(result.calculation.split.weekend_minutes, 360);
    }

    #[test]
    fn test_holiday_on_local_start_date() {
        // 2024-05-09 is a Thursday. In Moscow the shift starts at 01:00 local on the 9th.
        let mut shift = make_shift(utc(2024, 5, 8, 22, 0), Some(utc(2024, 5, 9, 6, 0)), 0);
        shift.time_zone = chrono_tz::Europe::Moscow;
        let holidays = vec![Holiday::new(
            NaiveDate::from_ymd_opt(2024, 5, 9).unwrap(),
            Some("Victory Day".to_string()),
            dec("2"),
        )
        .unwrap()];

        let result = calculate_shift(&shift, &Settings::default(), &field_crew_plan(), &holidays, now(), 1).unwrap();
        let calc = result.calculation;
        assert_eq!(calc.local_date, NaiveDate::from_ymd_opt(2024, 5, 9).unwrap());
        assert_eq!(calc.holiday_multiplier, Some(dec("2")));

        // Same instants in UTC start on the 8th: no holiday.
        shift.time_zone = Tz::UTC;
        let result = calculate_shift(&shift, &Settings::default(), &field_crew_plan(), &holidays, now(), 1).unwrap();
        assert_eq!(result.calculation.holiday_multiplier, None);
    }

    #[test]
    fn test_open_shift_has_minutes_but_no_pay() {
        let start = utc(2024, 5, 1, 8, 0);
        let shift = make_shift(start, None, 0);
        let result = calculate_shift(
            &shift,
            &Settings::default(),
            &field_crew_plan(),
            &[],
            start + Duration::hours(3),
            1,
        )
        .unwrap();
        let calc = result.calculation;
        assert!(calc.is_open);
        assert_eq!(calc.minutes.total_minutes, 180);
        assert_eq!(calc.pay, None);
        assert_eq!(calc.amount(), Decimal::ZERO);
    }

    #[test]
    fn test_invalid_range_propagates() {
        let at = utc(2024, 5, 1, 8, 0);
        let shift = make_shift(at, Some(at), 0);
        let err = calculate_shift(&shift, &Settings::default(), &field_crew_plan(), &[], now(), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }

    #[test]
    fn test_audit_steps_are_numbered_from_start() {
        let shift = make_shift(utc(2024, 5, 1, 8, 0), Some(utc(2024, 5, 1, 16, 0)), 30);
        let result = calculate_shift(&shift, &Settings::default(), &field_crew_plan(), &[], now(), 7).unwrap();

        let rule_ids: Vec<&str> = result.audit_steps.iter().map(|s| s.rule_id.as_str()).collect();
        assert_eq!(
            rule_ids,
            vec![
                "interval_split",
                "break_deduction",
                "overtime_threshold",
                "calendar_context",
                "pay_calculation"
            ]
        );
        let numbers: Vec<u32> = result.audit_steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![7, 8, 9, 10, 11]);
        assert!(result.audit_steps.iter().all(|s| s.shift_id.as_deref() == Some("shift_001")));
    }

    #[test]
    fn test_rounding_adds_audit_step() {
        let rule = RoundingRule {
            unit: RoundingUnit::FifteenMinutes,
            mode: RoundingMode::Ceil,
        };
        let settings = Settings::new(NightWindow::default(), 480, Some(rule)).unwrap();
        let shift = make_shift(utc(2024, 5, 1, 8, 0), Some(utc(2024, 5, 1, 9, 1)), 0);
        let result = calculate_shift(&shift, &settings, &field_crew_plan(), &[], now(), 1).unwrap();

        assert_eq!(result.calculation.minutes.total_minutes, 75);
        let rounding = result
            .audit_steps
            .iter()
            .find(|s| s.rule_id == "minute_rounding")
            .unwrap();
        assert_eq!(rounding.input["minutes"], 61);
        assert_eq!(rounding.output["minutes"], 75);
    }

    #[test]
    fn test_min_break_warning_when_break_short() {
        let shift = make_shift(utc(2024, 5, 1, 8, 0), Some(utc(2024, 5, 1, 16, 0)), 15);
        let rules = [MinBreakRule {
            after_hours: dec("6"),
            min_minutes: 30,
        }];
        let warnings = check_min_breaks(&shift, 465, &rules);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, MIN_BREAK_WARNING_CODE);
        assert_eq!(warnings[0].shift_id.as_deref(), Some("shift_001"));
        assert!(warnings[0].message.contains("30 minutes"));
    }

    #[test]
    fn test_min_break_not_applicable_below_threshold() {
        let shift = make_shift(utc(2024, 5, 1, 8, 0), Some(utc(2024, 5, 1, 13, 0)), 0);
        let rules = [MinBreakRule {
            after_hours: dec("6"),
            min_minutes: 30,
        }];
        assert!(check_min_breaks(&shift, 300, &rules).is_empty());
        // Exactly at the threshold does not trigger.
        assert!(check_min_breaks(&shift, 360, &rules).is_empty());
    }

    #[test]
    fn test_min_break_satisfied() {
        let shift = make_shift(utc(2024, 5, 1, 8, 0), Some(utc(2024, 5, 1, 18, 0)), 45);
        let rules = [
            MinBreakRule {
                after_hours: dec("6"),
                min_minutes: 30,
            },
            MinBreakRule {
                after_hours: dec("9"),
                min_minutes: 45,
            },
        ];
        assert!(check_min_breaks(&shift, 555, &rules).is_empty());
    }

    #[test]
    fn test_min_break_one_warning_per_violated_rule() {
        let shift = make_shift(utc(2024, 5, 1, 8, 0), Some(utc(2024, 5, 1, 18, 0)), 0);
        let rules = [
            MinBreakRule {
                after_hours: dec("6"),
                min_minutes: 30,
            },
            MinBreakRule {
                after_hours: dec("9"),
                min_minutes: 45,
            },
        ];
        assert_eq!(check_min_breaks(&shift, 600, &rules).len(), 2);
    }
}
