//! Overtime allocation.
//!
//! This module splits worked hours into regular and overtime portions, either
//! for a single day or for a seven-day week under one of three
//! [`OvertimeMode`]s. Hours are [`Decimal`] so that `regular + overtime`
//! always equals the hours worked exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::OvertimeMode;

/// Number of working days the weekly threshold is spread over when a
/// per-day threshold is derived from it.
pub const WORKING_DAYS_PER_WEEK: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Hours split into regular and overtime portions.
///
/// # Example
///
/// ```
/// use timesheet_engine::calculation::OvertimeSplit;
/// use rust_decimal::Decimal;
///
/// let split = OvertimeSplit {
///     regular: Decimal::from(8),
///     overtime: Decimal::from(2),
/// };
/// assert_eq!(split.total(), Decimal::from(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeSplit {
    /// Hours paid at the regular rate.
    pub regular: Decimal,
    /// Hours paid as overtime.
    pub overtime: Decimal,
}

impl OvertimeSplit {
    /// Regular plus overtime hours.
    pub fn total(&self) -> Decimal {
        self.regular + self.overtime
    }
}

/// Splits one day's hours at a threshold.
///
/// `regular = min(hours, threshold)` and `overtime = max(hours - threshold, 0)`.
///
/// # Errors
///
/// - `NegativeInput` if `hours` is negative
/// - `Configuration` if `threshold` is negative
///
/// # Examples
///
/// ```
/// use timesheet_engine::calculation::daily_overtime;
/// use rust_decimal::Decimal;
///
/// let split = daily_overtime(Decimal::from(10), Decimal::from(8)).unwrap();
/// assert_eq!(split.regular, Decimal::from(8));
/// assert_eq!(split.overtime, Decimal::from(2));
///
/// let split = daily_overtime(Decimal::from(6), Decimal::from(8)).unwrap();
/// assert_eq!(split.regular, Decimal::from(6));
/// assert_eq!(split.overtime, Decimal::ZERO);
/// ```
pub fn daily_overtime(hours: Decimal, threshold: Decimal) -> EngineResult<OvertimeSplit> {
    if hours < Decimal::ZERO {
        return Err(EngineError::negative_input("hours", hours));
    }
    check_threshold("daily_threshold_hours", threshold)?;
    Ok(split_at(hours, threshold))
}

/// Splits a week of daily hours into regular and overtime.
///
/// - [`OvertimeMode::PreferWeekly`]: overtime is `max(total - weekly_threshold, 0)`.
/// - [`OvertimeMode::PreferDaily`]: each day is split at `weekly_threshold / 5`;
///   overtime is `total - sum(daily regular)`.
/// - [`OvertimeMode::Split`]: the daily overtime sum, topped up with whatever
///   the weekly trigger yields beyond it. Never less than either of the
///   other two modes.
///
/// In every mode `regular + overtime == sum(hours_by_day)`.
///
/// # Errors
///
/// - `NegativeInput` if any day's hours are negative
/// - `Configuration` if `weekly_threshold` is negative
///
/// # Examples
///
/// ```
/// use timesheet_engine::calculation::weekly_overtime;
/// use timesheet_engine::models::OvertimeMode;
/// use rust_decimal::Decimal;
///
/// let week = [8, 8, 8, 8, 8, 4, 0].map(Decimal::from);
/// let split = weekly_overtime(&week, Decimal::from(40), OvertimeMode::PreferWeekly).unwrap();
/// assert_eq!(split.overtime, Decimal::from(4));
///
/// let week = [9, 9, 9, 9, 9, 0, 0].map(Decimal::from);
/// let split = weekly_overtime(&week, Decimal::from(40), OvertimeMode::Split).unwrap();
/// assert_eq!(split.overtime, Decimal::from(5));
/// assert_eq!(split.regular, Decimal::from(40));
/// ```
pub fn weekly_overtime(
    hours_by_day: &[Decimal; 7],
    weekly_threshold: Decimal,
    mode: OvertimeMode,
) -> EngineResult<OvertimeSplit> {
    for (day, hours) in hours_by_day.iter().enumerate() {
        if *hours < Decimal::ZERO {
            return Err(EngineError::negative_input(
                format!("hours_by_day[{}]", day),
                hours,
            ));
        }
    }
    check_threshold("weekly_threshold_hours", weekly_threshold)?;

    let total: Decimal = hours_by_day.iter().copied().sum();
    let weekly_excess = (total - weekly_threshold).max(Decimal::ZERO);
    let daily_threshold = weekly_threshold / WORKING_DAYS_PER_WEEK;

    let split = match mode {
        OvertimeMode::PreferWeekly => OvertimeSplit {
            regular: total - weekly_excess,
            overtime: weekly_excess,
        },
        OvertimeMode::PreferDaily => {
            let regular: Decimal = hours_by_day
                .iter()
                .map(|hours| split_at(*hours, daily_threshold).regular)
                .sum();
            OvertimeSplit {
                regular,
                overtime: (total - regular).max(Decimal::ZERO),
            }
        }
        OvertimeMode::Split => {
            let daily_sum: Decimal = hours_by_day
                .iter()
                .map(|hours| split_at(*hours, daily_threshold).overtime)
                .sum();
            let remaining = (weekly_excess - daily_sum).max(Decimal::ZERO);
            OvertimeSplit {
                regular: total - daily_sum - remaining,
                overtime: daily_sum + remaining,
            }
        }
    };

    tracing::debug!(
        mode = ?mode,
        total = %total,
        regular = %split.regular,
        overtime = %split.overtime,
        "Weekly overtime allocated"
    );

    Ok(split)
}

fn split_at(hours: Decimal, threshold: Decimal) -> OvertimeSplit {
    OvertimeSplit {
        regular: hours.min(threshold),
        overtime: (hours - threshold).max(Decimal::ZERO),
    }
}

fn check_threshold(field: &str, threshold: Decimal) -> EngineResult<()> {
    if threshold < Decimal::ZERO {
        return Err(EngineError::configuration(
            field,
            format!("must be >= 0, got {}", threshold),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn week(hours: [&str; 7]) -> [Decimal; 7] {
        hours.map(dec)
    }

    const MODES: [OvertimeMode; 3] = [
        OvertimeMode::PreferDaily,
        OvertimeMode::PreferWeekly,
        OvertimeMode::Split,
    ];

    #[test]
    fn test_daily_exactly_at_threshold() {
        let split = daily_overtime(dec("8"), dec("8")).unwrap();
        assert_eq!(split.regular, dec("8"));
        assert_eq!(split.overtime, Decimal::ZERO);
    }

    #[test]
    fn test_daily_fractional_excess() {
        let split = daily_overtime(dec("8.25"), dec("8")).unwrap();
        assert_eq!(split.regular, dec("8"));
        assert_eq!(split.overtime, dec("0.25"));
    }

    #[test]
    fn test_daily_rejects_negative_hours() {
        let err = daily_overtime(dec("-1"), dec("8")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NegativeInput);
    }

    #[test]
    fn test_daily_rejects_negative_threshold() {
        let err = daily_overtime(dec("4"), dec("-8")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_prefer_weekly_ignores_long_days() {
        // 12h Monday, nothing else: under 40 weekly, no overtime.
        let split = weekly_overtime(
            &week(["12", "0", "0", "0", "0", "0", "0"]),
            dec("40"),
            OvertimeMode::PreferWeekly,
        )
        .unwrap();
        assert_eq!(split.overtime, Decimal::ZERO);
        assert_eq!(split.regular, dec("12"));
    }

    #[test]
    fn test_prefer_daily_uses_fifth_of_weekly_threshold() {
        // Threshold 40 → 8h per day. 12h Monday yields 4h overtime.
        let split = weekly_overtime(
            &week(["12", "0", "0", "0", "0", "0", "0"]),
            dec("40"),
            OvertimeMode::PreferDaily,
        )
        .unwrap();
        assert_eq!(split.overtime, dec("4"));
        assert_eq!(split.regular, dec("8"));
    }

    #[test]
    fn test_prefer_daily_counts_weekend_days_against_same_threshold() {
        // Seven 8h days: every day at threshold, so no daily overtime.
        let split = weekly_overtime(
            &week(["8", "8", "8", "8", "8", "8", "8"]),
            dec("40"),
            OvertimeMode::PreferDaily,
        )
        .unwrap();
        assert_eq!(split.overtime, Decimal::ZERO);
        assert_eq!(split.regular, dec("56"));
    }

    #[test]
    fn test_split_adds_weekly_remainder() {
        // Seven 8h days: daily 0, weekly 16 → split takes the weekly 16.
        let split = weekly_overtime(
            &week(["8", "8", "8", "8", "8", "8", "8"]),
            dec("40"),
            OvertimeMode::Split,
        )
        .unwrap();
        assert_eq!(split.overtime, dec("16"));
        assert_eq!(split.regular, dec("40"));
    }

    #[test]
    fn test_split_keeps_daily_when_larger() {
        // One 16h day: daily 8, weekly 0 → split keeps 8.
        let split = weekly_overtime(
            &week(["16", "0", "0", "0", "0", "0", "0"]),
            dec("40"),
            OvertimeMode::Split,
        )
        .unwrap();
        assert_eq!(split.overtime, dec("8"));
    }

    #[test]
    fn test_non_integer_daily_threshold() {
        // 38h week → 7.6h per day.
        let split = weekly_overtime(
            &week(["8", "0", "0", "0", "0", "0", "0"]),
            dec("38"),
            OvertimeMode::PreferDaily,
        )
        .unwrap();
        assert_eq!(split.overtime, dec("0.4"));
    }

    #[test]
    fn test_zero_threshold_makes_everything_overtime() {
        for mode in MODES {
            let split = weekly_overtime(
                &week(["1", "2", "0", "0", "0", "0", "0"]),
                Decimal::ZERO,
                mode,
            )
            .unwrap();
            assert_eq!(split.overtime, dec("3"), "{:?}", mode);
            assert_eq!(split.regular, Decimal::ZERO, "{:?}", mode);
        }
    }

    #[test]
    fn test_weekly_rejects_negative_day() {
        let err = weekly_overtime(
            &week(["8", "-1", "0", "0", "0", "0", "0"]),
            dec("40"),
            OvertimeMode::Split,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NegativeInput);
        assert!(err.to_string().contains("hours_by_day[1]"));
    }

    fn hours_strategy() -> impl Strategy<Value = [Decimal; 7]> {
        // Quarter-hour resolution up to 16h per day.
        prop::array::uniform7(0i64..=64).prop_map(|q| q.map(|n| Decimal::new(n * 25, 2)))
    }

    proptest! {
        #[test]
        fn prop_additivity_holds_in_every_mode(
            hours in hours_strategy(),
            threshold in 0i64..=60,
        ) {
            let threshold = Decimal::from(threshold);
            let total: Decimal = hours.iter().copied().sum();
            for mode in MODES {
                let split = weekly_overtime(&hours, threshold, mode).unwrap();
                prop_assert_eq!(split.regular + split.overtime, total);
                prop_assert!(split.overtime >= Decimal::ZERO);
                prop_assert!(split.regular >= Decimal::ZERO);
            }
        }

        #[test]
        fn prop_split_dominates_daily_and_weekly(
            hours in hours_strategy(),
            threshold in 0i64..=60,
        ) {
            let threshold = Decimal::from(threshold);
            let daily = weekly_overtime(&hours, threshold, OvertimeMode::PreferDaily).unwrap();
            let weekly = weekly_overtime(&hours, threshold, OvertimeMode::PreferWeekly).unwrap();
            let split = weekly_overtime(&hours, threshold, OvertimeMode::Split).unwrap();
            prop_assert!(split.overtime >= daily.overtime);
            prop_assert!(split.overtime >= weekly.overtime);
            prop_assert!(daily.overtime >= Decimal::ZERO);
        }
    }
}
