//! Minute rounding.
//!
//! Quantizes minute values to a configured step (5, 10 or 15 minutes) using
//! ceil, floor or nearest rounding. Ties under `Nearest` go away from zero.

use crate::error::{EngineError, EngineResult};
use crate::models::{RoundingMode, RoundingRule, RoundingUnit};

/// Rounds `minutes` to a multiple of the unit's step.
///
/// # Examples
///
/// ```
/// use timesheet_engine::calculation::round_minutes;
/// use timesheet_engine::models::{RoundingMode, RoundingUnit};
///
/// assert_eq!(round_minutes(12, RoundingUnit::FiveMinutes, RoundingMode::Nearest), 10);
/// assert_eq!(round_minutes(13, RoundingUnit::FiveMinutes, RoundingMode::Nearest), 15);
/// assert_eq!(round_minutes(7, RoundingUnit::FiveMinutes, RoundingMode::Ceil), 10);
/// assert_eq!(round_minutes(14, RoundingUnit::TenMinutes, RoundingMode::Floor), 10);
/// ```
pub fn round_minutes(minutes: i64, unit: RoundingUnit, mode: RoundingMode) -> i64 {
    quantize(minutes, unit.step_minutes(), mode)
}

/// Rounds `minutes` with a [`RoundingRule`].
pub fn apply_rounding(minutes: i64, rule: RoundingRule) -> i64 {
    round_minutes(minutes, rule.unit, rule.mode)
}

/// Rounds `minutes` to a multiple of an arbitrary step.
///
/// A step of zero or less is a misconfiguration and fails with a
/// `Configuration` error rather than passing the input through.
///
/// ```
/// use timesheet_engine::calculation::round_to_step;
/// use timesheet_engine::models::RoundingMode;
///
/// assert_eq!(round_to_step(50, 30, RoundingMode::Nearest).unwrap(), 60);
/// assert!(round_to_step(50, 0, RoundingMode::Nearest).is_err());
/// ```
pub fn round_to_step(minutes: i64, step: i64, mode: RoundingMode) -> EngineResult<i64> {
    if step <= 0 {
        return Err(EngineError::configuration(
            "rounding.step",
            format!("must be > 0, got {}", step),
        ));
    }
    Ok(quantize(minutes, step, mode))
}

fn quantize(minutes: i64, step: i64, mode: RoundingMode) -> i64 {
    let remainder = minutes.rem_euclid(step);
    let floor = minutes - remainder;
    if remainder == 0 {
        return floor;
    }
    let ceil = floor + step;

    match mode {
        RoundingMode::Floor => floor,
        RoundingMode::Ceil => ceil,
        RoundingMode::Nearest => match (2 * remainder).cmp(&step) {
            std::cmp::Ordering::Less => floor,
            std::cmp::Ordering::Greater => ceil,
            // Tie: away from zero.
            std::cmp::Ordering::Equal => {
                if minutes >= 0 {
                    ceil
                } else {
                    floor
                }
            }
        },
    }
}
