//! Pay calculation.
//!
//! This module turns minute buckets into a money amount using a
//! [`RatePlan`].
//!
//! ## Formula
//!
//! With `minute_rate = base_rate_hourly / 60`, a scale factor
//! `k = weekend × holiday` (each 1 when not applicable):
//!
//! - `base = total × minute_rate × k`
//! - `overtime_bonus = overtime × minute_rate × (overtime_multiplier − 1) × k`
//! - `night_bonus = night × minute_rate × (night_multiplier − 1) × k`
//! - `amount = round2(base + overtime_bonus + night_bonus)`
//!
//! Overtime and night are additive premiums on top of base pay, so a night
//! overtime minute earns both bonuses.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::RatePlan;

use super::shift_minutes::ClassifiedMinutes;

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Decimal places money amounts are rounded to.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Minutes that attract a premium on top of base pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumMinutes {
    /// Minutes above the overtime threshold.
    pub overtime_minutes: i64,
    /// Minutes inside the night window.
    pub night_minutes: i64,
}

impl From<&ClassifiedMinutes> for PremiumMinutes {
    fn from(minutes: &ClassifiedMinutes) -> Self {
        Self {
            overtime_minutes: minutes.overtime_minutes,
            night_minutes: minutes.night_minutes,
        }
    }
}

/// Calendar context that scales the whole shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayContext {
    /// Whether the weekend multiplier applies.
    pub is_weekend: bool,
    /// Holiday multiplier, if the shift falls on a holiday.
    #[serde(default)]
    pub holiday_multiplier: Option<Decimal>,
}

/// The components of a pay calculation.
///
/// Components are kept unrounded; only `amount` is rounded to the currency's
/// minor unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayBreakdown {
    /// ISO-4217 currency code from the rate plan.
    pub currency: String,
    /// Base pay for all worked minutes.
    pub base: Decimal,
    /// Overtime premium.
    pub overtime_bonus: Decimal,
    /// Night premium.
    pub night_bonus: Decimal,
    /// Weekend multiplier that was applied (1 on weekdays).
    pub weekend_multiplier: Decimal,
    /// Holiday multiplier that was applied (1 when none).
    pub holiday_multiplier: Decimal,
    /// `round2(base + overtime_bonus + night_bonus)`.
    pub amount: Decimal,
}

/// Calculates the pay amount for a shift's minute buckets.
///
/// # Errors
///
/// Returns `NegativeInput` if `total_minutes`, `overtime_minutes` or
/// `night_minutes` is negative, and `Overflow` if the amount exceeds the
/// decimal range.
///
/// # Examples
///
/// ```
/// use timesheet_engine::calculation::{calculate_pay, PayContext, PremiumMinutes};
/// use timesheet_engine::models::RatePlan;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let plan = RatePlan::builder("standard", "RUB", Decimal::from(600))
///     .overtime_multiplier(Decimal::from_str("1.5").unwrap())
///     .night_multiplier(Decimal::from_str("1.4").unwrap())
///     .weekend_multiplier(Decimal::from(2))
///     .build()
///     .unwrap();
///
/// let amount = calculate_pay(
///     600,
///     &plan,
///     PremiumMinutes { overtime_minutes: 120, night_minutes: 180 },
///     PayContext { is_weekend: true, holiday_multiplier: Some(Decimal::from(2)) },
/// )
/// .unwrap();
///
/// // base 24000 + overtime 2400 + night 2880
/// assert_eq!(amount, Decimal::from_str("29280.00").unwrap());
/// ```
pub fn calculate_pay(
    total_minutes: i64,
    rate_plan: &RatePlan,
    premiums: PremiumMinutes,
    context: PayContext,
) -> EngineResult<Decimal> {
    calculate_pay_breakdown(total_minutes, rate_plan, premiums, context)
        .map(|breakdown| breakdown.amount)
}

/// Like [`calculate_pay`], but returns every component of the amount.
pub fn calculate_pay_breakdown(
    total_minutes: i64,
    rate_plan: &RatePlan,
    premiums: PremiumMinutes,
    context: PayContext,
) -> EngineResult<PayBreakdown> {
    check_non_negative("total_minutes", total_minutes)?;
    check_non_negative("overtime_minutes", premiums.overtime_minutes)?;
    check_non_negative("night_minutes", premiums.night_minutes)?;

    let weekend_multiplier = if context.is_weekend {
        rate_plan.weekend_multiplier()
    } else {
        Decimal::ONE
    };
    let holiday_multiplier = context.holiday_multiplier.unwrap_or(Decimal::ONE);

    if total_minutes == 0 {
        return Ok(PayBreakdown {
            currency: rate_plan.currency().to_string(),
            base: Decimal::ZERO,
            overtime_bonus: Decimal::ZERO,
            night_bonus: Decimal::ZERO,
            weekend_multiplier,
            holiday_multiplier,
            amount: Decimal::ZERO,
        });
    }

    // Multiply first, divide by 60 last, to keep the decimal result exact
    // wherever the inputs allow it.
    let scale = rate_plan
        .base_rate_hourly()
        .checked_mul(weekend_multiplier)
        .and_then(|v| v.checked_mul(holiday_multiplier))
        .ok_or_else(|| EngineError::overflow("rate"))?;
    let per_hour = |field: &str, minutes: i64, factor: Decimal| {
        Decimal::from(minutes)
            .checked_mul(scale)
            .and_then(|v| v.checked_mul(factor))
            .and_then(|v| v.checked_div(MINUTES_PER_HOUR))
            .ok_or_else(|| EngineError::overflow(field))
    };

    let base = per_hour("base", total_minutes, Decimal::ONE)?;
    let overtime_bonus = per_hour(
        "overtime_bonus",
        premiums.overtime_minutes,
        rate_plan.overtime_multiplier() - Decimal::ONE,
    )?;
    let night_bonus = per_hour(
        "night_bonus",
        premiums.night_minutes,
        rate_plan.night_multiplier() - Decimal::ONE,
    )?;

    let amount = base
        .checked_add(overtime_bonus)
        .and_then(|v| v.checked_add(night_bonus))
        .map(round_currency)
        .ok_or_else(|| EngineError::overflow("amount"))?;

    Ok(PayBreakdown {
        currency: rate_plan.currency().to_string(),
        base,
        overtime_bonus,
        night_bonus,
        weekend_multiplier,
        holiday_multiplier,
        amount,
    })
}

/// Rounds a money value to two decimal places, halves away from zero.
///
/// ```
/// use timesheet_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("10.005").unwrap()), Decimal::from_str("10.01").unwrap());
/// assert_eq!(round_currency(Decimal::from_str("10.004").unwrap()), Decimal::from_str("10.00").unwrap());
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

fn check_non_negative(field: &str, minutes: i64) -> EngineResult<()> {
    if minutes < 0 {
        return Err(EngineError::negative_input(field, minutes));
    }
    Ok(())
}
