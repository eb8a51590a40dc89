//! Rate plan model.
//!
//! A [`RatePlan`] holds an hourly base rate and the premium multipliers used
//! by the pay calculator. Optional multipliers are resolved to their defaults
//! once, when the plan is built, so a plan never carries an "unset" value.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// Default overtime multiplier (150%).
pub const DEFAULT_OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);
/// Default night multiplier (120%).
pub const DEFAULT_NIGHT_MULTIPLIER: Decimal = Decimal::from_parts(12, 0, 0, false, 1);
/// Default weekend multiplier (200%).
pub const DEFAULT_WEEKEND_MULTIPLIER: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// A validated pay rate plan.
///
/// Build one with [`RatePlan::builder`].
///
/// # Example
///
/// ```
/// use timesheet_engine::models::RatePlan;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let plan = RatePlan::builder("standard", "RUB", Decimal::from(600))
///     .night_multiplier(Decimal::from_str("1.4").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(plan.currency(), "RUB");
/// assert_eq!(plan.overtime_multiplier(), Decimal::from_str("1.5").unwrap());
/// assert_eq!(plan.night_multiplier(), Decimal::from_str("1.4").unwrap());
/// assert_eq!(plan.weekend_multiplier(), Decimal::from(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatePlan {
    id: String,
    currency: String,
    base_rate_hourly: Decimal,
    overtime_multiplier: Decimal,
    night_multiplier: Decimal,
    weekend_multiplier: Decimal,
}

impl RatePlan {
    /// Starts building a plan with the required fields.
    pub fn builder(
        id: impl Into<String>,
        currency: impl Into<String>,
        base_rate_hourly: Decimal,
    ) -> RatePlanBuilder {
        RatePlanBuilder {
            id: id.into(),
            currency: currency.into(),
            base_rate_hourly,
            overtime_multiplier: None,
            night_multiplier: None,
            weekend_multiplier: None,
        }
    }

    /// The plan identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// ISO-4217 currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Base pay per hour.
    pub fn base_rate_hourly(&self) -> Decimal {
        self.base_rate_hourly
    }

    /// Multiplier applied to overtime minutes.
    pub fn overtime_multiplier(&self) -> Decimal {
        self.overtime_multiplier
    }

    /// Multiplier applied to night minutes.
    pub fn night_multiplier(&self) -> Decimal {
        self.night_multiplier
    }

    /// Multiplier applied to the whole shift when it falls on a weekend.
    pub fn weekend_multiplier(&self) -> Decimal {
        self.weekend_multiplier
    }
}

/// Builder for [`RatePlan`].
#[derive(Debug, Clone)]
pub struct RatePlanBuilder {
    id: String,
    currency: String,
    base_rate_hourly: Decimal,
    overtime_multiplier: Option<Decimal>,
    night_multiplier: Option<Decimal>,
    weekend_multiplier: Option<Decimal>,
}

impl RatePlanBuilder {
    /// Sets the overtime multiplier (must be >= 1).
    pub fn overtime_multiplier(mut self, multiplier: Decimal) -> Self {
        self.overtime_multiplier = Some(multiplier);
        self
    }

    /// Sets the night multiplier (must be >= 1).
    pub fn night_multiplier(mut self, multiplier: Decimal) -> Self {
        self.night_multiplier = Some(multiplier);
        self
    }

    /// Sets the weekend multiplier (must be >= 1).
    pub fn weekend_multiplier(mut self, multiplier: Decimal) -> Self {
        self.weekend_multiplier = Some(multiplier);
        self
    }

    /// Sets any multipliers that are `Some`, leaving the rest at their defaults.
    pub fn multipliers(
        mut self,
        overtime: Option<Decimal>,
        night: Option<Decimal>,
        weekend: Option<Decimal>,
    ) -> Self {
        self.overtime_multiplier = overtime.or(self.overtime_multiplier);
        self.night_multiplier = night.or(self.night_multiplier);
        self.weekend_multiplier = weekend.or(self.weekend_multiplier);
        self
    }

    /// Validates the fields and builds the plan.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if:
    /// - the currency is not three ASCII uppercase letters
    /// - the base rate is negative
    /// - any supplied multiplier is below 1
    pub fn build(self) -> EngineResult<RatePlan> {
        validate_currency(&self.currency)?;

        if self.base_rate_hourly < Decimal::ZERO {
            return Err(EngineError::configuration(
                "base_rate_hourly",
                format!("must be >= 0, got {}", self.base_rate_hourly),
            ));
        }

        let overtime_multiplier = resolve_multiplier(
            "overtime_multiplier",
            self.overtime_multiplier,
            DEFAULT_OVERTIME_MULTIPLIER,
        )?;
        let night_multiplier = resolve_multiplier(
            "night_multiplier",
            self.night_multiplier,
            DEFAULT_NIGHT_MULTIPLIER,
        )?;
        let weekend_multiplier = resolve_multiplier(
            "weekend_multiplier",
            self.weekend_multiplier,
            DEFAULT_WEEKEND_MULTIPLIER,
        )?;

        Ok(RatePlan {
            id: self.id,
            currency: self.currency,
            base_rate_hourly: self.base_rate_hourly,
            overtime_multiplier,
            night_multiplier,
            weekend_multiplier,
        })
    }
}

fn resolve_multiplier(
    field: &str,
    supplied: Option<Decimal>,
    default: Decimal,
) -> EngineResult<Decimal> {
    match supplied {
        None => Ok(default),
        Some(value) if value < Decimal::ONE => Err(EngineError::configuration(
            field,
            format!("must be >= 1, got {}", value),
        )),
        Some(value) => Ok(value),
    }
}

fn validate_currency(code: &str) -> EngineResult<()> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(EngineError::configuration(
            "currency",
            format!("expected a three-letter ISO-4217 code, got '{}'", code),
        ))
    }
}
