//! Holiday model.
//!
//! A [`Holiday`] marks a local calendar date on which pay is scaled by a
//! multiplier.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents a paid holiday.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::Holiday;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let holiday = Holiday::new(
///     NaiveDate::from_ymd_opt(2024, 5, 9).unwrap(),
///     Some("Victory Day".to_string()),
///     Decimal::from(2),
/// )
/// .unwrap();
/// assert_eq!(holiday.multiplier, Decimal::from(2));
///
/// assert!(Holiday::new(NaiveDate::from_ymd_opt(2024, 5, 9).unwrap(), None, Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The local calendar date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    #[serde(default)]
    pub name: Option<String>,
    /// Multiplier applied to all pay on this date.
    pub multiplier: Decimal,
}

impl Holiday {
    /// Creates a holiday; the multiplier must be positive.
    pub fn new(date: NaiveDate, name: Option<String>, multiplier: Decimal) -> EngineResult<Self> {
        let holiday = Self {
            date,
            name,
            multiplier,
        };
        holiday.validate()?;
        Ok(holiday)
    }

    /// Checks that the multiplier is positive.
    pub fn validate(&self) -> EngineResult<()> {
        if self.multiplier <= Decimal::ZERO {
            return Err(EngineError::configuration(
                "holiday.multiplier",
                format!("must be > 0 on {}, got {}", self.date, self.multiplier),
            ));
        }
        Ok(())
    }
}

/// Finds the holiday on the given date, if any.
///
/// When several entries share a date, the first one wins.
pub fn find_holiday(holidays: &[Holiday], date: NaiveDate) -> Option<&Holiday> {
    holidays.iter().find(|h| h.date == date)
}
