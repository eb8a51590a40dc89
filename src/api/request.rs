//! Request types for the Timesheet Engine API.
//!
//! This module defines the JSON request structures for the `/calculate` endpoint.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::{HolidayConfig, OvertimePolicyConfig, RatePlanConfig, SettingsConfig};
use crate::models::Shift;

use super::response::ApiError;

/// Longest shift the endpoint accepts, measured to `now` for open shifts.
pub const MAX_SHIFT_DURATION_HOURS: i64 = 7 * 24;

/// Request body for the `/calculate` endpoint.
///
/// Contains an employee's shifts plus optional overrides for everything the
/// server otherwise takes from its configuration: rate plan, settings,
/// overtime policy and holidays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The employee whose shifts are calculated.
    pub employee_id: String,
    /// A configured rate plan to use instead of the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_plan_id: Option<String>,
    /// An inline rate plan; mutually exclusive with `rate_plan_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_plan: Option<RatePlanConfig>,
    /// Classification settings overriding the configured ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsConfig>,
    /// Overtime policy overriding the configured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overtime_policy: Option<OvertimePolicyConfig>,
    /// Holiday calendar replacing the configured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holidays: Option<Vec<HolidayConfig>>,
    /// When set, a weekly overtime summary starting on this local date is included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_start: Option<NaiveDate>,
    /// The instant open shifts are measured to; the server clock when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub now: Option<DateTime<Utc>>,
    /// The shifts to calculate.
    pub shifts: Vec<ShiftRequest>,
}

/// Shift information in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRequest {
    /// Unique identifier for the shift.
    pub id: String,
    /// The site the shift was worked at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    /// When the shift started.
    pub start: DateTime<Utc>,
    /// When the shift ended; absent for an open shift.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// Unpaid break minutes.
    #[serde(default)]
    pub break_minutes: i64,
    /// IANA timezone of the site; UTC when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<Tz>,
}

impl ShiftRequest {
    /// Converts the request shift into a [`Shift`] for the given employee.
    pub fn into_shift(self, employee_id: &str) -> Shift {
        Shift {
            id: self.id,
            employee_id: employee_id.to_string(),
            site_id: self.site_id,
            start: self.start,
            end: self.end,
            break_minutes: self.break_minutes,
            time_zone: self.time_zone.unwrap_or(Tz::UTC),
        }
    }
}

impl CalculationRequest {
    /// Checks constraints that the JSON shape alone cannot express.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.employee_id.trim().is_empty() {
            return Err(ApiError::validation_error("employee_id must not be empty"));
        }
        if self.rate_plan.is_some() && self.rate_plan_id.is_some() {
            return Err(ApiError::validation_error(
                "rate_plan and rate_plan_id are mutually exclusive",
            ));
        }
        if self.shifts.is_empty() {
            return Err(ApiError::validation_error("at least one shift is required"));
        }
        let max_duration = Duration::hours(MAX_SHIFT_DURATION_HOURS);
        let now = self.now.unwrap_or_else(Utc::now);
        let mut seen = HashSet::new();
        for shift in &self.shifts {
            if !seen.insert(shift.id.as_str()) {
                return Err(ApiError::validation_error(format!(
                    "duplicate shift id '{}'",
                    shift.id
                )));
            }
            if shift.end.unwrap_or(now) - shift.start > max_duration {
                return Err(ApiError::validation_error(format!(
                    "shift '{}' is longer than {} hours",
                    shift.id, MAX_SHIFT_DURATION_HOURS
                )));
            }
        }
        Ok(())
    }
}
