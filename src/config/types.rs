//! Configuration types for timesheet calculation.
//!
//! This module contains the raw structures deserialized from YAML
//! configuration files (and from request bodies), and their conversions into
//! validated domain models. Raw types accept absent fields; the conversions
//! apply defaults and reject invalid values with `Configuration` errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    DEFAULT_OVERTIME_THRESHOLD_MINUTES, Holiday, MinBreakRule, NightWindow, NightWindowSpec,
    OvertimeMode, OvertimePolicy, RatePlan, RoundingRule, Settings,
};

fn default_threshold_minutes() -> i64 {
    DEFAULT_OVERTIME_THRESHOLD_MINUTES
}

fn default_daily_threshold_hours() -> Decimal {
    Decimal::from(8)
}

fn default_weekly_threshold_hours() -> Decimal {
    Decimal::from(40)
}

/// Per-shift classification settings.
///
/// # Example
///
/// ```
/// use timesheet_engine::config::SettingsConfig;
/// use timesheet_engine::models::Settings;
///
/// let raw: SettingsConfig = serde_json::from_str(
///     r#"{"night_window": {"start": "23:00", "end": "07:00"}}"#,
/// )
/// .unwrap();
/// let settings = Settings::try_from(raw).unwrap();
/// assert_eq!(settings.night_window().start_minute(), 23 * 60);
/// assert_eq!(settings.overtime_threshold_minutes(), 480);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// The night window; 22:00–06:00 when absent.
    #[serde(default)]
    pub night_window: Option<NightWindowSpec>,
    /// Per-shift overtime threshold in minutes.
    #[serde(default = "default_threshold_minutes")]
    pub overtime_threshold_minutes: i64,
    /// Optional rounding of worked minutes.
    #[serde(default)]
    pub rounding: Option<RoundingRule>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            night_window: None,
            overtime_threshold_minutes: DEFAULT_OVERTIME_THRESHOLD_MINUTES,
            rounding: None,
        }
    }
}

impl TryFrom<SettingsConfig> for Settings {
    type Error = EngineError;

    fn try_from(raw: SettingsConfig) -> EngineResult<Self> {
        let night_window = match raw.night_window {
            Some(spec) => NightWindow::try_from(spec)?,
            None => NightWindow::default(),
        };
        Settings::new(night_window, raw.overtime_threshold_minutes, raw.rounding)
    }
}

/// Weekly overtime policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimePolicyConfig {
    /// Hours per day before daily overtime.
    #[serde(default = "default_daily_threshold_hours")]
    pub daily_threshold_hours: Decimal,
    /// Hours per week before weekly overtime.
    #[serde(default = "default_weekly_threshold_hours")]
    pub weekly_threshold_hours: Decimal,
    /// Allocation mode.
    #[serde(default)]
    pub mode: OvertimeMode,
    /// Rounding applied to each day's worked minutes.
    #[serde(default)]
    pub rounding_rule: RoundingRule,
    /// Minimum break requirements.
    #[serde(default)]
    pub min_breaks: Vec<MinBreakRule>,
}

impl Default for OvertimePolicyConfig {
    fn default() -> Self {
        Self {
            daily_threshold_hours: default_daily_threshold_hours(),
            weekly_threshold_hours: default_weekly_threshold_hours(),
            mode: OvertimeMode::default(),
            rounding_rule: RoundingRule::default(),
            min_breaks: Vec::new(),
        }
    }
}

impl TryFrom<OvertimePolicyConfig> for OvertimePolicy {
    type Error = EngineError;

    fn try_from(raw: OvertimePolicyConfig) -> EngineResult<Self> {
        OvertimePolicy::new(
            raw.daily_threshold_hours,
            raw.weekly_threshold_hours,
            raw.mode,
            raw.rounding_rule,
            raw.min_breaks,
        )
    }
}

/// settings.yaml file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsFile {
    /// Per-shift classification settings.
    #[serde(default)]
    pub settings: SettingsConfig,
    /// Weekly overtime policy.
    #[serde(default)]
    pub overtime_policy: OvertimePolicyConfig,
}

/// A rate plan as written in configuration; absent multipliers take the
/// engine defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePlanConfig {
    /// Unique identifier of the plan.
    pub id: String,
    /// ISO-4217 currency code.
    pub currency: String,
    /// Base pay per hour.
    pub base_rate_hourly: Decimal,
    /// Overtime multiplier (default 1.5).
    #[serde(default)]
    pub overtime_multiplier: Option<Decimal>,
    /// Night multiplier (default 1.2).
    #[serde(default)]
    pub night_multiplier: Option<Decimal>,
    /// Weekend multiplier (default 2).
    #[serde(default)]
    pub weekend_multiplier: Option<Decimal>,
}

impl TryFrom<RatePlanConfig> for RatePlan {
    type Error = EngineError;

    fn try_from(raw: RatePlanConfig) -> EngineResult<Self> {
        RatePlan::builder(raw.id, raw.currency, raw.base_rate_hourly)
            .multipliers(
                raw.overtime_multiplier,
                raw.night_multiplier,
                raw.weekend_multiplier,
            )
            .build()
    }
}

/// rate_plans.yaml file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct RatePlansConfig {
    /// The plan used when a request names none.
    pub default_rate_plan: String,
    /// All configured plans.
    pub rate_plans: Vec<RatePlanConfig>,
}

/// A holiday as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayConfig {
    /// The local date.
    pub date: NaiveDate,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Pay multiplier for the date.
    pub multiplier: Decimal,
}

impl TryFrom<HolidayConfig> for Holiday {
    type Error = EngineError;

    fn try_from(raw: HolidayConfig) -> EngineResult<Self> {
        Holiday::new(raw.date, raw.name, raw.multiplier)
    }
}

/// holidays.yaml file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidaysConfig {
    /// The holiday calendar.
    #[serde(default)]
    pub holidays: Vec<HolidayConfig>,
}
