//! Organization settings and overtime policy models.
//!
//! [`Settings`] drives per-shift classification (night window, overtime
//! threshold, optional rounding). [`OvertimePolicy`] drives weekly
//! aggregation reporting.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::NightWindow;

/// Default per-shift overtime threshold (8 hours).
pub const DEFAULT_OVERTIME_THRESHOLD_MINUTES: i64 = 480;

/// Step size for minute rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundingUnit {
    /// Five minute steps.
    #[serde(rename = "5m")]
    FiveMinutes,
    /// Ten minute steps.
    #[serde(rename = "10m")]
    TenMinutes,
    /// Fifteen minute steps.
    #[serde(rename = "15m")]
    FifteenMinutes,
}

impl RoundingUnit {
    /// The step size in minutes.
    pub fn step_minutes(&self) -> i64 {
        match self {
            RoundingUnit::FiveMinutes => 5,
            RoundingUnit::TenMinutes => 10,
            RoundingUnit::FifteenMinutes => 15,
        }
    }
}

/// Direction used when quantizing minutes to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Smallest multiple of the step that is not below the value.
    Ceil,
    /// Largest multiple of the step that is not above the value.
    Floor,
    /// Closest multiple of the step; ties go away from zero.
    Nearest,
}

/// A rounding unit paired with a rounding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundingRule {
    /// The step size.
    pub unit: RoundingUnit,
    /// The rounding direction.
    pub mode: RoundingMode,
}

impl Default for RoundingRule {
    fn default() -> Self {
        Self {
            unit: RoundingUnit::FifteenMinutes,
            mode: RoundingMode::Nearest,
        }
    }
}

/// Per-shift classification settings.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::{NightWindow, Settings};
///
/// let settings = Settings::new(NightWindow::parse("22:00", "06:00").unwrap(), 480, None).unwrap();
/// assert_eq!(settings.overtime_threshold_minutes(), 480);
///
/// assert!(Settings::new(NightWindow::default(), -1, None).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settings {
    night_window: NightWindow,
    overtime_threshold_minutes: i64,
    rounding: Option<RoundingRule>,
}

impl Settings {
    /// Creates validated settings.
    ///
    /// Returns a `Configuration` error if the threshold is negative.
    pub fn new(
        night_window: NightWindow,
        overtime_threshold_minutes: i64,
        rounding: Option<RoundingRule>,
    ) -> EngineResult<Self> {
        if overtime_threshold_minutes < 0 {
            return Err(EngineError::configuration(
                "overtime_threshold_minutes",
                format!("must be >= 0, got {}", overtime_threshold_minutes),
            ));
        }
        Ok(Self {
            night_window,
            overtime_threshold_minutes,
            rounding,
        })
    }

    /// The nightly window used to classify night minutes.
    pub fn night_window(&self) -> &NightWindow {
        &self.night_window
    }

    /// Worked minutes per shift above which minutes count as overtime.
    pub fn overtime_threshold_minutes(&self) -> i64 {
        self.overtime_threshold_minutes
    }

    /// Optional rounding applied to a shift's worked minutes after break deduction.
    pub fn rounding(&self) -> Option<RoundingRule> {
        self.rounding
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            night_window: NightWindow::default(),
            overtime_threshold_minutes: DEFAULT_OVERTIME_THRESHOLD_MINUTES,
            rounding: None,
        }
    }
}

/// How weekly overtime is allocated between daily and weekly triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeMode {
    /// Overtime comes from per-day thresholds only.
    #[default]
    PreferDaily,
    /// Overtime comes from the weekly threshold only.
    PreferWeekly,
    /// Overtime is the union of the daily and weekly triggers.
    Split,
}

/// A minimum break requirement: shifts longer than `after_hours` need at
/// least `min_minutes` of break. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinBreakRule {
    /// Worked hours after which the rule applies.
    pub after_hours: Decimal,
    /// The minimum break length in minutes.
    pub min_minutes: i64,
}

/// Overtime policy used for weekly aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OvertimePolicy {
    daily_threshold_hours: Decimal,
    weekly_threshold_hours: Decimal,
    mode: OvertimeMode,
    rounding_rule: RoundingRule,
    min_breaks: Vec<MinBreakRule>,
}

impl OvertimePolicy {
    /// Creates a validated overtime policy.
    ///
    /// Thresholds must be non-negative; break rules need a non-negative
    /// `after_hours` and a `min_minutes` of at least 1.
    pub fn new(
        daily_threshold_hours: Decimal,
        weekly_threshold_hours: Decimal,
        mode: OvertimeMode,
        rounding_rule: RoundingRule,
        min_breaks: Vec<MinBreakRule>,
    ) -> EngineResult<Self> {
        if daily_threshold_hours < Decimal::ZERO {
            return Err(EngineError::configuration(
                "daily_threshold_hours",
                format!("must be >= 0, got {}", daily_threshold_hours),
            ));
        }
        if weekly_threshold_hours < Decimal::ZERO {
            return Err(EngineError::configuration(
                "weekly_threshold_hours",
                format!("must be >= 0, got {}", weekly_threshold_hours),
            ));
        }
        for rule in &min_breaks {
            if rule.after_hours < Decimal::ZERO {
                return Err(EngineError::configuration(
                    "min_breaks.after_hours",
                    format!("must be >= 0, got {}", rule.after_hours),
                ));
            }
            if rule.min_minutes < 1 {
                return Err(EngineError::configuration(
                    "min_breaks.min_minutes",
                    format!("must be >= 1, got {}", rule.min_minutes),
                ));
            }
        }
        Ok(Self {
            daily_threshold_hours,
            weekly_threshold_hours,
            mode,
            rounding_rule,
            min_breaks,
        })
    }

    /// Hours per day before daily overtime.
    pub fn daily_threshold_hours(&self) -> Decimal {
        self.daily_threshold_hours
    }

    /// Hours per week before weekly overtime.
    pub fn weekly_threshold_hours(&self) -> Decimal {
        self.weekly_threshold_hours
    }

    /// The weekly allocation mode.
    pub fn mode(&self) -> OvertimeMode {
        self.mode
    }

    /// The policy's rounding rule.
    pub fn rounding_rule(&self) -> RoundingRule {
        self.rounding_rule
    }

    /// Minimum break requirements.
    pub fn min_breaks(&self) -> &[MinBreakRule] {
        &self.min_breaks
    }
}

impl Default for OvertimePolicy {
    fn default() -> Self {
        Self {
            daily_threshold_hours: Decimal::from(8),
            weekly_threshold_hours: Decimal::from(40),
            mode: OvertimeMode::PreferDaily,
            rounding_rule: RoundingRule::default(),
            min_breaks: Vec::new(),
        }
    }
}
