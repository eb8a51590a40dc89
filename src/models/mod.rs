//! Core data models for the Timesheet Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod holiday;
mod night_window;
mod rate_plan;
mod settings;
mod shift;

pub use calculation_result::{AuditStep, AuditTrace, AuditWarning, CalculationResult, PayTotals};
pub use holiday::{Holiday, find_holiday};
pub use night_window::{NightWindow, NightWindowSpec, WindowShape};
pub use rate_plan::{
    DEFAULT_NIGHT_MULTIPLIER, DEFAULT_OVERTIME_MULTIPLIER, DEFAULT_WEEKEND_MULTIPLIER, RatePlan,
    RatePlanBuilder,
};
pub use settings::{
    DEFAULT_OVERTIME_THRESHOLD_MINUTES, MinBreakRule, OvertimeMode, OvertimePolicy, RoundingMode,
    RoundingRule, RoundingUnit, Settings,
};
pub use shift::Shift;
