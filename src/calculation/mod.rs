//! Calculation logic for the Timesheet Engine.
//!
//! This module contains the pure functions that classify and price worked
//! time: minute rounding, the day/night/weekend interval splitter, the
//! daily and weekly overtime allocator, per-shift minute classification,
//! pay calculation, shift orchestration with audit steps and the weekly
//! overtime summary.

mod interval_split;
mod overtime;
mod pay;
mod rounding;
mod shift_minutes;
mod shift_pay;
mod weekly_report;

pub use interval_split::{SplitMinutes, WorkInterval, split_interval};
pub use overtime::{OvertimeSplit, WORKING_DAYS_PER_WEEK, daily_overtime, weekly_overtime};
pub use pay::{
    CURRENCY_DECIMAL_PLACES, PayBreakdown, PayContext, PremiumMinutes, calculate_pay,
    calculate_pay_breakdown, round_currency,
};
pub use rounding::{apply_rounding, round_minutes, round_to_step};
pub use shift_minutes::{
    ClassifiedMinutes, ShiftMinutesDetail, classify, classify_at, classify_detailed,
};
pub use shift_pay::{
    MIN_BREAK_WARNING_CODE, ShiftCalculation, ShiftCalculationResult, calculate_shift,
    check_min_breaks,
};
pub use weekly_report::{DaySummary, WeeklySummary, summarize_week};
