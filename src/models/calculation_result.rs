//! Calculation result models for the Timesheet Engine.
//!
//! This module contains the [`CalculationResult`] type and its associated
//! structures that capture all outputs of a timesheet calculation: per-shift
//! classifications and pay, an optional weekly overtime summary, totals and
//! an audit trace.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{ShiftCalculation, WeeklySummary};
use crate::error::{EngineError, EngineResult};

/// Aggregated totals over every shift in a calculation.
///
/// Minute totals include open shifts; `gross_pay` only closed ones.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::PayTotals;
///
/// let totals = PayTotals::from_calculations("RUB", &[]).unwrap();
/// assert_eq!(totals.gross_pay, rust_decimal::Decimal::ZERO);
/// assert_eq!(totals.closed_shifts, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayTotals {
    /// ISO-4217 currency of `gross_pay`.
    pub currency: String,
    /// Sum of every closed shift's pay amount.
    pub gross_pay: Decimal,
    /// Worked minutes after break deduction.
    pub total_minutes: i64,
    /// Minutes above the per-shift overtime threshold.
    pub overtime_minutes: i64,
    /// Night minutes.
    pub night_minutes: i64,
    /// Clocked minutes on a local Saturday or Sunday.
    pub weekend_minutes: i64,
    /// Number of closed shifts.
    pub closed_shifts: usize,
    /// Number of open shifts.
    pub open_shifts: usize,
}

impl PayTotals {
    /// Sums a set of shift calculations.
    ///
    /// Fails with `Overflow` if the gross pay exceeds the decimal range.
    pub fn from_calculations(
        currency: impl Into<String>,
        calculations: &[ShiftCalculation],
    ) -> EngineResult<Self> {
        let mut totals = Self {
            currency: currency.into(),
            gross_pay: Decimal::ZERO,
            total_minutes: 0,
            overtime_minutes: 0,
            night_minutes: 0,
            weekend_minutes: 0,
            closed_shifts: 0,
            open_shifts: 0,
        };
        for calc in calculations {
            totals.gross_pay = totals
                .gross_pay
                .checked_add(calc.amount())
                .ok_or_else(|| EngineError::overflow("gross_pay"))?;
            totals.total_minutes += calc.minutes.total_minutes;
            totals.overtime_minutes += calc.minutes.overtime_minutes;
            totals.night_minutes += calc.minutes.night_minutes;
            totals.weekend_minutes += calc.split.weekend_minutes;
            if calc.is_open {
                totals.open_shifts += 1;
            } else {
                totals.closed_shifts += 1;
            }
        }
        Ok(totals)
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The shift the step applies to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<String>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
    /// The shift the warning is about, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<String>,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use timesheet_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a timesheet calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The ID of the employee the calculation is for.
    pub employee_id: String,
    /// The rate plan used for pay.
    pub rate_plan_id: String,
    /// One calculation per shift, in request order.
    pub shifts: Vec<ShiftCalculation>,
    /// The weekly overtime summary, when a week was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly: Option<WeeklySummary>,
    /// Aggregated totals.
    pub totals: PayTotals,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}
