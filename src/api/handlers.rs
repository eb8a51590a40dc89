//! HTTP request handlers for the Timesheet Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_shift, check_min_breaks, summarize_week};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, CalculationResult, Holiday, OvertimePolicy, PayTotals,
    RatePlan, Settings, Shift,
};

use super::request::CalculationRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Warning code for shifts that are still running.
const OPEN_SHIFT_WARNING_CODE: &str = "OPEN_SHIFT_NOT_PAID";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a calculation request and returns per-shift classifications,
/// pay and an audit trace.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return ApiErrorResponse::bad_request(error).into_response();
        }
    };

    if let Err(error) = request.validate() {
        warn!(
            correlation_id = %correlation_id,
            error = %error.message,
            "Request validation failed"
        );
        return ApiErrorResponse::bad_request(error).into_response();
    }

    let start_time = Instant::now();
    let shift_count = request.shifts.len();
    let employee_id = request.employee_id.clone();

    match perform_calculation(request, state.config()) {
        Ok(result) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                shifts_count = shift_count,
                gross_pay = %result.totals.gross_pay,
                currency = %result.totals.currency,
                duration_us = duration.as_micros(),
                "Calculation completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                code = err.kind().code(),
                "Calculation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// The configuration a request is calculated against, after applying its
/// overrides to the server defaults.
struct ResolvedInputs {
    settings: Settings,
    policy: OvertimePolicy,
    rate_plan: RatePlan,
    holidays: Vec<Holiday>,
    week_start: Option<NaiveDate>,
    now: DateTime<Utc>,
}

fn resolve_inputs(
    request: &mut CalculationRequest,
    config: &ConfigLoader,
) -> EngineResult<ResolvedInputs> {
    let settings = match request.settings.take() {
        Some(raw) => Settings::try_from(raw)?,
        None => *config.settings(),
    };
    let policy = match request.overtime_policy.take() {
        Some(raw) => OvertimePolicy::try_from(raw)?,
        None => config.policy().clone(),
    };
    let rate_plan = match (request.rate_plan.take(), request.rate_plan_id.as_deref()) {
        (Some(raw), _) => RatePlan::try_from(raw)?,
        (None, Some(id)) => config.get_rate_plan(id)?.clone(),
        (None, None) => config.default_rate_plan()?.clone(),
    };
    let holidays = match request.holidays.take() {
        Some(raw) => {
            let mut holidays = raw
                .into_iter()
                .map(Holiday::try_from)
                .collect::<EngineResult<Vec<_>>>()?;
            holidays.sort_by_key(|h| h.date);
            holidays
        }
        None => config.holidays().to_vec(),
    };

    Ok(ResolvedInputs {
        settings,
        policy,
        rate_plan,
        holidays,
        week_start: request.week_start,
        now: request.now.unwrap_or_else(Utc::now),
    })
}

/// Performs the timesheet calculation for an employee's shifts.
fn perform_calculation(
    mut request: CalculationRequest,
    config: &ConfigLoader,
) -> Result<CalculationResult, EngineError> {
    let start_time = Instant::now();
    let inputs = resolve_inputs(&mut request, config)?;

    let employee_id = request.employee_id;
    let shifts: Vec<Shift> = request
        .shifts
        .into_iter()
        .map(|s| s.into_shift(&employee_id))
        .collect();

    let mut calculations = Vec::with_capacity(shifts.len());
    let mut all_audit_steps: Vec<AuditStep> = Vec::new();
    let mut all_warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    for shift in &shifts {
        let result = calculate_shift(
            shift,
            &inputs.settings,
            &inputs.rate_plan,
            &inputs.holidays,
            inputs.now,
            step_number,
        )?;
        step_number += result.audit_steps.len() as u32;
        all_audit_steps.extend(result.audit_steps);

        let calc = result.calculation;
        all_warnings.extend(check_min_breaks(
            shift,
            calc.minutes.total_minutes,
            inputs.policy.min_breaks(),
        ));
        if calc.is_open {
            all_warnings.push(AuditWarning {
                code: OPEN_SHIFT_WARNING_CODE.to_string(),
                message: format!(
                    "Shift '{}' has no end; minutes were measured to {}",
                    shift.id, calc.effective_end
                ),
                severity: "medium".to_string(),
                shift_id: Some(shift.id.clone()),
            });
        }
        calculations.push(calc);
    }

    let weekly = match inputs.week_start {
        Some(week_start) => {
            let summary = summarize_week(&calculations, &inputs.policy, week_start)?;
            all_audit_steps.push(AuditStep {
                step_number,
                rule_id: "weekly_overtime".to_string(),
                rule_name: "Weekly Overtime Allocation".to_string(),
                shift_id: None,
                input: serde_json::json!({
                    "week_start": summary.week_start,
                    "hours_by_day": summary.hours_by_day.map(|h| h.to_string()),
                    "weekly_threshold_hours": inputs.policy.weekly_threshold_hours().to_string(),
                    "daily_threshold_hours": inputs.policy.daily_threshold_hours().to_string(),
                    "mode": inputs.policy.mode(),
                }),
                output: serde_json::json!({
                    "regular_hours": summary.weekly.regular.to_string(),
                    "overtime_hours": summary.weekly.overtime.to_string(),
                    "daily_overtime_hours": summary.daily_overtime_hours.to_string(),
                }),
                reasoning: format!(
                    "{} hours in the week of {}: {} regular, {} overtime",
                    summary.total_hours,
                    summary.week_start,
                    summary.weekly.regular,
                    summary.weekly.overtime
                ),
            });
            Some(summary)
        }
        None => None,
    };

    let totals = PayTotals::from_calculations(inputs.rate_plan.currency(), &calculations)?;
    let duration_us = start_time.elapsed().as_micros() as u64;

    Ok(CalculationResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id,
        rate_plan_id: inputs.rate_plan.id().to_string(),
        shifts: calculations,
        weekly,
        totals,
        audit_trace: AuditTrace {
            steps: all_audit_steps,
            warnings: all_warnings,
            duration_us,
        },
    })
}
