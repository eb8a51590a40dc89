//! HTTP API module for the Timesheet Engine.
//!
//! This module provides the REST API endpoint for classifying shifts and
//! calculating pay against the loaded configuration.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculationRequest, MAX_SHIFT_DURATION_HOURS, ShiftRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
