//! Error types for the Timesheet Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while classifying shifts and
//! calculating pay. The engine carries no user-facing text beyond these
//! messages; callers map [`ErrorKind`] codes to localized strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The coarse category of an [`EngineError`].
///
/// Every error the engine produces belongs to exactly one kind, and each
/// kind has a stable machine-readable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Invalid configuration: rounding step, night window, thresholds, rate plans.
    Configuration,
    /// An interval whose end is not after its start.
    InvalidRange,
    /// A negative minute or hour value reached a calculation.
    NegativeInput,
    /// A referenced configuration entry does not exist.
    NotFound,
    /// A money or hour value exceeded the decimal range.
    Overflow,
}

impl ErrorKind {
    /// Returns the stable code for this kind.
    ///
    /// # Example
    ///
    /// ```
    /// use timesheet_engine::error::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::InvalidRange.code(), "INVALID_RANGE");
    /// ```
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "CONFIGURATION_ERROR",
            ErrorKind::InvalidRange => "INVALID_RANGE",
            ErrorKind::NegativeInput => "NEGATIVE_INPUT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Overflow => "AMOUNT_OVERFLOW",
        }
    }
}

/// The main error type for the Timesheet Engine.
///
/// All fallible operations in the engine return this error type. Failures
/// are deterministic: the same bad input produces the same error until the
/// input is corrected.
///
/// # Example
///
/// ```
/// use timesheet_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/settings.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/settings.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was rejected during validation.
    #[error("Invalid configuration '{field}': {message}")]
    Configuration {
        /// The configuration field that was rejected.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// An interval ended at or before its start.
    #[error("Invalid range: end {end} is not after start {start}")]
    InvalidRange {
        /// The start of the rejected interval.
        start: DateTime<Utc>,
        /// The end of the rejected interval.
        end: DateTime<Utc>,
    },

    /// A negative value was supplied where only non-negative values are valid.
    #[error("Negative input for '{field}': {value}")]
    NegativeInput {
        /// The name of the offending input.
        field: String,
        /// The rejected value, rendered as text.
        value: String,
    },

    /// A rate plan id was not present in the loaded configuration.
    #[error("Rate plan not found: {id}")]
    RatePlanNotFound {
        /// The rate plan id that was not found.
        id: String,
    },

    /// Arithmetic on a money or hour value overflowed.
    #[error("Amount overflow while computing '{field}'")]
    Overflow {
        /// The value being computed when the overflow happened.
        field: String,
    },
}

impl EngineError {
    /// Builds a [`EngineError::Configuration`] error.
    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Builds a [`EngineError::NegativeInput`] error.
    pub fn negative_input(field: impl Into<String>, value: impl ToString) -> Self {
        EngineError::NegativeInput {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Builds a [`EngineError::Overflow`] error.
    pub fn overflow(field: impl Into<String>) -> Self {
        EngineError::Overflow {
            field: field.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::Configuration { .. } => ErrorKind::Configuration,
            EngineError::InvalidRange { .. } => ErrorKind::InvalidRange,
            EngineError::NegativeInput { .. } => ErrorKind::NegativeInput,
            EngineError::RatePlanNotFound { .. } => ErrorKind::NotFound,
            EngineError::Overflow { .. } => ErrorKind::Overflow,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
