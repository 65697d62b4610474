//! # Error Types
//!
//! Structured error types for pemb_core. Validation-class problems are
//! collected and returned as data (`ValidationIssue` lists) so callers can
//! present them field by field; reference/store-class problems abort the
//! calculation and propagate as a single error.
//!
//! ## Example
//!
//! ```rust
//! use pemb_core::errors::{EstimateError, EstimateResult};
//!
//! fn check_eave(eave_m: f64) -> EstimateResult<()> {
//!     if eave_m <= 0.0 {
//!         return Err(EstimateError::invalid_input(
//!             "back_eave_height_m",
//!             eave_m.to_string(),
//!             "Eave height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pemb_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// A single field-level validation problem.
///
/// `validate()` on inputs returns a `Vec<ValidationIssue>`; an empty list
/// means the input is safe to calculate against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationIssue {
    /// Input field the problem belongs to (e.g. "spans", "wind_speed_kmh")
    pub field: String,
    /// Human-readable description of the problem
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Structured error type for estimation operations.
///
/// Each variant provides specific context about what went wrong, enabling
/// programmatic handling by the web layer and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A dimension-list string could not be parsed
    #[error("Cannot parse dimension list '{text}' for '{field}': {reason}")]
    FormatError {
        field: String,
        text: String,
        reason: String,
    },

    /// The building (or subsystem) input failed validation
    #[error("Validation failed with {} issue(s)", issues.len())]
    ValidationFailed { issues: Vec<ValidationIssue> },

    /// A resolved component code has no matching reference record.
    ///
    /// Fatal for the current calculation: no partial BOM is ever returned,
    /// since partial totals would be silently wrong.
    #[error("Unknown product code '{code}' ({context})")]
    MissingReference { code: String, context: String },

    /// A reference catalog failed to load
    #[error("Reference catalog '{catalog}' unavailable: {reason}")]
    StoreUnavailable { catalog: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EstimateError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FormatError
    pub fn format_error(
        field: impl Into<String>,
        text: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::FormatError {
            field: field.into(),
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Create a ValidationFailed error from a non-empty issue list
    pub fn validation_failed(issues: Vec<ValidationIssue>) -> Self {
        EstimateError::ValidationFailed { issues }
    }

    /// Create a MissingReference error
    pub fn missing_reference(code: impl Into<String>, context: impl Into<String>) -> Self {
        EstimateError::MissingReference {
            code: code.into(),
            context: context.into(),
        }
    }

    /// Create a StoreUnavailable error
    pub fn store_unavailable(catalog: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::StoreUnavailable {
            catalog: catalog.into(),
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        EstimateError::Internal {
            message: message.into(),
        }
    }

    /// Check whether this error is fatal for the calculation.
    ///
    /// Validation and format errors are recoverable by editing inputs;
    /// reference/store errors mean the calculation cannot proceed at all.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EstimateError::MissingReference { .. }
                | EstimateError::StoreUnavailable { .. }
                | EstimateError::Internal { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::InvalidInput { .. } => "INVALID_INPUT",
            EstimateError::FormatError { .. } => "FORMAT_ERROR",
            EstimateError::ValidationFailed { .. } => "VALIDATION_FAILED",
            EstimateError::MissingReference { .. } => "MISSING_REFERENCE",
            EstimateError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            EstimateError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
