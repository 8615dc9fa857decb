//! # Error Types
//!
//! Structured error types for emcalc_core. These errors are designed to be
//! informative for both humans and front ends, providing enough context to
//! understand and fix issues programmatically.
//!
//! ## Example
//!
//! ```rust
//! use emcalc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_binding(variable: &str, value: f64) -> CalcResult<()> {
//!     if !value.is_finite() {
//!         return Err(CalcError::invalid_input(
//!             variable,
//!             value.to_string(),
//!             "Value must be a finite number",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for emcalc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for catalog and solve operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by UI layers and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Requested equation id is not in the catalog
    #[error("Unknown equation: '{equation_id}'")]
    UnknownEquation { equation_id: String },

    /// Requested target variable is not declared by the equation
    #[error("Unknown variable '{variable}' for equation '{equation_id}'")]
    UnknownVariable {
        equation_id: String,
        variable: String,
    },

    /// A catalog expression is malformed or references undeclared symbols.
    /// This is a catalog-authoring defect, surfaced at load time.
    #[error("Expression parse error in '{equation_id}': {reason}")]
    ExpressionParse {
        equation_id: String,
        reason: String,
    },

    /// A catalog entry violates structural rules (duplicate or empty
    /// variable list). Also a load-time authoring defect.
    #[error("Invalid definition for '{equation_id}': {reason}")]
    InvalidDefinition {
        equation_id: String,
        reason: String,
    },

    /// The target variable cannot be isolated symbolically
    #[error("Cannot solve '{equation_id}' for '{variable}': {reason}")]
    NoSolution {
        equation_id: String,
        variable: String,
        reason: String,
    },

    /// A required numeric binding is missing, non-numeric, or non-finite
    #[error("Invalid input for '{variable}': {value} - {reason}")]
    InvalidInput {
        variable: String,
        value: String,
        reason: String,
    },

    /// Evaluation hit an undefined real-valued operation
    #[error("Domain error in '{expression}': {reason}")]
    Domain {
        expression: String,
        reason: String,
    },

    /// The defensive bound on symbolic isolation steps was exceeded
    #[error("Solver exceeded {steps} steps isolating '{variable}' in '{equation_id}'")]
    SolverTimeout {
        equation_id: String,
        variable: String,
        steps: usize,
    },
}

impl CalcError {
    /// Create an UnknownEquation error
    pub fn unknown_equation(equation_id: impl Into<String>) -> Self {
        CalcError::UnknownEquation {
            equation_id: equation_id.into(),
        }
    }

    /// Create an UnknownVariable error
    pub fn unknown_variable(equation_id: impl Into<String>, variable: impl Into<String>) -> Self {
        CalcError::UnknownVariable {
            equation_id: equation_id.into(),
            variable: variable.into(),
        }
    }

    /// Create an ExpressionParse error
    pub fn expression_parse(equation_id: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ExpressionParse {
            equation_id: equation_id.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidDefinition error
    pub fn invalid_definition(equation_id: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidDefinition {
            equation_id: equation_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a NoSolution error
    pub fn no_solution(
        equation_id: impl Into<String>,
        variable: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::NoSolution {
            equation_id: equation_id.into(),
            variable: variable.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(
        variable: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            variable: variable.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a Domain error
    pub fn domain(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Domain {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is a catalog-authoring defect. These are fatal:
    /// the catalog cannot serve any equation reliably, so loading fails at
    /// startup rather than at first solve.
    pub fn is_catalog_defect(&self) -> bool {
        matches!(
            self,
            CalcError::ExpressionParse { .. } | CalcError::InvalidDefinition { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::UnknownEquation { .. } => "UNKNOWN_EQUATION",
            CalcError::UnknownVariable { .. } => "UNKNOWN_VARIABLE",
            CalcError::ExpressionParse { .. } => "EXPRESSION_PARSE",
            CalcError::InvalidDefinition { .. } => "INVALID_DEFINITION",
            CalcError::NoSolution { .. } => "NO_SOLUTION",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::Domain { .. } => "DOMAIN_ERROR",
            CalcError::SolverTimeout { .. } => "SOLVER_TIMEOUT",
        }
    }
}
