//! # Validation Reports
//!
//! The combined outcome of one `validate_object` or `validate_graph` call.

use std::fmt;

use graphval_core::ValidationError;
use serde::{Deserialize, Serialize};

use crate::error::GraphValidationError;

/// Overall validity plus every problem found, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    valid: bool,
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub(crate) fn new(valid: bool, errors: Vec<ValidationError>) -> Self {
        Self { valid, errors }
    }

    /// A passing report with no errors.
    pub fn passing() -> Self {
        Self::new(true, Vec::new())
    }

    /// Whether every validated node passed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Errors in traversal order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes self and returns the errors.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Every field path of every error, flattened.
    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.errors
            .iter()
            .flat_map(|e| e.field_paths.iter().map(String::as_str))
    }

    /// Errors whose message equals `message`.
    pub fn with_message<'a>(&'a self, message: &'a str) -> impl Iterator<Item = &'a ValidationError> + 'a {
        self.errors.iter().filter(move |e| e.message == message)
    }

    /// `Ok(())` for a valid report.
    ///
    /// # Errors
    ///
    /// Returns `GraphValidationError::ValidationFailed` carrying every error
    /// when the report is invalid.
    pub fn into_result(self) -> Result<(), GraphValidationError> {
        if self.valid {
            Ok(())
        } else {
            Err(GraphValidationError::ValidationFailed {
                violations: ValidationViolations {
                    violations: self.errors,
                },
            })
        }
    }
}

/// Errors of a failed validation, displayed one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<ValidationError>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[ValidationError] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<ValidationError> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {v}")?;
        }
        Ok(())
    }
}
