//! # Engine Errors
//!
//! Structural faults abort a traversal and surface as [`TraversalError`];
//! they are never folded into the problem list. [`GraphValidationError`]
//! additionally covers the "graph is invalid" outcome for callers that
//! prefer `Result`-shaped validation.

use graphval_core::{AccessError, BoxError};
use thiserror::Error;

use crate::report::ValidationViolations;

/// A traversal could not complete.
#[derive(Error, Debug)]
pub enum TraversalError {
    /// The per-object validator failed while inspecting a node.
    #[error("validator failed on {type_name} at '{path}': {source}")]
    Collaborator {
        /// Field path of the node being validated.
        path: String,
        /// Runtime type of the node.
        type_name: &'static str,
        /// Underlying failure.
        #[source]
        source: BoxError,
    },

    /// A wrapped value could not be borrowed.
    #[error("cannot read node at '{path}': {source}")]
    Access {
        /// Field path of the wrapper.
        path: String,
        /// Underlying failure.
        #[source]
        source: AccessError,
    },

    /// The graph is deeper than the configured limit.
    #[error("depth limit {limit} exceeded at '{path}'")]
    DepthExceeded {
        /// Field path of the first node past the limit.
        path: String,
        /// Configured `max_depth`.
        limit: usize,
    },
}

/// Graph validation failed, either because problems were found or because
/// the traversal itself faulted.
#[derive(Error, Debug)]
pub enum GraphValidationError {
    /// One or more nodes reported problems.
    #[error("graph validation failed:\n{violations}")]
    ValidationFailed {
        /// Every problem found, in traversal order.
        violations: ValidationViolations,
    },

    /// The traversal could not complete.
    #[error(transparent)]
    Traversal(#[from] TraversalError),
}
