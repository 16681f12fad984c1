//! # Error Types
//!
//! Structural faults raised while reading the object graph or loading
//! configuration. All errors use `thiserror` for derive-based `Display` and
//! `Error` implementations.
//!
//! Validation problems are not errors: they are data, carried by
//! [`crate::ValidationError`]. The types here describe situations where the
//! graph or the configuration could not be inspected at all.

use thiserror::Error;

/// Boxed error returned by pluggable validators and rule closures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A wrapped value could not be borrowed for inspection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// A `RefCell` is currently mutably borrowed.
    #[error("value of type {type_name} is mutably borrowed")]
    Borrowed {
        /// Type name of the wrapped value.
        type_name: &'static str,
    },

    /// A lock is held exclusively by a writer.
    #[error("value of type {type_name} is write-locked")]
    Locked {
        /// Type name of the wrapped value.
        type_name: &'static str,
    },
}

/// Error loading or checking a [`crate::ValidatorConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document is not valid YAML/JSON for the schema.
    #[error("config parse error: {reason}")]
    Parse {
        /// Parser message.
        reason: String,
    },

    /// A field holds a value outside its permitted range.
    #[error("invalid config field '{field}': {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
