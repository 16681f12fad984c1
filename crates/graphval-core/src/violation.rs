//! # Validation Problems
//!
//! [`Problem`] is what a per-object validator reports: a message and member
//! names relative to the object it inspected. [`ValidationError`] is what
//! the traversal emits: the same message with absolute field paths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A problem reported by a per-object validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Human-readable description.
    pub message: String,
    /// Member names relative to the validated object, or already qualified
    /// with [`crate::ContextItems::member_prefix`]. May be empty.
    pub member_names: Vec<String>,
}

impl Problem {
    /// A problem that names no member.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            member_names: Vec::new(),
        }
    }

    /// Attach a member name.
    pub fn member(mut self, name: impl Into<String>) -> Self {
        self.member_names.push(name.into());
        self
    }

    /// A problem about a list of members.
    pub fn with_members<I, S>(message: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message: message.into(),
            member_names: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of validating a single object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Whether the object passed.
    pub valid: bool,
    /// Problems found, in the order the validator reported them.
    pub problems: Vec<Problem>,
}

impl Outcome {
    /// A passing outcome with no problems.
    pub fn pass() -> Self {
        Self {
            valid: true,
            problems: Vec::new(),
        }
    }

    /// Passing iff `problems` is empty.
    pub fn from_problems(problems: Vec<Problem>) -> Self {
        Self {
            valid: problems.is_empty(),
            problems,
        }
    }
}

/// A validation problem located in the graph.
///
/// Inside a graph traversal `field_paths` always holds at least one entry:
/// the qualified member names, or the path of the reporting node itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Human-readable description.
    pub message: String,
    /// Field paths rooted at the validated object.
    pub field_paths: Vec<String>,
}

impl ValidationError {
    /// Construct from a message and its paths.
    pub fn new(message: impl Into<String>, field_paths: Vec<String>) -> Self {
        Self {
            message: message.into(),
            field_paths,
        }
    }

    /// The first path, if any.
    pub fn primary_path(&self) -> Option<&str> {
        self.field_paths.first().map(String::as_str)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let located = self.field_paths.iter().any(|p| !p.is_empty());
        if located {
            write!(f, "{}: {}", self.field_paths.join(", "), self.message)
        } else {
            write!(f, "(root): {}", self.message)
        }
    }
}
