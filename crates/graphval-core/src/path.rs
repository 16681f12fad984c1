//! # Field Paths
//!
//! A field path names a location relative to the validation root:
//!
//! - field segments are joined with `.` (`Child.PropertyA`);
//! - sequence indices are appended as `[N]` (`GrandChildren[1]`);
//! - keyed container entries are appended as `[Index=N, Key="K"]`.
//!
//! Bracketed segments never carry a separator in front of them, even though
//! they live on the same segment stack as field names.

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

/// Separator between a path and the member name that follows it.
pub const DELIMITER: char = '.';

/// One step from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named member of a composite value.
    Field(&'static str),
    /// Position in an ordered sequence.
    Index(usize),
    /// Entry of a keyed container, with its enumeration position and the
    /// key's display form.
    Key {
        /// Enumeration position of the entry.
        index: usize,
        /// Display form of the key.
        key: String,
    },
}

impl PathSegment {
    /// Whether this segment renders in brackets.
    pub fn is_bracketed(&self) -> bool {
        !matches!(self, Self::Field(_))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(index) => write!(f, "[{index}]"),
            Self::Key { index, key } => write!(f, "[Index={index}, Key=\"{key}\"]"),
        }
    }
}

/// Render a segment stack, root first.
///
/// Field segments are joined with [`DELIMITER`]; bracketed segments attach
/// to whatever precedes them.
pub fn render(segments: &[PathSegment]) -> String {
    let mut rendered = String::new();
    for segment in segments {
        if !segment.is_bracketed() && !rendered.is_empty() {
            rendered.push(DELIMITER);
        }
        // Writing into a String cannot fail.
        let _ = write!(rendered, "{segment}");
    }
    rendered
}

/// A rendered, absolute field path. The empty path denotes the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// The root path.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Render a segment stack, root first.
    pub fn from_segments(segments: &[PathSegment]) -> Self {
        Self(render(segments))
    }

    /// The rendered path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the rendered string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// `"{path}."`, or the empty string at the root.
    pub fn prefix(&self) -> String {
        if self.is_root() {
            String::new()
        } else {
            format!("{}{DELIMITER}", self.0)
        }
    }

    /// Whether `name` was already qualified against this path, i.e. starts
    /// with [`FieldPath::prefix`]. Every name counts as qualified at the root.
    pub fn is_qualified(&self, name: &str) -> bool {
        self.is_root()
            || (name.len() > self.0.len()
                && name.starts_with(self.0.as_str())
                && name[self.0.len()..].starts_with(DELIMITER))
    }

    /// Turn a member name relative to the node at this path into an absolute
    /// path. Names that are already qualified pass through unchanged.
    pub fn qualify(&self, name: &str) -> String {
        if self.is_qualified(name) {
            name.to_string()
        } else {
            self.join(name)
        }
    }

    /// `"{path}.{member}"`, or `member` alone at the root.
    pub fn join(&self, member: &str) -> String {
        if self.is_root() {
            member.to_string()
        } else {
            format!("{}{DELIMITER}{member}", self.0)
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}
