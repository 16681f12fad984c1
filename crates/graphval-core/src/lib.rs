//! # graphval-core — Foundational Types for Object-Graph Validation
//!
//! This crate defines the vocabulary shared by every graphval component:
//! how an in-memory value describes itself to the traversal, how locations
//! inside a graph are named, and what a validation problem looks like.
//!
//! ## Key Design Principles
//!
//! 1. **Explicit node model instead of reflection.** Every value that takes
//!    part in validation implements [`Node`]. A node reports its
//!    [`NodeKind`], its declared [`Member`]s, and hands out borrowed views
//!    of member values, container elements, or wrapped targets.
//!
//! 2. **Identity, not equality.** [`NodeId`] is the address of a value plus
//!    its `TypeId`. Two structurally equal values are two nodes.
//!
//! 3. **One path format.** [`FieldPath`] and [`PathSegment`] render
//!    `Child.GrandChildren[1].PropertyA` and
//!    `DataList[0][Index=1, Key="key1"]`. Nothing else formats paths.
//!
//! 4. **Metadata is computed once per type.** [`TypeMetadataCache`] filters
//!    declared members down to the descendable ones and memoizes the result
//!    behind a concurrent map.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `graphval-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod context;
pub mod error;
pub mod metadata;
pub mod node;
pub mod path;
pub mod violation;

// Re-export primary types for ergonomic imports.
pub use config::ValidatorConfig;
pub use context::{ContextItems, MEMBER_PREFIX_KEY};
pub use error::{AccessError, BoxError, ConfigError};
pub use metadata::{FieldDescriptor, TypeMetadataCache};
pub use node::{AsAny, Element, Member, MemberType, Node, NodeId, NodeKind, NodeRef};
pub use path::{render, FieldPath, PathSegment, DELIMITER};
pub use violation::{Outcome, Problem, ValidationError};
