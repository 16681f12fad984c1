//! # graphval-engine — Recursive Object-Graph Validation
//!
//! Validates an object and everything reachable from it, reporting every
//! problem with a field path rooted at the object that was passed in.
//!
//! ## Traversal (`engine`)
//!
//! [`GraphValidator::validate_graph`] walks the graph depth first:
//!
//! - descendable members (see [`graphval_core::TypeMetadataCache`]) in
//!   declaration order, then the object's own validation;
//! - sequences element by element as `Field[i]`, keyed containers entry by
//!   entry as `Field[Index=i, Key="k"]`;
//! - wrappers (`Option`, `Box`, `Rc`, `Arc`, `Weak`, `RefCell`, `RwLock`)
//!   transparently.
//!
//! Each object is validated once per call, so cyclic graphs terminate.
//!
//! ## Per-Object Validation (`collaborator`)
//!
//! What makes a single object valid is not this crate's concern. The
//! traversal hands each object to an [`ObjectValidator`], together with the
//! [`graphval_core::ContextItems`] of the call, and qualifies the member
//! names it reports. [`RuleSet`] provides typed per-type rules.
//!
//! ## Crate Policy
//!
//! - Depends only on `graphval-core` internally.
//! - Validation problems are data ([`ValidationReport`]); only structural
//!   faults are returned as [`TraversalError`].
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod collaborator;
pub mod engine;
pub mod error;
pub mod report;
mod state;

pub use collaborator::{from_fn, FnValidator, ObjectValidator, RuleSet};
pub use engine::GraphValidator;
pub use error::{GraphValidationError, TraversalError};
pub use report::{ValidationReport, ValidationViolations};
