//! Per-call traversal state.

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

use graphval_core::{ContextItems, FieldPath, NodeId, PathSegment, ValidationError};

/// Everything one top-level traversal owns: visited identities, the path
/// from the root, the shared context and the errors collected so far.
#[derive(Debug)]
pub(crate) struct TraversalState {
    visited: HashSet<NodeId>,
    path: Vec<PathSegment>,
    pub(crate) context: ContextItems,
    errors: Vec<ValidationError>,
    validated: usize,
}

impl TraversalState {
    pub(crate) fn new(context: ContextItems) -> Self {
        Self {
            visited: HashSet::new(),
            path: Vec::new(),
            context,
            errors: Vec::new(),
            validated: 0,
        }
    }

    /// Record `id`. Returns false if it was already visited.
    pub(crate) fn first_visit(&mut self, id: NodeId) -> bool {
        self.visited.insert(id)
    }

    /// Push `segment` for the lifetime of the returned scope.
    pub(crate) fn enter(&mut self, segment: PathSegment) -> PathScope<'_> {
        self.path.push(segment);
        PathScope { state: self }
    }

    pub(crate) fn depth(&self) -> usize {
        self.path.len()
    }

    pub(crate) fn current_path(&self) -> FieldPath {
        FieldPath::from_segments(&self.path)
    }

    pub(crate) fn record(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub(crate) fn count_validated(&mut self) {
        self.validated += 1;
    }

    /// Number of collaborator calls made and the collected errors.
    pub(crate) fn finish(self) -> (usize, Vec<ValidationError>) {
        (self.validated, self.errors)
    }
}

/// Pops the segment pushed by [`TraversalState::enter`] when dropped, so
/// the stack stays balanced across `?` returns and unwinding.
pub(crate) struct PathScope<'s> {
    state: &'s mut TraversalState,
}

impl Deref for PathScope<'_> {
    type Target = TraversalState;

    fn deref(&self) -> &TraversalState {
        self.state
    }
}

impl DerefMut for PathScope<'_> {
    fn deref_mut(&mut self) -> &mut TraversalState {
        self.state
    }
}

impl Drop for PathScope<'_> {
    fn drop(&mut self) {
        self.state.path.pop();
    }
}
