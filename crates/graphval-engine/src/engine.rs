//! # Graph Validator
//!
//! Recursive, cycle-safe validation of an object graph.
//!
//! [`GraphValidator::validate_graph`] visits the root and every object
//! reachable from it through descendable members and container elements,
//! asks the [`ObjectValidator`] about each composite object exactly once,
//! and rewrites the member names it reports into absolute field paths.
//!
//! ## Order
//!
//! Children are validated before their parent. Members follow declaration
//! order and container elements follow enumeration order, so the error
//! list of a report is deterministic for a given graph.
//!
//! ## Identity
//!
//! A node is visited at most once per call, keyed by [`NodeId`]. Wrappers
//! (`Option`, `Rc`, `RefCell`, ...) are looked through and have no identity
//! of their own, so back-references via `Rc<RefCell<_>>` or `Weak` terminate.
//! Zero-sized values are keyed by type, so a stateless type is validated
//! once per call no matter how many places hold it.

use std::sync::Arc;

use graphval_core::{
    ConfigError, ContextItems, Element, Node, NodeId, NodeKind, PathSegment, TypeMetadataCache,
    ValidationError, ValidatorConfig,
};

use crate::collaborator::ObjectValidator;
use crate::error::TraversalError;
use crate::report::ValidationReport;
use crate::state::TraversalState;

/// Validates object graphs with a pluggable per-object validator.
///
/// Cheap to share: the metadata cache sits behind an `Arc` and traversal
/// state is created per call. `Send + Sync` whenever `V` is.
#[derive(Debug, Clone)]
pub struct GraphValidator<V> {
    collaborator: V,
    cache: Arc<TypeMetadataCache>,
    config: ValidatorConfig,
}

impl<V: ObjectValidator> GraphValidator<V> {
    /// Create a validator with default configuration and a private cache.
    pub fn new(collaborator: V) -> Self {
        Self {
            collaborator,
            cache: Arc::new(TypeMetadataCache::new()),
            config: ValidatorConfig::default(),
        }
    }

    /// Create a validator with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `config` fails
    /// [`ValidatorConfig::validate`].
    pub fn with_config(collaborator: V, config: ValidatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(collaborator)
        })
    }

    /// Share `cache` with other validators.
    pub fn with_cache(mut self, cache: Arc<TypeMetadataCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The metadata cache.
    pub fn cache(&self) -> &Arc<TypeMetadataCache> {
        &self.cache
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// The per-object validator.
    pub fn collaborator(&self) -> &V {
        &self.collaborator
    }

    /// Validate a single object without descending into its members.
    ///
    /// Wrappers around the object are looked through. Reported member names
    /// are returned as the collaborator produced them, and the reserved path
    /// item is not written. Leaves and containers have nothing of their own
    /// to validate and yield a passing report.
    ///
    /// # Errors
    ///
    /// Returns `TraversalError::Collaborator` if the collaborator fails and
    /// `TraversalError::Access` if a wrapper cannot be borrowed.
    pub fn validate_object(
        &self,
        object: &dyn Node,
        context: Option<&ContextItems>,
    ) -> Result<ValidationReport, TraversalError> {
        let mut context = self.initial_context(context);
        self.validate_single(object, &mut context)
    }

    fn validate_single(
        &self,
        object: &dyn Node,
        context: &mut ContextItems,
    ) -> Result<ValidationReport, TraversalError> {
        match object.kind() {
            NodeKind::Indirect => {
                let target = object.target().map_err(|source| TraversalError::Access {
                    path: String::new(),
                    source,
                })?;
                match target {
                    Some(inner) => self.validate_single(&*inner, context),
                    None => Ok(ValidationReport::passing()),
                }
            }
            NodeKind::Composite => {
                let outcome = self.collaborator.validate(object, context).map_err(|source| {
                    TraversalError::Collaborator {
                        path: String::new(),
                        type_name: object.type_name(),
                        source,
                    }
                })?;
                let errors = outcome
                    .problems
                    .into_iter()
                    .map(|p| ValidationError::new(p.message, p.member_names))
                    .collect();
                Ok(ValidationReport::new(outcome.valid, errors))
            }
            NodeKind::Scalar | NodeKind::Text | NodeKind::Sequence | NodeKind::Map => {
                Ok(ValidationReport::passing())
            }
        }
    }

    /// Validate `root` and every object reachable from it.
    ///
    /// `context` is copied into a fresh per-call item set, on top of the
    /// configured baseline. Every collaborator call of this traversal sees
    /// that one set, with the reserved path item pointing at the node being
    /// validated.
    ///
    /// # Errors
    ///
    /// Structural faults abort the traversal: a failing collaborator, a
    /// wrapper that cannot be borrowed, or a graph deeper than
    /// `max_depth`. Validation problems are never errors; they are in the
    /// returned report.
    pub fn validate_graph(
        &self,
        root: &dyn Node,
        context: Option<&ContextItems>,
    ) -> Result<ValidationReport, TraversalError> {
        tracing::debug!(root = root.type_name(), "graph validation started");
        let mut state = TraversalState::new(self.initial_context(context));
        let valid = self.descend(root, &mut state)?;
        let (validated, errors) = state.finish();
        tracing::debug!(
            root = root.type_name(),
            nodes = validated,
            errors = errors.len(),
            valid,
            "graph validation finished"
        );
        Ok(ValidationReport::new(valid, errors))
    }

    fn initial_context(&self, context: Option<&ContextItems>) -> ContextItems {
        let mut items = context.cloned().unwrap_or_default();
        items.merge_missing(&self.config.context);
        items
    }

    fn descend(&self, node: &dyn Node, state: &mut TraversalState) -> Result<bool, TraversalError> {
        if node.kind() == NodeKind::Indirect {
            let target = node.target().map_err(|source| TraversalError::Access {
                path: state.current_path().into_string(),
                source,
            })?;
            return match target {
                Some(inner) => self.descend(&*inner, state),
                None => Ok(true),
            };
        }

        if !state.first_visit(NodeId::of(node)) {
            tracing::trace!(
                path = %state.current_path(),
                type_name = node.type_name(),
                "already visited"
            );
            return Ok(true);
        }

        if let Some(limit) = self.config.max_depth {
            if state.depth() > limit {
                let path = state.current_path().into_string();
                tracing::warn!(%path, limit, "depth limit exceeded");
                return Err(TraversalError::DepthExceeded { path, limit });
            }
        }

        match node.kind() {
            NodeKind::Scalar | NodeKind::Text => Ok(true),
            NodeKind::Sequence | NodeKind::Map => self.descend_elements(node, state),
            // Handled above; only reachable if `kind` is not stable.
            NodeKind::Indirect => Ok(true),
            NodeKind::Composite => {
                let children_valid = self.descend_members(node, state)?;
                let own_valid = self.validate_own(node, state)?;
                Ok(children_valid && own_valid)
            }
        }
    }

    fn descend_elements(
        &self,
        node: &dyn Node,
        state: &mut TraversalState,
    ) -> Result<bool, TraversalError> {
        let mut valid = true;
        for (index, element) in node.elements().into_iter().enumerate() {
            let value = element.value();
            if value.is_null() {
                continue;
            }
            let segment = match element {
                Element::Item(_) => PathSegment::Index(index),
                Element::Entry { key, .. } => PathSegment::Key { index, key },
            };
            let mut scope = state.enter(segment);
            valid &= self.descend(value, &mut scope)?;
        }
        Ok(valid)
    }

    fn descend_members(
        &self,
        node: &dyn Node,
        state: &mut TraversalState,
    ) -> Result<bool, TraversalError> {
        let mut valid = true;
        let fields = self.cache.fields_of(node);
        for field in fields.iter() {
            let Some(value) = node.member(field.name) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let mut scope = state.enter(PathSegment::Field(field.name));
            valid &= self.descend(value, &mut scope)?;
        }
        Ok(valid)
    }

    fn validate_own(&self, node: &dyn Node, state: &mut TraversalState) -> Result<bool, TraversalError> {
        let path = state.current_path();
        state.context.set_current_path(path.as_str());

        let outcome = self
            .collaborator
            .validate(node, &mut state.context)
            .map_err(|source| TraversalError::Collaborator {
                path: path.to_string(),
                type_name: node.type_name(),
                source,
            })?;
        state.count_validated();
        tracing::trace!(
            path = %path,
            type_name = node.type_name(),
            valid = outcome.valid,
            problems = outcome.problems.len(),
            "validated node"
        );

        for problem in outcome.problems {
            let field_paths = if problem.member_names.is_empty() {
                vec![path.to_string()]
            } else {
                problem
                    .member_names
                    .iter()
                    .map(|name| path.qualify(name))
                    .collect()
            };
            state.record(ValidationError::new(problem.message, field_paths));
        }
        Ok(outcome.valid)
    }
}
