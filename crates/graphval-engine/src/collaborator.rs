//! # Per-Object Validators
//!
//! The traversal delegates the question "is this one object valid?" to an
//! [`ObjectValidator`]. It knows nothing about rules; it only hands the
//! validator a node and the shared [`ContextItems`], then places the
//! returned problems in the graph.
//!
//! Two implementations ship with the crate:
//!
//! - [`RuleSet`]: typed rule closures registered per concrete type;
//! - [`FnValidator`]: any closure over `&dyn Node`, built with [`from_fn`].

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use graphval_core::{BoxError, ContextItems, Node, Outcome, Problem};

/// Validates a single object, without looking at its children.
pub trait ObjectValidator {
    /// Validate `node`.
    ///
    /// `context` holds the caller's items plus the reserved path item for
    /// `node`. Items written here stay visible to later calls of the same
    /// traversal.
    ///
    /// # Errors
    ///
    /// An `Err` aborts the traversal. Report data problems through
    /// [`Outcome::problems`] instead.
    fn validate(&self, node: &dyn Node, context: &mut ContextItems) -> Result<Outcome, BoxError>;
}

impl<V: ObjectValidator + ?Sized> ObjectValidator for &V {
    fn validate(&self, node: &dyn Node, context: &mut ContextItems) -> Result<Outcome, BoxError> {
        (**self).validate(node, context)
    }
}

impl<V: ObjectValidator + ?Sized> ObjectValidator for Arc<V> {
    fn validate(&self, node: &dyn Node, context: &mut ContextItems) -> Result<Outcome, BoxError> {
        (**self).validate(node, context)
    }
}

impl<V: ObjectValidator + ?Sized> ObjectValidator for Box<V> {
    fn validate(&self, node: &dyn Node, context: &mut ContextItems) -> Result<Outcome, BoxError> {
        (**self).validate(node, context)
    }
}

/// Closure-backed validator. See [`from_fn`].
#[derive(Clone)]
pub struct FnValidator<F>(F);

/// Wrap a closure as an [`ObjectValidator`].
pub fn from_fn<F>(f: F) -> FnValidator<F>
where
    F: Fn(&dyn Node, &mut ContextItems) -> Result<Outcome, BoxError>,
{
    FnValidator(f)
}

impl<F> ObjectValidator for FnValidator<F>
where
    F: Fn(&dyn Node, &mut ContextItems) -> Result<Outcome, BoxError>,
{
    fn validate(&self, node: &dyn Node, context: &mut ContextItems) -> Result<Outcome, BoxError> {
        (self.0)(node, context)
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnValidator")
    }
}

type Rule = Box<dyn Fn(&dyn Node, &ContextItems) -> Result<Vec<Problem>, BoxError> + Send + Sync>;

/// Rules registered per concrete type.
///
/// Every rule registered for a node's runtime type runs, in registration
/// order, and their problems are concatenated. Types without rules pass.
#[derive(Default)]
pub struct RuleSet {
    rules: HashMap<TypeId, Vec<Rule>>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an infallible rule for `T`.
    pub fn rule<T, F>(self, rule: F) -> Self
    where
        T: Node,
        F: Fn(&T, &ContextItems) -> Vec<Problem> + Send + Sync + 'static,
    {
        self.fallible_rule::<T, _>(move |value, context| Ok(rule(value, context)))
    }

    /// Register a rule for `T` that may fail outright.
    pub fn fallible_rule<T, F>(mut self, rule: F) -> Self
    where
        T: Node,
        F: Fn(&T, &ContextItems) -> Result<Vec<Problem>, BoxError> + Send + Sync + 'static,
    {
        let erased: Rule = Box::new(move |node: &dyn Node, context: &ContextItems| {
            match node.as_any().downcast_ref::<T>() {
                Some(value) => rule(value, context),
                None => Ok(Vec::new()),
            }
        });
        self.rules.entry(TypeId::of::<T>()).or_default().push(erased);
        self
    }

    /// Whether any rule is registered for `T`.
    pub fn covers<T: Node>(&self) -> bool {
        self.rules.contains_key(&TypeId::of::<T>())
    }

    /// Total number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Returns true if no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl ObjectValidator for RuleSet {
    fn validate(&self, node: &dyn Node, context: &mut ContextItems) -> Result<Outcome, BoxError> {
        let Some(rules) = self.rules.get(&node.as_any().type_id()) else {
            return Ok(Outcome::pass());
        };
        let mut problems = Vec::new();
        for rule in rules {
            problems.extend(rule(node, context)?);
        }
        Ok(Outcome::from_problems(problems))
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("types", &self.rules.len())
            .field("rules", &self.len())
            .finish()
    }
}
