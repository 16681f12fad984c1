//! Shared fixtures: a Parent/Child/GrandChild family with required and
//! range rules plus cross-field checks, and a class holding a list of
//! dictionaries.
//!
//! Rules follow annotation semantics: required and range checks run first,
//! and cross-field checks run only when every member check passed.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use graphval_core::{ContextItems, Member, Node, Problem};
use graphval_engine::{GraphValidator, RuleSet};
use parking_lot::Mutex;

#[derive(Default)]
pub struct Parent {
    pub property_a: Option<i32>,
    pub property_b: Option<i32>,
    pub child: Option<Child>,
    pub skipped_child: Option<Child>,
}

impl Node for Parent {
    fn members(&self) -> Vec<Member> {
        vec![
            Member::scalar("PropertyA"),
            Member::scalar("PropertyB"),
            Member::reference("Child"),
            Member::reference("SkippedChild").skip_recursion(),
        ]
    }

    fn member(&self, name: &str) -> Option<&dyn Node> {
        match name {
            "PropertyA" => Some(&self.property_a),
            "PropertyB" => Some(&self.property_b),
            "Child" => Some(&self.child),
            "SkippedChild" => Some(&self.skipped_child),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct Child {
    pub parent: Option<Weak<RefCell<Parent>>>,
    pub property_a: Option<i32>,
    pub property_b: Option<i32>,
    pub grand_children: Vec<GrandChild>,
}

impl Node for Child {
    fn members(&self) -> Vec<Member> {
        vec![
            Member::reference("Parent"),
            Member::scalar("PropertyA"),
            Member::scalar("PropertyB"),
            Member::reference("GrandChildren"),
        ]
    }

    fn member(&self, name: &str) -> Option<&dyn Node> {
        match name {
            "Parent" => Some(&self.parent),
            "PropertyA" => Some(&self.property_a),
            "PropertyB" => Some(&self.property_b),
            "GrandChildren" => Some(&self.grand_children),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct GrandChild {
    pub property_a: Option<i32>,
    pub property_b: Option<i32>,
    pub property_c: Option<i32>,
}

impl Node for GrandChild {
    fn members(&self) -> Vec<Member> {
        vec![
            Member::scalar("PropertyA"),
            Member::scalar("PropertyB"),
            Member::scalar("PropertyC"),
        ]
    }
}

pub struct ClassWithDictionary {
    pub data_list: Vec<BTreeMap<String, Child>>,
}

impl Node for ClassWithDictionary {
    fn members(&self) -> Vec<Member> {
        vec![Member::reference("DataList")]
    }

    fn member(&self, name: &str) -> Option<&dyn Node> {
        match name {
            "DataList" => Some(&self.data_list),
            _ => None,
        }
    }
}

pub fn grand_child(a: Option<i32>, b: Option<i32>, c: Option<i32>) -> GrandChild {
    GrandChild {
        property_a: a,
        property_b: b,
        property_c: c,
    }
}

/// A parent behind `Rc<RefCell<_>>` whose child points back at it.
pub fn parent_with_child(
    parent_a: i32,
    parent_b: i32,
    child: Child,
) -> Rc<RefCell<Parent>> {
    let parent = Rc::new(RefCell::new(Parent {
        property_a: Some(parent_a),
        property_b: Some(parent_b),
        ..Parent::default()
    }));
    let child = Child {
        parent: Some(Rc::downgrade(&parent)),
        ..child
    };
    parent.borrow_mut().child = Some(child);
    parent
}

fn required(value: Option<i32>, message: &str, member: &str, problems: &mut Vec<Problem>) {
    if value.is_none() {
        problems.push(Problem::new(message).member(member));
    }
}

fn in_range(value: Option<i32>, message: &str, member: &str, problems: &mut Vec<Problem>) {
    if let Some(v) = value {
        if !(0..=10).contains(&v) {
            problems.push(Problem::new(message).member(member));
        }
    }
}

fn sum_exceeds(a: Option<i32>, b: Option<i32>, limit: i32) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a + b > limit)
}

fn parent_problems(parent: &Parent, _: &ContextItems) -> Vec<Problem> {
    let mut problems = Vec::new();
    required(parent.property_a, "Parent PropertyA is required.", "PropertyA", &mut problems);
    required(parent.property_b, "Parent PropertyB is required.", "PropertyB", &mut problems);
    if problems.is_empty() && sum_exceeds(parent.property_a, parent.property_b, 10) {
        problems.push(Problem::new(
            "Parent PropertyA and PropertyB cannot add up to more than 10.",
        ));
    }
    problems
}

fn child_problems(child: &Child, _: &ContextItems) -> Vec<Problem> {
    let mut problems = Vec::new();
    if child.parent.is_none() {
        problems.push(Problem::new("Child Parent is required.").member("Parent"));
    }
    required(child.property_a, "Child PropertyA is required.", "PropertyA", &mut problems);
    if problems.is_empty() && sum_exceeds(child.property_a, child.property_b, 10) {
        problems.push(Problem::new(
            "Child PropertyA and PropertyB cannot add up to more than 10.",
        ));
    }
    problems
}

fn grand_child_problems(gc: &GrandChild, context: &ContextItems) -> Vec<Problem> {
    let mut problems = Vec::new();
    required(gc.property_a, "The PropertyA field is required.", "PropertyA", &mut problems);
    in_range(gc.property_a, "GrandChild PropertyA not within range.", "PropertyA", &mut problems);
    required(gc.property_b, "The PropertyB field is required.", "PropertyB", &mut problems);
    in_range(gc.property_b, "GrandChild PropertyB not within range.", "PropertyB", &mut problems);
    if !problems.is_empty() {
        return problems;
    }

    if sum_exceeds(gc.property_a, gc.property_b, 10) {
        problems.push(Problem::new(
            "GrandChild PropertyA and PropertyB cannot add up to more than 10.",
        ));
    }
    if sum_exceeds(gc.property_a, gc.property_c, 20) {
        let prefix = context.member_prefix();
        problems.push(Problem::with_members(
            "GrandChild PropertyA and PropertyC cannot add up to more than 20.",
            [format!("{prefix}PropertyA"), format!("{prefix}PropertyC")],
        ));
    }
    problems
}

/// Rules for the whole family.
pub fn family_rules() -> RuleSet {
    RuleSet::new()
        .rule::<Parent, _>(parent_problems)
        .rule::<Child, _>(child_problems)
        .rule::<GrandChild, _>(grand_child_problems)
}

/// Every context a family rule was called with, in call order.
pub type SavedContexts = Arc<Mutex<Vec<ContextItems>>>;

/// Family rules plus a rule per type that records the context it sees.
pub fn recording_family_rules() -> (RuleSet, SavedContexts) {
    let saved: SavedContexts = Arc::default();
    let rules = family_rules()
        .rule::<Parent, _>(recorder::<Parent>(&saved))
        .rule::<Child, _>(recorder::<Child>(&saved))
        .rule::<GrandChild, _>(recorder::<GrandChild>(&saved));
    (rules, saved)
}

fn recorder<T: Node>(saved: &SavedContexts) -> impl Fn(&T, &ContextItems) -> Vec<Problem> + Send + Sync + 'static {
    let saved = Arc::clone(saved);
    move |_: &T, context: &ContextItems| {
        saved.lock().push(context.clone());
        Vec::new()
    }
}

pub fn family_validator() -> GraphValidator<RuleSet> {
    GraphValidator::new(family_rules())
}

/// Install a subscriber honouring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
