//! # Node Model
//!
//! Rust has no runtime reflection, so every value that takes part in graph
//! validation describes itself through [`Node`]:
//!
//! | Kind | Meaning | Accessor |
//! |------|---------|----------|
//! | `Scalar` | numbers, booleans, chars | none |
//! | `Text` | strings | none |
//! | `Sequence` | lists, arrays, sets, heaps | [`Node::elements`] (`Element::Item`) |
//! | `Map` | keyed collections | [`Node::elements`] (`Element::Entry`) |
//! | `Composite` | structs with named members | [`Node::members`], [`Node::member`] |
//! | `Indirect` | `Option`, `Box`, `Rc`, `Arc`, `Weak`, `RefCell`, `RwLock` | [`Node::target`] |
//!
//! Indirect wrappers are transparent: the traversal looks through them to
//! the wrapped value, which is also where object identity lives. This makes
//! every `Rc` clone of one allocation the same node, so back-references
//! through `Rc<RefCell<_>>` close cycles the traversal can detect.
//!
//! ## Implementing `Node` for a struct
//!
//! ```
//! use graphval_core::{Member, Node};
//!
//! struct Address {
//!     street: Option<String>,
//! }
//!
//! struct Customer {
//!     name: String,
//!     address: Option<Address>,
//! }
//!
//! impl Node for Address {
//!     fn members(&self) -> Vec<Member> {
//!         vec![Member::text("Street")]
//!     }
//! }
//!
//! impl Node for Customer {
//!     fn members(&self) -> Vec<Member> {
//!         vec![Member::text("Name"), Member::reference("Address")]
//!     }
//!
//!     fn member(&self, name: &str) -> Option<&dyn Node> {
//!         match name {
//!             "Address" => self.address.as_ref().map(|a| a as &dyn Node),
//!             _ => None,
//!         }
//!     }
//! }
//! # let _ = Customer { name: String::new(), address: Some(Address { street: None }) };
//! ```

use std::any::{Any, TypeId};
use std::cell::{Ref, RefCell};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt::{self, Display};
use std::hash::BuildHasher;
use std::ops::Deref;
use std::rc::{Rc, Weak as RcWeak};
use std::sync::{Arc, Weak as ArcWeak};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::AccessError;

/// Access to a value as `dyn Any`, implemented for every `'static` type.
pub trait AsAny: Any {
    /// Upcast to `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// How the traversal treats a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Number, boolean or character. A leaf.
    Scalar,
    /// Character string. A leaf.
    Text,
    /// Ordered collection; children are indexed.
    Sequence,
    /// Keyed collection; children are values addressed by key.
    Map,
    /// Struct-like value with named members.
    Composite,
    /// Transparent wrapper around zero or one other node.
    Indirect,
}

/// Declared type of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberType {
    /// Number, boolean, character, or any other value type.
    Scalar,
    /// Character string.
    Text,
    /// Anything else: structs, collections, wrappers.
    Reference,
}

/// Declared metadata of one member of a composite type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Member {
    /// Member name as it appears in field paths.
    pub name: &'static str,
    /// Declared type category.
    pub ty: MemberType,
    /// Whether the member's value can be read.
    pub readable: bool,
    /// Whether reading the member requires an index argument.
    pub indexed: bool,
    /// Whether the traversal must not descend into the member.
    pub skip_recursion: bool,
}

impl Member {
    const fn declared(name: &'static str, ty: MemberType) -> Self {
        Self {
            name,
            ty,
            readable: true,
            indexed: false,
            skip_recursion: false,
        }
    }

    /// A member holding a struct, collection, or wrapper.
    pub const fn reference(name: &'static str) -> Self {
        Self::declared(name, MemberType::Reference)
    }

    /// A member holding a value type.
    pub const fn scalar(name: &'static str) -> Self {
        Self::declared(name, MemberType::Scalar)
    }

    /// A member holding a string.
    pub const fn text(name: &'static str) -> Self {
        Self::declared(name, MemberType::Text)
    }

    /// Exclude the member from recursive descent. The owning object's own
    /// validation still sees it.
    pub const fn skip_recursion(mut self) -> Self {
        self.skip_recursion = true;
        self
    }

    /// Mark the member as requiring an index argument.
    pub const fn indexer(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Mark the member as not readable.
    pub const fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }

    /// Whether the traversal descends into this member.
    pub fn is_descendable(&self) -> bool {
        self.readable
            && !self.indexed
            && self.ty == MemberType::Reference
            && !self.skip_recursion
    }
}

/// One child of a sequence or keyed container.
pub enum Element<'a> {
    /// Sequence element.
    Item(&'a dyn Node),
    /// Keyed container entry. Only the value is traversed.
    Entry {
        /// Display form of the key.
        key: String,
        /// The entry's value.
        value: &'a dyn Node,
    },
}

impl<'a> Element<'a> {
    /// The node the traversal descends into.
    pub fn value(&self) -> &'a dyn Node {
        match self {
            Self::Item(value) | Self::Entry { value, .. } => *value,
        }
    }
}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(value) => f.debug_tuple("Item").field(&value.type_name()).finish(),
            Self::Entry { key, value } => f
                .debug_struct("Entry")
                .field("key", key)
                .field("value", &value.type_name())
                .finish(),
        }
    }
}

/// The target of an indirect node, possibly behind a borrow guard that must
/// stay alive while the target is inspected.
pub enum NodeRef<'a> {
    /// Plain borrow.
    Borrowed(&'a dyn Node),
    /// Borrow through a guard or an owned handle.
    Guarded(Box<dyn Deref<Target = dyn Node> + 'a>),
}

impl Deref for NodeRef<'_> {
    type Target = dyn Node;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Borrowed(node) => *node,
            Self::Guarded(guard) => &***guard,
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.type_name()).finish()
    }
}

/// A value that can be visited by the graph traversal.
///
/// Only [`Node::kind`]-appropriate methods are consulted; the defaults
/// describe a composite with no members.
pub trait Node: AsAny + 'static {
    /// How the traversal treats this value.
    fn kind(&self) -> NodeKind {
        NodeKind::Composite
    }

    /// Type name for diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Declared members, in declaration order. Consulted once per type.
    fn members(&self) -> Vec<Member> {
        Vec::new()
    }

    /// Current value of a declared member; `None` when the member is null.
    fn member(&self, _name: &str) -> Option<&dyn Node> {
        None
    }

    /// Children of a `Sequence` or `Map`, in enumeration order.
    fn elements(&self) -> Vec<Element<'_>> {
        Vec::new()
    }

    /// Wrapped value of an `Indirect` node; `Ok(None)` when empty.
    fn target(&self) -> Result<Option<NodeRef<'_>>, AccessError> {
        Ok(None)
    }

    /// True for a value that stands for "no object", such as `None`.
    fn is_null(&self) -> bool {
        false
    }
}

/// Identity of a node within one traversal: address plus runtime type.
///
/// The type takes part because a struct and its first field share an
/// address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    addr: usize,
    type_id: TypeId,
}

impl NodeId {
    /// Identity of `node`.
    ///
    /// Zero-sized values share one address with every other value of their
    /// type, so they are keyed by type alone: all instances of a stateless
    /// type are one node.
    pub fn of(node: &dyn Node) -> Self {
        let addr = if std::mem::size_of_val(node) == 0 {
            0
        } else {
            node as *const dyn Node as *const () as usize
        };
        Self {
            addr,
            type_id: node.as_any().type_id(),
        }
    }

    /// Runtime type of the node.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

fn upcast<T: Node>(value: &T) -> &dyn Node {
    value
}

/// Owned strong handle produced by upgrading a weak reference.
struct Upgraded<P>(P);

impl<P> Deref for Upgraded<P>
where
    P: Deref,
    P::Target: Node + Sized,
{
    type Target = dyn Node;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

macro_rules! leaf_nodes {
    ($kind:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Node for $ty {
                fn kind(&self) -> NodeKind {
                    $kind
                }
            }
        )+
    };
}

leaf_nodes!(NodeKind::Scalar =>
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);
leaf_nodes!(NodeKind::Text => String, Box<str>);

macro_rules! sequence_nodes {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl<T: Node> Node for $ty<T> {
                fn kind(&self) -> NodeKind {
                    NodeKind::Sequence
                }

                fn elements(&self) -> Vec<Element<'_>> {
                    self.iter().map(|item| Element::Item(item as &dyn Node)).collect()
                }
            }
        )+
    };
}

// `BinaryHeap` iterates in heap order, which is unspecified.
sequence_nodes!(Vec, VecDeque, LinkedList, BinaryHeap, BTreeSet);

impl<T: Node, const N: usize> Node for [T; N] {
    fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    fn elements(&self) -> Vec<Element<'_>> {
        self.iter().map(|item| Element::Item(item as &dyn Node)).collect()
    }
}

impl<T: Node> Node for Box<[T]> {
    fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    fn elements(&self) -> Vec<Element<'_>> {
        self.iter().map(|item| Element::Item(item as &dyn Node)).collect()
    }
}

impl<T, S> Node for HashSet<T, S>
where
    T: Node,
    S: BuildHasher + 'static,
{
    fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    fn elements(&self) -> Vec<Element<'_>> {
        self.iter().map(|item| Element::Item(item as &dyn Node)).collect()
    }
}

impl<K, V> Node for BTreeMap<K, V>
where
    K: Display + 'static,
    V: Node,
{
    fn kind(&self) -> NodeKind {
        NodeKind::Map
    }

    fn elements(&self) -> Vec<Element<'_>> {
        self.iter()
            .map(|(key, value)| Element::Entry {
                key: key.to_string(),
                value: value as &dyn Node,
            })
            .collect()
    }
}

impl<K, V, S> Node for HashMap<K, V, S>
where
    K: Display + 'static,
    V: Node,
    S: BuildHasher + 'static,
{
    fn kind(&self) -> NodeKind {
        NodeKind::Map
    }

    fn elements(&self) -> Vec<Element<'_>> {
        self.iter()
            .map(|(key, value)| Element::Entry {
                key: key.to_string(),
                value: value as &dyn Node,
            })
            .collect()
    }
}

impl<T: Node> Node for Option<T> {
    fn kind(&self) -> NodeKind {
        NodeKind::Indirect
    }

    fn target(&self) -> Result<Option<NodeRef<'_>>, AccessError> {
        Ok(self.as_ref().map(|value| NodeRef::Borrowed(value as &dyn Node)))
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl<T: Node> Node for Box<T> {
    fn kind(&self) -> NodeKind {
        NodeKind::Indirect
    }

    fn target(&self) -> Result<Option<NodeRef<'_>>, AccessError> {
        Ok(Some(NodeRef::Borrowed(&**self as &dyn Node)))
    }
}

impl<T: Node> Node for Rc<T> {
    fn kind(&self) -> NodeKind {
        NodeKind::Indirect
    }

    fn target(&self) -> Result<Option<NodeRef<'_>>, AccessError> {
        Ok(Some(NodeRef::Borrowed(&**self as &dyn Node)))
    }
}

impl<T: Node> Node for Arc<T> {
    fn kind(&self) -> NodeKind {
        NodeKind::Indirect
    }

    fn target(&self) -> Result<Option<NodeRef<'_>>, AccessError> {
        Ok(Some(NodeRef::Borrowed(&**self as &dyn Node)))
    }
}

impl<T: Node> Node for RcWeak<T> {
    fn kind(&self) -> NodeKind {
        NodeKind::Indirect
    }

    fn target(&self) -> Result<Option<NodeRef<'_>>, AccessError> {
        Ok(self
            .upgrade()
            .map(|strong| NodeRef::Guarded(Box::new(Upgraded(strong)))))
    }
}

impl<T: Node> Node for ArcWeak<T> {
    fn kind(&self) -> NodeKind {
        NodeKind::Indirect
    }

    fn target(&self) -> Result<Option<NodeRef<'_>>, AccessError> {
        Ok(self
            .upgrade()
            .map(|strong| NodeRef::Guarded(Box::new(Upgraded(strong)))))
    }
}

impl<T: Node> Node for RefCell<T> {
    fn kind(&self) -> NodeKind {
        NodeKind::Indirect
    }

    fn target(&self) -> Result<Option<NodeRef<'_>>, AccessError> {
        let guard = self.try_borrow().map_err(|_| AccessError::Borrowed {
            type_name: std::any::type_name::<T>(),
        })?;
        Ok(Some(NodeRef::Guarded(Box::new(Ref::map(guard, upcast::<T>)))))
    }
}

impl<T: Node> Node for RwLock<T> {
    fn kind(&self) -> NodeKind {
        NodeKind::Indirect
    }

    fn target(&self) -> Result<Option<NodeRef<'_>>, AccessError> {
        // Recursive read: a cycle back into this lock must not block on
        // the read guard we already hold further up the stack.
        let guard = self.try_read_recursive().ok_or(AccessError::Locked {
            type_name: std::any::type_name::<T>(),
        })?;
        Ok(Some(NodeRef::Guarded(Box::new(
            parking_lot::RwLockReadGuard::map(guard, upcast::<T>),
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leafy;

    impl Node for Leafy {}

    struct Pair {
        left: i32,
        right: i32,
    }

    impl Node for Pair {
        fn members(&self) -> Vec<Member> {
            vec![Member::scalar("Left"), Member::scalar("Right")]
        }

        fn member(&self, name: &str) -> Option<&dyn Node> {
            match name {
                "Left" => Some(&self.left),
                "Right" => Some(&self.right),
                _ => None,
            }
        }
    }

    #[test]
    fn leaf_kinds() {
        assert_eq!(5_i32.kind(), NodeKind::Scalar);
        assert_eq!(true.kind(), NodeKind::Scalar);
        assert_eq!(String::from("x").kind(), NodeKind::Text);
        assert_eq!(Leafy.kind(), NodeKind::Composite);
    }

    #[test]
    fn sequence_elements_in_order() {
        let v = vec![10_i32, 20, 30];
        let elements = v.elements();
        assert_eq!(elements.len(), 3);
        let addr = |e: &Element<'_>| e.value() as *const dyn Node as *const () as usize;
        assert_eq!(addr(&elements[1]), &v[1] as *const i32 as usize);
    }

    #[test]
    fn linked_and_boxed_sequences_keep_order() {
        let list: LinkedList<i32> = [3, 1, 2].into_iter().collect();
        let boxed: Box<[i32]> = vec![3, 1, 2].into_boxed_slice();
        let nodes: [&dyn Node; 2] = [&list, &boxed];
        for node in nodes {
            assert_eq!(node.kind(), NodeKind::Sequence);
            let addrs: Vec<usize> = node
                .elements()
                .iter()
                .map(|e| e.value() as *const dyn Node as *const () as usize)
                .collect();
            assert_eq!(addrs.len(), 3);
        }
        let front = list.elements()[0].value() as *const dyn Node as *const () as usize;
        assert_eq!(front, list.front().unwrap() as *const i32 as usize);
        let last = boxed.elements()[2].value() as *const dyn Node as *const () as usize;
        assert_eq!(last, &boxed[2] as *const i32 as usize);
    }

    #[test]
    fn sets_and_heaps_are_sequences() {
        let ordered: BTreeSet<u8> = [5, 1, 3].into_iter().collect();
        let hashed: HashSet<u8> = [5, 1, 3].into_iter().collect();
        let heap: BinaryHeap<u8> = [5, 1, 3].into_iter().collect();
        let nodes: [&dyn Node; 3] = [&ordered, &hashed, &heap];
        for node in nodes {
            assert_eq!(node.kind(), NodeKind::Sequence);
            assert_eq!(node.elements().len(), 3);
            assert!(node.elements().iter().all(|e| matches!(e, Element::Item(_))));
        }
        let first = ordered.elements()[0].value() as *const dyn Node as *const () as usize;
        assert_eq!(first, ordered.first().unwrap() as *const u8 as usize);
    }

    #[test]
    fn map_entries_carry_display_keys() {
        let mut m = BTreeMap::new();
        m.insert("key1", 1_u8);
        m.insert("key0", 0_u8);
        let keys: Vec<String> = m
            .elements()
            .into_iter()
            .map(|e| match e {
                Element::Entry { key, .. } => key,
                Element::Item(_) => String::new(),
            })
            .collect();
        assert_eq!(keys, vec!["key0", "key1"]);
    }

    #[test]
    fn option_is_transparent() {
        let some: Option<Leafy> = Some(Leafy);
        let none: Option<Leafy> = None;
        assert_eq!(some.kind(), NodeKind::Indirect);
        assert!(some.target().unwrap().is_some());
        assert!(none.target().unwrap().is_none());
        assert!(none.is_null());
        assert!(!some.is_null());
    }

    #[test]
    fn rc_clones_share_identity() {
        let a = Rc::new(Pair { left: 1, right: 2 });
        let b = Rc::clone(&a);
        let ta = a.target().unwrap().unwrap();
        let tb = b.target().unwrap().unwrap();
        assert_eq!(NodeId::of(&*ta), NodeId::of(&*tb));
    }

    #[test]
    fn struct_and_first_field_are_distinct() {
        let pair = Pair { left: 1, right: 2 };
        let outer = NodeId::of(&pair);
        let inner = NodeId::of(&pair.left);
        assert_ne!(outer, inner);
        assert_eq!(outer.type_id(), TypeId::of::<Pair>());
    }

    struct Marker;

    impl Node for Marker {}

    #[test]
    fn zero_sized_values_are_keyed_by_type() {
        let boxed = Box::new(Leafy);
        assert_eq!(NodeId::of(&Leafy), NodeId::of(&*boxed));
        assert_ne!(NodeId::of(&Leafy), NodeId::of(&Marker));
    }

    #[test]
    fn refcell_reports_mutable_borrow() {
        let cell = RefCell::new(Pair { left: 1, right: 2 });
        let _writer = cell.borrow_mut();
        let err = cell.target().unwrap_err();
        assert!(matches!(err, AccessError::Borrowed { .. }));
    }

    #[test]
    fn refcell_target_reads_through_guard() {
        let cell = RefCell::new(Pair { left: 1, right: 2 });
        let target = cell.target().unwrap().unwrap();
        assert_eq!(target.kind(), NodeKind::Composite);
        assert_eq!(target.members().len(), 2);
    }

    #[test]
    fn rwlock_reports_write_lock() {
        let lock = RwLock::new(Pair { left: 1, right: 2 });
        let _writer = lock.write();
        assert!(matches!(lock.target(), Err(AccessError::Locked { .. })));
    }

    #[test]
    fn weak_after_drop_is_null() {
        let strong = Rc::new(Pair { left: 1, right: 2 });
        let weak = Rc::downgrade(&strong);
        assert!(weak.target().unwrap().is_some());
        drop(strong);
        assert!(weak.target().unwrap().is_none());
    }

    #[test]
    fn member_descendability() {
        assert!(Member::reference("Child").is_descendable());
        assert!(!Member::scalar("Count").is_descendable());
        assert!(!Member::text("Name").is_descendable());
        assert!(!Member::reference("Skipped").skip_recursion().is_descendable());
        assert!(!Member::reference("Item").indexer().is_descendable());
        assert!(!Member::reference("Sink").write_only().is_descendable());
    }
}
