//! # Type Metadata Cache
//!
//! Computes, once per runtime type, the list of members the traversal may
//! descend into, and memoizes it.
//!
//! A member is descendable when it is readable, takes no index argument,
//! is declared as a reference (not a string, not a value type), and is not
//! marked with [`crate::Member::skip_recursion`]. Declaration order is kept.
//!
//! ## Thread Safety
//!
//! The cache is a `DashMap` keyed by `TypeId`. Member lists are computed
//! outside any shard lock and published through the entry API, so the first
//! writer wins and concurrent readers of other types never observe a
//! partially built entry. Entries are never replaced.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use crate::node::{Member, Node};

/// One descendable member of a composite type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldDescriptor {
    /// Member name, used both to read the value and as a path segment.
    pub name: &'static str,
}

/// Process-lifetime memo of descendable members per type.
#[derive(Debug, Default)]
pub struct TypeMetadataCache {
    fields: DashMap<TypeId, Arc<[FieldDescriptor]>>,
}

impl TypeMetadataCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Descendable members of `node`'s runtime type, computing them on first
    /// use.
    pub fn fields_of(&self, node: &dyn Node) -> Arc<[FieldDescriptor]> {
        let type_id = node.as_any().type_id();
        if let Some(cached) = self.fields.get(&type_id) {
            return Arc::clone(cached.value());
        }

        let computed: Arc<[FieldDescriptor]> = node
            .members()
            .iter()
            .filter(|member| Member::is_descendable(member))
            .map(|member| FieldDescriptor { name: member.name })
            .collect();
        tracing::trace!(
            type_name = node.type_name(),
            fields = computed.len(),
            "cached descendable fields"
        );

        let entry = self.fields.entry(type_id).or_insert(computed);
        Arc::clone(entry.value())
    }

    /// Whether a type has been cached.
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.fields.contains_key(&type_id)
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.fields.clear();
    }
}
