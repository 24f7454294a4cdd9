use std::collections::BTreeSet;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::node::HierarchyNode;

/**
The final output shape handed to the serializer.

Two invariants hold after canonicalization:

- A `Map` never has all-leaf children; a mapping whose children all resolve
  to leaves becomes a `List` of those leaf names, sorted and deduplicated.
- No redundant singleton wrapping survives: within a mixed list, an entry of
  the form `{name: [name]}` is collapsed to the bare `name`.

A mixed mapping (some leaf children, some subtrees) renders as a `List` whose
items are bare leaves and single-key `Map`s; an all-subtree mapping stays a
`Map`.  Canonicalization is idempotent: re-canonicalizing its own output is a
no-op.
*/
#[derive(Clone, Debug, PartialEq)]
pub enum CanonicalNode {
    Leaf(String),
    List(Vec<CanonicalNode>),
    Map(Vec<(String, CanonicalNode)>),
}

/// Canonicalize an intermediate tree.
pub fn canonicalize(node: &HierarchyNode) -> CanonicalNode {
    embed(node).canonicalized()
}

/// Structural embedding of the intermediate union; no shape rules applied
/// yet.  Empty groups stay empty maps here because their leaf name lives in
/// the parent's key, which only the mapping rules below can see.
fn embed(node: &HierarchyNode) -> CanonicalNode {
    match node {
        HierarchyNode::Leaf(name) => CanonicalNode::Leaf(name.clone()),
        HierarchyNode::FlatList(items) => CanonicalNode::List(
            items
                .iter()
                .map(|name| CanonicalNode::Leaf(name.clone()))
                .collect(),
        ),
        HierarchyNode::Group(children) => CanonicalNode::Map(
            children
                .iter()
                .map(|(name, value)| (name.clone(), embed(value)))
                .collect(),
        ),
    }
}

fn is_leaf(node: &CanonicalNode) -> bool {
    matches!(node, CanonicalNode::Leaf(_))
}

/// A mapping child seen through its key: an empty-map marker is a leaf whose
/// name is the key itself.
fn canonical_child(key: &str, value: &CanonicalNode) -> CanonicalNode {
    match value {
        CanonicalNode::Map(entries) if entries.is_empty() => CanonicalNode::Leaf(key.to_string()),
        other => other.canonicalized(),
    }
}

/// Collapse `{name: [name]}` to `name`; everything else passes through.
fn simplify_singleton(node: CanonicalNode) -> CanonicalNode {
    if let CanonicalNode::Map(entries) = &node {
        if let [(key, CanonicalNode::List(items))] = entries.as_slice() {
            if let [CanonicalNode::Leaf(sole)] = items.as_slice() {
                if sole == key {
                    return CanonicalNode::Leaf(key.clone());
                }
            }
        }
    }
    node
}

fn sorted_leaf_list<'a, I>(names: I) -> CanonicalNode
where
    I: IntoIterator<Item = &'a str>,
{
    let unique: BTreeSet<&str> = names.into_iter().collect();
    CanonicalNode::List(
        unique
            .into_iter()
            .map(|name| CanonicalNode::Leaf(name.to_string()))
            .collect(),
    )
}

impl CanonicalNode {
    /// Apply the canonical shape rules bottom-up.  This is the fixpoint
    /// operation: applying it to an already-canonical tree returns an equal
    /// tree.
    pub fn canonicalized(&self) -> CanonicalNode {
        match self {
            CanonicalNode::Leaf(name) => CanonicalNode::Leaf(name.clone()),
            CanonicalNode::List(items) => {
                let conv: Vec<CanonicalNode> = items
                    .iter()
                    .map(|item| simplify_singleton(item.canonicalized()))
                    .collect();
                if conv.iter().all(is_leaf) {
                    sorted_leaf_list(conv.iter().filter_map(|item| match item {
                        CanonicalNode::Leaf(name) => Some(name.as_str()),
                        _ => None,
                    }))
                } else {
                    CanonicalNode::List(conv)
                }
            }
            CanonicalNode::Map(entries) => {
                if entries.is_empty() {
                    // The empty mapping is terminal.
                    return CanonicalNode::Map(vec![]);
                }
                let conv: Vec<(String, CanonicalNode)> = entries
                    .iter()
                    .map(|(key, value)| (key.clone(), canonical_child(key, value)))
                    .collect();

                if conv.iter().all(|(_, value)| is_leaf(value)) {
                    return sorted_leaf_list(conv.iter().filter_map(|(_, value)| match value {
                        CanonicalNode::Leaf(name) => Some(name.as_str()),
                        _ => None,
                    }));
                }

                if conv.iter().any(|(_, value)| is_leaf(value)) {
                    // Mixed: bare leaves and single-key wrappers, child order
                    // preserved.
                    let items: Vec<CanonicalNode> = conv
                        .into_iter()
                        .map(|(key, value)| match value {
                            CanonicalNode::Leaf(name) => {
                                if name == key {
                                    CanonicalNode::Leaf(name)
                                } else {
                                    CanonicalNode::Map(vec![(
                                        key,
                                        CanonicalNode::List(vec![CanonicalNode::Leaf(name)]),
                                    )])
                                }
                            }
                            other => {
                                simplify_singleton(CanonicalNode::Map(vec![(key, other)]))
                            }
                        })
                        .collect();
                    if items.iter().all(is_leaf) {
                        return sorted_leaf_list(items.iter().filter_map(|item| match item {
                            CanonicalNode::Leaf(name) => Some(name.as_str()),
                            _ => None,
                        }));
                    }
                    return CanonicalNode::List(items);
                }

                CanonicalNode::Map(conv)
            }
        }
    }
}

impl Serialize for CanonicalNode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CanonicalNode::Leaf(name) => serializer.serialize_str(name),
            CanonicalNode::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            CanonicalNode::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (name, value) in entries {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}
