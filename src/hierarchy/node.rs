use std::collections::BTreeSet;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/**
The intermediate tree built during one hierarchy-generation call.

Historically this structure was three duck-typed encodings living side by
side: an empty mapping standing in for "leaf" (bottom-up path insertion), a
bare string (top-down expansion), and a plain list of names (depth
flattening).  Here they are one tagged union so that flattening and
canonicalization can match on shape instead of sniffing it.

A `Group` with no children is still meaningful: it is the implicit leaf
marker produced by bottom-up path insertion, whose name lives in the parent's
key.  Builders never emit an empty `Group` as a whole result; an empty result
is represented by the caller as an absent node.
*/
#[derive(Clone, Debug, PartialEq)]
pub enum HierarchyNode {
    /// A node that stands for itself.
    Leaf(String),
    /// Ordered children keyed by display name; insertion order is
    /// presentation order.
    Group(Vec<(String, HierarchyNode)>),
    /// A subtree collapsed to the set of leaf names reachable beneath it.
    /// The collector is a set, which also makes the serialized form sorted
    /// and deduplicated.
    FlatList(BTreeSet<String>),
}

impl HierarchyNode {
    pub fn empty_group() -> HierarchyNode {
        HierarchyNode::Group(vec![])
    }

    pub fn is_empty_group(&self) -> bool {
        match self {
            HierarchyNode::Group(children) => children.is_empty(),
            _ => false,
        }
    }

    /// Gather every leaf name reachable beneath this node: `Leaf` values,
    /// keys whose value is an empty `Group` marker, and flat-list members.
    pub fn collect_leaf_names(&self, out: &mut BTreeSet<String>) {
        match self {
            HierarchyNode::Leaf(name) => {
                out.insert(name.clone());
            }
            HierarchyNode::FlatList(items) => {
                out.extend(items.iter().cloned());
            }
            HierarchyNode::Group(children) => {
                for (name, value) in children {
                    if value.is_empty_group() {
                        out.insert(name.clone());
                    } else {
                        value.collect_leaf_names(out);
                    }
                }
            }
        }
    }
}

/// Insert or replace a child, preserving first-insertion order for existing
/// names the way repeated mapping assignment would.
pub fn push_child(children: &mut Vec<(String, HierarchyNode)>, name: String, value: HierarchyNode) {
    if let Some(slot) = children.iter_mut().find(|(n, _)| *n == name) {
        slot.1 = value;
    } else {
        children.push((name, value));
    }
}

impl Serialize for HierarchyNode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            HierarchyNode::Leaf(name) => serializer.serialize_str(name),
            HierarchyNode::FlatList(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            HierarchyNode::Group(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (name, value) in children {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}
