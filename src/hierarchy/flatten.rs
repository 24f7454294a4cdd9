use std::collections::BTreeSet;

use super::node::HierarchyNode;

/// Collapse every group sitting at or below `max_depth` into a flat list of
/// the leaf names reachable beneath it; above the limit the tree passes
/// through unchanged.
///
/// This is a generic post-process: it does not care which builder produced
/// the tree, and it handles all three historical leaf encodings (empty-group
/// marker, bare leaf, flat-list member) through the shared collector.  Empty
/// groups are leaf markers for their parent's key and are left alone; flat
/// values below the limit are likewise untouched.
pub fn flatten_below(node: &HierarchyNode, depth: u32, max_depth: u32) -> HierarchyNode {
    match node {
        HierarchyNode::Group(children) if depth >= max_depth && !children.is_empty() => {
            let mut names = BTreeSet::new();
            node.collect_leaf_names(&mut names);
            HierarchyNode::FlatList(names)
        }
        HierarchyNode::Group(children) => HierarchyNode::Group(
            children
                .iter()
                .map(|(name, value)| (name.clone(), flatten_below(value, depth + 1, max_depth)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Every leaf name reachable in the tree, sorted and deduplicated.  Useful for
/// advisory statistics ("generated ~N leaf items") without walking shapes by
/// hand.
pub fn extract_all_leaves(node: &HierarchyNode) -> Vec<String> {
    let mut names = BTreeSet::new();
    node.collect_leaf_names(&mut names);
    names.into_iter().collect()
}
