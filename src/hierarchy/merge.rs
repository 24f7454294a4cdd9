use itertools::Itertools;

use super::flatten::flatten_below;
use super::node::HierarchyNode;
use super::paths::{ancestor_paths, pick_primary_path};
use crate::lexicon::{AbstractLexicon, Result};

#[derive(Clone, Debug)]
pub struct MergeOptions {
    /// Keep only this many trailing entries of each ancestor path, counted
    /// from the leaf; 0 keeps full paths.
    pub ancestor_depth_limit: u32,
    /// Depth at which the merged tree collapses into flat lists.
    pub max_depth: u32,
}

/// Fold a set of leaf identifiers into one shared tree by merging their
/// primary ancestor paths.
///
/// Identifiers are deduplicated preserving first occurrence.  An identifier
/// that fails to resolve is dropped; partial results from a large corpus beat
/// aborting the whole run.  Paths sharing a prefix converge on the same
/// branch, and the terminal element of each path is recorded as an empty
/// group, the implicit leaf marker.  The merged tree is then passed through
/// the depth flattener.
pub async fn merge_identifier_paths(
    lexicon: &Box<dyn AbstractLexicon + Send + Sync>,
    identifiers: &[String],
    opts: &MergeOptions,
) -> Result<HierarchyNode> {
    let mut roots: Vec<(String, HierarchyNode)> = vec![];

    for id in identifiers.iter().unique() {
        let node = match lexicon.synset_lookup(id).await {
            Ok(node) => node,
            Err(err) => {
                warn!(id = %id, err = ?err, "skipping unresolvable identifier");
                continue;
            }
        };

        let paths = match ancestor_paths(lexicon, &node).await {
            Ok(paths) => paths,
            Err(err) => {
                warn!(id = %id, err = ?err, "skipping identifier with unresolvable ancestry");
                continue;
            }
        };
        let mut path = match pick_primary_path(paths) {
            Some(path) => path,
            None => continue,
        };

        let limit = opts.ancestor_depth_limit as usize;
        if limit > 0 && path.len() > limit {
            path.drain(..path.len() - limit);
        }

        let names: Vec<String> = path.iter().map(|n| n.display_name()).collect();
        insert_path(&mut roots, &names);
    }

    let merged = HierarchyNode::Group(roots);
    Ok(flatten_below(&merged, 0, opts.max_depth))
}

/// Descend one level per path element, reusing a name already present at a
/// level so shared prefixes converge.
fn insert_path(level: &mut Vec<(String, HierarchyNode)>, names: &[String]) {
    let (first, rest) = match names.split_first() {
        Some(split) => split,
        None => return,
    };

    let idx = match level.iter().position(|(name, _)| name == first) {
        Some(idx) => idx,
        None => {
            level.push((first.clone(), HierarchyNode::empty_group()));
            level.len() - 1
        }
    };
    if let HierarchyNode::Group(children) = &mut level[idx].1 {
        insert_path(children, rest);
    }
}
