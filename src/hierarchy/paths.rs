use std::collections::{HashMap, HashSet};

use ustr::Ustr;

use crate::lexicon::{AbstractLexicon, Result, SynsetInfo};

/// Enumerate every root-to-node ancestor path for `node` over the hypernym
/// relation.  The graph is a DAG, so a node can have several paths; they are
/// produced first-parent-first, which makes the first returned path the one
/// that follows primary parents all the way up.
///
/// Ancestors are fetched breadth-first through the lexicon before the paths
/// are assembled, so path assembly itself never suspends.
pub async fn ancestor_paths(
    lexicon: &Box<dyn AbstractLexicon + Send + Sync>,
    node: &SynsetInfo,
) -> Result<Vec<Vec<SynsetInfo>>> {
    let mut ancestors: HashMap<Ustr, SynsetInfo> = HashMap::new();
    let mut to_fetch: Vec<Ustr> = node.hypernyms.clone();
    let mut considered: HashSet<Ustr> = to_fetch.iter().cloned().collect();

    while let Some(key) = to_fetch.pop() {
        let info = match lexicon.synset_lookup(key.as_str()).await {
            Ok(info) => info,
            Err(err) => {
                warn!(key = %key, err = ?err, "unresolvable ancestor, treating as root");
                continue;
            }
        };
        for parent in &info.hypernyms {
            if considered.insert(*parent) {
                to_fetch.push(*parent);
            }
        }
        ancestors.insert(key, info);
    }

    let mut on_path = HashSet::new();
    Ok(assemble(&ancestors, node, &mut on_path))
}

fn assemble(
    ancestors: &HashMap<Ustr, SynsetInfo>,
    node: &SynsetInfo,
    on_path: &mut HashSet<Ustr>,
) -> Vec<Vec<SynsetInfo>> {
    on_path.insert(node.key);
    let parents: Vec<&SynsetInfo> = node
        .hypernyms
        .iter()
        .filter(|key| !on_path.contains(*key))
        .filter_map(|key| ancestors.get(key))
        .collect();

    let mut paths = vec![];
    if parents.is_empty() {
        paths.push(vec![node.clone()]);
    } else {
        for parent in parents {
            for mut path in assemble(ancestors, parent, on_path) {
                path.push(node.clone());
                paths.push(path);
            }
        }
    }
    on_path.remove(&node.key);
    paths
}

/// Primary-path selection: the DAG is collapsed to a tree by keeping only the
/// first reported ancestor path and silently discarding alternate parentage.
/// That information loss is a policy decision, which is why the choice lives
/// here rather than inline in traversal code; swap this out to experiment
/// with other selections.
pub fn pick_primary_path(paths: Vec<Vec<SynsetInfo>>) -> Option<Vec<SynsetInfo>> {
    paths.into_iter().next()
}
