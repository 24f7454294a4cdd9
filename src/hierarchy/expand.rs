use std::collections::{BTreeSet, HashMap, HashSet};

use ustr::Ustr;

use super::node::{push_child, HierarchyNode};
use super::validity::ValiditySet;
use crate::lexicon::{parse_synset_key, AbstractLexicon, Result, SynsetInfo};

lazy_static! {
    /// Display names of the abstract upper-ontology categories that drown a
    /// wildcard tree in noise when expanding from `entity`.  Matched against
    /// a node's display name when blacklisting is enabled.
    static ref CATEGORY_BLACKLIST: HashSet<&'static str> = [
        "abstraction",
        "attribute",
        "communication",
        "group",
        "measure",
        "otherworld",
        "phenomenon",
        "process",
        "psychological feature",
        "relation",
        "thing",
    ]
    .iter()
    .cloned()
    .collect();
}

#[derive(Clone, Debug, Default)]
pub struct ExpandOptions {
    /// Depth at which subtrees stop expanding and collapse into flat lists of
    /// their descendants.
    pub max_depth: u32,
    /// Restrict retained nodes to these keys; `None` means no restriction.
    pub validity: Option<ValiditySet>,
    /// Drop nodes that are not the primary sense of their own name, so
    /// unrelated subtrees cannot appear to share a label.
    pub strict_primary_sense: bool,
    /// Prune the fixed abstract-category names entirely.
    pub blacklist: bool,
}

/// Recursively expand a root synset into its descendant tree.
///
/// `root_spec` may be a synset key (`n00015388`) or a dotted sense name
/// (`animal.n.01`).  An unresolvable root is reported and yields the empty
/// structure rather than an error.  The result is wrapped as
/// `{root name: content}`.
///
/// The reachable subgraph is fetched through the lexicon up front (one
/// worklist pass with a considered-set, so the DAG is visited once per node);
/// expansion itself is then a pure function over the fetched map, which also
/// acts as the per-invocation memo for the repeated primary-sense lookups.
pub async fn expand_hierarchy(
    lexicon: &Box<dyn AbstractLexicon + Send + Sync>,
    root_spec: &str,
    opts: &ExpandOptions,
) -> Result<HierarchyNode> {
    let root = if parse_synset_key(root_spec).is_some() {
        lexicon.synset_lookup(root_spec).await
    } else {
        lexicon.synset_by_name(root_spec).await
    };
    let root = match root {
        Ok(root) => root,
        Err(err) => {
            warn!(root = %root_spec, err = ?err, "could not resolve root synset");
            return Ok(HierarchyNode::empty_group());
        }
    };

    // ## Fetch the reachable subgraph.
    let mut synsets: HashMap<Ustr, SynsetInfo> = HashMap::new();
    let mut to_traverse: Vec<Ustr> = vec![root.key];
    let mut considered: HashSet<Ustr> = to_traverse.iter().cloned().collect();

    while let Some(key) = to_traverse.pop() {
        let info = if key == root.key {
            root.clone()
        } else {
            match lexicon.synset_lookup(key.as_str()).await {
                Ok(info) => info,
                Err(err) => {
                    warn!(key = %key, err = ?err, "unresolvable hyponym, dropping");
                    continue;
                }
            }
        };
        for child in &info.hyponyms {
            if considered.insert(*child) {
                to_traverse.push(*child);
            }
        }
        synsets.insert(key, info);
    }
    trace!(synsets = synsets.len(), "fetched reachable subgraph");

    // ## Memoize primary senses for every lemma we may test.
    let mut primary: HashMap<Ustr, Option<Ustr>> = HashMap::new();
    if opts.strict_primary_sense {
        for info in synsets.values() {
            if primary.contains_key(&info.lemma) {
                continue;
            }
            let senses = lexicon.synsets_for_lemma(info.lemma.as_str()).await?;
            primary.insert(info.lemma, senses.first().map(|s| s.key));
        }
    }

    // ## Pure expansion over the fetched map.
    let expander = TreeExpander {
        synsets: &synsets,
        primary: &primary,
        opts,
    };
    match expander.expand(&root, 0) {
        Some(content) => Ok(HierarchyNode::Group(vec![(root.display_name(), content)])),
        None => Ok(HierarchyNode::empty_group()),
    }
}

struct TreeExpander<'a> {
    synsets: &'a HashMap<Ustr, SynsetInfo>,
    primary: &'a HashMap<Ustr, Option<Ustr>>,
    opts: &'a ExpandOptions,
}

impl<'a> TreeExpander<'a> {
    /// The recursive contract: `None` means the node (and its subtree) is
    /// excluded.  Filters apply in a fixed order: blacklist, then strict
    /// primary sense, then the depth/validity rules.
    fn expand(&self, node: &SynsetInfo, depth: u32) -> Option<HierarchyNode> {
        let name = node.display_name();

        if self.opts.blacklist && CATEGORY_BLACKLIST.contains(name.as_str()) {
            return None;
        }

        if self.opts.strict_primary_sense {
            if let Some(Some(primary_key)) = self.primary.get(&node.lemma) {
                if *primary_key != node.key {
                    // A secondary/minor sense of its own name.
                    return None;
                }
            }
        }

        if depth >= self.opts.max_depth {
            // Stop expanding: the subtree becomes the flat list of all valid
            // descendants.
            let names = self.descendant_names(node);
            if !names.is_empty() {
                return Some(HierarchyNode::FlatList(names));
            }
            return self.leaf_fallback(node, name);
        }

        let mut children_out: Vec<(String, HierarchyNode)> = vec![];
        for child_key in &node.hyponyms {
            let child = match self.synsets.get(child_key) {
                Some(child) => child,
                None => continue,
            };
            if let Some(content) = self.expand(child, depth + 1) {
                push_child(&mut children_out, child.display_name(), content);
            }
        }

        if children_out.is_empty() {
            // A leaf relative to this traversal: either the graph has no
            // children here or filtering removed them all.
            return self.leaf_fallback(node, name);
        }
        Some(HierarchyNode::Group(children_out))
    }

    /// Display names of every transitive descendant passing the validity
    /// filter; the node itself is not included.
    fn descendant_names(&self, node: &SynsetInfo) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let mut stack: Vec<Ustr> = node.hyponyms.clone();
        let mut visited: HashSet<Ustr> = stack.iter().cloned().collect();

        while let Some(key) = stack.pop() {
            let info = match self.synsets.get(&key) {
                Some(info) => info,
                None => continue,
            };
            let valid = match &self.opts.validity {
                Some(validity) => validity.contains(info.key.as_str()),
                None => true,
            };
            if valid {
                names.insert(info.display_name());
            }
            for child in &info.hyponyms {
                if visited.insert(*child) {
                    stack.push(*child);
                }
            }
        }
        names
    }

    fn leaf_fallback(&self, node: &SynsetInfo, name: String) -> Option<HierarchyNode> {
        match &self.opts.validity {
            Some(validity) if !validity.contains(node.key.as_str()) => None,
            _ => Some(HierarchyNode::Leaf(name)),
        }
    }
}
