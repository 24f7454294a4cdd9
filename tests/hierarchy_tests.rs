//! Behavior tests for the hierarchy core: canonical shapes, depth
//! flattening, bottom-up path merging, and top-down expansion with its
//! filter chain.

use std::collections::BTreeSet;

use hiergen::hierarchy::{
    canonicalize, expand_hierarchy, extract_all_leaves, flatten_below, merge_identifier_paths,
    CanonicalNode, ExpandOptions, HierarchyNode, MergeOptions, ValiditySet,
};
use hiergen::lexicon::{
    make_memory_lexicon, parse_synset_key, AbstractLexicon, SynsetSeed,
};

fn group(entries: Vec<(&str, HierarchyNode)>) -> HierarchyNode {
    HierarchyNode::Group(
        entries
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    )
}

fn leaf(name: &str) -> HierarchyNode {
    HierarchyNode::Leaf(name.to_string())
}

fn flat(names: &[&str]) -> HierarchyNode {
    HierarchyNode::FlatList(names.iter().map(|n| n.to_string()).collect::<BTreeSet<_>>())
}

fn empty() -> HierarchyNode {
    HierarchyNode::empty_group()
}

fn canonical_json(node: &CanonicalNode) -> serde_json::Value {
    serde_json::to_value(node).unwrap()
}

// ## Shape canonicalization

#[test]
fn test_all_leaf_collapse() {
    // A mapping whose children are all leaves becomes the sorted,
    // deduplicated list of those leaf names.
    let tree = group(vec![("b", empty()), ("a", empty())]);
    let result = canonicalize(&tree);
    assert_eq!(canonical_json(&result), serde_json::json!(["a", "b"]));
}

#[test]
fn test_all_leaf_collapse_under_parent() {
    let tree = group(vec![("root", group(vec![("leaf1", empty()), ("leaf2", empty())]))]);
    let result = canonicalize(&tree);
    assert_eq!(
        canonical_json(&result),
        serde_json::json!({"root": ["leaf1", "leaf2"]})
    );
}

#[test]
fn test_bare_leaf_values_collapse_like_markers() {
    // The top-down builder encodes leaves as bare strings rather than empty
    // markers; both encodings canonicalize identically.
    let tree = group(vec![(
        "root",
        group(vec![("leaf1", leaf("leaf1")), ("leaf2", leaf("leaf2"))]),
    )]);
    let result = canonicalize(&tree);
    assert_eq!(
        canonical_json(&result),
        serde_json::json!({"root": ["leaf1", "leaf2"]})
    );
}

#[test]
fn test_mixed_map_becomes_list_with_singleton_removed() {
    // A mixed parent keeps child order, renders leaves bare (not wrapped as
    // {leaf1: [leaf1]}), and wraps subtrees as single-key maps.
    let tree = group(vec![(
        "root",
        group(vec![
            ("leaf1", empty()),
            ("sub", group(vec![("leaf2", empty())])),
        ]),
    )]);
    let result = canonicalize(&tree);
    assert_eq!(
        canonical_json(&result),
        serde_json::json!({"root": ["leaf1", {"sub": ["leaf2"]}]})
    );
}

#[test]
fn test_all_subtree_map_preserved() {
    let tree = group(vec![(
        "a",
        group(vec![("b", group(vec![("c", group(vec![("d", empty())]))]))]),
    )]);
    let result = canonicalize(&tree);
    assert_eq!(
        canonical_json(&result),
        serde_json::json!({"a": {"b": {"c": ["d"]}}})
    );
}

#[test]
fn test_flat_group_source_preserved() {
    // Supercategory groups bypass the builders; a pre-flattened list only
    // gets deduplicated and sorted.
    let tree = group(vec![("super", flat(&["c1", "c2"]))]);
    let result = canonicalize(&tree);
    assert_eq!(
        canonical_json(&result),
        serde_json::json!({"super": ["c1", "c2"]})
    );
}

#[test]
fn test_empty_mapping_is_terminal() {
    let result = canonicalize(&empty());
    assert_eq!(canonical_json(&result), serde_json::json!({}));
}

#[test]
fn test_canonicalize_idempotent() {
    let trees = vec![
        group(vec![("b", empty()), ("a", empty())]),
        group(vec![(
            "root",
            group(vec![
                ("leaf1", empty()),
                ("sub", group(vec![("leaf2", empty())])),
            ]),
        )]),
        group(vec![(
            "a",
            group(vec![("b", group(vec![("c", group(vec![("d", empty())]))]))]),
        )]),
        group(vec![("super", flat(&["c2", "c1", "c2"]))]),
        empty(),
    ];
    for tree in trees {
        let once = canonicalize(&tree);
        let twice = once.canonicalized();
        assert_eq!(once, twice);
    }
}

// ## Depth flattening

#[test]
fn test_flatten_noop_above_limit() {
    let tree = group(vec![(
        "A",
        group(vec![
            ("B", leaf("leaf1")),
            ("C", group(vec![("D", leaf("leaf2"))])),
        ]),
    )]);
    assert_eq!(flatten_below(&tree, 0, 10), tree);
}

#[test]
fn test_flatten_collapses_at_limit() {
    let tree = group(vec![(
        "A",
        group(vec![
            ("B", leaf("leaf1")),
            ("C", group(vec![("D", leaf("leaf2"))])),
        ]),
    )]);
    let flattened = flatten_below(&tree, 0, 1);
    assert_eq!(flattened, group(vec![("A", flat(&["leaf1", "leaf2"]))]));
}

#[test]
fn test_flatten_handles_all_leaf_encodings() {
    // Bare leaves, empty markers, and list members all count as leaves.
    let tree = group(vec![(
        "top",
        group(vec![
            ("bare", leaf("x")),
            ("marker", empty()),
            ("list", flat(&["y", "z"])),
        ]),
    )]);
    let flattened = flatten_below(&tree, 0, 1);
    assert_eq!(
        flattened,
        group(vec![("top", flat(&["marker", "x", "y", "z"]))])
    );
}

#[test]
fn test_extract_all_leaves() {
    let tree = group(vec![
        ("a", flat(&["1", "2"])),
        ("b", group(vec![("c", leaf("3"))])),
    ]);
    assert_eq!(extract_all_leaves(&tree), vec!["1", "2", "3"]);
}

// ## Lexicon fixtures

fn animal_graph() -> Box<dyn AbstractLexicon + Send + Sync> {
    make_memory_lexicon(vec![
        SynsetSeed::new("n00000001", "entity.n.01", &["entity"], &[], &["n00000002"]),
        SynsetSeed::new(
            "n00000002",
            "animal.n.01",
            &["animal"],
            &["n00000001"],
            &["n00000003", "n00000004"],
        ),
        SynsetSeed::new("n00000003", "dog.n.01", &["dog"], &["n00000002"], &[]),
        SynsetSeed::new("n00000004", "cat.n.01", &["cat"], &["n00000002"], &[]),
    ])
}

fn chain_graph() -> Box<dyn AbstractLexicon + Send + Sync> {
    make_memory_lexicon(vec![
        SynsetSeed::new("n00000011", "a.n.01", &["a"], &[], &["n00000012"]),
        SynsetSeed::new("n00000012", "b.n.01", &["b"], &["n00000011"], &["n00000013"]),
        SynsetSeed::new("n00000013", "c.n.01", &["c"], &["n00000012"], &["n00000014"]),
        SynsetSeed::new("n00000014", "d.n.01", &["d"], &["n00000013"], &[]),
    ])
}

// ## Bottom-up merging

#[tokio::test]
async fn test_merge_shares_path_prefixes() {
    let lexicon = animal_graph();
    let ids = vec!["n00000003".to_string(), "n00000004".to_string()];
    let opts = MergeOptions {
        ancestor_depth_limit: 0,
        max_depth: 10,
    };
    let tree = merge_identifier_paths(&lexicon, &ids, &opts).await.unwrap();

    // One shared prefix, not two disjoint trees.
    let expected = group(vec![(
        "entity",
        group(vec![(
            "animal",
            group(vec![("dog", empty()), ("cat", empty())]),
        )]),
    )]);
    assert_eq!(tree, expected);
}

#[tokio::test]
async fn test_merge_ancestor_depth_truncation() {
    let lexicon = chain_graph();
    let ids = vec!["n00000014".to_string()];
    let opts = MergeOptions {
        ancestor_depth_limit: 2,
        max_depth: 10,
    };
    let tree = merge_identifier_paths(&lexicon, &ids, &opts).await.unwrap();

    // Only the trailing [c, d] of the [a, b, c, d] path is inserted.
    assert_eq!(tree, group(vec![("c", group(vec![("d", empty())]))]));
}

#[tokio::test]
async fn test_merge_deduplicates_identifiers() {
    let lexicon = animal_graph();
    let ids = vec!["n00000003".to_string(), "n00000003".to_string()];
    let opts = MergeOptions {
        ancestor_depth_limit: 0,
        max_depth: 10,
    };
    let tree = merge_identifier_paths(&lexicon, &ids, &opts).await.unwrap();
    let expected = group(vec![(
        "entity",
        group(vec![("animal", group(vec![("dog", empty())]))]),
    )]);
    assert_eq!(tree, expected);
}

#[tokio::test]
async fn test_merge_drops_unresolvable_identifiers() {
    let lexicon = animal_graph();
    let ids = vec![
        "bogus!".to_string(),
        "n99999999".to_string(),
        "n00000003".to_string(),
    ];
    let opts = MergeOptions {
        ancestor_depth_limit: 0,
        max_depth: 10,
    };
    let tree = merge_identifier_paths(&lexicon, &ids, &opts).await.unwrap();
    let leaves = extract_all_leaves(&tree);
    assert_eq!(leaves, vec!["dog"]);
}

#[tokio::test]
async fn test_merge_collapses_dag_to_primary_path() {
    // "fork" has two parents; only the first reported ancestor path (via
    // "left") survives the collapse to a tree.
    let lexicon = make_memory_lexicon(vec![
        SynsetSeed::new("n00000051", "top.n.01", &["top"], &[], &["n00000052", "n00000053"]),
        SynsetSeed::new("n00000052", "left.n.01", &["left"], &["n00000051"], &["n00000054"]),
        SynsetSeed::new("n00000053", "right.n.01", &["right"], &["n00000051"], &["n00000054"]),
        SynsetSeed::new(
            "n00000054",
            "fork.n.01",
            &["fork"],
            &["n00000052", "n00000053"],
            &[],
        ),
    ]);
    let ids = vec!["n00000054".to_string()];
    let opts = MergeOptions {
        ancestor_depth_limit: 0,
        max_depth: 10,
    };
    let tree = merge_identifier_paths(&lexicon, &ids, &opts).await.unwrap();
    let expected = group(vec![(
        "top",
        group(vec![("left", group(vec![("fork", empty())]))]),
    )]);
    assert_eq!(tree, expected);
}

#[tokio::test]
async fn test_merge_flattens_at_max_depth() {
    let lexicon = animal_graph();
    let ids = vec!["n00000003".to_string(), "n00000004".to_string()];
    let opts = MergeOptions {
        ancestor_depth_limit: 0,
        max_depth: 1,
    };
    let tree = merge_identifier_paths(&lexicon, &ids, &opts).await.unwrap();
    assert_eq!(tree, group(vec![("entity", flat(&["cat", "dog"]))]));
}

// ## Top-down expansion

#[tokio::test]
async fn test_expand_leaves_below_limit() {
    let lexicon = animal_graph();
    let opts = ExpandOptions {
        max_depth: 2,
        ..Default::default()
    };
    let tree = expand_hierarchy(&lexicon, "animal.n.01", &opts).await.unwrap();
    let expected = group(vec![(
        "animal",
        group(vec![("dog", leaf("dog")), ("cat", leaf("cat"))]),
    )]);
    assert_eq!(tree, expected);
}

#[tokio::test]
async fn test_expand_flattens_chain_at_depth_limit() {
    // At the depth limit the subtree is replaced by the set of every
    // reachable descendant name.
    let lexicon = chain_graph();
    let opts = ExpandOptions {
        max_depth: 0,
        ..Default::default()
    };
    let tree = expand_hierarchy(&lexicon, "a.n.01", &opts).await.unwrap();
    assert_eq!(tree, group(vec![("a", flat(&["b", "c", "d"]))]));
}

#[tokio::test]
async fn test_expand_partial_depth_flattens_tail() {
    let lexicon = chain_graph();
    let opts = ExpandOptions {
        max_depth: 1,
        ..Default::default()
    };
    let tree = expand_hierarchy(&lexicon, "a.n.01", &opts).await.unwrap();
    assert_eq!(
        tree,
        group(vec![("a", group(vec![("b", flat(&["c", "d"]))]))])
    );
}

#[tokio::test]
async fn test_expand_validity_keeps_path_to_valid_leaf() {
    let lexicon = animal_graph();
    let opts = ExpandOptions {
        max_depth: 5,
        validity: Some(ValiditySet::from_keys(vec!["n00000003"])),
        ..Default::default()
    };
    let tree = expand_hierarchy(&lexicon, "animal.n.01", &opts).await.unwrap();
    // Only the valid leaf survives, but its ancestor line is kept.
    let expected = group(vec![("animal", group(vec![("dog", leaf("dog"))]))]);
    assert_eq!(tree, expected);
}

#[tokio::test]
async fn test_expand_validity_excluding_everything_yields_empty() {
    let lexicon = animal_graph();
    let opts = ExpandOptions {
        max_depth: 5,
        validity: Some(ValiditySet::from_keys(vec!["n77777777"])),
        ..Default::default()
    };
    let tree = expand_hierarchy(&lexicon, "animal.n.01", &opts).await.unwrap();
    assert!(tree.is_empty_group());
}

#[tokio::test]
async fn test_expand_strict_sense_prunes_secondary() {
    // old_man.n.03 is a minor sense of "old_man"; its first-registered sense
    // is a different synset, so strict filtering excludes it even though it
    // has children.
    let lexicon = make_memory_lexicon(vec![
        SynsetSeed::new("n00000021", "old_man.n.01", &["old_man"], &[], &[]),
        SynsetSeed::new(
            "n00000022",
            "old_man.n.03",
            &["old_man"],
            &[],
            &["n00000023"],
        ),
        SynsetSeed::new("n00000023", "graybeard.n.01", &["graybeard"], &["n00000022"], &[]),
    ]);
    let opts = ExpandOptions {
        max_depth: 3,
        strict_primary_sense: true,
        ..Default::default()
    };

    let tree = expand_hierarchy(&lexicon, "old_man.n.03", &opts).await.unwrap();
    assert!(tree.is_empty_group());

    let tree = expand_hierarchy(&lexicon, "old_man.n.01", &opts).await.unwrap();
    assert_eq!(tree, group(vec![("old man", leaf("old man"))]));
}

#[tokio::test]
async fn test_expand_blacklist_prunes_category() {
    let lexicon = make_memory_lexicon(vec![
        SynsetSeed::new(
            "n00000031",
            "communication.n.01",
            &["communication"],
            &[],
            &["n00000032"],
        ),
        SynsetSeed::new("n00000032", "message.n.01", &["message"], &["n00000031"], &[]),
    ]);

    let opts = ExpandOptions {
        max_depth: 3,
        blacklist: true,
        ..Default::default()
    };
    let tree = expand_hierarchy(&lexicon, "communication.n.01", &opts)
        .await
        .unwrap();
    assert!(tree.is_empty_group());

    let opts = ExpandOptions {
        max_depth: 3,
        blacklist: false,
        ..Default::default()
    };
    let tree = expand_hierarchy(&lexicon, "communication.n.01", &opts)
        .await
        .unwrap();
    assert_eq!(
        tree,
        group(vec![("communication", group(vec![("message", leaf("message"))]))])
    );
}

#[tokio::test]
async fn test_expand_unresolvable_root_is_empty_not_error() {
    let lexicon = animal_graph();
    let opts = ExpandOptions {
        max_depth: 3,
        ..Default::default()
    };
    let tree = expand_hierarchy(&lexicon, "unicorn.n.01", &opts).await.unwrap();
    assert!(tree.is_empty_group());
}

// ## Identifier syntax

#[test]
fn test_parse_synset_key() {
    assert_eq!(parse_synset_key("n02084071"), Some(('n', 2084071)));
    assert_eq!(parse_synset_key("v00001740"), Some(('v', 1740)));
    assert_eq!(parse_synset_key("invalid"), None);
    assert_eq!(parse_synset_key("nABC"), None);
    assert_eq!(parse_synset_key("n"), None);
    assert_eq!(parse_synset_key(""), None);
    assert_eq!(parse_synset_key("12345678"), None);
}
