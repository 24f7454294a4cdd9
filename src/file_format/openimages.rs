use std::collections::BTreeSet;
use std::collections::HashMap;

use serde::Deserialize;
use tokio::fs::read_to_string;

use crate::hierarchy::node::push_child;
use crate::hierarchy::HierarchyNode;
use crate::lexicon::{ErrorDetails, ErrorLayer, LexiconError, Result};

/// One node of the Open Images `bbox_labels_600_hierarchy.json` tree.  Labels
/// are machine identifiers (`/m/...`) translated through the descriptions
/// CSV; fields we do not consume (`Part`, confidence data) are ignored.
#[derive(Debug, Deserialize)]
struct OpenImagesNode {
    #[serde(rename = "LabelName")]
    label_name: String,
    #[serde(rename = "Subcategories")]
    subcategories: Option<Vec<OpenImagesNode>>,
}

/// Read the Open Images hierarchy plus its class-descriptions CSV into a
/// hierarchy tree.  Leaf subcategories of a labeled group are gathered under
/// a `misc` child so that a group never mixes named subtrees and anonymous
/// members at the same level.
pub async fn read_openimages_hierarchy(
    hierarchy_path: &str,
    descriptions_path: &str,
) -> Result<HierarchyNode> {
    let raw = read_to_string(hierarchy_path).await.map_err(|err| {
        LexiconError::StickyProblem(ErrorDetails {
            layer: ErrorLayer::BadInput,
            message: format!(
                "cannot read Open Images hierarchy [{}]: {}",
                hierarchy_path, err
            ),
        })
    })?;
    let root: OpenImagesNode = serde_json::from_str(&raw)?;

    let descriptions = match read_to_string(descriptions_path).await {
        Ok(raw) => parse_descriptions(&raw),
        Err(_) => {
            // Not fatal: machine identifiers are ugly but usable labels.
            info!(
                "Error trying to open class descriptions file [{}]",
                descriptions_path
            );
            HashMap::new()
        }
    };

    let (name, content) = convert_node(&root, &descriptions);
    let content = match content {
        Some(children) => children,
        None => HierarchyNode::empty_group(),
    };
    Ok(HierarchyNode::Group(vec![(name, content)]))
}

/// Walk one hierarchy node, returning its display name and, when it has
/// subcategories, its converted children.
fn convert_node(
    node: &OpenImagesNode,
    descriptions: &HashMap<String, String>,
) -> (String, Option<HierarchyNode>) {
    let name = descriptions
        .get(&node.label_name)
        .cloned()
        .unwrap_or_else(|| node.label_name.clone());

    let subcategories = match &node.subcategories {
        Some(subs) => subs,
        None => return (name, None),
    };

    let mut children: Vec<(String, HierarchyNode)> = vec![];
    for sub in subcategories {
        match convert_node(sub, descriptions) {
            (sub_name, Some(sub_tree)) => {
                push_child(&mut children, sub_name, sub_tree);
            }
            (sub_name, None) => {
                // The misc bucket is created in place of the first leaf so
                // that presentation order follows the source file.
                let misc = children.iter_mut().find(|(name, _)| name == "misc");
                match misc {
                    Some((_, HierarchyNode::FlatList(members))) => {
                        members.insert(sub_name);
                    }
                    _ => {
                        let mut members = BTreeSet::new();
                        members.insert(sub_name);
                        children.push(("misc".to_string(), HierarchyNode::FlatList(members)));
                    }
                }
            }
        }
    }
    (name, Some(HierarchyNode::Group(children)))
}

/// Parse the two-column class-descriptions CSV (`/m/011k07,Tortoise`).  The
/// name column may be quoted and contain commas; no CSV feature beyond that
/// appears in the published file.
fn parse_descriptions(raw: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some((id, name)) = split_csv_row(line) {
            map.insert(id, name);
        }
    }
    info!(descriptions = map.len(), "loaded class descriptions");
    map
}

fn split_csv_row(line: &str) -> Option<(String, String)> {
    let (id, rest) = line.split_once(',')?;
    let name = rest.trim();
    let name = if name.len() >= 2 && name.starts_with('"') && name.ends_with('"') {
        name[1..name.len() - 1].replace("\"\"", "\"")
    } else {
        name.to_string()
    };
    if name.is_empty() {
        return None;
    }
    Some((id.trim().to_string(), name))
}
