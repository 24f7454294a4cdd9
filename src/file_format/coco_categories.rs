use std::collections::BTreeSet;

use serde::Deserialize;
use tokio::fs::read_to_string;

use crate::hierarchy::HierarchyNode;
use crate::lexicon::{ErrorDetails, ErrorLayer, LexiconError, Result};

#[derive(Debug, Deserialize)]
struct CocoCategory {
    supercategory: String,
    name: String,
}

/// The slice of a COCO annotations file we care about; everything else
/// (images, annotations proper) is ignored by serde.
#[derive(Debug, Deserialize)]
struct CocoAnnotations {
    categories: Vec<CocoCategory>,
}

/// Read COCO instance annotations and group category names under their
/// supercategory, supercategories in first-appearance order.
///
/// This is a flat category-group source: the result bypasses the graph
/// builders entirely and feeds straight into flattening/canonicalization.
pub async fn read_coco_categories(filename: &str) -> Result<HierarchyNode> {
    let raw = read_to_string(filename).await.map_err(|err| {
        LexiconError::StickyProblem(ErrorDetails {
            layer: ErrorLayer::BadInput,
            message: format!("cannot read COCO annotations [{}]: {}", filename, err),
        })
    })?;
    let data: CocoAnnotations = serde_json::from_str(&raw)?;

    let mut groups: Vec<(String, BTreeSet<String>)> = vec![];
    for cat in data.categories {
        match groups.iter_mut().find(|(name, _)| *name == cat.supercategory) {
            Some((_, members)) => {
                members.insert(cat.name);
            }
            None => {
                let mut members = BTreeSet::new();
                members.insert(cat.name);
                groups.push((cat.supercategory, members));
            }
        }
    }
    info!(groups = groups.len(), "grouped COCO categories");

    Ok(HierarchyNode::Group(
        groups
            .into_iter()
            .map(|(name, members)| (name, HierarchyNode::FlatList(members)))
            .collect(),
    ))
}
