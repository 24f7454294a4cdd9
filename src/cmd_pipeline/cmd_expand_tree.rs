use async_trait::async_trait;
use clap::Args;

use super::interface::{HierarchyTree, PipelineCommand, PipelineValues};
use crate::dataset_fetch::ensure_class_index;
use crate::file_format::class_index::{read_class_index, read_id_list};
use crate::hierarchy::{expand_hierarchy, ExpandOptions};
use crate::lexicon::{AbstractLexicon, Result};

/// Recursively expand a root synset into its descendant tree, applying the
/// blacklist, strict-sense, and validity filters, and flattening subtrees at
/// the depth limit into lists of their descendants.
#[derive(Debug, Args)]
pub struct ExpandTree {
    /// Root synset, by dotted name ("animal.n.01") or key ("n00015388").
    #[clap(long, value_parser, default_value = "entity.n.01")]
    root: String,

    /// Maximum traversal depth.  Subtrees reaching this depth stop expanding
    /// and collapse into flat lists of their descendants.
    #[clap(long, short, value_parser, default_value = "3")]
    max_depth: u32,

    /// Restrict leaves to keys appearing in this class-index JSON file
    /// (ImageNet-1k format).  A file that fails to parse is logged and
    /// ignored.
    #[clap(long, value_parser)]
    class_index: Option<String>,

    /// Restrict leaves to keys listed in this file, one per line.
    #[clap(long, value_parser)]
    id_list: Option<String>,

    /// Restrict leaves to the ImageNet-1k classes, downloading the published
    /// class index into the data directory when it is not already there.
    #[clap(long, value_parser)]
    imagenet_1k: bool,

    /// Directory downloaded assets land in.
    #[clap(long, value_parser, default_value = ".")]
    data_dir: String,

    /// Drop nodes that are not the primary sense of their own name.
    #[clap(long, value_parser)]
    strict_sense: bool,

    /// Prune the fixed set of abstract category names entirely.
    #[clap(long, value_parser)]
    blacklist: bool,
}

#[derive(Debug)]
pub struct ExpandTreeCommand {
    pub args: ExpandTree,
}

#[async_trait]
impl PipelineCommand for ExpandTreeCommand {
    async fn execute(
        &self,
        lexicon: &Box<dyn AbstractLexicon + Send + Sync>,
        _input: PipelineValues,
    ) -> Result<PipelineValues> {
        let mut validity = None;
        if let Some(filename) = &self.args.class_index {
            validity = read_class_index(filename).await;
        }
        if validity.is_none() {
            if let Some(filename) = &self.args.id_list {
                validity = read_id_list(filename).await;
            }
        }
        if validity.is_none() && self.args.imagenet_1k {
            // A broken or unreachable preset degrades to "no restriction",
            // same as any other validity source.
            match ensure_class_index(&self.args.data_dir).await {
                Ok(path) => {
                    validity = read_class_index(&path.to_string_lossy()).await;
                }
                Err(err) => {
                    warn!(err = ?err, "could not fetch class index, expanding unfiltered");
                }
            }
        }

        let opts = ExpandOptions {
            max_depth: self.args.max_depth,
            validity,
            strict_primary_sense: self.args.strict_sense,
            blacklist: self.args.blacklist,
        };

        let root = expand_hierarchy(lexicon, &self.args.root, &opts).await?;
        if root.is_empty_group() {
            // Possibly aggressive filtering; surfaced as advice, not an
            // error.
            warn!(root = %self.args.root, "resulting hierarchy is empty");
        }

        Ok(PipelineValues::HierarchyTree(HierarchyTree { root }))
    }
}
