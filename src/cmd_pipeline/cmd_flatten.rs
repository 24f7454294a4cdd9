use async_trait::async_trait;
use clap::Args;

use super::interface::{HierarchyTree, PipelineCommand, PipelineValues};
use crate::hierarchy::flatten_below;
use crate::lexicon::{AbstractLexicon, ErrorDetails, ErrorLayer, LexiconError, Result};

/// Collapse every subtree at the given depth into a flat, deduplicated list
/// of the leaf names beneath it.
#[derive(Debug, Args)]
pub struct Flatten {
    #[clap(long, short, value_parser, default_value = "3")]
    max_depth: u32,
}

#[derive(Debug)]
pub struct FlattenCommand {
    pub args: Flatten,
}

#[async_trait]
impl PipelineCommand for FlattenCommand {
    async fn execute(
        &self,
        _lexicon: &Box<dyn AbstractLexicon + Send + Sync>,
        input: PipelineValues,
    ) -> Result<PipelineValues> {
        let tree = match input {
            PipelineValues::HierarchyTree(ht) => ht,
            _ => {
                return Err(LexiconError::StickyProblem(ErrorDetails {
                    layer: ErrorLayer::ConfigLayer,
                    message: "flatten needs a HierarchyTree".to_string(),
                }));
            }
        };

        let root = flatten_below(&tree.root, 0, self.args.max_depth);
        Ok(PipelineValues::HierarchyTree(HierarchyTree { root }))
    }
}
