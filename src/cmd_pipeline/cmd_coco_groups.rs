use async_trait::async_trait;
use clap::Args;

use super::interface::{HierarchyTree, PipelineCommand, PipelineValues};
use crate::file_format::coco_categories::read_coco_categories;
use crate::lexicon::{AbstractLexicon, Result};

/// Group COCO categories under their supercategories.  This bypasses the
/// graph builders entirely; the result feeds straight into
/// flatten/canonicalize.
#[derive(Debug, Args)]
pub struct CocoGroups {
    /// Path to a COCO instance annotations JSON file (e.g.
    /// annotations/instances_train2017.json).
    #[clap(long, value_parser)]
    annotations: String,
}

#[derive(Debug)]
pub struct CocoGroupsCommand {
    pub args: CocoGroups,
}

#[async_trait]
impl PipelineCommand for CocoGroupsCommand {
    async fn execute(
        &self,
        _lexicon: &Box<dyn AbstractLexicon + Send + Sync>,
        _input: PipelineValues,
    ) -> Result<PipelineValues> {
        let root = read_coco_categories(&self.args.annotations).await?;
        Ok(PipelineValues::HierarchyTree(HierarchyTree { root }))
    }
}
