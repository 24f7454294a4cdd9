use async_trait::async_trait;
use clap::Args;

use super::interface::{HierarchyTree, PipelineCommand, PipelineValues};
use crate::dataset_fetch::ensure_openimages_data;
use crate::file_format::openimages::read_openimages_hierarchy;
use crate::lexicon::{AbstractLexicon, Result};

/// Build a hierarchy from the Open Images label tree, translating label
/// identifiers through the class-descriptions CSV.  Missing assets are
/// downloaded into the data directory first.
#[derive(Debug, Args)]
pub struct OpenimagesTree {
    /// Path to bbox_labels_600_hierarchy.json; downloaded when not given.
    #[clap(long, value_parser)]
    hierarchy: Option<String>,

    /// Path to class-descriptions-boxable.csv; downloaded when not given.
    #[clap(long, value_parser)]
    descriptions: Option<String>,

    /// Directory downloaded assets land in.
    #[clap(long, value_parser, default_value = ".")]
    data_dir: String,
}

#[derive(Debug)]
pub struct OpenimagesTreeCommand {
    pub args: OpenimagesTree,
}

#[async_trait]
impl PipelineCommand for OpenimagesTreeCommand {
    async fn execute(
        &self,
        _lexicon: &Box<dyn AbstractLexicon + Send + Sync>,
        _input: PipelineValues,
    ) -> Result<PipelineValues> {
        let (hierarchy_path, descriptions_path) =
            match (&self.args.hierarchy, &self.args.descriptions) {
                (Some(h), Some(d)) => (h.clone(), d.clone()),
                _ => {
                    let (h, d) = ensure_openimages_data(&self.args.data_dir).await?;
                    (
                        h.to_string_lossy().into_owned(),
                        d.to_string_lossy().into_owned(),
                    )
                }
            };

        let root = read_openimages_hierarchy(&hierarchy_path, &descriptions_path).await?;
        Ok(PipelineValues::HierarchyTree(HierarchyTree { root }))
    }
}
