use async_trait::async_trait;
use clap::Args;

use super::interface::{CanonicalTree, PipelineCommand, PipelineValues};
use crate::hierarchy::canonicalize;
use crate::hierarchy::extract_all_leaves;
use crate::lexicon::{AbstractLexicon, ErrorDetails, ErrorLayer, LexiconError, Result};

/// Convert a hierarchy into its canonical wildcard shape: all-leaf mappings
/// become sorted lists, mixed mappings become lists of leaves and single-key
/// maps, and redundant singleton wrapping is removed.  Canonicalizing an
/// already-canonical tree is a no-op.
#[derive(Debug, Args)]
pub struct Canonicalize {}

#[derive(Debug)]
pub struct CanonicalizeCommand {
    #[allow(dead_code)]
    pub args: Canonicalize,
}

#[async_trait]
impl PipelineCommand for CanonicalizeCommand {
    async fn execute(
        &self,
        _lexicon: &Box<dyn AbstractLexicon + Send + Sync>,
        input: PipelineValues,
    ) -> Result<PipelineValues> {
        let root = match input {
            PipelineValues::HierarchyTree(ht) => {
                info!(
                    leaves = extract_all_leaves(&ht.root).len(),
                    "canonicalizing hierarchy"
                );
                canonicalize(&ht.root)
            }
            PipelineValues::CanonicalTree(ct) => ct.root.canonicalized(),
            _ => {
                return Err(LexiconError::StickyProblem(ErrorDetails {
                    layer: ErrorLayer::ConfigLayer,
                    message: "canonicalize needs a HierarchyTree or CanonicalTree".to_string(),
                }));
            }
        };

        Ok(PipelineValues::CanonicalTree(CanonicalTree { root }))
    }
}
