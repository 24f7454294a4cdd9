use async_trait::async_trait;
use clap::Args;
use tokio::fs::read_to_string;

use super::interface::{HierarchyTree, PipelineCommand, PipelineValues};
use crate::hierarchy::{merge_identifier_paths, MergeOptions};
use crate::lexicon::{AbstractLexicon, ErrorDetails, ErrorLayer, LexiconError, Result};

/// Fold leaf identifiers into one shared tree by merging their primary
/// ancestor paths bottom-up.  Identifiers come from explicit arguments, from
/// files of one identifier per line, or from a piped-in identifier list.
#[derive(Debug, Args)]
pub struct MergePaths {
    /// Explicit identifiers to resolve (`<pos><8-digit-offset>`, e.g.
    /// n02084071).
    #[clap(value_parser)]
    identifiers: Vec<String>,

    /// Read additional identifiers from these files, one per line; blank
    /// lines are skipped and an unreadable file is logged and skipped.
    #[clap(long, value_parser)]
    from_file: Vec<String>,

    /// Keep only this many trailing entries of each ancestor path, counted
    /// from the leaf, to bound tree height.  0 keeps full paths.
    #[clap(long, value_parser, default_value = "0")]
    ancestor_depth: u32,

    /// Depth at which the merged tree collapses into flat lists.
    #[clap(long, short, value_parser, default_value = "10")]
    max_depth: u32,
}

#[derive(Debug)]
pub struct MergePathsCommand {
    pub args: MergePaths,
}

#[async_trait]
impl PipelineCommand for MergePathsCommand {
    async fn execute(
        &self,
        lexicon: &Box<dyn AbstractLexicon + Send + Sync>,
        input: PipelineValues,
    ) -> Result<PipelineValues> {
        let mut identifiers: Vec<String> = match input {
            PipelineValues::IdentifierList(il) => {
                il.identifiers.iter().map(|id| id.to_string()).collect()
            }
            PipelineValues::Void => vec![],
            _ => {
                return Err(LexiconError::StickyProblem(ErrorDetails {
                    layer: ErrorLayer::ConfigLayer,
                    message: "merge-paths needs a Void or IdentifierList".to_string(),
                }));
            }
        };

        identifiers.extend(self.args.identifiers.iter().cloned());
        for filename in &self.args.from_file {
            match read_to_string(filename).await {
                Ok(raw) => {
                    identifiers.extend(
                        raw.lines()
                            .map(|l| l.trim())
                            .filter(|l| !l.is_empty())
                            .map(|l| l.to_string()),
                    );
                }
                Err(err) => {
                    warn!(file = %filename, err = %err, "cannot read identifier file, skipping");
                }
            }
        }

        if identifiers.is_empty() {
            warn!("no identifiers to process");
        }

        let opts = MergeOptions {
            ancestor_depth_limit: self.args.ancestor_depth,
            max_depth: self.args.max_depth,
        };
        let root = merge_identifier_paths(lexicon, &identifiers, &opts).await?;
        if root.is_empty_group() {
            // Advisory, not an error: malformed or unknown identifiers are
            // simply dropped, and dropping all of them leaves nothing.
            warn!(
                identifiers = identifiers.len(),
                "no identifiers resolved; hierarchy is empty"
            );
        } else {
            info!(identifiers = identifiers.len(), "merged ancestor paths");
        }

        Ok(PipelineValues::HierarchyTree(HierarchyTree { root }))
    }
}
