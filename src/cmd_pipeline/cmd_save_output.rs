use async_trait::async_trait;
use clap::Args;
use tokio::fs::write;

use super::interface::{render_values, PipelineCommand, PipelineValues};
use super::parser::OutputFormat;
use crate::lexicon::{AbstractLexicon, Result};

/// Serialize the piped-in structure and write it to a file.  The core's
/// output is persisted verbatim; this command adds nothing beyond encoding.
#[derive(Debug, Args)]
pub struct SaveOutput {
    /// Output file path.
    #[clap(long, short, value_parser, default_value = "wildcards_output.yaml")]
    output: String,

    #[clap(long, short, value_enum, default_value = "yaml")]
    format: OutputFormat,
}

#[derive(Debug)]
pub struct SaveOutputCommand {
    pub args: SaveOutput,
}

#[async_trait]
impl PipelineCommand for SaveOutputCommand {
    async fn execute(
        &self,
        _lexicon: &Box<dyn AbstractLexicon + Send + Sync>,
        input: PipelineValues,
    ) -> Result<PipelineValues> {
        let contents = render_values(&input, &self.args.format)?;
        write(&self.args.output, contents.as_bytes()).await?;
        info!(path = %self.args.output, "saved output");
        Ok(PipelineValues::Void)
    }
}
