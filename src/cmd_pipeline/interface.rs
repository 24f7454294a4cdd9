use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{to_string_pretty, to_value};
use tracing::{trace, trace_span, Instrument};
use ustr::Ustr;

pub use crate::lexicon::{AbstractLexicon, Result};
use crate::hierarchy::{CanonicalNode, HierarchyNode};
use crate::lexicon::{ErrorDetails, ErrorLayer, LexiconError};

use super::parser::OutputFormat;

/// The input and output of each pipeline segment
#[derive(Serialize)]
pub enum PipelineValues {
    IdentifierList(IdentifierList),
    HierarchyTree(HierarchyTree),
    CanonicalTree(CanonicalTree),
    TextFile(TextFile),
    Void,
}

/// A list of raw synset identifiers, as piped in from a resolver or an
/// upstream tool.
#[derive(Serialize)]
pub struct IdentifierList {
    pub identifiers: Vec<Ustr>,
}

/// An intermediate hierarchy built by one of the tree builders or ingested
/// from a flat category-group source.
#[derive(Serialize)]
pub struct HierarchyTree {
    pub root: HierarchyNode,
}

/// A canonicalized hierarchy, ready for serialization.
#[derive(Serialize)]
pub struct CanonicalTree {
    pub root: CanonicalNode,
}

#[derive(Serialize)]
pub struct TextFile {
    pub mime_type: String,
    pub contents: String,
}

/// Render the final pipeline value in the requested output format.  Trees
/// serialize as their bare structure (no enum wrapper) so the emitted YAML is
/// directly consumable as a wildcard file.
pub fn render_values(values: &PipelineValues, format: &OutputFormat) -> Result<String> {
    let value = match values {
        PipelineValues::Void => return Ok(String::new()),
        PipelineValues::TextFile(tf) => return Ok(tf.contents.clone()),
        PipelineValues::IdentifierList(il) => to_value(&il.identifiers)?,
        PipelineValues::HierarchyTree(ht) => to_value(&ht.root)?,
        PipelineValues::CanonicalTree(ct) => to_value(&ct.root)?,
    };

    match format {
        OutputFormat::Yaml => serde_yaml::to_string(&value).map_err(|err| {
            LexiconError::StickyProblem(ErrorDetails {
                layer: ErrorLayer::DataLayer,
                message: err.to_string(),
            })
        }),
        OutputFormat::Json => Ok(value.to_string()),
        OutputFormat::PrettyJson => Ok(to_string_pretty(&value)?),
    }
}

/// A command that takes a single input and produces a single output.  At the
/// start of the pipeline, the input may be ignored / expected to be void.
#[async_trait]
pub trait PipelineCommand: Debug {
    async fn execute(
        &self,
        lexicon: &Box<dyn AbstractLexicon + Send + Sync>,
        input: PipelineValues,
    ) -> Result<PipelineValues>;
}

/// Multiple-use linear pipeline sequence.
pub struct LexiconPipeline {
    pub lexicon: Box<dyn AbstractLexicon + Send + Sync>,
    pub commands: Vec<Box<dyn PipelineCommand + Send + Sync>>,
}

impl LexiconPipeline {
    pub async fn run(&self, traced: bool) -> Result<PipelineValues> {
        let mut cur_values = PipelineValues::Void;

        for cmd in &self.commands {
            let span = trace_span!("run_pipeline_step", cmd = ?cmd);

            match cmd
                .execute(&self.lexicon, cur_values)
                .instrument(span.clone())
                .await
            {
                Ok(next_values) => {
                    cur_values = next_values;
                }
                Err(err) => {
                    trace!(err = ?err);
                    return Err(err);
                }
            }

            let _span_guard = span.entered();
            if traced {
                if let Ok(value_str) = to_string_pretty(&cur_values) {
                    trace!(output_json = %value_str);
                }
            }
        }

        Ok(cur_values)
    }
}
