use clap::Parser;
use tracing::{trace, trace_span};

use crate::lexicon::{
    make_local_lexicon, AbstractLexicon, ErrorDetails, ErrorLayer, LexiconError, Result,
};

use super::cmd_canonicalize::CanonicalizeCommand;
use super::cmd_coco_groups::CocoGroupsCommand;
use super::cmd_expand_tree::ExpandTreeCommand;
use super::cmd_flatten::FlattenCommand;
use super::cmd_merge_paths::MergePathsCommand;
use super::cmd_openimages_tree::OpenimagesTreeCommand;
use super::cmd_save_output::SaveOutputCommand;
use super::interface::LexiconPipeline;
use super::parser::{Command, OutputFormat, ToolOpts};
use super::PipelineCommand;

pub fn fab_command_from_opts(opts: ToolOpts) -> Result<Box<dyn PipelineCommand + Send + Sync>> {
    match opts.cmd {
        Command::Canonicalize(c) => Ok(Box::new(CanonicalizeCommand { args: c })),

        Command::CocoGroups(cg) => Ok(Box::new(CocoGroupsCommand { args: cg })),

        Command::ExpandTree(et) => Ok(Box::new(ExpandTreeCommand { args: et })),

        Command::Flatten(f) => Ok(Box::new(FlattenCommand { args: f })),

        Command::MergePaths(mp) => Ok(Box::new(MergePathsCommand { args: mp })),

        Command::OpenimagesTree(ot) => Ok(Box::new(OpenimagesTreeCommand { args: ot })),

        Command::SaveOutput(so) => Ok(Box::new(SaveOutputCommand { args: so })),
    }
}

/// Build a command pipeline from a shell-y string where we use pipe boundaries
/// to delineate the separate pipeline steps.
///
/// The shell-words module is used to parse `arg_str` into shell words, which
/// we then break into separate sub-commands whenever we see a `|`.  Each
/// sub-command goes through clap parsing, taking care to stuff our binary
/// name into the first arg.  The lexicon named by the first segment serves
/// the whole pipeline.
pub fn build_pipeline(bin_name: &str, arg_str: &str) -> Result<(LexiconPipeline, OutputFormat)> {
    let span = trace_span!("build_pipeline", arg_str);
    let _span_guard = span.enter();

    let all_args = match shell_words::split(arg_str) {
        Ok(parsed) => parsed,
        Err(err) => {
            return Err(LexiconError::StickyProblem(ErrorDetails {
                layer: ErrorLayer::BadInput,
                message: err.to_string(),
            }));
        }
    };

    let mut lexicon = None;
    let mut output_format = None;

    let mut commands: Vec<Box<dyn PipelineCommand + Send + Sync>> = vec![];

    for arg_slices in all_args.split(|v| v == "|") {
        let mut fake_args = vec![bin_name.to_string()];
        fake_args.extend(arg_slices.iter().cloned());

        let opts = match ToolOpts::try_parse_from(fake_args) {
            Ok(opts) => opts,
            Err(err) => {
                return Err(LexiconError::StickyProblem(ErrorDetails {
                    layer: ErrorLayer::BadInput,
                    message: err.to_string(),
                }));
            }
        };

        if lexicon.is_none() {
            lexicon = Some(make_local_lexicon(&opts.lexicon));
            output_format = Some(opts.output_format.clone());
        }

        trace!(cmd = ?opts.cmd);
        commands.push(fab_command_from_opts(opts)?);
    }

    let lexicon = lexicon.ok_or_else(|| {
        LexiconError::StickyProblem(ErrorDetails {
            layer: ErrorLayer::BadInput,
            message: "empty pipeline".to_string(),
        })
    })?;

    Ok((
        LexiconPipeline { lexicon, commands },
        output_format.unwrap_or(OutputFormat::Yaml),
    ))
}

/// Build a pipeline against an already-constructed lexicon; used by embedders
/// and tests that supply in-memory graph data instead of an on-disk dump.
pub fn build_pipeline_with_lexicon(
    lexicon: Box<dyn AbstractLexicon + Send + Sync>,
    arg_str: &str,
) -> Result<(LexiconPipeline, OutputFormat)> {
    let all_args = match shell_words::split(arg_str) {
        Ok(parsed) => parsed,
        Err(err) => {
            return Err(LexiconError::StickyProblem(ErrorDetails {
                layer: ErrorLayer::BadInput,
                message: err.to_string(),
            }));
        }
    };

    let mut output_format = None;
    let mut commands: Vec<Box<dyn PipelineCommand + Send + Sync>> = vec![];

    for arg_slices in all_args.split(|v| v == "|") {
        let mut fake_args = vec!["hiergen-tool".to_string()];
        fake_args.extend(arg_slices.iter().cloned());

        let opts = match ToolOpts::try_parse_from(fake_args) {
            Ok(opts) => opts,
            Err(err) => {
                return Err(LexiconError::StickyProblem(ErrorDetails {
                    layer: ErrorLayer::BadInput,
                    message: err.to_string(),
                }));
            }
        };

        if output_format.is_none() {
            output_format = Some(opts.output_format.clone());
        }
        commands.push(fab_command_from_opts(opts)?);
    }

    Ok((
        LexiconPipeline { lexicon, commands },
        output_format.unwrap_or(OutputFormat::Yaml),
    ))
}
