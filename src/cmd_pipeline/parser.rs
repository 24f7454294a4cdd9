use clap::{Parser, Subcommand, ValueEnum};

use super::cmd_canonicalize::Canonicalize;
use super::cmd_coco_groups::CocoGroups;
use super::cmd_expand_tree::ExpandTree;
use super::cmd_flatten::Flatten;
use super::cmd_merge_paths::MergePaths;
use super::cmd_openimages_tree::OpenimagesTree;
use super::cmd_save_output::SaveOutput;

#[derive(Clone, Debug, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// YAML, the wildcard-file format.
    Yaml,
    /// Un-pretty-printed JSON.
    Json,
    /// Pretty-printed JSON.
    PrettyJson,
}

#[derive(Debug, Parser)]
pub struct ToolOpts {
    /// Path to the lexical graph dump (gzip-compressed newline-delimited
    /// JSON, one synset record per line).  Loaded lazily; pipelines that
    /// never touch the graph don't need it to exist.
    #[clap(
        long,
        default_value = "wordnet-noun-graph.ndjson.gz",
        env = "HIERGEN_LEXICON"
    )]
    pub lexicon: String,

    #[clap(long, short, value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    #[clap(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Canonicalize(Canonicalize),
    CocoGroups(CocoGroups),
    ExpandTree(ExpandTree),
    Flatten(Flatten),
    MergePaths(MergePaths),
    OpenimagesTree(OpenimagesTree),
    SaveOutput(SaveOutput),
}
