use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Serialized file records
    Json,
    /// Human-readable import tree
    Tree,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "dependency-tree")]
#[command(about = "Trace the local import tree of JavaScript/TypeScript entry files")]
pub struct Config {
    /// Entry files to trace
    #[arg(required = true)]
    pub entries: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,

    /// Leave file contents out of the output
    #[arg(long)]
    pub no_content: bool,
}
