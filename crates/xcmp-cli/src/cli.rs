use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "xcmp",
    about = "Fingerprint and compare XML documents by structure",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with comparison options
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the root fingerprint of each document
    Fingerprint(FingerprintArgs),
    /// List every element's path and fingerprint
    Paths(PathsArgs),
    /// Compare two documents (exit status 1 when they differ)
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct FingerprintArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct PathsArgs {
    pub file: PathBuf,
    /// Index repeated siblings by first matching fingerprint
    #[arg(long)]
    pub by_fingerprint: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    pub left: PathBuf,
    pub right: PathBuf,
    /// Treat child order as significant
    #[arg(long)]
    pub ordered: bool,
    /// Require element namespaces to match
    #[arg(long)]
    pub namespaces: bool,
    /// Stop after this many differences
    #[arg(short = 'n', long)]
    pub max: Option<usize>,
}
