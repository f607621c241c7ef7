use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;
use xcmp_diff::{compare, CompareConfig, Difference};
use xcmp_tree::{Document, Fingerprint};

use crate::cli::*;

/// Whether the command found the inputs to be the same.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Same,
    Different,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Same => ExitCode::SUCCESS,
            Self::Different => ExitCode::from(1),
        }
    }
}

pub fn run_command(cli: Cli, out: &mut dyn Write) -> anyhow::Result<Outcome> {
    match cli.command {
        Command::Fingerprint(args) => cmd_fingerprint(args, &cli.format, out),
        Command::Paths(args) => cmd_paths(args, &cli.format, out),
        Command::Diff(args) => cmd_diff(args, cli.config.as_deref(), &cli.format, out),
    }
}

fn load_document(path: &Path) -> anyhow::Result<Document> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let doc = Document::parse_bytes(&bytes)
        .with_context(|| format!("cannot parse {}", path.display()))?;
    debug!(path = %path.display(), nodes = doc.len(), "loaded document");
    Ok(doc)
}

#[derive(Serialize)]
struct FingerprintEntry {
    file: String,
    fingerprint: String,
    nodes: usize,
}

fn cmd_fingerprint(
    args: FingerprintArgs,
    format: &OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<Outcome> {
    let mut entries = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let doc = load_document(file)?;
        entries.push(FingerprintEntry {
            file: file.display().to_string(),
            fingerprint: doc.root().fingerprint().to_hex(),
            nodes: doc.len(),
        });
    }

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &entries)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for entry in &entries {
                writeln!(out, "{}  {}", entry.fingerprint.yellow(), entry.file)?;
            }
        }
    }

    let first = entries.first().map(|e| e.fingerprint.as_str());
    if entries.iter().all(|e| Some(e.fingerprint.as_str()) == first) {
        Ok(Outcome::Same)
    } else {
        Ok(Outcome::Different)
    }
}

#[derive(Serialize)]
struct PathEntry {
    path: String,
    fingerprint: Fingerprint,
    node: String,
}

fn cmd_paths(args: PathsArgs, format: &OutputFormat, out: &mut dyn Write) -> anyhow::Result<Outcome> {
    let doc = load_document(&args.file)?;
    let entries: Vec<PathEntry> = doc
        .iter()
        .map(|node| PathEntry {
            path: if args.by_fingerprint {
                node.path_by_fingerprint()
            } else {
                node.path()
            },
            fingerprint: node.fingerprint(),
            node: node.to_string(),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &entries)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for entry in &entries {
                writeln!(out, "{}  {}", entry.fingerprint.to_string().dimmed(), entry.path)?;
            }
        }
    }
    Ok(Outcome::Same)
}

fn cmd_diff(
    args: DiffArgs,
    config_path: Option<&Path>,
    format: &OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<Outcome> {
    let mut config = match config_path {
        Some(path) => CompareConfig::load(path)?,
        None => CompareConfig::default(),
    };
    if args.ordered {
        config.ordered_children = true;
    }
    if args.namespaces {
        config.compare_namespaces = true;
    }
    if let Some(max) = args.max {
        config.max_differences = max;
    }

    let left = load_document(&args.left)?;
    let right = load_document(&args.right)?;
    let comparison = compare(&left, &right, &config);

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &comparison)?;
            writeln!(out)?;
        }
        OutputFormat::Text if comparison.is_equal() => {
            writeln!(out, "{} documents are equal", "✓".green().bold())?;
        }
        OutputFormat::Text => {
            for difference in &comparison.differences {
                let line = difference.to_string();
                let line = match difference {
                    Difference::ChildAdded { .. } | Difference::AttributeAdded { .. } => line.green(),
                    Difference::ChildRemoved { .. } | Difference::AttributeRemoved { .. } => line.red(),
                    _ => line.yellow(),
                };
                writeln!(out, "{line}")?;
            }
            let more = if comparison.truncated { " (truncated)" } else { "" };
            writeln!(out, "{} difference(s){more}", comparison.len().to_string().bold())?;
        }
    }

    Ok(if comparison.is_equal() {
        Outcome::Same
    } else {
        Outcome::Different
    })
}
