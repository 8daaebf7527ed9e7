use super::read_input;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use commonplace_editor::{bridge, DocumentTree};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input file (defaults to stdin)
    pub file: Option<PathBuf>,

    /// Drop one trailing newline from the input before converting
    #[arg(long)]
    pub strip_final_newline: bool,
}

#[derive(Debug, Args)]
pub struct RoundtripArgs {
    /// Input file (defaults to stdin)
    pub file: Option<PathBuf>,

    /// Input is a JSON document tree instead of text
    #[arg(long)]
    pub json: bool,
}

fn read_text(args: &ConvertArgs) -> Result<String> {
    let mut text = read_input(args.file.as_deref())?;
    if args.strip_final_newline && text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Text → pretty JSON tree
pub fn deserialize(args: ConvertArgs) -> Result<()> {
    let text = read_text(&args)?;
    let doc = bridge::deserialize(&text);
    tracing::debug!(blocks = doc.block_count(), "deserialized input");

    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

/// JSON tree → text
pub fn serialize(args: ConvertArgs) -> Result<()> {
    let json = read_input(args.file.as_deref())?;
    let doc = parse_tree(&json)?;

    print!("{}", bridge::serialize(&doc));
    Ok(())
}

/// Report whether the input survives a trip through the bridge
pub fn roundtrip(args: RoundtripArgs) -> Result<()> {
    let input = read_input(args.file.as_deref())?;
    let report = if args.json {
        check_tree(&parse_tree(&input)?)
    } else {
        check_text(&input)
    };

    if report.lossless {
        println!("{} Lossless ({} blocks)", "✓".green(), report.blocks);
    } else {
        println!("{} Lossy ({} blocks)", "⚠️".yellow(), report.blocks);
        println!("  {}", report.detail);
    }
    Ok(())
}

fn parse_tree(json: &str) -> Result<DocumentTree> {
    DocumentTree::from_json(json).context("Input is not a document tree")
}

#[derive(Debug, PartialEq)]
pub(crate) struct RoundtripReport {
    pub lossless: bool,
    pub blocks: usize,
    pub detail: String,
}

pub(crate) fn check_text(text: &str) -> RoundtripReport {
    let doc = bridge::deserialize(text);
    let back = bridge::serialize(&doc);
    RoundtripReport {
        lossless: back == text,
        blocks: doc.block_count(),
        detail: format!("text came back as {:?}", back),
    }
}

pub(crate) fn check_tree(doc: &DocumentTree) -> RoundtripReport {
    let lossless = bridge::is_lossless(doc);
    let detail = if doc.is_empty() {
        "an empty document comes back as one empty line".to_string()
    } else {
        "block types, leaf boundaries or marks are dropped".to_string()
    };
    RoundtripReport {
        lossless,
        blocks: doc.block_count(),
        detail,
    }
}
