//! Read-only commands: `split`, `kinds` and `completions`.

use anyhow::Context;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::collections::BTreeMap;
use std::path::Path;
use tc_split::{split, FileKind};

use crate::cli::{Cli, Part};
use crate::config::Config;
use crate::style;

pub fn run_split(
    config: &Config,
    file: &Path,
    kind: Option<FileKind>,
    json: bool,
    part: Option<Part>,
) -> anyhow::Result<()> {
    let kind = config.kind_for(file, kind);
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let parsed = split(&content, kind);

    if let Some(fallback) = parsed.fallback() {
        eprintln!(
            "{}",
            style::warning(format!(
                "Warning: {}: {}",
                file.display(),
                fallback.describe()
            ))
        );
    }

    if json {
        let text = serde_json::to_string_pretty(&parsed).context("failed to serialize split")?;
        println!("{text}");
        return Ok(());
    }
    match part {
        Some(Part::Declarations) => println!("{}", parsed.declarations()),
        Some(Part::Code) => println!("{}", parsed.code()),
        None => {
            println!("# {} ({kind})", style::path(file));
            println!("--- declarations");
            println!("{}", parsed.declarations());
            if kind.has_body() || !parsed.code().is_empty() {
                println!("--- code");
                println!("{}", parsed.code());
            }
        }
    }
    Ok(())
}

pub fn run_kinds(config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        let table: BTreeMap<&str, FileKind> = config.extensions.entries().collect();
        let text = serde_json::to_string_pretty(&table).context("failed to serialize kinds")?;
        println!("{text}");
        return Ok(());
    }
    match &config.path {
        Some(path) => println!("config: {}", path.display()),
        None => println!("config: (defaults)"),
    }
    for (extension, kind) in config.extensions.entries() {
        println!("  .{extension:<12} {kind}");
    }
    println!("  {:<13} unknown", "(other)");
    Ok(())
}

pub fn run_completions(shell: Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "tc-split", &mut std::io::stdout());
    Ok(())
}
