//! `tc-split` - command-line host for the declaration/code splitter.
//!
//! Reads TwinCAT object files, prints their declarations and code, writes
//! edited parts back with a whole-document replace, and reports whether files
//! survive a split/reassemble round trip.

mod apply;
mod check;
mod cli;
mod config;
mod inspect;
mod session;
mod style;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use apply::ApplyArgs;
use cli::{Cli, Command};
use config::Config;

/// Exit status when `check` finds a file that would lose content.
const EXIT_DEGRADED: i32 = 2;

fn main() {
    match run() {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let message = format_error_with_tip(&err);
            eprintln!("{}", style::error(format!("Error: {message}")));
            std::process::exit(1);
        }
    }
}

fn run() -> anyhow::Result<i32> {
    let raw_args: Vec<String> = std::env::args().collect();
    let cli = match Cli::try_parse_from(&raw_args) {
        Ok(cli) => cli,
        Err(err) => {
            if err.kind() == ErrorKind::InvalidSubcommand {
                if let Some(input) = raw_args.get(1) {
                    if let Some(suggestion) = suggest_subcommand(input) {
                        eprintln!("Did you mean: {suggestion}?");
                    }
                }
            }
            err.exit();
        }
    };
    init_logging(cli.verbose);

    let cwd = std::env::current_dir()?;
    let config = Config::resolve(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Command::Split {
            file,
            kind,
            json,
            part,
        } => inspect::run_split(&config, &file, kind, json, part)?,
        Command::Apply {
            file,
            declarations,
            code,
            kind,
            line_ending,
            output,
            dry_run,
            force,
        } => apply::run_apply(
            &config,
            ApplyArgs {
                file,
                declarations,
                code,
                kind,
                line_ending,
                output,
                dry_run,
                force,
            },
        )?,
        Command::Check { files, json, diff } => {
            if check::run_check(&config, &files, json, diff)? {
                return Ok(EXIT_DEGRADED);
            }
        }
        Command::Kinds { json } => inspect::run_kinds(&config, json)?,
        Command::Completions { shell } => inspect::run_completions(shell)?,
    }
    Ok(0)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn suggest_subcommand(input: &str) -> Option<&'static str> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let candidates = ["split", "apply", "check", "kinds", "completions"];
    let mut best = None;
    let mut best_score = usize::MAX;
    for candidate in candidates {
        let score = levenshtein(input, candidate);
        if score < best_score {
            best_score = score;
            best = Some(candidate);
        }
    }
    if best_score <= 2 {
        best
    } else {
        None
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }
    prev[b.len()]
}

fn format_error_with_tip(err: &anyhow::Error) -> String {
    let message = format!("{err:#}");
    let tip = if message.contains("does not round-trip cleanly") {
        Some("Tip: run `tc-split check --diff <FILE>` to see what would change, or pass --force to apply anyway.")
    } else if message.contains("already mapped to") {
        Some("Tip: each extension can map to one kind; remove the duplicate from [extensions] in tc-split.toml.")
    } else if message.contains("invalid config") {
        Some("Tip: check tc-split.toml; [extensions] takes lists of extensions and [reassemble] line_ending is auto, lf or crlf.")
    } else {
        None
    };
    match tip {
        Some(tip) => format!("{message}\n{tip}"),
        None => message,
    }
}
