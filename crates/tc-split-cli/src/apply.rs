//! `apply`: write edited declarations/code back into a document.

use anyhow::{bail, Context};
use std::io::Read;
use std::path::{Path, PathBuf};
use tc_split::{FileKind, LineEnding};

use crate::config::Config;
use crate::session::{HostMessage, Session, SessionEvent};
use crate::style;

#[derive(Debug)]
pub struct ApplyArgs {
    pub file: PathBuf,
    pub declarations: Option<PathBuf>,
    pub code: Option<PathBuf>,
    pub kind: Option<FileKind>,
    pub line_ending: Option<LineEnding>,
    pub output: Option<PathBuf>,
    pub dry_run: bool,
    pub force: bool,
}

pub fn run_apply(config: &Config, args: ApplyArgs) -> anyhow::Result<()> {
    if args.declarations.is_none() && args.code.is_none() {
        bail!("nothing to apply: pass --declarations and/or --code");
    }
    if args.declarations.as_deref().is_some_and(is_stdin) && args.code.as_deref().is_some_and(is_stdin)
    {
        bail!("only one of --declarations and --code can read stdin");
    }

    let kind = config.kind_for(&args.file, args.kind);
    let mut session = Session::open(&args.file, kind, config.reassembler(args.line_ending))?;
    if let Some(output) = args.output.clone() {
        session = session.with_target(output);
    }

    let declarations = args.declarations.as_deref().map(read_blob).transpose()?;
    let code = args.code.as_deref().map(read_blob).transpose()?;

    // Reading stdin can take a while; apply the edit to the file as it is now.
    session.reload()?;
    if session.fidelity().is_degraded() && !args.force {
        bail!(
            "{} does not round-trip cleanly as {}; refusing to apply",
            session.path().display(),
            session.kind()
        );
    }

    let declarations =
        declarations.unwrap_or_else(|| session.parsed().declarations().to_string());
    let code = code.unwrap_or_else(|| session.parsed().code().to_string());

    session.handle(HostMessage::ContentChanged { declarations, code })?;
    if args.dry_run {
        print!("{}", session.text());
        return Ok(());
    }
    if !session.is_dirty() && args.output.is_none() {
        println!("No changes to {}", style::path(session.path()));
        return Ok(());
    }
    if let SessionEvent::Saved(path) = session.handle(HostMessage::Save)? {
        println!("{}", style::success(format!("Updated {}", path.display())));
    }
    if let Some(fallback) = session.parsed().fallback() {
        eprintln!(
            "{}",
            style::warning(format!("Warning: result: {}", fallback.describe()))
        );
    }
    Ok(())
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_blob(path: &Path) -> anyhow::Result<String> {
    if is_stdin(path) {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
