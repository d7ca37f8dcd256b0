//! CLI definitions for tc-split.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;
use tc_split::{FileKind, LineEnding};

#[derive(Debug, Parser)]
#[command(
    name = "tc-split",
    version,
    about = "Split TwinCAT POU/DUT/GVL files into declarations and code, and put them back",
    infer_subcommands = true,
    after_help = "Examples:\n  tc-split split FB_Motor.TcPOU --part code\n  tc-split apply FB_Motor.TcPOU --code body.st\n  tc-split check POUs/*.TcPOU --diff\n  tc-split kinds"
)]
pub struct Cli {
    /// Show debug logging on stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    /// Configuration file (default: tc-split.toml searched upwards).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the declarations and code of a file.
    #[command(
        after_help = "Examples:\n  tc-split split FB_Motor.TcPOU\n  tc-split split ST_Point.TcDUT --json\n  tc-split split main.txt --kind gvl --part declarations"
    )]
    Split {
        /// File to split.
        file: PathBuf,
        /// File kind override (pou, dut, gvl, unknown).
        #[arg(long)]
        kind: Option<FileKind>,
        /// Print the full split as JSON.
        #[arg(long, conflicts_with = "part")]
        json: bool,
        /// Print only one part.
        #[arg(long, value_enum)]
        part: Option<Part>,
    },
    /// Replace the declarations and/or code of a file and save it.
    #[command(
        after_help = "Examples:\n  tc-split apply FB_Motor.TcPOU --code body.st\n  cat decl.st | tc-split apply GVL_Main.TcGVL --declarations -\n  tc-split apply FB_Motor.TcPOU --code body.st --dry-run"
    )]
    Apply {
        /// File to update.
        file: PathBuf,
        /// New declarations (`-` reads stdin).
        #[arg(long, value_name = "PATH")]
        declarations: Option<PathBuf>,
        /// New code (`-` reads stdin).
        #[arg(long, value_name = "PATH")]
        code: Option<PathBuf>,
        /// File kind override (pou, dut, gvl, unknown).
        #[arg(long)]
        kind: Option<FileKind>,
        /// Line ending override (auto, lf, crlf).
        #[arg(long, value_name = "ENDING")]
        line_ending: Option<LineEnding>,
        /// Write the result here instead of replacing the input file.
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Print the result instead of writing it.
        #[arg(long)]
        dry_run: bool,
        /// Apply even if the file does not round-trip cleanly.
        #[arg(long)]
        force: bool,
    },
    /// Check that files survive a split/reassemble round trip.
    #[command(
        after_help = "Exit status is 2 if any file degrades.\n\nExamples:\n  tc-split check FB_Motor.TcPOU\n  tc-split check POUs/*.TcPOU --diff\n  tc-split check GVL_Main.TcGVL --json"
    )]
    Check {
        /// Files to check.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print a JSON report.
        #[arg(long, conflicts_with = "diff")]
        json: bool,
        /// Show a unified diff for files that do not round-trip exactly.
        #[arg(long)]
        diff: bool,
    },
    /// Show the effective extension table.
    Kinds {
        /// Print JSON.
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// The part printed by `split --part`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Part {
    Declarations,
    Code,
}
