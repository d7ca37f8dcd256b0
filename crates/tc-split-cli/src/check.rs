//! `check`: round-trip fidelity report.

use anyhow::Context;
use serde::Serialize;
use similar::TextDiff;
use std::path::{Path, PathBuf};
use tc_split::{check_round_trip, Fallback, Fidelity, FileKind, RoundTrip};

use crate::config::Config;
use crate::style;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileReport {
    path: PathBuf,
    kind: FileKind,
    fidelity: Fidelity,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<Fallback>,
}

/// Checks every file and prints a report. Returns `true` if any file degrades.
pub fn run_check(config: &Config, files: &[PathBuf], json: bool, diff: bool) -> anyhow::Result<bool> {
    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let kind = config.kind_for(file, None);
        let round_trip = check_round_trip(&content, kind);

        if !json {
            print_line(file, kind, &round_trip);
            if diff && round_trip.fidelity != Fidelity::Exact {
                print!("{}", unified_diff(file, &content, &round_trip.rebuilt));
            }
        }
        reports.push(FileReport {
            path: file.clone(),
            kind,
            fidelity: round_trip.fidelity,
            fallback: round_trip.parsed.fallback(),
        });
    }

    let degraded = reports
        .iter()
        .filter(|report| report.fidelity.is_degraded())
        .count();
    if json {
        let text = serde_json::to_string_pretty(&reports).context("failed to serialize report")?;
        println!("{text}");
    } else if degraded > 0 {
        eprintln!(
            "{}",
            style::warning(format!(
                "Warning: {degraded} of {} file(s) would lose content when edited",
                reports.len()
            ))
        );
    }
    Ok(degraded > 0)
}

fn print_line(file: &Path, kind: FileKind, round_trip: &RoundTrip) {
    let mut line = format!(
        "{}  {kind}  {}",
        style::path(file),
        style::fidelity(round_trip.fidelity)
    );
    if let Some(fallback) = round_trip.parsed.fallback() {
        line.push_str(&format!("  ({})", fallback.describe()));
    }
    println!("{line}");
}

fn unified_diff(file: &Path, original: &str, rebuilt: &str) -> String {
    let name = file.display().to_string();
    TextDiff::from_lines(original, rebuilt)
        .unified_diff()
        .context_radius(2)
        .header(&format!("{name} (original)"), &format!("{name} (rebuilt)"))
        .to_string()
}
