//! Terminal styling for reports and errors.

use std::io::IsTerminal;
use std::path::Path;

use owo_colors::{AnsiColors, OwoColorize};
use tc_split::Fidelity;

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn should_color(stream: Stream) -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    match stream {
        Stream::Stdout => std::io::stdout().is_terminal(),
        Stream::Stderr => std::io::stderr().is_terminal(),
    }
}

fn paint(text: &str, color: AnsiColors, stream: Stream) -> String {
    if should_color(stream) {
        text.color(color).to_string()
    } else {
        text.to_string()
    }
}

/// Error line for stderr.
pub fn error(text: impl AsRef<str>) -> String {
    paint(text.as_ref(), AnsiColors::Red, Stream::Stderr)
}

/// Warning line for stderr.
pub fn warning(text: impl AsRef<str>) -> String {
    paint(text.as_ref(), AnsiColors::Yellow, Stream::Stderr)
}

/// Fidelity label for stdout reports.
pub fn fidelity(fidelity: Fidelity) -> String {
    let color = match fidelity {
        Fidelity::Exact => AnsiColors::Green,
        Fidelity::SeamEquivalent => AnsiColors::Cyan,
        Fidelity::Degraded => AnsiColors::Red,
    };
    paint(fidelity.as_str(), color, Stream::Stdout)
}

/// File path for stdout reports.
pub fn path(path: &Path) -> String {
    let text = path.display().to_string();
    if should_color(Stream::Stdout) {
        text.bold().to_string()
    } else {
        text
    }
}

/// Confirmation line for stdout.
pub fn success(text: impl AsRef<str>) -> String {
    paint(text.as_ref(), AnsiColors::Green, Stream::Stdout)
}
