//! Host side of the split/reassemble cycle for one document.
//!
//! The session owns the current document text and its split. Every change
//! replaces the whole text and splits it again, so the split shown to the
//! user always belongs to the text that will be saved.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tc_split::{check_round_trip, split, FileKind, Fidelity, ParsedDocument, Reassembler};
use tracing::debug;

/// Messages a host sends to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMessage {
    /// The user edited the declarations and/or code.
    ContentChanged { declarations: String, code: String },
    /// The document changed outside the session (e.g. on disk).
    ExternalChange(String),
    /// Persist the current text.
    Save,
}

/// What a message did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The text changed and was split again.
    Updated,
    /// Nothing changed.
    Unchanged,
    /// The text was written to this path.
    Saved(PathBuf),
}

#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    target: PathBuf,
    kind: FileKind,
    text: String,
    parsed: ParsedDocument,
    reassembler: Reassembler,
    dirty: bool,
}

impl Session {
    /// Reads `path` and splits it as `kind`.
    pub fn open(path: &Path, kind: FileKind, reassembler: Reassembler) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self::from_text(path, kind, text, reassembler))
    }

    /// Builds a session around text that is already in memory.
    pub fn from_text(path: &Path, kind: FileKind, text: String, reassembler: Reassembler) -> Self {
        let parsed = split(&text, kind);
        if let Some(fallback) = parsed.fallback() {
            debug!("{}: {}", path.display(), fallback.describe());
        }
        Self {
            path: path.to_path_buf(),
            target: path.to_path_buf(),
            kind,
            text,
            parsed,
            reassembler,
            dirty: false,
        }
    }

    /// Saves to `target` instead of the source path.
    pub fn with_target(mut self, target: PathBuf) -> Self {
        self.target = target;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parsed(&self) -> &ParsedDocument {
        &self.parsed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Round-trip fidelity of the current text.
    pub fn fidelity(&self) -> Fidelity {
        check_round_trip(&self.text, self.kind).fidelity
    }

    /// Re-reads the source path as an external change.
    pub fn reload(&mut self) -> anyhow::Result<SessionEvent> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        self.handle(HostMessage::ExternalChange(text))
    }

    pub fn handle(&mut self, message: HostMessage) -> anyhow::Result<SessionEvent> {
        match message {
            HostMessage::ContentChanged { declarations, code } => {
                let parsed = &self.parsed;
                let text = self.reassembler.reassemble(
                    &declarations,
                    &code,
                    parsed.prefix(),
                    parsed.suffix(),
                    parsed.end_marker(),
                    self.kind,
                );
                if text == self.text {
                    return Ok(SessionEvent::Unchanged);
                }
                self.replace(text);
                self.dirty = true;
                Ok(SessionEvent::Updated)
            }
            HostMessage::ExternalChange(text) => {
                if text == self.text {
                    return Ok(SessionEvent::Unchanged);
                }
                self.replace(text);
                self.dirty = false;
                Ok(SessionEvent::Updated)
            }
            HostMessage::Save => {
                std::fs::write(&self.target, &self.text)
                    .with_context(|| format!("failed to write {}", self.target.display()))?;
                self.dirty = false;
                debug!("saved {}", self.target.display());
                Ok(SessionEvent::Saved(self.target.clone()))
            }
        }
    }

    fn replace(&mut self, text: String) {
        self.parsed = split(&text, self.kind);
        self.text = text;
    }
}
