//! The split form of a document.

use serde::{Deserialize, Serialize};

use crate::kind::FileKind;
use crate::reassemble::reassemble;

/// Why the splitter could not locate the expected structure.
///
/// A fallback never fails the call; it records that the document was kept as
/// a single blob (or that the body was missing) so a host can warn before the
/// user edits and saves a document whose shape was not understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Fallback {
    /// No declaration block was found.
    BlockNotFound,
    /// An opening marker was found without a well-formed matching close.
    Unterminated,
    /// A POU declaration was found but no structured-text implementation follows it.
    ImplementationNotFound,
}

impl Fallback {
    /// Human-readable description for reports.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::BlockNotFound => "no declaration block found",
            Self::Unterminated => "declaration block is not closed",
            Self::ImplementationNotFound => "no structured-text implementation after the declaration",
        }
    }
}

/// Declarations and code of one document, plus the verbatim text around them.
///
/// A `ParsedDocument` belongs to exactly one version of the document text.
/// It is never edited in place: edited blobs go through
/// [`ParsedDocument::reassemble`] to produce the next document text, which is
/// split again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    declarations: String,
    code: String,
    prefix: String,
    suffix: String,
    end_marker: String,
    file_kind: FileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fallback: Option<Fallback>,
}

impl ParsedDocument {
    pub(crate) fn new(file_kind: FileKind) -> Self {
        Self {
            declarations: String::new(),
            code: String::new(),
            prefix: String::new(),
            suffix: String::new(),
            end_marker: String::new(),
            file_kind,
            fallback: None,
        }
    }

    /// Whole document as code (POU without declaration, unknown kinds).
    pub(crate) fn whole_as_code(content: &str, file_kind: FileKind) -> Self {
        Self {
            code: content.to_string(),
            ..Self::new(file_kind)
        }
    }

    /// Whole document as declarations (keyword kinds without a recognizable block).
    pub(crate) fn whole_as_declarations(content: &str, file_kind: FileKind) -> Self {
        Self {
            declarations: content.trim().to_string(),
            ..Self::new(file_kind)
        }
    }

    pub(crate) fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub(crate) fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    pub(crate) fn with_declarations(mut self, declarations: &str) -> Self {
        self.declarations = declarations.trim().to_string();
        self
    }

    pub(crate) fn with_code(mut self, code: &str) -> Self {
        self.code = code.trim().to_string();
        self
    }

    pub(crate) fn with_end_marker(mut self, end_marker: &str) -> Self {
        self.end_marker = end_marker.to_string();
        self
    }

    pub(crate) fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Trimmed text of the declaration region.
    #[must_use]
    pub fn declarations(&self) -> &str {
        &self.declarations
    }

    /// Trimmed text of the implementation region (verbatim whole document for fallbacks).
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Verbatim text before the declaration region.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Verbatim text after the last extracted region.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Literal closing tag or keywords of the declaration region.
    #[must_use]
    pub fn end_marker(&self) -> &str {
        &self.end_marker
    }

    /// Grammar the document was split with.
    #[must_use]
    pub fn file_kind(&self) -> FileKind {
        self.file_kind
    }

    /// Fallback engaged while splitting, if any.
    #[must_use]
    pub fn fallback(&self) -> Option<Fallback> {
        self.fallback
    }

    /// Rebuilds a full document from edited blobs and this document's saved context.
    #[must_use]
    pub fn reassemble(&self, declarations: &str, code: &str) -> String {
        reassemble(
            declarations,
            code,
            &self.prefix,
            &self.suffix,
            &self.end_marker,
            self.file_kind,
        )
    }

    /// Rebuilds the document without any edits.
    #[must_use]
    pub fn rebuild(&self) -> String {
        self.reassemble(&self.declarations, &self.code)
    }
}
