//! Splitting a document into declarations and code.
//!
//! Each file kind has its own scanner:
//!
//! - [`FileKind::PouXml`]: markup scanner over the XML container.
//! - [`FileKind::TypeDef`] and [`FileKind::GlobalVarList`]: keyword scanner
//!   over Structured Text.
//! - [`FileKind::Unknown`]: no scanning; the document is code.
//!
//! Scanners never fail. When the expected structure is missing or ambiguous
//! they keep the document as a single blob and record a [`Fallback`].
//!
//! [`Fallback`]: crate::Fallback

mod blocks;
mod pou;

pub(crate) use pou::{DECLARATION, IMPLEMENTATION, ST};

use std::path::Path;

use crate::document::ParsedDocument;
use crate::kind::{ExtensionTable, FileKind};

/// Splits `content` according to the grammar of `kind`.
#[must_use]
pub fn split(content: &str, kind: FileKind) -> ParsedDocument {
    match kind {
        FileKind::PouXml => pou::split_pou(content),
        FileKind::TypeDef => blocks::split_type_def(content),
        FileKind::GlobalVarList => blocks::split_global_vars(content),
        FileKind::Unknown => ParsedDocument::whole_as_code(content, kind),
    }
}

/// Splits `content`, picking the file kind from the extension of `path`.
#[must_use]
pub fn split_path(path: &Path, content: &str, table: &ExtensionTable) -> ParsedDocument {
    split(content, table.kind_for_path(path))
}
