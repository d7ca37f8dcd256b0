//! Rebuilding a full document from edited declarations and code.
//!
//! The reassembler is the inverse of [`split`](crate::split()): it takes the
//! two blobs plus the saved prefix, suffix and end marker and produces the
//! next document text. Whitespace at the seams is normalized; everything in
//! the prefix and suffix is copied through byte for byte.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::kind::FileKind;
use crate::lexer::{escape_cdata, Tag};
use crate::split::{DECLARATION, IMPLEMENTATION, ST};

/// Line terminator used for synthesized lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Follow the document: CRLF if its first line break is CRLF, LF otherwise.
    #[default]
    Auto,
    /// Always `\n`.
    Lf,
    /// Always `\r\n`.
    CrLf,
}

impl LineEnding {
    /// Name used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Lf => "lf",
            Self::CrLf => "crlf",
        }
    }

    /// Resolves `Auto` against the given texts, in priority order.
    fn resolve(self, texts: &[&str]) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Auto => {
                let first_break = texts
                    .iter()
                    .find_map(|text| text.find('\n').map(|index| &text[..index]));
                match first_break {
                    Some(line) if line.ends_with('\r') => "\r\n",
                    _ => "\n",
                }
            }
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "lf" | "unix" => Ok(Self::Lf),
            "crlf" | "windows" => Ok(Self::CrLf),
            other => Err(format!(
                "unknown line ending '{other}' (expected auto, lf or crlf)"
            )),
        }
    }
}

/// Reassembly options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReassembleOptions {
    /// Line terminator for synthesized lines and edited blobs.
    pub line_ending: LineEnding,
}

/// Reassembles documents with a fixed set of options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reassembler {
    options: ReassembleOptions,
}

impl Reassembler {
    /// Creates a reassembler.
    #[must_use]
    pub fn new(options: ReassembleOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    #[must_use]
    pub fn options(&self) -> ReassembleOptions {
        self.options
    }

    /// Rebuilds a document of `kind` from edited blobs and saved context.
    ///
    /// `end_marker` supplies the spelling of the declaration element for
    /// [`FileKind::PouXml`]; for the keyword kinds the closing keywords
    /// already live at the start of `suffix`.
    #[must_use]
    pub fn reassemble(
        &self,
        declarations: &str,
        code: &str,
        prefix: &str,
        suffix: &str,
        end_marker: &str,
        kind: FileKind,
    ) -> String {
        let newline = self
            .options
            .line_ending
            .resolve(&[prefix, suffix, declarations, code]);
        match kind {
            FileKind::PouXml => {
                pou_xml(declarations, code, prefix, suffix, end_marker, newline)
            }
            FileKind::TypeDef | FileKind::GlobalVarList => {
                keyword_block(declarations, prefix, suffix, newline)
            }
            FileKind::Unknown => {
                if declarations.is_empty() {
                    code.to_string()
                } else {
                    format!("{declarations}{newline}{code}")
                }
            }
        }
    }
}

/// Rebuilds a document with default options (line endings follow the document).
#[must_use]
pub fn reassemble(
    declarations: &str,
    code: &str,
    prefix: &str,
    suffix: &str,
    end_marker: &str,
    kind: FileKind,
) -> String {
    Reassembler::default().reassemble(declarations, code, prefix, suffix, end_marker, kind)
}

fn pou_xml(
    declarations: &str,
    code: &str,
    prefix: &str,
    suffix: &str,
    end_marker: &str,
    newline: &str,
) -> String {
    let indent = trailing_indent(prefix);
    let element = declaration_element(end_marker);
    let declarations = escape_cdata(declarations.trim());
    let code = escape_cdata(code.trim());

    let mut lines: Vec<Cow<'_, str>> = Vec::with_capacity(10);
    let head = prefix.trim_end();
    if !head.is_empty() {
        lines.push(Cow::Borrowed(head));
    }
    lines.extend([
        Cow::Owned(format!("{indent}<{element}><![CDATA[")),
        normalize_newlines(&declarations, newline),
        Cow::Owned(format!("]]></{element}>")),
        Cow::Owned(format!("{indent}<{IMPLEMENTATION}>")),
        Cow::Owned(format!("{indent}  <{ST}><![CDATA[")),
        normalize_newlines(&code, newline),
        Cow::Owned(format!("]]></{ST}>")),
        Cow::Owned(format!("{indent}</{IMPLEMENTATION}>")),
    ]);
    let tail = trim_leading_blank_lines(suffix);
    if !tail.is_empty() {
        lines.push(Cow::Borrowed(tail));
    }
    lines.join(newline)
}

fn keyword_block(declarations: &str, prefix: &str, suffix: &str, newline: &str) -> String {
    let declarations = normalize_newlines(declarations.trim(), newline);
    [
        prefix.trim_end(),
        &*declarations,
        trim_leading_blank_lines(suffix),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(newline)
}

/// Element name for the synthesized declaration tags, spelled as in the source.
fn declaration_element(end_marker: &str) -> &str {
    if end_marker.starts_with("</") {
        let tag = Tag::parse(end_marker);
        if tag.is(DECLARATION) {
            return tag.name;
        }
    }
    DECLARATION
}

/// Blanks between the last line break of `prefix` and its end.
fn trailing_indent(prefix: &str) -> &str {
    let line_start = prefix.rfind('\n').map_or(0, |index| index + 1);
    let tail = &prefix[line_start..];
    if tail.bytes().all(|byte| byte == b' ' || byte == b'\t') {
        tail
    } else {
        ""
    }
}

/// Drops leading blank lines but keeps the indentation of the first content line.
fn trim_leading_blank_lines(text: &str) -> &str {
    let content = text.trim_start();
    if content.is_empty() {
        return "";
    }
    let content_start = text.len() - content.len();
    let line_start = text[..content_start]
        .rfind('\n')
        .map_or(0, |index| index + 1);
    &text[line_start..]
}

fn normalize_newlines<'a>(text: &'a str, newline: &str) -> Cow<'a, str> {
    if newline == "\n" {
        if text.contains("\r\n") {
            return Cow::Owned(text.replace("\r\n", "\n"));
        }
        return Cow::Borrowed(text);
    }
    let lone_lf = text
        .match_indices('\n')
        .any(|(index, _)| !text[..index].ends_with('\r'));
    if lone_lf {
        Cow::Owned(text.replace("\r\n", "\n").replace('\n', newline))
    } else {
        Cow::Borrowed(text)
    }
}
