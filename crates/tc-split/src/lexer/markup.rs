//! Markup tokens for the XML container of TwinCAT object files.
//!
//! The lexer does not build a tree and does not validate nesting; it only
//! separates tags from character data so the POU scanner can count element
//! depth and pick out CDATA sections verbatim.

use logos::Logos;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

fn lex_cdata(lex: &mut logos::Lexer<MarkupKind>) -> bool {
    lex_until(lex, CDATA_CLOSE)
}

fn lex_comment(lex: &mut logos::Lexer<MarkupKind>) -> bool {
    lex_until(lex, "-->")
}

fn lex_processing_instruction(lex: &mut logos::Lexer<MarkupKind>) -> bool {
    lex_until(lex, "?>")
}

fn lex_declaration(lex: &mut logos::Lexer<MarkupKind>) -> bool {
    lex_until(lex, ">")
}

fn lex_until(lex: &mut logos::Lexer<MarkupKind>, terminator: &str) -> bool {
    let remainder = lex.remainder();
    match remainder.find(terminator) {
        Some(index) => {
            lex.bump(index + terminator.len());
            true
        }
        None => {
            lex.bump(remainder.len());
            false
        }
    }
}

/// Token kinds of the XML container.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum MarkupKind {
    /// Character data between tags (whitespace included).
    #[regex(r"[^<]+")]
    Text,

    /// `<Name attr="...">` or `<Name/>`
    #[regex(r"<[A-Za-z_:][^<>]*>")]
    StartTag,

    /// `</Name>`
    #[regex(r"</[A-Za-z_:][^<>]*>")]
    EndTag,

    /// `<![CDATA[ ... ]]>`
    #[token("<![CDATA[", lex_cdata)]
    CData,

    /// `<!-- ... -->`
    #[token("<!--", lex_comment)]
    Comment,

    /// `<? ... ?>`
    #[token("<?", lex_processing_instruction)]
    ProcessingInstruction,

    /// `<!DOCTYPE ...>` and other markup declarations.
    #[token("<!", lex_declaration)]
    Doctype,

    /// Unterminated constructs and stray `<`.
    #[default]
    Error,
}

impl MarkupKind {
    /// Returns `true` for tokens that never affect element structure.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Comment | Self::ProcessingInstruction | Self::Doctype
        )
    }
}

/// Returns the literal text of a CDATA token, without its delimiters.
#[must_use]
pub(crate) fn cdata_inner(text: &str) -> &str {
    text.strip_prefix(CDATA_OPEN)
        .and_then(|rest| rest.strip_suffix(CDATA_CLOSE))
        .unwrap_or_default()
}

/// Escapes literal text so it can be written inside a single CDATA block.
///
/// A `]]>` inside the text would end the section early, so it is split across
/// two sections; reading the sections back and concatenating them yields the
/// original text.
#[must_use]
pub(crate) fn escape_cdata(value: &str) -> String {
    value.replace(CDATA_CLOSE, "]]]]><![CDATA[>")
}

/// A start or end tag, as far as the scanner needs to know it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'src> {
    /// Element name as written (namespace prefix included).
    pub name: &'src str,
    /// `true` for `<Name/>`.
    pub self_closing: bool,
}

impl<'src> Tag<'src> {
    /// Reads the name out of a `StartTag` or `EndTag` token text.
    #[must_use]
    pub fn parse(text: &'src str) -> Self {
        let inner = text
            .trim_start_matches('<')
            .trim_start_matches('/')
            .trim_end_matches('>');
        let self_closing = inner.ends_with('/');
        let end = inner
            .find(|ch: char| ch.is_ascii_whitespace() || ch == '/')
            .unwrap_or(inner.len());
        Self {
            name: &inner[..end],
            self_closing,
        }
    }

    /// Case-insensitive comparison of the local name, ignoring any namespace prefix.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        let local = self
            .name
            .rsplit_once(':')
            .map_or(self.name, |(_, local)| local);
        local.eq_ignore_ascii_case(name)
    }
}
