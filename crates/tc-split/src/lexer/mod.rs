//! Lexers for the two surface syntaxes a document can use.
//!
//! - [`MarkupKind`] tokenizes the XML container of a `.TcPOU` file: tags,
//!   CDATA sections, comments and plain text.
//! - [`KeywordKind`] tokenizes Structured Text far enough to find block
//!   keywords (`TYPE`, `STRUCT`, `VAR_GLOBAL`, ...) without matching them
//!   inside comments, pragmas, strings or longer identifiers.
//!
//! Both lexers are lossless: every byte of the source belongs to exactly one
//! token, so token ranges can be used to slice the prefix and suffix back out
//! of the original text.

mod keywords;
mod markup;

pub use keywords::KeywordKind;
pub use markup::{MarkupKind, Tag};

pub(crate) use markup::{cdata_inner, escape_cdata};

use logos::Logos;
use text_size::{TextRange, TextSize};

/// A token produced by one of the lexers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<K> {
    /// The kind of token.
    pub kind: K,
    /// The byte range of the token in the source text.
    pub range: TextRange,
}

impl<K> Token<K> {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: K, range: TextRange) -> Self {
        Self { kind, range }
    }

    /// Byte offset where the token starts.
    #[must_use]
    pub fn start(&self) -> usize {
        usize::from(self.range.start())
    }

    /// Byte offset just past the token.
    #[must_use]
    pub fn end(&self) -> usize {
        usize::from(self.range.end())
    }

    /// Returns the token text within `source`.
    #[must_use]
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        &source[self.start()..self.end()]
    }
}

/// Lexer over one token set.
///
/// Unrecognized input is returned as the token set's default kind, so the
/// iterator never stops early and never fails.
pub struct Lexer<'src, K>
where
    K: Logos<'src>,
{
    inner: logos::Lexer<'src, K>,
}

impl<'src, K> Lexer<'src, K>
where
    K: Logos<'src, Source = str>,
    K::Extras: Default,
{
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: K::lexer(source),
        }
    }
}

impl<'src, K> Iterator for Lexer<'src, K>
where
    K: Logos<'src, Source = str> + Default,
{
    type Item = Token<K>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?.unwrap_or_default();
        let span = self.inner.span();
        let range = TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        );
        Some(Token::new(kind, range))
    }
}

/// Lex an XML document into markup tokens.
#[must_use]
pub fn lex_markup(source: &str) -> Vec<Token<MarkupKind>> {
    Lexer::<MarkupKind>::new(source).collect()
}

/// Lex Structured Text (or text embedding it) into keyword tokens.
#[must_use]
pub fn lex_keywords(source: &str) -> Vec<Token<KeywordKind>> {
    Lexer::<KeywordKind>::new(source).collect()
}
