//! POU objects: an XML container with a `Declaration` CDATA block and an
//! `Implementation/ST` CDATA block.
//!
//! The scanner walks markup tokens and tracks element depth. The declaration
//! is the shallowest `Declaration` element whose body is literal CDATA (the
//! first one on ties); the implementation must be the next sibling, with
//! nothing but blank text in between. Methods, actions and properties of a
//! function block carry their own `Declaration`/`Implementation` pairs one
//! level deeper, so depth keeps the scanner on the outer object.

use tracing::{debug, trace};

use crate::document::{Fallback, ParsedDocument};
use crate::kind::FileKind;
use crate::lexer::{cdata_inner, lex_markup, MarkupKind, Tag, Token};

pub(crate) const DECLARATION: &str = "Declaration";
pub(crate) const IMPLEMENTATION: &str = "Implementation";
pub(crate) const ST: &str = "ST";

/// An element found by the scanner, as token indices into the token stream.
#[derive(Debug)]
struct Located {
    /// Index of the start tag token.
    start: usize,
    /// Index of the matching end tag token.
    end: usize,
    /// Number of open elements enclosing the start tag.
    depth: usize,
    /// Literal text carried by the element.
    text: String,
}

pub(super) fn split_pou(content: &str) -> ParsedDocument {
    let tokens = lex_markup(content);

    let Some(declaration) = find_declaration(content, &tokens) else {
        debug!("no CDATA declaration element found; keeping the whole document as code");
        return ParsedDocument::whole_as_code(content, FileKind::PouXml)
            .with_fallback(Fallback::BlockNotFound);
    };

    let open = &tokens[declaration.start];
    let close = &tokens[declaration.end];
    trace!(
        depth = declaration.depth,
        offset = open.start(),
        "located declaration element"
    );

    let document = ParsedDocument::new(FileKind::PouXml)
        .with_prefix(&content[..open.start()])
        .with_declarations(&declaration.text)
        .with_end_marker(close.text(content));

    match find_implementation(content, &tokens, &declaration) {
        Some(implementation) => {
            let implementation_close = &tokens[implementation.end];
            trace!(
                offset = tokens[implementation.start].start(),
                "located implementation element"
            );
            document
                .with_code(&implementation.text)
                .with_suffix(&content[implementation_close.end()..])
        }
        None => {
            debug!("declaration has no structured-text implementation sibling; keeping the tail as suffix");
            document
                .with_suffix(&content[close.end()..])
                .with_fallback(Fallback::ImplementationNotFound)
        }
    }
}

fn find_declaration(source: &str, tokens: &[Token<MarkupKind>]) -> Option<Located> {
    let mut outermost: Option<Located> = None;
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            MarkupKind::StartTag => {
                let tag = Tag::parse(token.text(source));
                if tag.self_closing {
                    continue;
                }
                let shallower = outermost
                    .as_ref()
                    .map_or(true, |found| depth < found.depth);
                if shallower && tag.is(DECLARATION) {
                    if let Some((text, end)) = literal_body(source, tokens, index, DECLARATION) {
                        outermost = Some(Located {
                            start: index,
                            end,
                            depth,
                            text,
                        });
                    }
                }
                depth += 1;
            }
            MarkupKind::EndTag => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    outermost
}

/// Returns the `Implementation` element that directly follows the declaration.
///
/// Only blank text may separate the two. Anything else in between belongs to no
/// field of the split, so the tail is left whole in the suffix.
fn find_implementation(
    source: &str,
    tokens: &[Token<MarkupKind>],
    declaration: &Located,
) -> Option<Located> {
    let (index, token) = tokens
        .iter()
        .enumerate()
        .skip(declaration.end + 1)
        .find(|(_, token)| !is_blank(source, token))?;
    if token.kind != MarkupKind::StartTag {
        return None;
    }
    let tag = Tag::parse(token.text(source));
    if tag.self_closing || !tag.is(IMPLEMENTATION) {
        return None;
    }
    implementation_body(source, tokens, index, declaration.depth)
}

fn is_blank(source: &str, token: &Token<MarkupKind>) -> bool {
    token.kind == MarkupKind::Text && token.text(source).trim().is_empty()
}

/// Reads an `Implementation` element up to its end tag, picking the first
/// `ST` descendant with a literal body.
fn implementation_body(
    source: &str,
    tokens: &[Token<MarkupKind>],
    open: usize,
    base: usize,
) -> Option<Located> {
    let mut depth = base + 1;
    let mut code = None;
    let mut index = open + 1;
    while let Some(token) = tokens.get(index) {
        match token.kind {
            MarkupKind::StartTag => {
                let tag = Tag::parse(token.text(source));
                if !tag.self_closing {
                    if code.is_none() && tag.is(ST) {
                        if let Some((text, end)) = literal_body(source, tokens, index, ST) {
                            code = Some(text);
                            index = end + 1;
                            continue;
                        }
                    }
                    depth += 1;
                }
            }
            MarkupKind::EndTag => {
                depth -= 1;
                if depth == base {
                    return code.map(|text| Located {
                        start: open,
                        end: index,
                        depth: base,
                        text,
                    });
                }
            }
            _ => {}
        }
        index += 1;
    }
    None
}

/// Collects the literal text of an element whose body is only CDATA sections
/// and blank text. Adjacent sections are concatenated.
///
/// Returns the text and the index of the element's end tag.
fn literal_body(
    source: &str,
    tokens: &[Token<MarkupKind>],
    open: usize,
    name: &str,
) -> Option<(String, usize)> {
    let mut text = String::new();
    let mut seen_cdata = false;
    for (index, token) in tokens.iter().enumerate().skip(open + 1) {
        match token.kind {
            MarkupKind::CData => {
                text.push_str(cdata_inner(token.text(source)));
                seen_cdata = true;
            }
            _ if is_blank(source, token) => {}
            MarkupKind::EndTag if Tag::parse(token.text(source)).is(name) => {
                return seen_cdata.then_some((text, index));
            }
            _ => return None,
        }
    }
    None
}
