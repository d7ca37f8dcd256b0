//! Keyword-delimited declaration blocks.
//!
//! - Structure types: `TYPE Name : STRUCT ... END_STRUCT END_TYPE`
//! - Global variable lists: `VAR_GLOBAL ... END_VAR`
//!
//! The scanners run over keyword tokens of the whole file, so the same code
//! handles bare Structured Text and the XML-wrapped `.TcDUT`/`.TcGVL`
//! containers (the markup simply ends up in the prefix and suffix).

use tracing::{debug, trace};

use crate::document::{Fallback, ParsedDocument};
use crate::kind::FileKind;
use crate::lexer::{lex_keywords, KeywordKind, Token};

/// Byte offsets of a located block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    /// End of the opening keyword(s); the prefix ends here.
    open_end: usize,
    /// Start of the closing keyword; the suffix starts here.
    close_start: usize,
    /// End of the closing keyword(s).
    close_end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Found(Block),
    NotFound,
    Unterminated,
}

pub(super) fn split_type_def(content: &str) -> ParsedDocument {
    let tokens = lex_keywords(content);
    finish(content, FileKind::TypeDef, scan_struct(&tokens))
}

pub(super) fn split_global_vars(content: &str) -> ParsedDocument {
    let tokens = lex_keywords(content);
    finish(content, FileKind::GlobalVarList, scan_global_vars(content, &tokens))
}

fn finish(content: &str, kind: FileKind, scan: Scan) -> ParsedDocument {
    match scan {
        Scan::Found(block) => {
            trace!(%kind, open_end = block.open_end, close_start = block.close_start, "located declaration block");
            ParsedDocument::new(kind)
                .with_prefix(&content[..block.open_end])
                .with_declarations(&content[block.open_end..block.close_start])
                .with_suffix(&content[block.close_start..])
                .with_end_marker(&content[block.close_start..block.close_end])
        }
        Scan::NotFound => {
            debug!(%kind, "no declaration block found; keeping the whole document as declarations");
            ParsedDocument::whole_as_declarations(content, kind)
                .with_fallback(Fallback::BlockNotFound)
        }
        Scan::Unterminated => {
            debug!(%kind, "declaration block is not closed; keeping the whole document as declarations");
            ParsedDocument::whole_as_declarations(content, kind)
                .with_fallback(Fallback::Unterminated)
        }
    }
}

/// `TYPE <name> [EXTENDS <base>] : STRUCT ... END_STRUCT [;] END_TYPE`
fn scan_struct(tokens: &[Token<KeywordKind>]) -> Scan {
    let mut significant = tokens.iter().filter(|token| !token.kind.is_trivia());

    if !significant
        .by_ref()
        .any(|token| token.kind == KeywordKind::KwType)
    {
        return Scan::NotFound;
    }

    // The type must be a structure: STRUCT is the next block keyword.
    let open = loop {
        match significant.next() {
            Some(token) if token.kind == KeywordKind::KwStruct => break token,
            Some(token) if token.kind.is_block_keyword() => return Scan::NotFound,
            Some(_) => {}
            None => return Scan::NotFound,
        }
    };

    let mut depth = 0usize;
    while let Some(token) = significant.next() {
        match token.kind {
            KeywordKind::KwStruct => depth += 1,
            KeywordKind::KwEndStruct if depth > 0 => depth -= 1,
            KeywordKind::KwEndStruct => {
                let mut next = significant.next();
                if next.is_some_and(|token| token.kind == KeywordKind::Semicolon) {
                    next = significant.next();
                }
                return match next {
                    Some(end_type) if end_type.kind == KeywordKind::KwEndType => {
                        Scan::Found(Block {
                            open_end: open.end(),
                            close_start: token.start(),
                            close_end: end_type.end(),
                        })
                    }
                    _ => Scan::Unterminated,
                };
            }
            kind if kind.is_block_keyword() => return Scan::Unterminated,
            _ => {}
        }
    }
    Scan::Unterminated
}

/// `VAR_GLOBAL [CONSTANT | RETAIN | PERSISTENT ...] ... END_VAR`
fn scan_global_vars(source: &str, tokens: &[Token<KeywordKind>]) -> Scan {
    let Some(open_index) = tokens
        .iter()
        .position(|token| token.kind == KeywordKind::KwVarGlobal)
    else {
        return Scan::NotFound;
    };

    // Qualifiers on the same line belong to the opening marker.
    let mut open_end = tokens[open_index].end();
    let mut index = open_index + 1;
    while let Some(token) = tokens.get(index) {
        match token.kind {
            KeywordKind::Whitespace if !token.text(source).contains('\n') => {}
            KeywordKind::KwQualifier => open_end = token.end(),
            _ => break,
        }
        index += 1;
    }

    for token in &tokens[index..] {
        match token.kind {
            KeywordKind::KwEndVar => {
                return Scan::Found(Block {
                    open_end,
                    close_start: token.start(),
                    close_end: token.end(),
                })
            }
            kind if kind.opens_var_block() => return Scan::Unterminated,
            _ => {}
        }
    }
    Scan::Unterminated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn struct_scan(source: &str) -> Scan {
        scan_struct(&lex_keywords(source))
    }

    fn gvl_scan(source: &str) -> Scan {
        scan_global_vars(source, &lex_keywords(source))
    }

    #[test]
    fn test_struct_block_offsets() {
        let source = "TYPE ST_A :\nSTRUCT\n  a : INT;\nEND_STRUCT\nEND_TYPE\n";
        let Scan::Found(block) = struct_scan(source) else {
            panic!("expected a struct block");
        };
        assert_eq!(&source[..block.open_end], "TYPE ST_A :\nSTRUCT");
        assert_eq!(
            &source[block.close_start..block.close_end],
            "END_STRUCT\nEND_TYPE"
        );
    }

    #[test]
    fn test_nested_struct_is_balanced() {
        let source = "TYPE A : STRUCT inner : STRUCT x : INT; END_STRUCT; y : INT; END_STRUCT END_TYPE";
        let Scan::Found(block) = struct_scan(source) else {
            panic!("expected a struct block");
        };
        assert_eq!(
            source[block.open_end..block.close_start].trim(),
            "inner : STRUCT x : INT; END_STRUCT; y : INT;"
        );
    }

    #[test]
    fn test_end_struct_semicolon_is_accepted() {
        let source = "TYPE A : STRUCT x : INT; END_STRUCT; END_TYPE";
        assert!(matches!(struct_scan(source), Scan::Found(_)));
    }

    #[test]
    fn test_enum_type_is_not_a_struct() {
        assert_eq!(
            struct_scan("TYPE E_Color : (Red, Green) := Red; END_TYPE"),
            Scan::NotFound
        );
        assert_eq!(struct_scan("x : INT;"), Scan::NotFound);
    }

    #[test]
    fn test_struct_fails_closed() {
        assert_eq!(
            struct_scan("TYPE A : STRUCT x : INT; END_TYPE"),
            Scan::Unterminated
        );
        assert_eq!(
            struct_scan("TYPE A : STRUCT x : INT; END_STRUCT"),
            Scan::Unterminated
        );
        assert_eq!(
            struct_scan("TYPE A : STRUCT x : INT; END_STRUCT x END_TYPE"),
            Scan::Unterminated
        );
    }

    #[test]
    fn test_gvl_same_line_qualifiers() {
        let source = "VAR_GLOBAL CONSTANT RETAIN\n  c : INT := 1;\nEND_VAR";
        let Scan::Found(block) = gvl_scan(source) else {
            panic!("expected a global block");
        };
        assert_eq!(&source[..block.open_end], "VAR_GLOBAL CONSTANT RETAIN");

        let source = "VAR_GLOBAL\nCONSTANT_A : INT;\nEND_VAR";
        let Scan::Found(block) = gvl_scan(source) else {
            panic!("expected a global block");
        };
        assert_eq!(&source[..block.open_end], "VAR_GLOBAL");
    }

    #[test]
    fn test_gvl_fails_closed() {
        assert_eq!(gvl_scan("VAR_GLOBAL a : INT;"), Scan::Unterminated);
        assert_eq!(
            gvl_scan("VAR_GLOBAL a : INT; VAR b : INT; END_VAR"),
            Scan::Unterminated
        );
        assert_eq!(gvl_scan("VAR a : INT; END_VAR"), Scan::NotFound);
    }
}
