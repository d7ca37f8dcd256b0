//! Block-keyword tokens for IEC 61131-3 Structured Text.
//!
//! Only the keywords that open or close a declaration block get their own
//! kind. Everything that could *hide* a keyword (comments, pragmas, string
//! literals, identifiers such as `TYPE_NAME`) is lexed as a whole token so a
//! scanner looking at keyword kinds never sees a false match.

use logos::Logos;

fn lex_block_comment_pascal(lex: &mut logos::Lexer<KeywordKind>) -> bool {
    lex_nested_comment(lex, b"(*", b"*)")
}

fn lex_block_comment_c(lex: &mut logos::Lexer<KeywordKind>) -> bool {
    lex_nested_comment(lex, b"/*", b"*/")
}

fn lex_nested_comment(lex: &mut logos::Lexer<KeywordKind>, open: &[u8], close: &[u8]) -> bool {
    let mut depth = 1usize;
    let bytes = lex.remainder().as_bytes();
    let mut i = 0usize;

    while i + 1 < bytes.len() {
        if bytes[i] == open[0] && bytes[i + 1] == open[1] {
            depth += 1;
            i += 2;
            continue;
        }
        if bytes[i] == close[0] && bytes[i + 1] == close[1] {
            depth -= 1;
            i += 2;
            if depth == 0 {
                lex.bump(i);
                return true;
            }
            continue;
        }
        i += 1;
    }

    // Unterminated: swallow the rest so nothing after it is mistaken for a keyword.
    lex.bump(bytes.len());
    false
}

/// Token kinds relevant to locating declaration blocks.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum KeywordKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    /// Whitespace (spaces, tabs, newlines)
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    /// Single-line comment: // ...
    #[regex(r"//[^\r\n]*", allow_greedy = true)]
    LineComment,

    /// Block comment: (* ... *) or /* ... */ (supports nesting).
    #[token("(*", lex_block_comment_pascal)]
    #[token("/*", lex_block_comment_c)]
    BlockComment,

    /// Pragma / attribute: { ... }
    #[regex(r"\{[^}]*\}")]
    Pragma,

    // =========================================================================
    // LITERALS AND NAMES
    // =========================================================================
    /// Single-quoted string on one line, `$` escapes included: 'it$'s END_VAR'
    #[regex(r"'([^$'\r\n]|\$[^\r\n])*'")]
    StringLiteral,

    /// Double-quoted string on one line (WSTRING, or an XML attribute value).
    #[regex(r#""([^$"\r\n]|\$[^\r\n])*""#)]
    WideStringLiteral,

    /// Identifier: starts with letter or underscore, contains letters, digits, underscores
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    /// `;`
    #[token(";")]
    Semicolon,

    // =========================================================================
    // KEYWORDS - Type definitions
    // =========================================================================
    /// `TYPE`
    #[token("TYPE", ignore(case))]
    KwType,

    /// `END_TYPE`
    #[token("END_TYPE", ignore(case))]
    KwEndType,

    /// `STRUCT`
    #[token("STRUCT", ignore(case))]
    KwStruct,

    /// `END_STRUCT`
    #[token("END_STRUCT", ignore(case))]
    KwEndStruct,

    // =========================================================================
    // KEYWORDS - Variable blocks
    // =========================================================================
    /// `VAR_GLOBAL`
    #[token("VAR_GLOBAL", ignore(case))]
    KwVarGlobal,

    /// `VAR`, `VAR_INPUT`, `VAR_OUTPUT`, `VAR_IN_OUT`, `VAR_TEMP`, `VAR_STAT`,
    /// `VAR_EXTERNAL`, `VAR_INST`, `VAR_CONFIG`, `VAR_ACCESS`
    #[token("VAR", ignore(case))]
    #[token("VAR_INPUT", ignore(case))]
    #[token("VAR_OUTPUT", ignore(case))]
    #[token("VAR_IN_OUT", ignore(case))]
    #[token("VAR_TEMP", ignore(case))]
    #[token("VAR_STAT", ignore(case))]
    #[token("VAR_EXTERNAL", ignore(case))]
    #[token("VAR_INST", ignore(case))]
    #[token("VAR_CONFIG", ignore(case))]
    #[token("VAR_ACCESS", ignore(case))]
    KwVarOther,

    /// `END_VAR`
    #[token("END_VAR", ignore(case))]
    KwEndVar,

    /// `CONSTANT`, `RETAIN`, `NON_RETAIN`, `PERSISTENT`
    #[token("CONSTANT", ignore(case))]
    #[token("RETAIN", ignore(case))]
    #[token("NON_RETAIN", ignore(case))]
    #[token("PERSISTENT", ignore(case))]
    KwQualifier,

    // =========================================================================
    // SPECIAL TOKENS
    // =========================================================================
    /// Anything else: punctuation, digits, markup, non-ASCII text and
    /// unterminated comments.
    #[regex(r"[^\x00-\x7F]+")]
    #[default]
    Other,
}

impl KeywordKind {
    /// Returns `true` if this token is trivia (whitespace, comment, or pragma).
    #[inline]
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::LineComment | Self::BlockComment | Self::Pragma
        )
    }

    /// Returns `true` for keywords that open or close a declaration block.
    #[must_use]
    pub fn is_block_keyword(self) -> bool {
        matches!(
            self,
            Self::KwType
                | Self::KwEndType
                | Self::KwStruct
                | Self::KwEndStruct
                | Self::KwVarGlobal
                | Self::KwVarOther
                | Self::KwEndVar
        )
    }

    /// Returns `true` for keywords that open a variable block.
    #[must_use]
    pub fn opens_var_block(self) -> bool {
        matches!(self, Self::KwVarGlobal | Self::KwVarOther)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<(KeywordKind, &str)> {
        KeywordKind::lexer(input)
            .spanned()
            .map(|(tok, span)| (tok.unwrap_or(KeywordKind::Other), &input[span]))
            .collect()
    }

    fn significant(input: &str) -> Vec<KeywordKind> {
        lex(input)
            .into_iter()
            .filter(|(kind, _)| !kind.is_trivia())
            .map(|(kind, _)| kind)
            .collect()
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let tokens = lex("END_VAR end_var End_Var eNd_VaR");
        assert!(tokens
            .iter()
            .filter(|(k, _)| !k.is_trivia())
            .all(|(kind, _)| *kind == KeywordKind::KwEndVar));
    }

    #[test]
    fn test_longer_identifiers_are_not_keywords() {
        assert_eq!(
            significant("TYPE_A STRUCTURE VAR_GLOBALS END_TYPES"),
            vec![
                KeywordKind::Ident,
                KeywordKind::Ident,
                KeywordKind::Ident,
                KeywordKind::Ident
            ]
        );
    }

    #[test]
    fn test_keywords_hidden_in_trivia_and_strings() {
        let source = "(* END_VAR (* nested *) END_VAR *) // END_VAR\n{attribute 'END_VAR'} 'END_VAR' \"END_VAR\"";
        let kinds = significant(source);
        assert_eq!(
            kinds,
            vec![KeywordKind::StringLiteral, KeywordKind::WideStringLiteral]
        );

        let tokens = lex("s := 'a$'END_VAR'; w := \"$\"END_VAR$$\";");
        let strings: Vec<&str> = tokens
            .iter()
            .filter(|(kind, _)| {
                matches!(
                    kind,
                    KeywordKind::StringLiteral | KeywordKind::WideStringLiteral
                )
            })
            .map(|(_, text)| *text)
            .collect();
        assert_eq!(strings, vec!["'a$'END_VAR'", "\"$\"END_VAR$$\""]);
        assert!(tokens.iter().all(|(kind, _)| *kind != KeywordKind::KwEndVar));
    }

    #[test]
    fn test_var_block_openers() {
        let kinds = significant("VAR VAR_INPUT var_in_out VAR_GLOBAL CONSTANT END_VAR");
        assert_eq!(
            kinds,
            vec![
                KeywordKind::KwVarOther,
                KeywordKind::KwVarOther,
                KeywordKind::KwVarOther,
                KeywordKind::KwVarGlobal,
                KeywordKind::KwQualifier,
                KeywordKind::KwEndVar
            ]
        );
        assert!(kinds.iter().take(4).all(|kind| kind.opens_var_block()));
    }

    #[test]
    fn test_unterminated_comment_swallows_rest() {
        let tokens = lex("STRUCT (* open END_STRUCT END_TYPE");
        let last = tokens.last().expect("tokens");
        assert_eq!(last.0, KeywordKind::Other);
        assert_eq!(last.1, "(* open END_STRUCT END_TYPE");
    }

    #[test]
    fn test_punctuation_is_other() {
        assert_eq!(
            significant("x : INT;"),
            vec![
                KeywordKind::Ident,
                KeywordKind::Other,
                KeywordKind::Ident,
                KeywordKind::Semicolon
            ]
        );
    }
}
