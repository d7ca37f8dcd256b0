//! Shared helpers for split/reassemble integration tests.
#![allow(dead_code, unused_imports)]

use std::fs;
use std::path::Path;

pub use tc_split::{
    check_round_trip, reassemble, seam_equivalent, split, Fallback, FileKind, Fidelity,
    ParsedDocument,
};

/// Reads a file from `tests/fixtures`.
pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("read {}: {err}", path.display()))
}

/// Formats a split for snapshot testing.
pub fn render(parsed: &ParsedDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!("kind: {}\n", parsed.file_kind()));
    if let Some(fallback) = parsed.fallback() {
        out.push_str(&format!("fallback: {fallback:?}\n"));
    }
    out.push_str(&format!("prefix: {:?}\n", parsed.prefix()));
    out.push_str(&format!("end_marker: {:?}\n", parsed.end_marker()));
    out.push_str(&format!("suffix: {:?}\n", parsed.suffix()));
    out.push_str("--- declarations\n");
    out.push_str(parsed.declarations());
    out.push_str("\n--- code\n");
    out.push_str(parsed.code());
    out.push('\n');
    out
}

/// Declaration and ST text of the outer POU, read back with a real XML parser.
pub fn pou_blocks(xml: &str) -> (String, String) {
    let doc = roxmltree::Document::parse(xml).unwrap_or_else(|err| panic!("not well-formed: {err}\n{xml}"));
    let pou = doc
        .descendants()
        .find(|node| node.has_tag_name("POU"))
        .expect("POU element");
    let declaration = pou
        .children()
        .find(|node| node.has_tag_name("Declaration"))
        .and_then(|node| node.text())
        .unwrap_or_default();
    let code = pou
        .children()
        .find(|node| node.has_tag_name("Implementation"))
        .and_then(|node| node.children().find(|child| child.has_tag_name("ST")))
        .and_then(|node| node.text())
        .unwrap_or_default();
    (declaration.trim().to_string(), code.trim().to_string())
}

/// Normalizes line breaks the way an XML parser reports them.
pub fn lf(text: &str) -> String {
    text.replace("\r\n", "\n")
}
