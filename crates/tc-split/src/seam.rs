//! Round-trip fidelity.
//!
//! A document round-trips when splitting it and reassembling the unchanged
//! blobs gives back the same document. Whitespace at the seams may change;
//! anything else that changes means the split lost information.

use std::fmt;

use serde::Serialize;

use crate::document::ParsedDocument;
use crate::kind::FileKind;
use crate::split::split;

/// How closely a rebuilt document matches its original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Fidelity {
    /// Byte-identical.
    Exact,
    /// Differs only in whitespace at the seams.
    SeamEquivalent,
    /// Structure or content changed.
    Degraded,
}

impl Fidelity {
    /// Short name for reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::SeamEquivalent => "seam-equivalent",
            Self::Degraded => "degraded",
        }
    }

    /// Returns `true` if saving an edit of this document could lose content.
    #[must_use]
    pub fn is_degraded(self) -> bool {
        self == Self::Degraded
    }
}

impl fmt::Display for Fidelity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of splitting a document and rebuilding it without edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundTrip {
    /// The split of the original document.
    pub parsed: ParsedDocument,
    /// The rebuilt document text.
    pub rebuilt: String,
    /// How `rebuilt` compares to the original.
    pub fidelity: Fidelity,
}

/// Returns `true` if `rebuilt` differs from `original` at most in seam whitespace.
///
/// Both documents are split with `kind`; they are equivalent when the splits
/// agree on the fallback state, the two blobs, the prefix up to its trailing
/// whitespace and the suffix from its first non-blank character. On top of
/// that, the two texts must match once all whitespace is removed, so text
/// that no field of the split carries cannot disappear unnoticed. Unknown
/// documents have no seams and must be byte-identical.
#[must_use]
pub fn seam_equivalent(original: &str, rebuilt: &str, kind: FileKind) -> bool {
    if kind == FileKind::Unknown {
        return original == rebuilt;
    }
    let left = split(original, kind);
    let right = split(rebuilt, kind);
    left.fallback() == right.fallback()
        && left.declarations() == right.declarations()
        && left.code() == right.code()
        && left.prefix().trim_end() == right.prefix().trim_end()
        && left.suffix().trim_start() == right.suffix().trim_start()
        && skeleton(original) == skeleton(rebuilt)
}

/// Document text without whitespace or CDATA section breaks, lowercased.
///
/// Wrapper tags are re-synthesized in their canonical spelling, so case is
/// ignored here; the prefix and suffix comparison above is case-sensitive.
fn skeleton(text: &str) -> String {
    let compact: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
    compact.replace("]]><![CDATA[", "").to_lowercase()
}

/// Splits `content`, rebuilds it unchanged and classifies the result.
#[must_use]
pub fn check_round_trip(content: &str, kind: FileKind) -> RoundTrip {
    let parsed = split(content, kind);
    let rebuilt = parsed.rebuild();
    let fidelity = if rebuilt == content {
        Fidelity::Exact
    } else if seam_equivalent(content, &rebuilt, kind) {
        Fidelity::SeamEquivalent
    } else {
        Fidelity::Degraded
    };
    RoundTrip {
        parsed,
        rebuilt,
        fidelity,
    }
}
