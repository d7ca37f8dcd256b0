//! File-kind dispatch.
//!
//! The file kind selects the grammar both the splitter and the reassembler
//! apply, so the extension lookup lives in one place and is shared by both.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;

/// Grammar variant of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileKind {
    /// POU object: XML with a `Declaration` and an `Implementation/ST` CDATA block.
    PouXml,
    /// Structure type definition: `TYPE ... STRUCT ... END_STRUCT END_TYPE`.
    TypeDef,
    /// Global variable list: `VAR_GLOBAL ... END_VAR`.
    GlobalVarList,
    /// Anything else; the whole document is treated as code.
    Unknown,
}

impl FileKind {
    /// All kinds, in dispatch-table order.
    pub const ALL: [FileKind; 4] = [
        FileKind::PouXml,
        FileKind::TypeDef,
        FileKind::GlobalVarList,
        FileKind::Unknown,
    ];

    /// Short name used on the command line and in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PouXml => "pou",
            Self::TypeDef => "dut",
            Self::GlobalVarList => "gvl",
            Self::Unknown => "unknown",
        }
    }

    /// Extensions recognized without any configuration.
    #[must_use]
    pub fn default_extensions(self) -> &'static [&'static str] {
        match self {
            Self::PouXml => &["tcpou", "xml"],
            Self::TypeDef => &["tcdut"],
            Self::GlobalVarList => &["tcgvl"],
            Self::Unknown => &[],
        }
    }

    /// Returns `true` if documents of this kind carry an implementation body.
    #[must_use]
    pub fn has_body(self) -> bool {
        matches!(self, Self::PouXml)
    }

    /// Looks up an extension in the default table.
    #[must_use]
    pub fn from_extension(extension: &str) -> Self {
        let extension = normalize_extension(extension);
        Self::ALL
            .into_iter()
            .find(|kind| kind.default_extensions().contains(&extension.as_str()))
            .unwrap_or(Self::Unknown)
    }

    /// Looks up a path's extension in the default table.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(Self::Unknown, Self::from_extension)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = KindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "pou" | "pou-xml" | "pouxml" => Ok(Self::PouXml),
            "dut" | "type-def" | "typedef" => Ok(Self::TypeDef),
            "gvl" | "global-var-list" | "globalvarlist" => Ok(Self::GlobalVarList),
            "unknown" => Ok(Self::Unknown),
            _ => Err(KindError::UnknownName(SmolStr::new(value))),
        }
    }
}

/// Errors raised while building or querying the dispatch table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KindError {
    /// Kind name not recognized.
    #[error("unknown file kind '{0}' (expected pou, dut, gvl or unknown)")]
    UnknownName(SmolStr),

    /// Extension already bound to a different kind.
    #[error("extension '.{extension}' is already mapped to {existing}, cannot map it to {requested}")]
    Conflict {
        /// Normalized extension.
        extension: SmolStr,
        /// Kind the extension is bound to.
        existing: FileKind,
        /// Kind the caller asked for.
        requested: FileKind,
    },

    /// Empty extension.
    #[error("empty file extension")]
    EmptyExtension,
}

/// Extension → kind lookup, seeded with the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionTable {
    entries: BTreeMap<SmolStr, FileKind>,
}

impl Default for ExtensionTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        for kind in FileKind::ALL {
            for extension in kind.default_extensions() {
                entries.insert(SmolStr::new(extension), kind);
            }
        }
        Self { entries }
    }
}

impl ExtensionTable {
    /// Creates the default table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an extra extension to `kind`.
    ///
    /// Rebinding an extension to the kind it already has is a no-op; binding
    /// it to a different kind is rejected so lookups stay unambiguous.
    pub fn insert(&mut self, extension: &str, kind: FileKind) -> Result<(), KindError> {
        let extension = normalize_extension(extension);
        if extension.is_empty() {
            return Err(KindError::EmptyExtension);
        }
        match self.entries.get(&extension) {
            Some(existing) if *existing == kind => Ok(()),
            Some(existing) => Err(KindError::Conflict {
                extension,
                existing: *existing,
                requested: kind,
            }),
            None => {
                self.entries.insert(extension, kind);
                Ok(())
            }
        }
    }

    /// Resolves an extension (with or without the leading dot, any case).
    #[must_use]
    pub fn kind_for_extension(&self, extension: &str) -> FileKind {
        self.entries
            .get(&normalize_extension(extension))
            .copied()
            .unwrap_or(FileKind::Unknown)
    }

    /// Resolves a path by its extension.
    #[must_use]
    pub fn kind_for_path(&self, path: &Path) -> FileKind {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(FileKind::Unknown, |ext| self.kind_for_extension(ext))
    }

    /// Iterates `(extension, kind)` pairs in extension order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, FileKind)> + '_ {
        self.entries
            .iter()
            .map(|(extension, kind)| (extension.as_str(), *kind))
    }
}

fn normalize_extension(extension: &str) -> SmolStr {
    SmolStr::new(extension.trim().trim_start_matches('.').to_ascii_lowercase())
}
