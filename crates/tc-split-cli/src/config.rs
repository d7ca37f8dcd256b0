//! Configuration loaded from `tc-split.toml`.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tc_split::{ExtensionTable, FileKind, ReassembleOptions, Reassembler};
use tracing::{debug, warn};

pub(crate) const CONFIG_FILES: &[&str] = &["tc-split.toml", ".tc-split.toml"];

/// Effective configuration: defaults plus whatever the config file adds.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Config file path (if one was used).
    pub path: Option<PathBuf>,
    /// Extension → kind lookup.
    pub extensions: ExtensionTable,
    /// Reassembly options.
    pub reassemble: ReassembleOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    extensions: ExtensionsSection,
    reassemble: ReassembleOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExtensionsSection {
    pou: Vec<String>,
    type_def: Vec<String>,
    global_var_list: Vec<String>,
}

impl Config {
    /// Loads the config file named on the command line, or searches for one
    /// from `start` upwards.
    pub fn resolve(explicit: Option<&Path>, start: &Path) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load_explicit(path),
            None => Self::discover(start),
        }
    }

    /// Loads a config file the user asked for. Any failure is an error.
    pub fn load_explicit(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let parsed: ConfigFile = toml::from_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Self::from_file(Some(path.to_path_buf()), parsed)
    }

    /// Searches `start` and its ancestors for a config file.
    ///
    /// A file that cannot be read or parsed is skipped with a warning.
    pub fn discover(start: &Path) -> anyhow::Result<Self> {
        let Some(path) = start.ancestors().find_map(find_config_file) else {
            debug!("no tc-split config found from {}", start.display());
            return Ok(Self::default());
        };
        let Ok(contents) = std::fs::read_to_string(&path) else {
            warn!("Failed to read tc-split config at {}", path.display());
            return Ok(Self::default());
        };
        let parsed: ConfigFile = match toml::from_str(&contents) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(
                    "Failed to parse tc-split config at {}: {err}",
                    path.display()
                );
                return Ok(Self::default());
            }
        };
        Self::from_file(Some(path), parsed)
    }

    fn from_file(path: Option<PathBuf>, parsed: ConfigFile) -> anyhow::Result<Self> {
        let mut extensions = ExtensionTable::new();
        let aliases = [
            (FileKind::PouXml, &parsed.extensions.pou),
            (FileKind::TypeDef, &parsed.extensions.type_def),
            (FileKind::GlobalVarList, &parsed.extensions.global_var_list),
        ];
        for (kind, list) in aliases {
            for extension in list {
                extensions.insert(extension, kind).with_context(|| {
                    match &path {
                        Some(path) => format!("invalid config {}", path.display()),
                        None => "invalid config".to_string(),
                    }
                })?;
            }
        }
        if let Some(path) = &path {
            debug!("loaded tc-split config from {}", path.display());
        }
        Ok(Self {
            path,
            extensions,
            reassemble: parsed.reassemble,
        })
    }

    /// Kind for `path`, unless the user forced one.
    pub fn kind_for(&self, path: &Path, forced: Option<FileKind>) -> FileKind {
        forced.unwrap_or_else(|| self.extensions.kind_for_path(path))
    }

    /// Reassembler built from the config, with an optional override.
    pub fn reassembler(&self, line_ending: Option<tc_split::LineEnding>) -> Reassembler {
        let mut options = self.reassemble;
        if let Some(line_ending) = line_ending {
            options.line_ending = line_ending;
        }
        Reassembler::new(options)
    }
}

pub(crate) fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}
