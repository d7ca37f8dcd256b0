//! `tc-split` - Declaration/code splitter and reassembler for TwinCAT sources.
//!
//! TwinCAT stores Structured Text inside object files whose layout depends on
//! the object type. This crate pulls the editable parts out of such a file and
//! puts them back:
//!
//! - **Splitter**: document text + [`FileKind`] → [`ParsedDocument`] with the
//!   declarations, the code, and the verbatim text around them.
//! - **Reassembler**: edited declarations and code + the saved context → the
//!   next document text.
//! - **Format dispatch**: file extension → [`FileKind`], shared by both
//!   directions so they always agree on the grammar.
//! - **Seam fidelity**: checks that a split/rebuild round trip only touched
//!   whitespace at the section seams.
//!
//! # Design Principles
//!
//! - **Never fails**: malformed input degrades to a single blob and records a
//!   [`Fallback`] instead of returning an error
//! - **Fails closed**: an ambiguous block boundary is treated as missing
//! - **Pure**: no I/O and no state between calls; the host owns sequencing
//!
//! # Example
//!
//! ```
//! use tc_split::{split, FileKind};
//!
//! let source = "VAR_GLOBAL\n  g_bReady : BOOL;\nEND_VAR";
//! let parsed = split(source, FileKind::GlobalVarList);
//!
//! assert_eq!(parsed.prefix(), "VAR_GLOBAL");
//! assert_eq!(parsed.declarations(), "g_bReady : BOOL;");
//! assert_eq!(parsed.suffix(), "END_VAR");
//!
//! let rebuilt = parsed.reassemble("g_bReady : BOOL;\ng_nCount : INT;", "");
//! assert_eq!(rebuilt, "VAR_GLOBAL\ng_bReady : BOOL;\ng_nCount : INT;\nEND_VAR");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod document;
mod kind;
pub mod lexer;
mod reassemble;
mod seam;
mod split;

pub use document::{Fallback, ParsedDocument};
pub use kind::{ExtensionTable, FileKind, KindError};
pub use reassemble::{reassemble, LineEnding, ReassembleOptions, Reassembler};
pub use seam::{check_round_trip, seam_equivalent, Fidelity, RoundTrip};
pub use split::{split, split_path};
