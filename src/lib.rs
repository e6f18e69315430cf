//! Format-preserving translation file editing for Rust.
//!
//! Reads XLIFF 1.2, XLIFF 2.0 and flat, nested or wrapped JSON translation files, exposes
//! their entries as a uniform list of [`TranslationUnit`]s, applies target edits back into
//! the original document and writes it out again with everything it did not touch intact.
//! JSON exports of any loaded document are generated from the unit list.
//!
//! [`EditorState`] is the usual entry point; [`Session`] and [`Registry`] are available for
//! callers that keep their own unit list.

#![forbid(unsafe_code)]

pub mod error;
pub mod export;
pub mod formats;
pub mod io;
pub mod session;
pub mod state;
pub mod traits;
pub mod types;
pub mod xml_tree;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    export::ExportOptions,
    formats::{DialectKind, ExportFormat, ExportKind, JsonShape},
    session::{LoadedDocument, Registry, Session},
    state::{EditorState, FilterStatus, Stats},
    types::{Features, Note, TranslationUnit, UpdateOutcome},
};
