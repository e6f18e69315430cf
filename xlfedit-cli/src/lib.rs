//! CLI library for testing purposes

pub mod input;

pub use input::{ExportTarget, load_state, parse_export_target};
pub use xlfedit::EditorState;
