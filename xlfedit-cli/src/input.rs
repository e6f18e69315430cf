use std::path::Path;

use xlfedit::{
    EditorState, ExportFormat, ExportKind, JsonShape, export::is_accepted_file_name,
};

/// Reads `input` from disk and loads it into a fresh editor state.
pub fn load_state(input: &str) -> Result<EditorState, String> {
    let path = Path::new(input);
    if !path.is_file() {
        return Err(format!("Input file does not exist: {}", input));
    }

    let file_name = path.file_name().and_then(|n| n.to_str());
    if !file_name.is_some_and(is_accepted_file_name) {
        tracing::warn!(
            event = "unexpected_extension",
            input,
            "expected .xlf, .xliff or .json; detecting the format from content"
        );
    }

    let content = xlfedit::io::read_text(path)
        .map_err(|e| format!("Error reading {}: {}", input, e))?;
    let mut state = EditorState::new();
    state
        .load(file_name, &content)
        .map_err(|e| format!("Failed to load {}: {}", input, e))?;
    Ok(state)
}

/// What the user asked `export` to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportTarget {
    pub kind: ExportKind,
    /// `None` reuses the shape of the loaded JSON file (flat for XLIFF).
    pub shape: Option<JsonShape>,
}

impl ExportTarget {
    /// Concrete format used for file naming.
    pub fn format(&self) -> ExportFormat {
        match self.kind {
            ExportKind::Xml => ExportFormat::Xml,
            ExportKind::Json => ExportFormat::Json(self.shape.unwrap_or_default()),
        }
    }
}

/// Parses `xliff`, `json` or `json-<shape>`. A bare `json` leaves the shape open.
pub fn parse_export_target(s: &str) -> Result<ExportTarget, String> {
    if s.trim().eq_ignore_ascii_case("json") {
        return Ok(ExportTarget {
            kind: ExportKind::Json,
            shape: None,
        });
    }
    let format: ExportFormat = s.parse().map_err(|_| {
        format!(
            "Unknown export format: '{}'. Supported formats: \
             xliff, json, json-flat, json-nested, json-wrapped",
            s
        )
    })?;
    Ok(match format {
        ExportFormat::Xml => ExportTarget {
            kind: ExportKind::Xml,
            shape: None,
        },
        ExportFormat::Json(shape) => ExportTarget {
            kind: ExportKind::Json,
            shape: Some(shape),
        },
    })
}
