//! Core, dialect-agnostic types for xlfedit.
//! Adapters decode into these; the editor state projects over these.

use std::cmp::Ordering;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A single translatable entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TranslationUnit {
    /// Opaque key, unique within the scope the dialect defines.
    /// For XLIFF this is `<trans-unit>@id` / `<unit>@id`; for JSON the (flattened) key.
    pub id: String,

    /// Source text. Empty for dialects without a source concept.
    pub source: String,

    /// The editable translation.
    pub target: String,

    /// Dialect-specific state tag, e.g. `translated` or `needs-review`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub state: Option<String>,

    /// Annotations attached to the unit, in document order.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub notes: Option<Vec<Note>>,
}

impl TranslationUnit {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            state: None,
            notes: None,
        }
    }

    /// Whether the target carries any non-whitespace text.
    pub fn is_translated(&self) -> bool {
        !self.target.trim().is_empty()
    }

    /// Notes in display order; see [`sort_notes_for_display`].
    pub fn display_notes(&self) -> Vec<&Note> {
        match &self.notes {
            Some(notes) => sort_notes_for_display(notes),
            None => Vec::new(),
        }
    }

    /// Free-text notes joined with ` | ` in display order.
    pub fn notes_summary(&self) -> String {
        self.display_notes()
            .into_iter()
            .filter(|n| matches!(n, Note::Comment { .. }))
            .map(Note::content)
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Source references (`file:line`) attached to this unit.
    pub fn location_references(&self) -> Vec<&str> {
        self.notes
            .iter()
            .flatten()
            .filter(|n| matches!(n, Note::Location { .. }))
            .map(Note::content)
            .collect()
    }
}

impl Display for TranslationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TranslationUnit {{ id: {}, target: {}, state: {:?} }}",
            self.id, self.target, self.state
        )
    }
}

/// An annotation attached to a unit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Note {
    /// Free-text note.
    Comment {
        content: String,
        /// XLIFF 1.2 `from` attribute (e.g. `description`, `meaning`).
        #[serde(skip_serializing_if = "Option::is_none", default)]
        from: Option<String>,
        /// XLIFF 1.2 `priority` attribute; lower sorts first, zero means none.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        priority: Option<f64>,
        /// XLIFF 2.0 `category` attribute.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        category: Option<String>,
    },

    /// A cross-reference into the code base the string was extracted from.
    Location {
        /// Combined reference, e.g. `src/app/home.html:12`.
        content: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        source_file: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        line_number: Option<String>,
        /// XLIFF 2.0 `category` attribute.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        category: Option<String>,
        /// XLIFF 1.2 context-group `purpose`.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        purpose: Option<String>,
    },
}

impl Note {
    pub fn content(&self) -> &str {
        match self {
            Note::Comment { content, .. } | Note::Location { content, .. } => content,
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Note::Comment {
            content: content.into(),
            from: None,
            priority: None,
            category: None,
        }
    }

    fn display_priority(&self) -> Option<f64> {
        match self {
            Note::Comment { priority, .. } => *priority,
            Note::Location { .. } => None,
        }
    }
}

/// Orders notes for display: prioritised comments ascending, everything else after them
/// in document order.
pub fn sort_notes_for_display(notes: &[Note]) -> Vec<&Note> {
    let mut sorted: Vec<&Note> = notes.iter().collect();
    sorted.sort_by(|a, b| match (a.display_priority(), b.display_priority()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted
}

/// Which optional fields a dialect actually supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Features {
    pub has_source: bool,
    pub has_notes: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            has_source: true,
            has_notes: true,
        }
    }
}

/// Result of applying an edit to a document handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The handle now carries the new target.
    Applied,
    /// No unit with the given id exists in the handle.
    UnitNotFound,
    /// The unit exists but lacks the structure a target is attached to.
    MissingAnchor,
}

impl UpdateOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, UpdateOutcome::Applied)
    }
}

/// Everything a successful parse produces.
#[derive(Debug)]
pub struct Parsed<D> {
    /// Dialect-native handle used for format-preserving re-serialization.
    pub document: D,
    pub units: Vec<TranslationUnit>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    /// Human-readable label, e.g. `xliff 1.2` or `json (nested)`.
    pub document_format: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prioritized(content: &str, priority: Option<f64>) -> Note {
        Note::Comment {
            content: content.to_string(),
            from: None,
            priority,
            category: None,
        }
    }

    #[test]
    fn test_display_notes_sorted_by_priority() {
        let mut unit = TranslationUnit::new("greeting", "Hello", "");
        unit.notes = Some(vec![
            prioritized("three", Some(3.0)),
            prioritized("one", Some(1.0)),
            prioritized("none", None),
        ]);

        let order: Vec<&str> = unit.display_notes().into_iter().map(Note::content).collect();
        assert_eq!(order, vec!["one", "three", "none"]);
    }

    #[test]
    fn test_locations_sort_after_prioritized_comments() {
        let notes = vec![
            Note::Location {
                content: "src/app.html:4".to_string(),
                source_file: Some("src/app.html".to_string()),
                line_number: Some("4".to_string()),
                category: None,
                purpose: Some("location".to_string()),
            },
            prioritized("important", Some(2.0)),
        ];
        let sorted = sort_notes_for_display(&notes);
        assert_eq!(sorted[0].content(), "important");
        assert_eq!(sorted[1].content(), "src/app.html:4");
    }

    #[test]
    fn test_notes_summary_and_locations() {
        let mut unit = TranslationUnit::new("id", "", "");
        unit.notes = Some(vec![
            Note::Location {
                content: "a.ts:1".to_string(),
                source_file: Some("a.ts".to_string()),
                line_number: Some("1".to_string()),
                category: None,
                purpose: None,
            },
            prioritized("second", Some(5.0)),
            prioritized("first", Some(1.0)),
        ]);
        assert_eq!(unit.notes_summary(), "first | second");
        assert_eq!(unit.location_references(), vec!["a.ts:1"]);
    }

    #[test]
    fn test_is_translated_ignores_whitespace() {
        assert!(!TranslationUnit::new("a", "", "   ").is_translated());
        assert!(TranslationUnit::new("a", "", " x ").is_translated());
    }

    #[test]
    fn test_note_serializes_with_type_tag() {
        let json = serde_json::to_value(Note::comment("hi")).unwrap();
        assert_eq!(json["type"], "comment");
        assert_eq!(json["content"], "hi");
        assert!(json.get("priority").is_none());
    }
}
