//! The editor's view of the loaded document.
//!
//! [`EditorState`] keeps the canonical unit list next to the bound [`Session`] and derives
//! everything else (filtered view, statistics, pages) from them on demand.

use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    export::{ExportOptions, export_file_name},
    formats::{DialectKind, ExportFormat, ExportKind, JsonShape, generate_export},
    io::decode_text,
    session::{LoadedDocument, Session},
    types::{Features, TranslationUnit, UpdateOutcome},
};

/// Number of units per page when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Status filter applied before the text query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStatus {
    #[default]
    All,
    /// Target has non-whitespace text.
    Translated,
    /// Target is empty or whitespace only.
    Missing,
    /// Edited since the document was loaded.
    Changed,
}

impl Display for FilterStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterStatus::All => write!(f, "all"),
            FilterStatus::Translated => write!(f, "translated"),
            FilterStatus::Missing => write!(f, "missing"),
            FilterStatus::Changed => write!(f, "changed"),
        }
    }
}

impl FromStr for FilterStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterStatus::All),
            "translated" => Ok(FilterStatus::Translated),
            "missing" | "untranslated" => Ok(FilterStatus::Missing),
            "changed" | "modified" => Ok(FilterStatus::Changed),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// Aggregate counts over all units, regardless of the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub translated: usize,
    pub missing: usize,
    pub changed: usize,
}

/// Loaded document, its canonical units and the editing session around them.
///
/// # Example
/// ```rust
/// use xlfedit::{EditorState, FilterStatus};
///
/// let mut state = EditorState::new();
/// state.load(Some("messages.json"), r#"{"a.b":"v1","c":""}"#)?;
/// state.update_unit("c", "v2")?;
///
/// state.set_filter_status(FilterStatus::Changed);
/// assert_eq!(state.filtered_units().len(), 1);
/// assert_eq!(state.stats().translated, 2);
/// # Ok::<(), xlfedit::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct EditorState {
    session: Option<Session>,
    units: Vec<TranslationUnit>,
    source_lang: Option<String>,
    target_lang: Option<String>,
    document_format: Option<String>,
    file_name: Option<String>,
    modified_ids: BTreeSet<String>,
    filter_query: String,
    filter_status: FilterStatus,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detects, parses and binds `content`, replacing the current document.
    ///
    /// Nothing changes when this fails. On success the modified set is cleared and the
    /// status filter goes back to [`FilterStatus::All`]; the text query is kept.
    pub fn load(&mut self, file_name: Option<&str>, content: &str) -> Result<(), Error> {
        let (session, loaded) = Session::load(content)?;
        let LoadedDocument {
            dialect,
            units,
            source_lang,
            target_lang,
            document_format,
        } = loaded;

        tracing::info!(
            event = "document_loaded",
            file = file_name.unwrap_or("-"),
            dialect = %dialect,
            format = %document_format,
            units = units.len()
        );

        self.session = Some(session);
        self.units = units;
        self.source_lang = source_lang;
        self.target_lang = target_lang;
        self.document_format = Some(document_format);
        self.file_name = file_name.map(str::to_string);
        self.modified_ids.clear();
        self.filter_status = FilterStatus::All;
        Ok(())
    }

    /// Like [`EditorState::load`] for raw bytes, honouring a byte order mark.
    pub fn load_bytes(&mut self, file_name: Option<&str>, bytes: &[u8]) -> Result<(), Error> {
        let content = decode_text(bytes)?;
        self.load(file_name, &content)
    }

    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    pub fn units(&self) -> &[TranslationUnit] {
        &self.units
    }

    pub fn unit(&self, id: &str) -> Option<&TranslationUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn source_lang(&self) -> Option<&str> {
        self.source_lang.as_deref()
    }

    pub fn target_lang(&self) -> Option<&str> {
        self.target_lang.as_deref()
    }

    /// The target language as a canonical tag, e.g. `zh_hant` becomes `zh-Hant`.
    /// `None` when the document names none or the value is not a valid tag.
    pub fn target_language_identifier(&self) -> Option<LanguageIdentifier> {
        self.target_lang.as_deref()?.parse().ok()
    }

    pub fn source_language_identifier(&self) -> Option<LanguageIdentifier> {
        self.source_lang.as_deref()?.parse().ok()
    }

    /// Label of the loaded document, e.g. `xliff 1.2` or `json (nested)`.
    pub fn document_format(&self) -> Option<&str> {
        self.document_format.as_deref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn dialect(&self) -> Option<DialectKind> {
        self.session.as_ref().map(Session::kind)
    }

    pub fn modified_ids(&self) -> impl Iterator<Item = &str> {
        self.modified_ids.iter().map(String::as_str)
    }

    pub fn is_modified(&self) -> bool {
        !self.modified_ids.is_empty()
    }

    pub fn features(&self) -> Result<Features, Error> {
        Ok(self.session()?.features())
    }

    pub fn supported_export_formats(&self) -> Result<Vec<ExportFormat>, Error> {
        Ok(self.session()?.supported_export_formats())
    }

    pub fn filter_query(&self) -> &str {
        &self.filter_query
    }

    pub fn set_filter_query(&mut self, query: impl Into<String>) {
        self.filter_query = query.into();
    }

    pub fn filter_status(&self) -> FilterStatus {
        self.filter_status
    }

    pub fn set_filter_status(&mut self, status: FilterStatus) {
        self.filter_status = status;
    }

    /// Writes `value` as the target of unit `id`.
    ///
    /// The edit is first applied to the document handle; the canonical unit and the
    /// modified set only follow when that succeeds, so both always agree. Ids that are
    /// not part of the loaded document yield [`UpdateOutcome::UnitNotFound`].
    pub fn update_unit(&mut self, id: &str, value: &str) -> Result<UpdateOutcome, Error> {
        let session = self.session.as_mut().ok_or(Error::NoSession)?;
        let Some(index) = self.units.iter().position(|u| u.id == id) else {
            tracing::warn!(event = "unit_not_found", id, "no such unit in the loaded document");
            return Ok(UpdateOutcome::UnitNotFound);
        };

        let outcome = session.update_unit(id, value);
        if outcome.is_applied() {
            self.units[index].target = value.to_string();
            self.modified_ids.insert(id.to_string());
        }
        Ok(outcome)
    }

    /// Units matching the status filter and then the text query.
    ///
    /// The query is matched case-insensitively against id and target, and against source
    /// and note text only when the bound dialect supplies them.
    pub fn filtered_units(&self) -> Vec<&TranslationUnit> {
        let features = self
            .session
            .as_ref()
            .map(Session::features)
            .unwrap_or_default();
        let query = self.filter_query.to_lowercase();

        self.units
            .iter()
            .filter(|unit| self.matches_status(unit))
            .filter(|unit| query.is_empty() || matches_query(unit, &query, features))
            .collect()
    }

    /// Counts over the whole document; the filter does not apply.
    pub fn stats(&self) -> Stats {
        let translated = self.units.iter().filter(|u| u.is_translated()).count();
        Stats {
            total: self.units.len(),
            translated,
            missing: self.units.len() - translated,
            changed: self.modified_ids.len(),
        }
    }

    /// The `index`-th window of `size` filtered units (zero based).
    pub fn page(&self, index: usize, size: usize) -> Vec<&TranslationUnit> {
        if size == 0 {
            return Vec::new();
        }
        self.filtered_units()
            .into_iter()
            .skip(index.saturating_mul(size))
            .take(size)
            .collect()
    }

    pub fn page_count(&self, size: usize) -> usize {
        if size == 0 {
            return 0;
        }
        self.filtered_units().len().div_ceil(size)
    }

    /// Renders the document for download.
    ///
    /// [`ExportKind::Xml`] serializes the live document with every untouched byte intact and
    /// is only available for XLIFF sessions. [`ExportKind::Json`] is generated from the
    /// canonical units alone; without an explicit shape the one of the loaded JSON file is
    /// reused (flat for XLIFF), and the locale is the target language, else the source one.
    pub fn export_content(
        &self,
        kind: ExportKind,
        json_shape: Option<JsonShape>,
    ) -> Result<String, Error> {
        let session = self.session()?;
        match kind {
            ExportKind::Xml => {
                if session.kind() == DialectKind::Json {
                    return Err(Error::UnsupportedExport(
                        "XLIFF export needs an XLIFF document".to_string(),
                    ));
                }
                session.serialize()
            }
            ExportKind::Json => {
                let shape = json_shape.unwrap_or_else(|| {
                    JsonShape::from_document_format(self.document_format().unwrap_or_default())
                });
                let locale = self.target_lang().or(self.source_lang());
                tracing::debug!(
                    event = "json_export",
                    shape = %shape,
                    locale = locale.unwrap_or("-")
                );
                generate_export(&self.units, shape, locale)
            }
        }
    }

    /// The loaded document in its own dialect, edits included. For JSON this keeps key
    /// order and non-string values, unlike a generated export.
    pub fn serialize(&self) -> Result<String, Error> {
        self.session()?.serialize()
    }

    /// Shorthand for [`EditorState::export_content`] with a concrete format.
    pub fn export(&self, format: ExportFormat) -> Result<String, Error> {
        let shape = match format {
            ExportFormat::Xml => None,
            ExportFormat::Json(shape) => Some(shape),
        };
        self.export_content(format.kind(), shape)
    }

    /// File name for an export of the current document.
    pub fn export_file_name(&self, format: ExportFormat, options: &ExportOptions) -> String {
        export_file_name(self.file_name(), self.target_lang(), format, options)
    }

    fn session(&self) -> Result<&Session, Error> {
        self.session.as_ref().ok_or(Error::NoSession)
    }

    fn matches_status(&self, unit: &TranslationUnit) -> bool {
        match self.filter_status {
            FilterStatus::All => true,
            FilterStatus::Translated => unit.is_translated(),
            FilterStatus::Missing => !unit.is_translated(),
            FilterStatus::Changed => self.modified_ids.contains(&unit.id),
        }
    }
}

fn matches_query(unit: &TranslationUnit, query: &str, features: Features) -> bool {
    let hit = |text: &str| text.to_lowercase().contains(query);

    hit(&unit.id)
        || hit(&unit.target)
        || (features.has_source && hit(&unit.source))
        || (features.has_notes && unit.notes.iter().flatten().any(|n| hit(n.content())))
}
