//! Dialect detection and the bound editing session.
//!
//! [`Registry`] sniffs raw text and picks a dialect; [`Session`] owns the chosen adapter
//! together with its document handle and forwards every later call to it. A session is
//! built completely or not at all, so a failed load never disturbs the one already held
//! by the caller.

use crate::{
    error::Error,
    formats::{
        DialectKind, ExportFormat, JsonDialect, JsonDocument, Xliff2Dialect, Xliff12Dialect,
        xliff2::VERSION_MARKER,
    },
    traits::Dialect,
    types::{Features, Parsed, TranslationUnit, UpdateOutcome},
    xml_tree::XmlTree,
};

/// The ordered set of dialect adapters used for detection.
#[derive(Debug, Default, Clone, Copy)]
pub struct Registry {
    xliff12: Xliff12Dialect,
    xliff2: Xliff2Dialect,
    json: JsonDialect,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the dialect for `content`.
    ///
    /// Adapters are asked in [`DialectKind::PRIORITY`] order. When none claims the content
    /// but it looks like markup, it is routed to XLIFF 2.0 if it carries a `version="2.0"`
    /// marker and to XLIFF 1.2 otherwise, since real-world files often lack the full set of
    /// detection markers.
    ///
    /// # Example
    /// ```rust
    /// use xlfedit::{formats::DialectKind, session::Registry};
    /// let registry = Registry::new();
    /// assert_eq!(registry.detect(r#"{"a":"b"}"#)?, DialectKind::Json);
    /// assert_eq!(registry.detect("<xliff version=\"1.2\"/>")?, DialectKind::Xliff12);
    /// assert!(registry.detect("key=value").is_err());
    /// # Ok::<(), xlfedit::Error>(())
    /// ```
    pub fn detect(&self, content: &str) -> Result<DialectKind, Error> {
        self.detect_unmarked(strip_bom(content))
    }

    fn detect_unmarked(&self, content: &str) -> Result<DialectKind, Error> {
        if let Some(kind) = DialectKind::PRIORITY
            .into_iter()
            .find(|kind| self.can_parse(*kind, content))
        {
            tracing::debug!(event = "dialect_detected", dialect = %kind);
            return Ok(kind);
        }

        if content.trim_start().starts_with('<') {
            let kind = if content.contains(VERSION_MARKER) {
                DialectKind::Xliff2
            } else {
                DialectKind::Xliff12
            };
            tracing::debug!(event = "dialect_fallback", dialect = %kind);
            return Ok(kind);
        }

        Err(Error::UnsupportedFormat(
            "content is neither XLIFF nor a JSON object".to_string(),
        ))
    }

    /// Detects the dialect, parses `content` and binds a fresh session to it.
    ///
    /// A leading byte order mark is set aside before detection and written back by
    /// [`Session::serialize`].
    pub fn bind(&self, content: &str) -> Result<(Session, LoadedDocument), Error> {
        let bom = content.starts_with(BOM);
        let content = strip_bom(content);
        let kind = self.detect_unmarked(content)?;
        let (binding, loaded) = match kind {
            DialectKind::Xliff12 => {
                let mut dialect = self.xliff12;
                let (document, loaded) = split(kind, dialect.parse(content)?);
                (Binding::Xliff12 { dialect, document }, loaded)
            }
            DialectKind::Xliff2 => {
                let mut dialect = self.xliff2;
                let (document, loaded) = split(kind, dialect.parse(content)?);
                (Binding::Xliff2 { dialect, document }, loaded)
            }
            DialectKind::Json => {
                let mut dialect = self.json;
                let (document, loaded) = split(kind, dialect.parse(content)?);
                (Binding::Json { dialect, document }, loaded)
            }
        };
        tracing::debug!(
            event = "session_bound",
            dialect = %kind,
            format = %loaded.document_format,
            units = loaded.units.len(),
            bom
        );
        Ok((Session { binding, bom }, loaded))
    }

    fn can_parse(&self, kind: DialectKind, content: &str) -> bool {
        match kind {
            DialectKind::Xliff12 => self.xliff12.can_parse(content),
            DialectKind::Xliff2 => self.xliff2.can_parse(content),
            DialectKind::Json => self.json.can_parse(content),
        }
    }
}

const BOM: char = '\u{feff}';

fn strip_bom(content: &str) -> &str {
    content.strip_prefix(BOM).unwrap_or(content)
}

fn split<D>(dialect: DialectKind, parsed: Parsed<D>) -> (D, LoadedDocument) {
    let Parsed {
        document,
        units,
        source_lang,
        target_lang,
        document_format,
    } = parsed;
    (
        document,
        LoadedDocument {
            dialect,
            units,
            source_lang,
            target_lang,
            document_format,
        },
    )
}

/// The canonical view of a freshly parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub dialect: DialectKind,
    pub units: Vec<TranslationUnit>,
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub document_format: String,
}

#[derive(Debug)]
enum Binding {
    Xliff12 {
        dialect: Xliff12Dialect,
        document: XmlTree,
    },
    Xliff2 {
        dialect: Xliff2Dialect,
        document: XmlTree,
    },
    Json {
        dialect: JsonDialect,
        document: JsonDocument,
    },
}

/// One adapter bound to the document handle it produced.
#[derive(Debug)]
pub struct Session {
    binding: Binding,
    bom: bool,
}

impl Session {
    /// Shorthand for [`Registry::bind`] with the default registry.
    ///
    /// # Example
    /// ```rust
    /// use xlfedit::session::Session;
    /// let (mut session, loaded) = Session::load(r#"{"a.b":"v1","c":"v2"}"#)?;
    /// assert_eq!(loaded.document_format, "json (flat)");
    /// session.update_unit("a.b", "new");
    /// let out: serde_json::Value = serde_json::from_str(&session.serialize()?)?;
    /// assert_eq!(out, serde_json::json!({"a.b": "new", "c": "v2"}));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load(content: &str) -> Result<(Session, LoadedDocument), Error> {
        Registry::default().bind(content)
    }

    pub fn kind(&self) -> DialectKind {
        match &self.binding {
            Binding::Xliff12 { .. } => DialectKind::Xliff12,
            Binding::Xliff2 { .. } => DialectKind::Xliff2,
            Binding::Json { .. } => DialectKind::Json,
        }
    }

    /// Writes `target` into the bound document. Only the handle is touched.
    pub fn update_unit(&mut self, id: &str, target: &str) -> UpdateOutcome {
        match &mut self.binding {
            Binding::Xliff12 { dialect, document } => dialect.update_unit(document, id, target),
            Binding::Xliff2 { dialect, document } => dialect.update_unit(document, id, target),
            Binding::Json { dialect, document } => dialect.update_unit(document, id, target),
        }
    }

    /// Format-preserving rendering of the bound document.
    pub fn serialize(&self) -> Result<String, Error> {
        let body = match &self.binding {
            Binding::Xliff12 { dialect, document } => dialect.serialize(document)?,
            Binding::Xliff2 { dialect, document } => dialect.serialize(document)?,
            Binding::Json { dialect, document } => dialect.serialize(document)?,
        };
        if self.bom {
            Ok(format!("{}{}", BOM, body))
        } else {
            Ok(body)
        }
    }

    pub fn features(&self) -> Features {
        match &self.binding {
            Binding::Xliff12 { dialect, .. } => dialect.features(),
            Binding::Xliff2 { dialect, .. } => dialect.features(),
            Binding::Json { dialect, .. } => dialect.features(),
        }
    }

    pub fn supported_export_formats(&self) -> Vec<ExportFormat> {
        match &self.binding {
            Binding::Xliff12 { dialect, .. } => dialect.supported_export_formats(),
            Binding::Xliff2 { dialect, .. } => dialect.supported_export_formats(),
            Binding::Json { dialect, .. } => dialect.supported_export_formats(),
        }
    }
}
