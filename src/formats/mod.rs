//! All supported translation dialects for xlfedit.
//!
//! This module re-exports the adapter for each dialect and provides
//! [`DialectKind`], [`JsonShape`] and [`ExportFormat`] for generic handling across the crate.

pub mod json;
pub mod xliff12;
pub mod xliff2;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

// Reexporting the adapters for easier access
pub use json::{JsonDialect, JsonDocument, generate_export};
pub use xliff2::Xliff2Dialect;
pub use xliff12::Xliff12Dialect;

use crate::Error;

/// The three dialect families the engine understands, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    /// XLIFF 1.2 (`trans-unit` based).
    Xliff12,
    /// XLIFF 2.0 (`unit`/`segment` based).
    Xliff2,
    /// Flat, nested or wrapped JSON key/value maps.
    Json,
}

impl DialectKind {
    /// Detection order used by [`crate::session::Registry`].
    pub const PRIORITY: [DialectKind; 3] =
        [DialectKind::Xliff12, DialectKind::Xliff2, DialectKind::Json];
}

/// Implements [`std::fmt::Display`] for [`DialectKind`].
///
/// # Example
/// ```rust
/// use xlfedit::formats::DialectKind;
/// assert_eq!(DialectKind::Xliff12.to_string(), "xliff 1.2");
/// assert_eq!(DialectKind::Json.to_string(), "json");
/// ```
impl Display for DialectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DialectKind::Xliff12 => write!(f, "xliff 1.2"),
            DialectKind::Xliff2 => write!(f, "xliff 2.0"),
            DialectKind::Json => write!(f, "json"),
        }
    }
}

/// Structural variant of a JSON translation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonShape {
    /// `{ "a.b": "text" }`, keys are ids verbatim.
    #[default]
    Flat,
    /// `{ "a": { "b": "text" } }`, ids are dot-joined paths.
    Nested,
    /// `{ "locale": "xx", "translations": { ... } }`.
    Wrapped,
}

impl Display for JsonShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonShape::Flat => write!(f, "flat"),
            JsonShape::Nested => write!(f, "nested"),
            JsonShape::Wrapped => write!(f, "wrapped"),
        }
    }
}

/// Accepts `flat`, `nested` and `wrapped` (case-insensitive). `angular` is accepted as an
/// alias of `wrapped`, the layout Angular's `extract-i18n --format=json` produces.
///
/// # Example
/// ```rust
/// use xlfedit::formats::JsonShape;
/// use std::str::FromStr;
/// assert_eq!(JsonShape::from_str("Nested").unwrap(), JsonShape::Nested);
/// assert_eq!(JsonShape::from_str("angular").unwrap(), JsonShape::Wrapped);
/// assert!(JsonShape::from_str("yaml").is_err());
/// ```
impl FromStr for JsonShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(JsonShape::Flat),
            "nested" => Ok(JsonShape::Nested),
            "wrapped" | "angular" => Ok(JsonShape::Wrapped),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl JsonShape {
    /// Infers the shape from a document format label such as `json (nested)`.
    /// Non-JSON labels and unknown shapes fall back to [`JsonShape::Flat`].
    pub fn from_document_format(label: &str) -> JsonShape {
        if !label.contains("json") {
            return JsonShape::Flat;
        }
        if label.contains("nested") {
            JsonShape::Nested
        } else if label.contains("wrapped") {
            JsonShape::Wrapped
        } else {
            JsonShape::Flat
        }
    }
}

/// The two export families: format-preserving XML or freshly generated JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Xml,
    Json,
}

/// A format a loaded document can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "shape", rename_all = "snake_case")]
pub enum ExportFormat {
    /// The native XML dialect of the loaded document, format-preserving.
    Xml,
    /// Freshly generated JSON of the given shape.
    Json(JsonShape),
}

impl ExportFormat {
    pub fn kind(&self) -> ExportKind {
        match self {
            ExportFormat::Xml => ExportKind::Xml,
            ExportFormat::Json(_) => ExportKind::Json,
        }
    }

    /// Menu label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Xml => "XLIFF",
            ExportFormat::Json(JsonShape::Flat) => "JSON (Flat)",
            ExportFormat::Json(JsonShape::Nested) => "JSON (Nested)",
            ExportFormat::Json(JsonShape::Wrapped) => "JSON (Wrapped)",
        }
    }

    /// File extension (without the dot) for exported files.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xml => "xlf",
            ExportFormat::Json(_) => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Xml => "application/xliff+xml",
            ExportFormat::Json(_) => "application/json",
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Xml => write!(f, "xml"),
            ExportFormat::Json(shape) => write!(f, "json-{}", shape),
        }
    }
}

/// Accepts `xml`, `xliff`, `xlf`, `json` (flat) and `json-<shape>`.
impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "xml" | "xliff" | "xlf" => Ok(ExportFormat::Xml),
            "json" => Ok(ExportFormat::Json(JsonShape::Flat)),
            other => match other.strip_prefix("json-") {
                Some(shape) => Ok(ExportFormat::Json(shape.parse()?)),
                None => Err(Error::UnknownFormat(other.to_string())),
            },
        }
    }
}
