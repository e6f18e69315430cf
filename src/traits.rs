//! The capability contract every dialect adapter implements.

use crate::{
    error::Error,
    formats::ExportFormat,
    types::{Features, Parsed, UpdateOutcome},
};

/// Detects, parses, edits and re-serializes exactly one family of persisted format.
///
/// The document handle is owned by the caller (see [`crate::session::Session`]) and only
/// lent to the adapter for the duration of a call.
///
/// # Example
///
/// ```rust
/// use xlfedit::formats::JsonDialect;
/// use xlfedit::traits::Dialect;
///
/// let mut dialect = JsonDialect::default();
/// assert!(dialect.can_parse(r#"{"hello":"Hallo"}"#));
/// let mut parsed = dialect.parse(r#"{"hello":"Hallo"}"#)?;
/// dialect.update_unit(&mut parsed.document, "hello", "Servus");
/// assert!(dialect.serialize(&parsed.document)?.contains("Servus"));
/// # Ok::<(), xlfedit::Error>(())
/// ```
pub trait Dialect {
    /// Dialect-native document representation.
    type Document;

    /// Cheap content sniffing. Must not panic and must not mutate anything.
    fn can_parse(&self, content: &str) -> bool;

    /// Parses the full document or fails; never returns a partial result.
    fn parse(&mut self, content: &str) -> Result<Parsed<Self::Document>, Error>;

    /// Writes `target` into the unit `id`, leaving every other node untouched.
    fn update_unit(&self, document: &mut Self::Document, id: &str, target: &str) -> UpdateOutcome;

    /// Renders the (possibly edited) document back to text.
    fn serialize(&self, document: &Self::Document) -> Result<String, Error>;

    fn features(&self) -> Features;

    fn supported_export_formats(&self) -> Vec<ExportFormat>;
}
