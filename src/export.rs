//! Export file naming.

use crate::formats::ExportFormat;

/// Extensions accepted for input files. They only drive naming, never detection.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = [".xlf", ".xliff", ".json"];

const DEFAULT_BASE_NAME: &str = "translations";

/// Naming behavior for exported files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Overrides the base name derived from the input file name.
    pub base_name: Option<String>,
    /// Appends `.{locale}` before the extension when a target language is known.
    pub include_locale_suffix: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            base_name: None,
            include_locale_suffix: true,
        }
    }
}

impl ExportOptions {
    /// Creates default export options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit base name.
    pub fn with_base_name(mut self, base_name: Option<String>) -> Self {
        self.base_name = base_name;
        self
    }

    /// Enables/disables the locale suffix.
    pub fn with_locale_suffix(mut self, include_locale_suffix: bool) -> Self {
        self.include_locale_suffix = include_locale_suffix;
        self
    }
}

/// Whether `file_name` ends with one of [`ACCEPTED_EXTENSIONS`].
pub fn is_accepted_file_name(file_name: &str) -> bool {
    ACCEPTED_EXTENSIONS
        .iter()
        .any(|ext| file_name.ends_with(ext))
}

/// `file_name` with an accepted extension removed.
pub fn base_name(file_name: &str) -> &str {
    ACCEPTED_EXTENSIONS
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .unwrap_or(file_name)
}

/// Builds the download name for an export, e.g. `messages.fr.xlf`.
///
/// # Example
/// ```rust
/// use xlfedit::export::{ExportOptions, export_file_name};
/// use xlfedit::formats::{ExportFormat, JsonShape};
///
/// let options = ExportOptions::new();
/// assert_eq!(
///     export_file_name(Some("messages.xlf"), Some("fr"), ExportFormat::Xml, &options),
///     "messages.fr.xlf"
/// );
/// assert_eq!(
///     export_file_name(None, None, ExportFormat::Json(JsonShape::Flat), &options),
///     "translations.json"
/// );
/// ```
pub fn export_file_name(
    file_name: Option<&str>,
    locale: Option<&str>,
    format: ExportFormat,
    options: &ExportOptions,
) -> String {
    let base = options
        .base_name
        .as_deref()
        .or_else(|| file_name.map(base_name))
        .filter(|b| !b.is_empty())
        .unwrap_or(DEFAULT_BASE_NAME);

    match locale.filter(|l| options.include_locale_suffix && !l.is_empty()) {
        Some(locale) => format!("{}.{}.{}", base, locale, format.extension()),
        None => format!("{}.{}", base, format.extension()),
    }
}
