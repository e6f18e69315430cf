//! Support for JSON translation maps.
//!
//! Three shapes are recognised after parsing (see [`JsonShape`]):
//! flat `{ "a.b": "text" }`, nested `{ "a": { "b": "text" } }` and wrapped
//! `{ "locale": "xx", "translations": { ... } }`. JSON carries no source text and no notes.

use serde_json::{Map, Value};

use crate::{
    error::Error,
    formats::{ExportFormat, JsonShape},
    traits::Dialect,
    types::{Features, Parsed, TranslationUnit, UpdateOutcome},
};

/// A parsed JSON translation file. Key order is preserved through serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDocument(Value);

impl JsonDocument {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDialect {
    shape: JsonShape,
}

impl JsonDialect {
    /// Shape detected by the last successful [`Dialect::parse`].
    pub fn shape(&self) -> JsonShape {
        self.shape
    }
}

impl Dialect for JsonDialect {
    type Document = JsonDocument;

    fn can_parse(&self, content: &str) -> bool {
        serde_json::from_str::<Value>(content)
            .map(|value| value.is_object())
            .unwrap_or(false)
    }

    fn parse(&mut self, content: &str) -> Result<Parsed<JsonDocument>, Error> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::malformed(format!("invalid JSON: {}", e)))?;
        let Value::Object(map) = &value else {
            return Err(Error::UnsupportedFormat(
                "top-level JSON value is not an object".to_string(),
            ));
        };

        let shape = detect_shape(map);
        let mut units = Vec::new();
        let mut target_lang = None;
        match (shape, map.get("translations")) {
            (JsonShape::Wrapped, Some(Value::Object(translations))) => {
                flatten_into(translations, "", &mut units);
                target_lang = map
                    .get("locale")
                    .and_then(Value::as_str)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string);
            }
            _ => flatten_into(map, "", &mut units),
        }

        self.shape = shape;
        Ok(Parsed {
            document: JsonDocument(value),
            units,
            source_lang: None,
            target_lang,
            document_format: format!("json ({})", shape),
        })
    }

    fn update_unit(&self, document: &mut JsonDocument, id: &str, target: &str) -> UpdateOutcome {
        let written = match self.shape {
            JsonShape::Flat => insert_literal(&mut document.0, id, target),
            JsonShape::Wrapped => document
                .0
                .get_mut("translations")
                .and_then(|translations| insert_literal(translations, id, target)),
            JsonShape::Nested => write_path(&mut document.0, id, target),
        };
        match written {
            Some(()) => UpdateOutcome::Applied,
            None => {
                tracing::warn!(event = "json_path_blocked", shape = %self.shape, id);
                UpdateOutcome::MissingAnchor
            }
        }
    }

    fn serialize(&self, document: &JsonDocument) -> Result<String, Error> {
        serde_json::to_string_pretty(&document.0).map_err(Error::Parse)
    }

    fn features(&self) -> Features {
        Features {
            has_source: false,
            has_notes: false,
        }
    }

    fn supported_export_formats(&self) -> Vec<ExportFormat> {
        match self.shape {
            JsonShape::Nested => vec![
                ExportFormat::Json(JsonShape::Nested),
                ExportFormat::Json(JsonShape::Flat),
            ],
            JsonShape::Wrapped => vec![ExportFormat::Json(JsonShape::Wrapped)],
            JsonShape::Flat => vec![ExportFormat::Json(JsonShape::Flat)],
        }
    }
}

/// Builds fresh JSON of the requested shape from the canonical units.
///
/// Anything the original JSON carried beyond id/target pairs is not reproduced.
///
/// # Example
/// ```rust
/// use xlfedit::{TranslationUnit, formats::{JsonShape, generate_export}};
/// let units = vec![TranslationUnit::new("menu.open", "", "Öffnen")];
/// let json = generate_export(&units, JsonShape::Nested, None)?;
/// let value: serde_json::Value = serde_json::from_str(&json)?;
/// assert_eq!(value["menu"]["open"], "Öffnen");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn generate_export(
    units: &[TranslationUnit],
    shape: JsonShape,
    locale: Option<&str>,
) -> Result<String, Error> {
    let flat = || {
        units
            .iter()
            .map(|u| (u.id.clone(), Value::String(u.target.clone())))
            .collect::<Map<String, Value>>()
    };

    let output = match shape {
        JsonShape::Flat => Value::Object(flat()),
        JsonShape::Wrapped => {
            let mut wrapper = Map::new();
            wrapper.insert(
                "locale".to_string(),
                Value::String(locale.unwrap_or_default().to_string()),
            );
            wrapper.insert("translations".to_string(), Value::Object(flat()));
            Value::Object(wrapper)
        }
        JsonShape::Nested => {
            let mut root = Value::Object(Map::new());
            for unit in units {
                // A fresh tree only holds objects, so every path is writable.
                let _ = write_path(&mut root, &unit.id, &unit.target);
            }
            root
        }
    };

    serde_json::to_string_pretty(&output).map_err(Error::Parse)
}

fn detect_shape(map: &Map<String, Value>) -> JsonShape {
    if matches!(map.get("translations"), Some(Value::Object(_))) {
        JsonShape::Wrapped
    } else if map.values().any(is_container) {
        JsonShape::Nested
    } else {
        JsonShape::Flat
    }
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, units: &mut Vec<TranslationUnit>) {
    for (key, value) in map {
        flatten_value(value, &join_key(prefix, key), units);
    }
}

fn flatten_value(value: &Value, id: &str, units: &mut Vec<TranslationUnit>) {
    match value {
        Value::Object(map) => flatten_into(map, id, units),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(item, &join_key(id, &index.to_string()), units);
            }
        }
        Value::String(text) => units.push(TranslationUnit::new(id, "", text.clone())),
        other => units.push(TranslationUnit::new(id, "", other.to_string())),
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Sets `map[id]` without interpreting dots in `id`.
fn insert_literal(container: &mut Value, id: &str, target: &str) -> Option<()> {
    container
        .as_object_mut()?
        .insert(id.to_string(), Value::String(target.to_string()));
    Some(())
}

/// Walks `id` split on `.`, creating objects along the way and replacing scalars that sit
/// where an object is needed. Existing arrays are entered by index; `None` when an index
/// does not exist.
fn write_path(root: &mut Value, id: &str, target: &str) -> Option<()> {
    let keys: Vec<&str> = id.split('.').collect();
    let (last, parents) = keys.split_last()?;

    let mut current = root;
    for key in parents {
        let slot = child_slot(current, key)?;
        if !is_container(slot) {
            *slot = Value::Object(Map::new());
        }
        current = slot;
    }
    *child_slot(current, last)? = Value::String(target.to_string());
    Some(())
}

fn child_slot<'a>(container: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match container {
        Value::Object(map) => Some(map.entry(key.to_string()).or_insert(Value::Null)),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(content: &str) -> (JsonDialect, Parsed<JsonDocument>) {
        let mut dialect = JsonDialect::default();
        let parsed = dialect.parse(content).unwrap();
        (dialect, parsed)
    }

    #[test]
    fn test_can_parse_only_objects() {
        let dialect = JsonDialect::default();
        assert!(dialect.can_parse(r#"{"a":"b"}"#));
        assert!(dialect.can_parse("{}"));
        assert!(!dialect.can_parse("[1,2]"));
        assert!(!dialect.can_parse("null"));
        assert!(!dialect.can_parse("\"text\""));
        assert!(!dialect.can_parse("{not json"));
        assert!(!dialect.can_parse("<xliff/>"));
    }

    #[test]
    fn test_detect_flat() {
        let (dialect, parsed) = parse(r#"{"a.b":"v1","c":"v2"}"#);
        assert_eq!(parsed.document_format, "json (flat)");
        assert_eq!(dialect.shape(), JsonShape::Flat);
        assert_eq!(parsed.units.len(), 2);
        assert_eq!(parsed.units[0].id, "a.b");
        assert_eq!(parsed.units[0].source, "");
        assert_eq!(parsed.units[1].target, "v2");
    }

    #[test]
    fn test_detect_nested() {
        let (dialect, parsed) = parse(r#"{"a":{"b":"v1"},"c":"v2"}"#);
        assert_eq!(parsed.document_format, "json (nested)");
        let ids: Vec<&str> = parsed.units.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["a.b", "c"]);
        assert_eq!(
            dialect.supported_export_formats(),
            vec![
                ExportFormat::Json(JsonShape::Nested),
                ExportFormat::Json(JsonShape::Flat)
            ]
        );
    }

    #[test]
    fn test_detect_wrapped_with_locale() {
        let (dialect, parsed) =
            parse(r#"{"locale":"fr","translations":{"a.b":"v1","menu":{"open":"Ouvrir"}}}"#);
        assert_eq!(parsed.document_format, "json (wrapped)");
        assert_eq!(parsed.target_lang.as_deref(), Some("fr"));
        let ids: Vec<&str> = parsed.units.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["a.b", "menu.open"]);
        assert_eq!(
            dialect.supported_export_formats(),
            vec![ExportFormat::Json(JsonShape::Wrapped)]
        );
    }

    #[test]
    fn test_scalars_and_arrays_become_units() {
        let (_, parsed) = parse(r#"{"count":3,"flag":true,"nothing":null,"list":["x","y"]}"#);
        let pairs: Vec<(&str, &str)> = parsed
            .units
            .iter()
            .map(|u| (u.id.as_str(), u.target.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("count", "3"),
                ("flag", "true"),
                ("nothing", "null"),
                ("list.0", "x"),
                ("list.1", "y"),
            ]
        );
    }

    #[test]
    fn test_flat_update_keeps_dotted_key_literal() {
        let (dialect, mut parsed) = parse(r#"{"a.b":"v1","c":"v2"}"#);
        assert_eq!(
            dialect.update_unit(&mut parsed.document, "a.b", "new"),
            UpdateOutcome::Applied
        );
        let out: Value =
            serde_json::from_str(&dialect.serialize(&parsed.document).unwrap()).unwrap();
        assert_eq!(out, json!({"a.b": "new", "c": "v2"}));
        assert!(out.get("a").is_none());
    }

    #[test]
    fn test_nested_update_walks_path() {
        let (dialect, mut parsed) = parse(r#"{"a":{"b":"v1"}}"#);
        dialect.update_unit(&mut parsed.document, "a.b", "new");
        assert_eq!(parsed.document.as_value(), &json!({"a": {"b": "new"}}));
    }

    #[test]
    fn test_nested_update_replaces_scalar_on_path() {
        let (dialect, mut parsed) = parse(r#"{"a":"leaf","x":{"y":"1"}}"#);
        dialect.update_unit(&mut parsed.document, "a.b.c", "deep");
        assert_eq!(
            parsed.document.as_value(),
            &json!({"a": {"b": {"c": "deep"}}, "x": {"y": "1"}})
        );
    }

    #[test]
    fn test_nested_update_enters_arrays_by_index() {
        let (dialect, mut parsed) = parse(r#"{"list":["x","y"]}"#);
        assert_eq!(
            dialect.update_unit(&mut parsed.document, "list.1", "z"),
            UpdateOutcome::Applied
        );
        assert_eq!(parsed.document.as_value(), &json!({"list": ["x", "z"]}));
        assert_eq!(
            dialect.update_unit(&mut parsed.document, "list.7", "q"),
            UpdateOutcome::MissingAnchor
        );
    }

    #[test]
    fn test_wrapped_update_keeps_dotted_key_literal() {
        let (dialect, mut parsed) = parse(r#"{"translations":{"a.b":"v1"}}"#);
        dialect.update_unit(&mut parsed.document, "a.b", "new");
        assert_eq!(
            parsed.document.as_value(),
            &json!({"translations": {"a.b": "new"}})
        );
    }

    #[test]
    fn test_serialize_preserves_key_order_and_indent() {
        let (dialect, parsed) = parse(r#"{"z":"1","a":"2"}"#);
        assert_eq!(
            dialect.serialize(&parsed.document).unwrap(),
            "{\n  \"z\": \"1\",\n  \"a\": \"2\"\n}"
        );
    }

    #[test]
    fn test_generate_export_shapes() {
        let units = vec![
            TranslationUnit::new("a.b", "s1", "t1"),
            TranslationUnit::new("c", "s2", "t2"),
        ];

        let flat: Value =
            serde_json::from_str(&generate_export(&units, JsonShape::Flat, None).unwrap()).unwrap();
        assert_eq!(flat, json!({"a.b": "t1", "c": "t2"}));

        let nested: Value =
            serde_json::from_str(&generate_export(&units, JsonShape::Nested, None).unwrap())
                .unwrap();
        assert_eq!(nested, json!({"a": {"b": "t1"}, "c": "t2"}));

        let wrapped: Value = serde_json::from_str(
            &generate_export(&units, JsonShape::Wrapped, Some("en-US")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            wrapped,
            json!({"locale": "en-US", "translations": {"a.b": "t1", "c": "t2"}})
        );
    }

    #[test]
    fn test_generate_wrapped_without_locale() {
        let units = vec![TranslationUnit::new("k", "", "v")];
        let wrapped: Value =
            serde_json::from_str(&generate_export(&units, JsonShape::Wrapped, None).unwrap())
                .unwrap();
        assert_eq!(wrapped["locale"], "");
    }

    #[test]
    fn test_parse_errors() {
        let mut dialect = JsonDialect::default();
        assert!(matches!(
            dialect.parse("{oops"),
            Err(Error::MalformedInput(_))
        ));
        assert!(matches!(
            dialect.parse("[1]"),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
