//! Support for XLIFF 2.0 documents.
//!
//! Units are `<unit>` elements whose text lives in a nested `<segment>`. Notes come from
//! `<notes><note category="...">`; the `location` category is treated as a source reference.
//!
//! Edits need an existing `<segment>`: segments are never synthesized, and a unit without
//! one is reported as [`UpdateOutcome::MissingAnchor`] instead of being silently dropped.

use crate::{
    error::Error,
    formats::{
        ExportFormat,
        xliff12::{ensure_target, find_by_id, non_empty},
    },
    traits::Dialect,
    types::{Features, Note, Parsed, TranslationUnit, UpdateOutcome},
    xml_tree::{NodeId, XmlTree},
};

/// Version marker every XLIFF 2.0 document carries on its root element.
pub const VERSION_MARKER: &str = r#"version="2.0""#;

/// Presentation attribute written by the tool chain whose XLIFF 2.0 output we accept
/// without further hints.
pub const PRESENTATION_MARKER: &str = r#"presentation="libRExo""#;

#[derive(Debug, Default, Clone, Copy)]
pub struct Xliff2Dialect;

impl Dialect for Xliff2Dialect {
    type Document = XmlTree;

    /// Requires both markers so other XML dialects that merely say `version="2.0"` are not
    /// claimed here. The registry falls back to this dialect on its own.
    fn can_parse(&self, content: &str) -> bool {
        content.contains(VERSION_MARKER) && content.contains(PRESENTATION_MARKER)
    }

    fn parse(&mut self, content: &str) -> Result<Parsed<XmlTree>, Error> {
        let tree = XmlTree::parse(content)?;
        let root = tree.root();

        let xliff = if tree.is_element(root, "xliff") {
            Some(root)
        } else {
            tree.first_descendant(root, "xliff")
        };
        let source_lang = xliff.and_then(|x| non_empty(tree.attribute(x, "srcLang")));
        let target_lang = xliff.and_then(|x| non_empty(tree.attribute(x, "trgLang")));

        let units = tree
            .descendants(root, "unit")
            .into_iter()
            .map(|node| read_unit(&tree, node))
            .collect();

        Ok(Parsed {
            document: tree,
            units,
            source_lang,
            target_lang,
            document_format: "xliff 2.0".to_string(),
        })
    }

    fn update_unit(&self, document: &mut XmlTree, id: &str, target: &str) -> UpdateOutcome {
        let Some(unit) = find_by_id(document, "unit", id) else {
            tracing::warn!(event = "unit_not_found", dialect = "xliff 2.0", id);
            return UpdateOutcome::UnitNotFound;
        };
        let Some(segment) = document.first_descendant(unit, "segment") else {
            tracing::warn!(
                event = "missing_segment",
                dialect = "xliff 2.0",
                id,
                "unit has no <segment>; edit not written to the document"
            );
            return UpdateOutcome::MissingAnchor;
        };
        let target_node = ensure_target(document, segment);
        document.set_text_content(target_node, target);
        UpdateOutcome::Applied
    }

    fn serialize(&self, document: &XmlTree) -> Result<String, Error> {
        document.serialize()
    }

    fn features(&self) -> Features {
        Features {
            has_source: true,
            has_notes: true,
        }
    }

    fn supported_export_formats(&self) -> Vec<ExportFormat> {
        vec![ExportFormat::Xml]
    }
}

fn read_unit(tree: &XmlTree, node: NodeId) -> TranslationUnit {
    let segment = tree.first_descendant(node, "segment");
    let text_of = |name: &str| {
        segment
            .and_then(|s| tree.first_child_element(s, name))
            .map(|n| tree.text_content(n))
            .unwrap_or_default()
    };
    let source = text_of("source");
    let target = text_of("target");
    let state = segment.and_then(|s| non_empty(tree.attribute(s, "state")));

    let notes: Vec<Note> = tree
        .child_elements(node, "notes")
        .flat_map(|notes| tree.child_elements(notes, "note"))
        .map(|note| {
            let content = tree.text_content(note);
            match non_empty(tree.attribute(note, "category")) {
                Some(category) if category == "location" => Note::Location {
                    content,
                    source_file: None,
                    line_number: None,
                    category: Some(category),
                    purpose: None,
                },
                category => Note::Comment {
                    content,
                    from: None,
                    priority: None,
                    category,
                },
            }
        })
        .collect();

    TranslationUnit {
        id: tree.attribute(node, "id").unwrap_or_default(),
        source,
        target,
        state,
        notes: (!notes.is_empty()).then_some(notes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" srcLang="en" trgLang="de" presentation="libRExo">
          <file id="ngi18n" original="ng.template">
            <unit id="greeting">
              <notes>
                <note category="location">src/app/app.component.html:3</note>
                <note category="description">Greeting on the landing page</note>
                <note>Uncategorised</note>
              </notes>
              <segment state="translated">
                <source>Hello</source>
                <target>Hallo</target>
              </segment>
            </unit>
            <unit id="farewell">
              <segment>
                <source>Goodbye</source>
              </segment>
            </unit>
            <unit id="orphan">
              <notes>
                <note category="description">No segment here</note>
              </notes>
            </unit>
          </file>
        </xliff>
    "#};

    #[test]
    fn test_can_parse_requires_both_markers() {
        let dialect = Xliff2Dialect;
        assert!(dialect.can_parse(SAMPLE));
        assert!(!dialect.can_parse(r#"<xliff version="2.0" srcLang="en"></xliff>"#));
        assert!(!dialect.can_parse(r#"<xliff presentation="libRExo"></xliff>"#));
    }

    #[test]
    fn test_parse_units_notes_and_languages() {
        let parsed = Xliff2Dialect.parse(SAMPLE).unwrap();
        assert_eq!(parsed.document_format, "xliff 2.0");
        assert_eq!(parsed.source_lang.as_deref(), Some("en"));
        assert_eq!(parsed.target_lang.as_deref(), Some("de"));
        assert_eq!(parsed.units.len(), 3);

        let greeting = &parsed.units[0];
        assert_eq!(greeting.source, "Hello");
        assert_eq!(greeting.target, "Hallo");
        assert_eq!(greeting.state.as_deref(), Some("translated"));
        let notes = greeting.notes.as_ref().unwrap();
        assert_eq!(notes.len(), 3);
        assert!(matches!(
            &notes[0],
            Note::Location { content, category: Some(c), .. }
                if content == "src/app/app.component.html:3" && c == "location"
        ));
        assert!(matches!(
            &notes[1],
            Note::Comment { category: Some(c), .. } if c == "description"
        ));
        assert!(matches!(&notes[2], Note::Comment { category: None, .. }));

        let orphan = &parsed.units[2];
        assert_eq!(orphan.source, "");
        assert_eq!(orphan.target, "");
    }

    #[test]
    fn test_update_inserts_target_inside_segment() {
        let mut dialect = Xliff2Dialect;
        let mut parsed = dialect.parse(SAMPLE).unwrap();
        let outcome = dialect.update_unit(&mut parsed.document, "farewell", "Auf Wiedersehen");
        assert_eq!(outcome, UpdateOutcome::Applied);

        let xml = dialect.serialize(&parsed.document).unwrap();
        assert!(xml.contains("<source>Goodbye</source><target>Auf Wiedersehen</target>"));
        assert!(xml.contains(r#"<note category="location">src/app/app.component.html:3</note>"#));
        let reparsed = dialect.parse(&xml).unwrap();
        assert_eq!(reparsed.units[1].target, "Auf Wiedersehen");
    }

    #[test]
    fn test_update_existing_target_keeps_segment_attributes() {
        let mut dialect = Xliff2Dialect;
        let mut parsed = dialect.parse(SAMPLE).unwrap();
        dialect.update_unit(&mut parsed.document, "greeting", "Servus");
        let xml = dialect.serialize(&parsed.document).unwrap();
        assert!(xml.contains(r#"<segment state="translated">"#));
        assert!(xml.contains("<target>Servus</target>"));
        assert_eq!(xml.replace("Servus", "Hallo"), SAMPLE);
    }

    #[test]
    fn test_update_without_segment_is_an_observable_no_op() {
        let mut dialect = Xliff2Dialect;
        let mut parsed = dialect.parse(SAMPLE).unwrap();
        let outcome = dialect.update_unit(&mut parsed.document, "orphan", "x");
        assert_eq!(outcome, UpdateOutcome::MissingAnchor);
        assert_eq!(dialect.serialize(&parsed.document).unwrap(), SAMPLE);
    }

    #[test]
    fn test_update_unknown_unit() {
        let mut dialect = Xliff2Dialect;
        let mut parsed = dialect.parse(SAMPLE).unwrap();
        assert_eq!(
            dialect.update_unit(&mut parsed.document, "nope", "x"),
            UpdateOutcome::UnitNotFound
        );
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        let xml = r#"<xliff version="2.0" presentation="libRExo"><file><unit id="a"></file></xliff>"#;
        assert!(matches!(
            Xliff2Dialect.parse(xml),
            Err(Error::MalformedInput(_))
        ));
    }
}
