//! Support for XLIFF 1.2 documents.
//!
//! Units are `<trans-unit>` elements. Source references come from
//! `<context-group purpose="location">`, translator notes from `<note>`.
//! Edits are applied to the retained [`XmlTree`], so serialization keeps everything else intact.

use crate::{
    error::Error,
    formats::ExportFormat,
    traits::Dialect,
    types::{Features, Note, Parsed, TranslationUnit, UpdateOutcome},
    xml_tree::{NodeId, XmlTree},
};

/// Namespace URI that identifies an XLIFF 1.2 document.
pub const XLIFF_12_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";

#[derive(Debug, Default, Clone, Copy)]
pub struct Xliff12Dialect;

impl Dialect for Xliff12Dialect {
    type Document = XmlTree;

    fn can_parse(&self, content: &str) -> bool {
        content.contains(XLIFF_12_NAMESPACE)
    }

    fn parse(&mut self, content: &str) -> Result<Parsed<XmlTree>, Error> {
        let tree = XmlTree::parse(content)?;
        let root = tree.root();

        let file = tree.first_descendant(root, "file");
        let source_lang = file.and_then(|f| non_empty(tree.attribute(f, "source-language")));
        let target_lang = file.and_then(|f| non_empty(tree.attribute(f, "target-language")));

        let units = tree
            .descendants(root, "trans-unit")
            .into_iter()
            .map(|node| read_trans_unit(&tree, node))
            .collect();

        Ok(Parsed {
            document: tree,
            units,
            source_lang,
            target_lang,
            document_format: "xliff 1.2".to_string(),
        })
    }

    fn update_unit(&self, document: &mut XmlTree, id: &str, target: &str) -> UpdateOutcome {
        let Some(unit) = find_by_id(document, "trans-unit", id) else {
            tracing::warn!(event = "unit_not_found", dialect = "xliff 1.2", id);
            return UpdateOutcome::UnitNotFound;
        };
        let target_node = ensure_target(document, unit);
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

fn read_trans_unit(tree: &XmlTree, node: NodeId) -> TranslationUnit {
    let source = tree
        .first_child_element(node, "source")
        .map(|s| tree.text_content(s))
        .unwrap_or_default();
    let target_node = tree.first_child_element(node, "target");
    let target = target_node
        .map(|t| tree.text_content(t))
        .unwrap_or_default();
    let state = target_node.and_then(|t| non_empty(tree.attribute(t, "state")));

    let mut notes = Vec::new();

    for group in tree.child_elements(node, "context-group") {
        if tree.attribute(group, "purpose").as_deref() != Some("location") {
            continue;
        }
        let mut source_file = None;
        let mut line_number = None;
        for context in tree.child_elements(group, "context") {
            match tree.attribute(context, "context-type").as_deref() {
                Some("sourcefile") if source_file.is_none() => {
                    source_file = non_empty(Some(tree.text_content(context)));
                }
                Some("linenumber") if line_number.is_none() => {
                    line_number = non_empty(Some(tree.text_content(context)));
                }
                _ => {}
            }
        }
        // A location without a file is not a usable reference.
        let Some(file) = source_file else { continue };
        let content = match &line_number {
            Some(line) => format!("{}:{}", file, line),
            None => file.clone(),
        };
        notes.push(Note::Location {
            content,
            source_file: Some(file),
            line_number,
            category: None,
            purpose: Some("location".to_string()),
        });
    }

    for note in tree.child_elements(node, "note") {
        notes.push(Note::Comment {
            content: tree.text_content(note),
            from: non_empty(tree.attribute(note, "from")),
            priority: tree
                .attribute(note, "priority")
                .and_then(|p| p.trim().parse::<f64>().ok())
                .filter(|p| !p.is_nan() && *p != 0.0),
            category: None,
        });
    }

    TranslationUnit {
        id: tree.attribute(node, "id").unwrap_or_default(),
        source,
        target,
        state,
        notes: (!notes.is_empty()).then_some(notes),
    }
}

/// Linear scan for the first `element` whose `id` attribute equals `id`.
pub(crate) fn find_by_id(tree: &XmlTree, element: &str, id: &str) -> Option<NodeId> {
    tree.descendants(tree.root(), element)
        .into_iter()
        .find(|&node| tree.attribute(node, "id").as_deref() == Some(id))
}

/// Returns the `<target>` child of `container`, creating it right after `<source>`
/// (or at the end) in the document element's namespace when absent.
pub(crate) fn ensure_target(tree: &mut XmlTree, container: NodeId) -> NodeId {
    if let Some(existing) = tree.first_child_element(container, "target") {
        return existing;
    }
    let name = match tree.prefix(tree.root()) {
        Some(prefix) => format!("{}:target", prefix),
        None => "target".to_string(),
    };
    let target = tree.create_element(&name);
    match tree.first_child_element(container, "source") {
        Some(source) => tree.insert_after(container, source, target),
        None => tree.append_child(container, target),
    }
    target
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
