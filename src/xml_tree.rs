//! A small mutable XML document model built on `quick-xml` events.
//!
//! Nodes live in an arena and keep the raw event they were read from, so anything the
//! editor does not touch (declaration, comments, attribute quoting, entity references,
//! whitespace) is written back exactly as it was read. Detached nodes stay in the arena
//! and are simply never reached again.

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesCData, BytesDecl, BytesPI, BytesStart, BytesText, Event},
};

use crate::error::Error;

/// Index of a node inside an [`XmlTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        start: BytesStart<'static>,
        /// Read as `<tag/>`; only written that way while it has no children.
        self_closing: bool,
    },
    Text(BytesText<'static>),
    CData(BytesCData<'static>),
    Comment(BytesText<'static>),
    Decl(BytesDecl<'static>),
    PI(BytesPI<'static>),
    DocType(BytesText<'static>),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed, editable XML document.
#[derive(Debug, Clone)]
pub struct XmlTree {
    nodes: Vec<Node>,
    /// Prolog, root element and epilog, in document order.
    top_level: Vec<NodeId>,
    root: NodeId,
}

impl XmlTree {
    /// Parses a complete document, rejecting anything that is not well-formed.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let mut reader = Reader::from_str(content);
        let mut builder = TreeBuilder::default();

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::malformed(format!("{} (at byte {})", e, reader.error_position()))
            })?;
            match event {
                Event::Start(e) => {
                    check_attributes(&e)?;
                    let id = builder.attach(NodeKind::Element {
                        start: e.into_owned(),
                        self_closing: false,
                    })?;
                    builder.open.push(id);
                }
                Event::Empty(e) => {
                    check_attributes(&e)?;
                    builder.attach(NodeKind::Element {
                        start: e.into_owned(),
                        self_closing: true,
                    })?;
                }
                Event::End(e) => {
                    if builder.open.pop().is_none() {
                        return Err(Error::malformed(format!(
                            "unexpected closing tag `{}`",
                            String::from_utf8_lossy(e.name().as_ref())
                        )));
                    }
                }
                Event::Text(e) => {
                    e.unescape()
                        .map_err(|err| Error::malformed(format!("invalid text: {}", err)))?;
                    if builder.open.is_empty() && !e.iter().all(u8::is_ascii_whitespace) {
                        return Err(Error::malformed("text outside of the root element"));
                    }
                    builder.attach(NodeKind::Text(e.into_owned()))?;
                }
                Event::CData(e) => {
                    if builder.open.is_empty() {
                        return Err(Error::malformed("CDATA outside of the root element"));
                    }
                    builder.attach(NodeKind::CData(e.into_owned()))?;
                }
                Event::Comment(e) => {
                    builder.attach(NodeKind::Comment(e.into_owned()))?;
                }
                Event::Decl(e) => {
                    builder.attach(NodeKind::Decl(e.into_owned()))?;
                }
                Event::PI(e) => {
                    builder.attach(NodeKind::PI(e.into_owned()))?;
                }
                Event::DocType(e) => {
                    builder.attach(NodeKind::DocType(e.into_owned()))?;
                }
                Event::Eof => break,
            }
        }

        builder.finish()
    }

    /// Renders the whole document back to text.
    pub fn serialize(&self) -> Result<String, Error> {
        let mut writer = Writer::new(Vec::new());
        for &id in &self.top_level {
            self.write_node(&mut writer, id)?;
        }
        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::malformed(format!("serialized document is not UTF-8: {}", e)))
    }

    /// The document element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `id` is an element with the given local name (namespace prefix ignored).
    pub fn is_element(&self, id: NodeId, local_name: &str) -> bool {
        match &self.node(id).kind {
            NodeKind::Element { start, .. } => start.local_name().as_ref() == local_name.as_bytes(),
            _ => false,
        }
    }

    /// Namespace prefix of an element, e.g. `Some("x")` for `<x:xliff>`.
    pub fn prefix(&self, id: NodeId) -> Option<String> {
        match &self.node(id).kind {
            NodeKind::Element { start, .. } => start
                .name()
                .prefix()
                .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned()),
            _ => None,
        }
    }

    /// Unescaped value of an attribute, matched on its full (possibly prefixed) name.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        match &self.node(id).kind {
            NodeKind::Element { start, .. } => start
                .try_get_attribute(name)
                .ok()
                .flatten()
                .and_then(|attr| attr.unescape_value().ok())
                .map(|value| value.into_owned()),
            _ => None,
        }
    }

    /// Direct children of `id` that are elements named `local_name`.
    pub fn child_elements<'a>(
        &'a self,
        id: NodeId,
        local_name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(move |&child| self.is_element(child, local_name))
    }

    pub fn first_child_element(&self, id: NodeId, local_name: &str) -> Option<NodeId> {
        self.child_elements(id, local_name).next()
    }

    /// All elements named `local_name` below `id`, in document order.
    pub fn descendants(&self, id: NodeId, local_name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut pending: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(current) = pending.pop() {
            if self.is_element(current, local_name) {
                found.push(current);
            }
            pending.extend(self.node(current).children.iter().rev().copied());
        }
        found
    }

    pub fn first_descendant(&self, id: NodeId, local_name: &str) -> Option<NodeId> {
        self.descendants(id, local_name).into_iter().next()
    }

    /// Concatenated, unescaped text of every text and CDATA node below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    /// Creates a detached element. Attach it with [`Self::insert_after`] or [`Self::append_child`].
    pub fn create_element(&mut self, qualified_name: &str) -> NodeId {
        self.push_node(
            NodeKind::Element {
                start: BytesStart::new(qualified_name.to_string()),
                self_closing: false,
            },
            None,
        )
    }

    /// Inserts `new` into `parent` directly after `reference`, or at the end when
    /// `reference` is not a child of `parent`.
    pub fn insert_after(&mut self, parent: NodeId, reference: NodeId, new: NodeId) {
        let position = self
            .node(parent)
            .children
            .iter()
            .position(|&c| c == reference)
            .map(|i| i + 1);
        match position {
            Some(index) => {
                self.open_element(parent);
                self.nodes[new.0].parent = Some(parent);
                self.nodes[parent.0].children.insert(index, new);
            }
            None => self.append_child(parent, new),
        }
    }

    pub fn append_child(&mut self, parent: NodeId, new: NodeId) {
        self.open_element(parent);
        self.nodes[new.0].parent = Some(parent);
        self.nodes[parent.0].children.push(new);
    }

    /// Replaces all children of `id` with a single text node holding `text`.
    /// Only `<`, `>` and `&` are escaped; quotes are left as typed.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let old = std::mem::take(&mut self.nodes[id.0].children);
        for child in old {
            self.nodes[child.0].parent = None;
        }
        self.open_element(id);
        if !text.is_empty() {
            let text_node = self.push_node(
                NodeKind::Text(BytesText::from_escaped(partial_escape(text).into_owned())),
                Some(id),
            );
            self.nodes[id.0].children.push(text_node);
        }
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn push_node(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        id
    }

    fn open_element(&mut self, id: NodeId) {
        if let NodeKind::Element { self_closing, .. } = &mut self.nodes[id.0].kind {
            *self_closing = false;
        }
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for &child in &self.node(id).children {
            match &self.node(child).kind {
                NodeKind::Text(text) => match text.unescape() {
                    Ok(value) => out.push_str(&value),
                    Err(_) => out.push_str(&String::from_utf8_lossy(text)),
                },
                NodeKind::CData(data) => out.push_str(&String::from_utf8_lossy(data)),
                NodeKind::Element { .. } => self.collect_text(child, out),
                _ => {}
            }
        }
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<(), Error> {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Element {
                start,
                self_closing,
            } => {
                if *self_closing && node.children.is_empty() {
                    writer.write_event(Event::Empty(start.borrow()))?;
                } else {
                    writer.write_event(Event::Start(start.borrow()))?;
                    for &child in &node.children {
                        self.write_node(writer, child)?;
                    }
                    writer.write_event(Event::End(start.to_end()))?;
                }
            }
            NodeKind::Text(text) => writer.write_event(Event::Text(text.clone()))?,
            NodeKind::CData(data) => writer.write_event(Event::CData(data.clone()))?,
            NodeKind::Comment(text) => writer.write_event(Event::Comment(text.clone()))?,
            NodeKind::Decl(decl) => writer.write_event(Event::Decl(decl.clone()))?,
            NodeKind::PI(pi) => writer.write_event(Event::PI(pi.clone()))?,
            NodeKind::DocType(text) => writer.write_event(Event::DocType(text.clone()))?,
        }
        Ok(())
    }
}

#[derive(Default)]
struct TreeBuilder {
    nodes: Vec<Node>,
    top_level: Vec<NodeId>,
    open: Vec<NodeId>,
    root: Option<NodeId>,
}

impl TreeBuilder {
    fn attach(&mut self, kind: NodeKind) -> Result<NodeId, Error> {
        let id = NodeId(self.nodes.len());
        let parent = self.open.last().copied();
        let is_element = matches!(kind, NodeKind::Element { .. });
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => {
                if is_element {
                    if self.root.is_some() {
                        return Err(Error::malformed("more than one root element"));
                    }
                    self.root = Some(id);
                }
                self.top_level.push(id);
            }
        }
        Ok(id)
    }

    fn finish(self) -> Result<XmlTree, Error> {
        if let Some(&unclosed) = self.open.last() {
            let name = match &self.nodes[unclosed.0].kind {
                NodeKind::Element { start, .. } => {
                    String::from_utf8_lossy(start.name().as_ref()).into_owned()
                }
                _ => String::new(),
            };
            return Err(Error::malformed(format!("unclosed element `{}`", name)));
        }
        let root = self
            .root
            .ok_or_else(|| Error::malformed("document has no root element"))?;
        Ok(XmlTree {
            nodes: self.nodes,
            top_level: self.top_level,
            root,
        })
    }
}

fn check_attributes(start: &BytesStart) -> Result<(), Error> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::malformed(format!("invalid attribute: {}", e)))?;
        attr.unescape_value()
            .map_err(|e| Error::malformed(format!("invalid attribute value: {}", e)))?;
    }
    Ok(())
}
