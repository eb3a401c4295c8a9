//! Read-only DOM built from an html5ever parse.

use std::collections::BTreeMap;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// A DOM node: character data or an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Character data with `&`, `<` and `>` escaped as in the source markup.
    Text(String),
    /// Element with its attributes and children.
    Element(Element),
}

impl Node {
    /// Create a text node.
    pub fn text(data: impl Into<String>) -> Self {
        Self::Text(data.into())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// An element node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Lowercase local tag name (`p`, `span`, `a`, ...).
    pub tag: String,
    /// Attributes by local name.
    pub attrs: BTreeMap<String, String>,
    /// Children in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder: append a child node.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder: append a text child.
    #[must_use]
    pub fn with_text(self, data: impl Into<String>) -> Self {
        self.with_child(Node::text(data))
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Iterate over element children, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }
}

/// Parse an HTML document into its root forest.
///
/// Comments, doctypes and processing instructions are dropped.
pub fn parse_html(html: &str) -> Vec<Node> {
    let opts = ParseOpts::default();
    let dom = parse_document(RcDom::default(), opts).one(html);
    dom.document
        .children
        .borrow()
        .iter()
        .filter_map(convert)
        .collect()
}

/// The document body: second element child of the root element.
///
/// Exports put `<head>` first and `<body>` second under `<html>`.
pub fn document_body(forest: &[Node]) -> Option<&Element> {
    let root = forest.iter().find_map(|node| match node {
        Node::Element(element) => Some(element),
        Node::Text(_) => None,
    })?;
    root.child_elements().nth(1)
}

fn convert(handle: &Handle) -> Option<Node> {
    match &handle.data {
        // Back to source form: the entity pass after rendering decodes exactly once.
        NodeData::Text { contents } => Some(Node::Text(
            html_escape::encode_text(&**contents.borrow()).into_owned(),
        )),
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            let children = handle.children.borrow().iter().filter_map(convert).collect();
            Some(Node::Element(Element {
                tag: name.local.to_string(),
                attrs,
                children,
            }))
        }
        NodeData::Document
        | NodeData::Doctype { .. }
        | NodeData::Comment { .. }
        | NodeData::ProcessingInstruction { .. } => None,
    }
}
