//! DOM to ArchieML text rendering.
//!
//! Produces plain text with one line per paragraph, heading or list item.
//! Links survive as inline `<a href="...">...</a>` markers; every other piece
//! of markup is flattened or dropped.

use super::dom::{Element, Node};
use super::link::normalize_href;

/// How a node contributes to the rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// Character data, emitted verbatim.
    Text,
    /// `span`, `ul`, `ol`: children only.
    Container,
    /// `p`, `h1`..`h6`: children, then a newline.
    Block,
    /// `li`: `* `, children, then a newline.
    ListItem,
    /// `a`: children wrapped in an `<a href>` marker, or nothing without `href`.
    Anchor,
    /// Anything else: dropped along with its children.
    Unhandled,
}

impl TagKind {
    /// Classify a node.
    pub fn of(node: &Node) -> Self {
        match node {
            Node::Text(_) => Self::Text,
            Node::Element(element) => Self::for_tag(&element.tag),
        }
    }

    /// Classify an element by tag name.
    pub fn for_tag(tag: &str) -> Self {
        match tag {
            "span" | "ul" | "ol" => Self::Container,
            "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Self::Block,
            "li" => Self::ListItem,
            "a" => Self::Anchor,
            _ => Self::Unhandled,
        }
    }
}

/// Render a single node.
pub fn render(node: &Node) -> String {
    let mut out = String::new();
    render_into(node, &mut out);
    out
}

/// Render the children of `element` without any markup of its own.
///
/// This is the entry point for a document body.
pub fn render_children(element: &Element) -> String {
    let mut out = String::new();
    children_into(element, &mut out);
    out
}

fn render_into(node: &Node, out: &mut String) {
    let element = match node {
        Node::Text(data) => {
            out.push_str(data);
            return;
        }
        Node::Element(element) => element,
    };

    match TagKind::for_tag(&element.tag) {
        TagKind::Container => children_into(element, out),
        TagKind::Block => {
            children_into(element, out);
            out.push('\n');
        }
        TagKind::ListItem => {
            out.push_str("* ");
            children_into(element, out);
            out.push('\n');
        }
        TagKind::Anchor => {
            // The link text goes too when there is nowhere to point it.
            let Some(href) = element.attr("href") else {
                return;
            };
            out.push_str("<a href=\"");
            out.push_str(&normalize_href(href));
            out.push_str("\">");
            children_into(element, out);
            out.push_str("</a>");
        }
        TagKind::Text | TagKind::Unhandled => {}
    }
}

fn children_into(element: &Element, out: &mut String) {
    for child in &element.children {
        render_into(child, out);
    }
}
