//! Typed HTML tree and serializer.
//!
//! Markup is never built by string concatenation at call sites: assemblers
//! construct a tree of [`Node`]s and a single serializer at the end turns the
//! tree into compact HTML. This keeps escaping in exactly one place.

use std::fmt::Write;

/// Elements that never carry children and are serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// A node in the document tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// An element with attributes and children
    Element(Element),
    /// Text content, escaped on serialization
    Text(String),
    /// Pre-serialized content trusted as-is (stylesheets, script bodies,
    /// the JSON payload). Never built from user-supplied strings.
    Raw(String),
}

impl From<Element> for Node {
    fn from(el: Element) -> Node {
        Node::Element(el)
    }
}

/// An HTML element.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: &'static str,
    /// Attribute name/value pairs in insertion order. An empty value is
    /// serialized as a bare boolean attribute (`hidden`, `required`).
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

/// Shorthand constructor, the usual way assemblers start an element.
pub fn el(tag: &'static str) -> Element {
    Element::new(tag)
}

/// Shorthand for a text node.
pub fn text(content: impl AsRef<str>) -> Node {
    Node::Text(content.as_ref().to_string())
}

impl Element {
    pub fn new(tag: &'static str) -> Element {
        Element {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute. Later writes win over earlier ones with the same name.
    pub fn attr(mut self, name: &'static str, value: impl AsRef<str>) -> Element {
        let value = value.as_ref().to_string();
        if let Some(existing) = self.attrs.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            self.attrs.push((name, value));
        }
        self
    }

    /// Set a boolean attribute (`required`, `hidden`, `selected`).
    pub fn flag(self, name: &'static str) -> Element {
        self.attr(name, "")
    }

    pub fn id(self, value: impl AsRef<str>) -> Element {
        self.attr("id", value)
    }

    /// Append to the `class` attribute (space-separated).
    pub fn class(mut self, value: &str) -> Element {
        if let Some(existing) = self.attrs.iter_mut().find(|(n, _)| *n == "class") {
            existing.1.push(' ');
            existing.1.push_str(value);
            self
        } else {
            self.attr("class", value)
        }
    }

    pub fn child(mut self, node: impl Into<Node>) -> Element {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Element {
        self.children.extend(nodes);
        self
    }

    /// Append a text child.
    pub fn text(self, content: impl AsRef<str>) -> Element {
        self.child(Node::Text(content.as_ref().to_string()))
    }

    /// Serialize this element (and its subtree) to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(&mut out, self);
        out
    }
}

/// Serialize a list of sibling nodes.
pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(el) => write_element(out, el),
        Node::Text(content) => out.push_str(&escape_text(content)),
        Node::Raw(content) => out.push_str(content),
    }
}

fn write_element(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(el.tag);
    for (name, value) in &el.attrs {
        if value.is_empty() {
            let _ = write!(out, " {name}");
        } else {
            let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
        }
    }
    if VOID_ELEMENTS.contains(&el.tag) {
        out.push('>');
        return;
    }
    out.push('>');
    for child in &el.children {
        write_node(out, child);
    }
    let _ = write!(out, "</{}>", el.tag);
}

/// Escape text content: `&`, `<`, `>`.
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute values: text escapes plus `"`.
pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_nested_elements() {
        let tree = el("div")
            .class("outer")
            .child(el("span").text("hi"))
            .to_html();
        assert_eq!(tree, r#"<div class="outer"><span>hi</span></div>"#);
    }

    #[test]
    fn escapes_text_and_attributes() {
        let tree = el("div")
            .attr("title", r#"a"b<c"#)
            .text("x < y & z")
            .to_html();
        assert_eq!(
            tree,
            r#"<div title="a&quot;b&lt;c">x &lt; y &amp; z</div>"#
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let tree = el("input").attr("name", "email").to_html();
        assert_eq!(tree, r#"<input name="email">"#);
    }

    #[test]
    fn boolean_attributes_are_bare() {
        let tree = el("input").flag("required").to_html();
        assert_eq!(tree, "<input required>");
    }

    #[test]
    fn class_appends() {
        let tree = el("div").class("a").class("b").to_html();
        assert_eq!(tree, r#"<div class="a b"></div>"#);
    }

    #[test]
    fn attr_overwrites_same_name() {
        let tree = el("div").attr("data-x", "1").attr("data-x", "2").to_html();
        assert_eq!(tree, r#"<div data-x="2"></div>"#);
    }

    #[test]
    fn raw_nodes_pass_through() {
        let tree = el("style").child(Node::Raw(".a>b{}".into())).to_html();
        assert_eq!(tree, "<style>.a>b{}</style>");
    }
}
