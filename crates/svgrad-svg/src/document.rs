//! Owned SVG document tree
//!
//! A minimal mutable element tree for the patcher to work on. Parsing goes
//! through roxmltree; the read-only parse tree is converted into owned nodes
//! so gradients can be inserted and paint attributes rewritten in place.

use crate::error::SvgError;
use indexmap::IndexMap;

/// A child of an element: nested element or text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Nested element
    Element(Element),
    /// Text content (whitespace-only runs are dropped at parse time)
    Text(String),
}

/// One element: tag name, ordered attributes, children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name (with prefix where the source had one)
    pub name: String,
    /// Attributes in document order
    pub attributes: IndexMap<String, String>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl Element {
    /// Empty element with the given tag name.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Attribute value by name.
    #[inline]
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set (or overwrite) an attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Builder-style [`set_attr`](Self::set_attr).
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Append a child element.
    pub fn push_element(&mut self, child: Element) {
        self.children.push(XmlNode::Element(child));
    }

    /// Child elements (text runs skipped).
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// Mutable child elements (text runs skipped).
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// Whether the whitespace-separated `class` attribute contains `class_name`.
    #[must_use]
    pub fn has_class(&self, class_name: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }

    /// One-line rendering for log output, children elided.
    #[must_use]
    pub fn snippet(&self) -> String {
        let mut out = String::new();
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attributes {
            out.push_str(&format!(" {k}=\"{}\"", escape_attr(v)));
        }
        if self.children.is_empty() {
            out.push_str("/>");
        } else {
            out.push_str(&format!(">…</{}>", self.name));
        }
        out
    }

    fn write_xml(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attributes {
            out.push_str(&format!(" {k}=\"{}\"", escape_attr(v)));
        }
        if self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }
        // Text-only elements stay on one line.
        if self.children.iter().all(|n| matches!(n, XmlNode::Text(_))) {
            out.push('>');
            for node in &self.children {
                if let XmlNode::Text(text) = node {
                    out.push_str(&escape_text(text));
                }
            }
            out.push_str(&format!("</{}>\n", self.name));
            return;
        }
        out.push_str(">\n");
        for node in &self.children {
            match node {
                XmlNode::Element(el) => el.write_xml(out, depth + 1),
                XmlNode::Text(text) => {
                    out.push_str(&"  ".repeat(depth + 1));
                    out.push_str(&escape_text(text));
                    out.push('\n');
                }
            }
        }
        out.push_str(&format!("{indent}</{}>\n", self.name));
    }
}

/// An in-memory SVG document, owned by one request's pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    root: Element,
}

impl SvgDocument {
    /// Parse SVG text into an owned tree.
    ///
    /// Fails with [`SvgError::MalformedDocument`] on XML errors or when the
    /// root element is not `<svg>`.
    pub fn parse(text: &str) -> Result<Self, SvgError> {
        let doc = roxmltree::Document::parse(text)
            .map_err(|e| SvgError::MalformedDocument(e.to_string()))?;
        let root_node = doc.root_element();
        if root_node.tag_name().name() != "svg" {
            return Err(SvgError::MalformedDocument(format!(
                "root element is <{}>, expected <svg>",
                root_node.tag_name().name()
            )));
        }
        let mut root = convert(root_node);
        // roxmltree strips namespace declarations from the attribute list;
        // re-attach the default namespace so serialization round-trips.
        if let Some(ns) = root_node.lookup_namespace_uri(None) {
            if root.attr("xmlns").is_none() {
                root.set_attr("xmlns", ns);
            }
        }
        Ok(Self { root })
    }

    /// Root `<svg>` element.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable root element.
    #[inline]
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// The `<defs>` container, created right after the root opening tag when
    /// absent.
    pub fn defs_mut(&mut self) -> &mut Element {
        let existing = self.root.children.iter().position(
            |n| matches!(n, XmlNode::Element(el) if el.name == "defs"),
        );
        let index = match existing {
            Some(i) => i,
            None => {
                self.root.children.insert(0, XmlNode::Element(Element::new("defs")));
                0
            }
        };
        match &mut self.root.children[index] {
            XmlNode::Element(el) => el,
            XmlNode::Text(_) => unreachable!("defs index always points at an element"),
        }
    }

    /// First element carrying the given id, if any.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        fn walk<'a>(el: &'a Element, id: &str) -> Option<&'a Element> {
            if el.attr("id") == Some(id) {
                return Some(el);
            }
            el.child_elements().find_map(|c| walk(c, id))
        }
        walk(&self.root, id)
    }

    /// Serialize back to indented SVG text.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.root.write_xml(&mut out, 0);
        out
    }
}

fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    let name = match tag.namespace().and_then(|ns| node.lookup_prefix(ns)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", tag.name()),
        _ => tag.name().to_string(),
    };
    let mut element = Element::new(name);
    for attr in node.attributes() {
        element.set_attr(attr.name(), attr.value());
    }
    for child in node.children() {
        if child.is_element() {
            element.push_element(convert(child));
        } else if child.is_text() {
            let text = child.text().unwrap_or_default().trim();
            if !text.is_empty() {
                element.children.push(XmlNode::Text(text.to_string()));
            }
        }
    }
    element
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
