//! A small owned XML node tree built from quick-xml events.
//!
//! Only what inner-XML extraction needs is supported: parsing with XML
//! well-formedness checks, detaching elements by tag name, finding an
//! element, and writing an element's children back out. Markup is kept as
//! it was read, so attribute order, quoting and `<x/>` vs `<x></x>` survive
//! a round trip. The one rewrite is the expansion of entities declared in
//! the document's internal DTD subset.

use std::borrow::Cow;

use quick_xml::events::{BytesCData, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::entity::EntityMap;
use crate::error::{IconError, Result};

// ============================================================================
// Nodes
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Element(Element),
    Text(BytesText<'static>),
    CData(BytesCData<'static>),
    Comment(BytesText<'static>),
    ProcessingInstruction(BytesText<'static>),
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    start: BytesStart<'static>,
    children: Vec<Node>,
    /// Written as `<name/>` in the source.
    self_closing: bool,
}

impl Element {
    fn new(start: BytesStart<'static>, self_closing: bool) -> Self {
        Self {
            start,
            children: Vec::new(),
            self_closing,
        }
    }

    /// Matches on the local name, so `svg:title` counts as `title`.
    pub(crate) fn is_named(&self, name: &str) -> bool {
        self.start.local_name().as_ref() == name.as_bytes()
    }

    fn is_named_any(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.is_named(name))
    }

    /// Serializes the children of this element in document order.
    pub(crate) fn inner_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for child in &self.children {
            write_node(&mut writer, child)?;
        }
        String::from_utf8(writer.into_inner()).map_err(|e| IconError::MalformedSvg(e.to_string()))
    }

    fn find_first(&self, name: &str) -> Option<&Element> {
        if self.is_named(name) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Node::Element(element) => element.find_first(name),
            _ => None,
        })
    }
}

fn remove_named(children: &mut Vec<Node>, names: &[&str]) -> usize {
    let before = children.len();
    children.retain(|node| match node {
        Node::Element(element) => !element.is_named_any(names),
        _ => true,
    });
    let mut removed = before - children.len();

    for node in children.iter_mut() {
        if let Node::Element(element) = node {
            removed += remove_named(&mut element.children, names);
        }
    }
    removed
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    match node {
        Node::Element(element) if element.self_closing => {
            writer.write_event(Event::Empty(element.start.clone()))?;
        }
        Node::Element(element) => {
            writer.write_event(Event::Start(element.start.clone()))?;
            for child in &element.children {
                write_node(writer, child)?;
            }
            writer.write_event(Event::End(element.start.to_end()))?;
        }
        Node::Text(text) => writer.write_event(Event::Text(text.clone()))?,
        Node::CData(data) => writer.write_event(Event::CData(data.clone()))?,
        Node::Comment(comment) => writer.write_event(Event::Comment(comment.clone()))?,
        Node::ProcessingInstruction(pi) => writer.write_event(Event::PI(pi.clone()))?,
    }
    Ok(())
}

// ============================================================================
// XmlTree
// ============================================================================

/// A parsed XML document: its single root element.
///
/// Prolog content (declaration, doctype, comments outside the root) is not
/// kept.
#[derive(Debug, Clone)]
pub(crate) struct XmlTree {
    root: Option<Element>,
}

impl XmlTree {
    /// Parses a document, rejecting anything that is not well-formed XML.
    pub(crate) fn parse(source: &str) -> Result<Self> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let mut reader = Reader::from_str(source);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut entities = EntityMap::default();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| malformed(format!("{} at byte {}", e, reader.buffer_position())))?;

            match event {
                Event::Start(start) => {
                    check_attributes(&start, &entities)?;
                    stack.push(Element::new(entities.expand_start(start), false));
                }
                Event::Empty(start) => {
                    check_attributes(&start, &entities)?;
                    let element = Element::new(entities.expand_start(start), true);
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| malformed("closing tag without a matching opening tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    // Undeclared entities are a well-formedness error in XML
                    text.unescape_with(|name| entities.get(name))?;
                    match stack.last_mut() {
                        Some(parent) => {
                            parent.children.push(Node::Text(entities.expand_text(text)));
                        }
                        None if text.iter().all(u8::is_ascii_whitespace) => {}
                        None => return Err(malformed("text outside the root element")),
                    }
                }
                Event::CData(data) => match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::CData(data.into_owned())),
                    None => return Err(malformed("CDATA outside the root element")),
                },
                Event::Comment(comment) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Comment(comment.into_owned()));
                    }
                }
                Event::PI(pi) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::ProcessingInstruction(pi.into_owned()));
                    }
                }
                Event::DocType(doctype) => {
                    entities = EntityMap::from_doctype(&String::from_utf8_lossy(&doctype));
                }
                Event::Decl(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(malformed(format!(
                "unclosed element <{}>",
                String::from_utf8_lossy(open.start.name().as_ref())
            )));
        }

        match root {
            Some(root) => Ok(Self { root: Some(root) }),
            None => Err(malformed("document has no root element")),
        }
    }

    /// Detaches every element named in `names`, at any depth, together with
    /// its descendants. Returns how many elements were removed.
    pub(crate) fn remove_elements(&mut self, names: &[&str]) -> usize {
        let Some(root) = self.root.as_mut() else {
            return 0;
        };
        if root.is_named_any(names) {
            self.root = None;
            return 1;
        }
        remove_named(&mut root.children, names)
    }

    /// The first element named `name` in document order. When the root
    /// matches, the root is returned and nested matches are ignored.
    pub(crate) fn find_first(&self, name: &str) -> Option<&Element> {
        self.root.as_ref()?.find_first(name)
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(malformed("document has more than one root element"));
    }
    *root = Some(element);
    Ok(())
}

fn check_attributes(start: &BytesStart<'_>, entities: &EntityMap) -> Result<()> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(e.to_string()))?;
        attr.unescape_value_with(|name| entities.get(name))?;
    }
    Ok(())
}

fn malformed(message: impl Into<Cow<'static, str>>) -> IconError {
    IconError::MalformedSvg(message.into().into_owned())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn inner(source: &str, name: &str) -> String {
        XmlTree::parse(source)
            .unwrap()
            .find_first(name)
            .unwrap()
            .inner_xml()
            .unwrap()
    }

    #[test]
    fn preserves_markup_as_written() {
        let source = r#"<svg><rect width="1" x='2' /><g id="a"></g><!-- note --><![CDATA[x < y]]></svg>"#;
        assert_eq!(
            inner(source, "svg"),
            r#"<rect width="1" x='2' /><g id="a"></g><!-- note --><![CDATA[x < y]]>"#
        );
    }

    #[test]
    fn preserves_escaped_text() {
        let source = "<svg><text>a &amp; b &#169;</text></svg>";
        assert_eq!(inner(source, "svg"), "<text>a &amp; b &#169;</text>");
    }

    #[test]
    fn ignores_prolog() {
        let source = "<?xml version=\"1.0\"?>\n<!-- generator -->\n<svg><path/></svg>\n";
        assert_eq!(inner(source, "svg"), "<path/>");
    }

    #[test]
    fn removes_nested_elements() {
        let source = "<svg><title>a</title><g><desc>b</desc><g><title/></g></g></svg>";
        let mut tree = XmlTree::parse(source).unwrap();

        assert_eq!(tree.remove_elements(&["title", "desc"]), 3);
        assert_eq!(tree.find_first("svg").unwrap().inner_xml().unwrap(), "<g><g></g></g>");
    }

    #[test]
    fn matches_prefixed_names() {
        let source = concat!(
            r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg">"#,
            "<svg:title>t</svg:title><svg:rect/></svg:svg>"
        );
        let mut tree = XmlTree::parse(source).unwrap();
        tree.remove_elements(&["title"]);
        assert_eq!(tree.find_first("svg").unwrap().inner_xml().unwrap(), "<svg:rect/>");
    }

    #[test]
    fn removing_the_root_empties_the_tree() {
        let mut tree = XmlTree::parse("<title>only</title>").unwrap();
        assert_eq!(tree.remove_elements(&["title"]), 1);
        assert!(tree.find_first("title").is_none());
    }

    #[test]
    fn expands_declared_entities() {
        let source = concat!(
            "<!DOCTYPE svg [\n",
            "  <!ENTITY ns_svg \"http://www.w3.org/2000/svg\">\n",
            "  <!ENTITY layer \"layer-1\">\n",
            "]>\n",
            r#"<svg xmlns="&ns_svg;">"#,
            r#"<g id="&layer;" class='&layer; &amp; more'>&layer; &amp; &#169;</g></svg>"#
        );
        assert_eq!(
            inner(source, "svg"),
            r#"<g id="layer-1" class='layer-1 &amp; more'>layer-1 &amp; &#169;</g>"#
        );
    }

    #[test]
    fn undeclared_entity_in_attribute_is_rejected() {
        let source = r#"<!DOCTYPE svg [<!ENTITY a "x">]><svg><g id="&b;"/></svg>"#;
        assert!(matches!(XmlTree::parse(source), Err(IconError::MalformedSvg(_))));
    }

    #[test]
    fn rejects_malformed_documents() {
        for source in [
            "",
            "not xml at all",
            "<svg><g></svg>",
            "<svg>",
            "<svg></svg><svg></svg>",
            "<svg>&nbsp;</svg>",
            r#"<svg><rect x="1" x="2"/></svg>"#,
            "</svg>",
        ] {
            let result = XmlTree::parse(source);
            assert!(
                matches!(result, Err(IconError::MalformedSvg(_))),
                "expected {source:?} to be rejected"
            );
        }
    }
}
