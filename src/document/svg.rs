//! SVG generation

use std::io::{Cursor, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::errors::RenderError;

/// SVG namespace URI
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// A built element, ready to serialize
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    pub fn set(&mut self, name: &'static str, value: impl Into<String>) {
        self.attributes.push((name, value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

fn xml_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Xml(e.to_string())
}

/// Serialize a node tree, optionally indenting nested elements
pub fn to_string(root: &Node, indent: Option<usize>) -> Result<String, RenderError> {
    let cursor = Cursor::new(Vec::new());
    let mut writer = match indent {
        Some(width) => Writer::new_with_indent(cursor, b' ', width),
        None => Writer::new(cursor),
    };
    write_node(&mut writer, root)?;
    String::from_utf8(writer.into_inner().into_inner()).map_err(xml_error)
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<(), RenderError> {
    let mut start = BytesStart::new(node.tag);
    for (name, value) in &node.attributes {
        start.push_attribute((*name, value.as_str()));
    }

    if node.children.is_empty() && node.text.is_none() {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    if let Some(text) = &node.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)?;
    }
    for child in &node.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(node.tag)))
        .map_err(xml_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_elements_self_close() {
        let mut rect = Node::new("rect");
        rect.set("x", "1");
        assert_eq!(to_string(&rect, None).unwrap(), r#"<rect x="1"/>"#);
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let mut text = Node::new("text");
        text.set("class", "a\"b");
        text.text = Some("1 < 2 & 3".into());
        assert_eq!(
            to_string(&text, None).unwrap(),
            r#"<text class="a&quot;b">1 &lt; 2 &amp; 3</text>"#
        );
    }

    #[test]
    fn nested_children() {
        let mut root = Node::new("svg");
        root.set("xmlns", SVG_NS);
        let mut g = Node::new("g");
        g.children.push(Node::new("circle"));
        root.children.push(g);
        assert_eq!(
            to_string(&root, None).unwrap(),
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g><circle/></g></svg>"#
        );
    }
}
