/*!
 * Minimal XML element tree for `<source>` and `<target>` fragments.
 *
 * Parsing is event driven on top of quick-xml; the tree only keeps what
 * translation round-trips need: element names, ordered attributes, text,
 * CDATA sections and nested inline elements. Comments, processing
 * instructions and declarations are dropped.
 */

use std::fmt;

use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Attribute that controls whitespace handling in XLIFF segments
pub const XML_SPACE: &str = "xml:space";

/// Errors raised while turning text into an element tree
#[derive(Error, Debug, PartialEq)]
pub enum XmlError {
    /// The text is not well-formed
    #[error("XML syntax error: {0}")]
    Syntax(String),

    /// The text contains no element at all
    #[error("No root element found")]
    NoRoot,

    /// The text has more than one top-level element
    #[error("More than one root element found")]
    MultipleRoots,

    /// The text ended before an element was closed
    #[error("Element <{0}> is not closed")]
    Unclosed(String),
}

/// A child of an element
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Nested element
    Element(XmlElement),
    /// Unescaped character data
    Text(String),
    /// CDATA section content
    CData(String),
}

impl XmlNode {
    fn write_to(&self, out: &mut String) {
        match self {
            XmlNode::Element(element) => element.write_to(out),
            XmlNode::Text(text) => out.push_str(&partial_escape(text.as_str())),
            XmlNode::CData(data) => {
                out.push_str("<![CDATA[");
                out.push_str(data);
                out.push_str("]]>");
            }
        }
    }
}

/// An XML element with its attributes and content
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Value of the named attribute, if present
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Append character data, merging with a trailing text node
    pub fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }

    pub fn add_element(&mut self, element: XmlElement) {
        self.children.push(XmlNode::Element(element));
    }

    /// Copy `xml:space` from another element when it carries one
    pub fn copy_space_from(&mut self, other: &XmlElement) {
        if let Some(space) = other.attribute(XML_SPACE) {
            self.set_attribute(XML_SPACE, space);
        }
    }

    /// All character data of the element and its descendants, without markup
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Element(element) => element.collect_text(out),
                XmlNode::Text(text) | XmlNode::CData(text) => out.push_str(text),
            }
        }
    }

    /// Serialized content of the element, without its own start and end tags
    pub fn inner_xml(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_to(&mut out);
        }
        out
    }

    /// Names of every descendant element, in document order
    pub fn descendant_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for child in &self.children {
            if let XmlNode::Element(element) = child {
                names.push(element.name());
                names.extend(element.descendant_names());
            }
        }
        names
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}

impl std::str::FromStr for XmlElement {
    type Err = XmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_element(s)
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| XmlError::Syntax(e.to_string()))?
        .to_string();
    let mut element = XmlElement::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlError::Syntax(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| XmlError::Syntax(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.add_element(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::MultipleRoots);
    }
    *root = Some(element);
    Ok(())
}

/// Parse a string holding exactly one root element
pub fn parse_element(text: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(false);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(element_from_start(&start)?),
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Syntax("unexpected end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(text)) => {
                let value = text.unescape().map_err(|e| XmlError::Syntax(e.to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.add_text(&value),
                    None if value.trim().is_empty() => {}
                    None => {
                        return Err(XmlError::Syntax(format!(
                            "text outside of the root element: {}",
                            value.trim()
                        )));
                    }
                }
            }
            Ok(Event::CData(data)) => {
                let value = String::from_utf8(data.into_inner().into_owned())
                    .map_err(|e| XmlError::Syntax(e.to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::CData(value)),
                    None => return Err(XmlError::Syntax("CDATA outside of the root element".to_string())),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(XmlError::Syntax(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }
    root.ok_or(XmlError::NoRoot)
}
