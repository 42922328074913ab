//! Domain entities: XML node model

use std::fmt;

use itertools::Itertools;

/// Content item attached to an element, in document order.
///
/// Only `Element` participates in inheritance matching; comments, processing
/// instructions, and text are opaque passthrough content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlContent {
    Element(XmlElement),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
    Text(String),
}

impl XmlContent {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlContent::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, XmlContent::Element(_))
    }
}

/// An XML element: tag name, ordered attributes with unique keys, ordered
/// child content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub tag: String,
    attributes: Vec<(String, String)>,
    pub children: Vec<XmlContent>,
}

impl XmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Get an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Set an attribute, replacing the value in place if the name exists.
    /// Keys stay unique; new names append in document order.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Mutable attribute values, for in-place rewriting (variable replacement).
    pub fn attribute_values_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.attributes.iter_mut().map(|(_, value)| value)
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Element children only, skipping comments and other passthrough content.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlContent::as_element)
    }

    /// Fluent helper for constructing elements in code.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: XmlContent) -> Self {
        self.children.push(child);
        self
    }
}

/// A parsed document: exactly one root element, plus any comments or
/// processing instructions outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    /// Content before the root element (XML declaration, comments)
    pub leading: Vec<XmlContent>,
    pub root: XmlElement,
    /// Comments after the root element
    pub trailing: Vec<XmlContent>,
}

impl XmlDocument {
    pub fn from_root(root: XmlElement) -> Self {
        Self {
            leading: Vec::new(),
            root,
            trailing: Vec::new(),
        }
    }
}

/// Escape a value for use inside a double-quoted attribute.
fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

impl fmt::Display for XmlElement {
    /// Compact serialization: no indentation, self-closing empty elements.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        if !self.attributes.is_empty() {
            write!(
                f,
                " {}",
                self.attributes
                    .iter()
                    .map(|(key, value)| format!("{}=\"{}\"", key, escape_attribute(value)))
                    .join(" ")
            )?;
        }
        if self.children.is_empty() {
            write!(f, " />")
        } else {
            write!(f, ">")?;
            for child in &self.children {
                write!(f, "{}", child)?;
            }
            write!(f, "</{}>", self.tag)
        }
    }
}

impl fmt::Display for XmlContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlContent::Element(element) => write!(f, "{}", element),
            XmlContent::Comment(text) => write!(f, "<!--{}-->", text),
            XmlContent::ProcessingInstruction { target, data } => {
                if data.is_empty() {
                    write!(f, "<?{}?>", target)
                } else {
                    write!(f, "<?{} {}?>", target, data)
                }
            }
            XmlContent::Text(text) => write!(f, "{}", escape_text(text)),
        }
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.leading {
            write!(f, "{}", item)?;
        }
        write!(f, "{}", self.root)?;
        for item in &self.trailing {
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}
