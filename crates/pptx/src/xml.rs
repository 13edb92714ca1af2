//! Minimal mutable XML tree over quick-xml events.
//!
//! Element names keep their prefixes (`p:sp`); lookups go by local name.
//! Text is stored unescaped and escaped again on write.

use doorplate_core::{Error, Result};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

/// Extract the local name from a potentially namespaced XML element name.
pub fn local_name(name: &str) -> &str {
    match name.split_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Prefix of the element name, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute in some namespace with the given local name, e.g. `r:id`
    /// for `id`. Unprefixed attributes do not match.
    pub fn prefixed_attr(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.contains(':') && local_name(k) == local && !k.starts_with("xmlns"))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First child element with the given local name.
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.local_name() == local)
    }

    pub fn child_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|e| e.local_name() == local)
    }

    /// Follow a chain of local names.
    pub fn path(&self, locals: &[&str]) -> Option<&XmlElement> {
        locals.iter().try_fold(self, |el, local| el.child(local))
    }

    pub fn path_mut(&mut self, locals: &[&str]) -> Option<&mut XmlElement> {
        let mut el = self;
        for local in locals {
            el = el.child_mut(local)?;
        }
        Some(el)
    }

    /// Position of the first child element with the given local name, as an
    /// index into `children`.
    pub fn position(&self, local: &str) -> Option<usize> {
        self.children.iter().position(|c| match c {
            XmlNode::Element(e) => e.local_name() == local,
            _ => false,
        })
    }

    /// Remove every child element with the given local name.
    pub fn remove_children(&mut self, local: &str) {
        self.children.retain(|c| match c {
            XmlNode::Element(e) => e.local_name() != local,
            _ => true,
        });
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(el: &XmlElement, out: &mut String) {
    for child in &el.children {
        match child {
            XmlNode::Element(e) => collect_text(e, out),
            XmlNode::Text(t) | XmlNode::CData(t) => out.push_str(t),
            XmlNode::Comment(_) => {}
        }
    }
}

/// A parsed XML part.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlElement,
    declaration: bool,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self {
            root,
            declaration: true,
        }
    }

    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root = None;
        let mut declaration = false;

        loop {
            match reader.read_event() {
                Ok(Event::Decl(_)) => declaration = true,
                Ok(Event::Start(ref e)) => stack.push(element_from(e, &reader)?),
                Ok(Event::Empty(ref e)) => attach(&mut stack, &mut root, element_from(e, &reader)?)?,
                Ok(Event::End(_)) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| Error::XmlError("Unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, el)?;
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::XmlError(e.to_string()))?;
                        parent.children.push(XmlNode::Text(text.into_owned()));
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                        parent.children.push(XmlNode::CData(text));
                    }
                }
                Ok(Event::Comment(ref e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(e).into_owned();
                        parent.children.push(XmlNode::Comment(text));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
            }
        }

        if !stack.is_empty() {
            return Err(Error::XmlError(format!(
                "Unclosed element '{}'",
                stack[stack.len() - 1].name
            )));
        }

        let root = root.ok_or_else(|| Error::XmlError("Document has no root element".to_string()))?;
        Ok(Self { root, declaration })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        if self.declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
                .map_err(|e| Error::XmlError(e.to_string()))?;
            writer
                .write_event(Event::Text(BytesText::from_escaped("\r\n")))
                .map_err(|e| Error::XmlError(e.to_string()))?;
        }
        write_element(&mut writer, &self.root)?;
        Ok(writer.into_inner())
    }
}

fn element_from<B>(start: &BytesStart, reader: &Reader<B>) -> Result<XmlElement> {
    let mut el = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::XmlError(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(reader)
            .map_err(|e| Error::XmlError(e.to_string()))?
            .into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, el: XmlElement) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(el)),
        None if root.is_none() => *root = Some(el),
        None => {
            return Err(Error::XmlError(format!(
                "Second root element '{}'",
                el.name
            )))
        }
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (key, value) in &el.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if el.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::XmlError(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::XmlError(e.to_string()))?;

    for child in &el.children {
        let result = match child {
            XmlNode::Element(e) => {
                write_element(writer, e)?;
                Ok(())
            }
            XmlNode::Text(t) => writer.write_event(Event::Text(BytesText::new(t))),
            XmlNode::CData(t) => writer.write_event(Event::CData(BytesCData::new(t.as_str()))),
            XmlNode::Comment(t) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(t.as_str())))
            }
        };
        result.map_err(|e| Error::XmlError(e.to_string()))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(el.name.as_str())))
        .map_err(|e| Error::XmlError(e.to_string()))
}
