//! A generic element tree read from XML-like markup.
//!
//! This carries no markup-language semantics: tag names, ordered attributes,
//! ordered children, and the text directly inside each element.

use anyhow::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Text directly inside this element, concatenated and trimmed.
    pub text: String,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    /// Returns the value of the first attribute named `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// Parses `input` and returns its root element.
    pub fn parse(input: &str) -> Result<Element> {
        let mut reader = Reader::from_str(input);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Err(e) => {
                    return Err(anyhow::anyhow!(
                        "Error at position {}: {:?}",
                        reader.buffer_position(),
                        e
                    ))
                }
                Ok(Event::Eof) => break,
                Ok(Event::Start(ref e)) => {
                    stack.push(Self::from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = Self::from_start(e)?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    if let Some(mut element) = stack.pop() {
                        element.text = element.text.trim().to_string();
                        Self::attach(&mut stack, &mut root, element)?;
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(e));
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(e));
                    }
                }
                Ok(Event::GeneralRef(ref e)) => {
                    if let Some(current) = stack.last_mut() {
                        let name = String::from_utf8_lossy(e).into_owned();
                        match quick_xml::escape::resolve_predefined_entity(&name) {
                            Some(resolved) => current.text.push_str(resolved),
                            None => match e.resolve_char_ref()? {
                                Some(ch) => current.text.push(ch),
                                None => anyhow::bail!("Unknown entity reference: &{};", name),
                            },
                        }
                    }
                }
                _ => (),
            }
            buf.clear();
        }

        if !stack.is_empty() {
            anyhow::bail!(
                "Unexpected end of input: <{}> is not closed",
                stack[stack.len() - 1].tag
            );
        }
        root.ok_or_else(|| anyhow::anyhow!("No root element found"))
    }

    fn from_start(start: &BytesStart) -> Result<Element> {
        let mut element = Element::new(&String::from_utf8_lossy(start.name().as_ref()));
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_none() => *root = Some(element),
            None => anyhow::bail!("Multiple root elements: <{}>", element.tag),
        }
        Ok(())
    }
}
