//! Owned XML element tree: parsing with quick-xml's event reader and
//! pretty-printing with its indenting writer.

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use feedfreeze_util::errors::FreezeError;

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
}

/// An XML element with ordered attributes and children.
///
/// Names are kept exactly as written, including any namespace prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
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

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing its value in place if it already exists.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn append_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Concatenated text and CDATA content of the direct children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All descendant elements (not including `self`) named `name`, in document order.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        collect_named(self, name, &mut found);
        found
    }

    /// Whether any descendant element is named `name`.
    pub fn has_descendant(&self, name: &str) -> bool {
        self.child_elements()
            .any(|c| c.name == name || c.has_descendant(name))
    }

    /// First descendant element (depth-first) matching `pred`.
    pub fn find_descendant_mut(
        &mut self,
        pred: &dyn Fn(&Element) -> bool,
    ) -> Option<&mut Element> {
        for child in self.child_elements_mut() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant_mut(pred) {
                return Some(found);
            }
        }
        None
    }

    /// Keep only the child elements for which `keep` returns true.
    ///
    /// Non-element children are left untouched.
    pub fn retain_elements(&mut self, mut keep: impl FnMut(&Element) -> bool) {
        self.children.retain(|n| match n {
            Node::Element(e) => keep(e),
            _ => true,
        });
    }
}

fn collect_named<'a>(el: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    for child in el.child_elements() {
        if child.name == name {
            found.push(child);
        }
        collect_named(child, name, found);
    }
}

/// A parsed XML document: the root element plus any nodes around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub prolog: Vec<Node>,
    pub root: Element,
    pub epilog: Vec<Node>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    /// Parse an XML string.
    ///
    /// Whitespace-only text is dropped; other text is kept exactly as
    /// written. The declaration and any DOCTYPE are not kept.
    pub fn parse(xml: &str) -> Result<Self, FreezeError> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<Element> = Vec::new();
        let mut tree = TreeBuilder::default();

        loop {
            let event = reader.read_event().map_err(|e| FreezeError::Xml {
                message: format!("at position {}: {e}", reader.buffer_position()),
            })?;
            match event {
                Event::Start(ref e) => stack.push(element_from_start(e)?),
                Event::Empty(ref e) => {
                    let el = element_from_start(e)?;
                    tree.attach(&mut stack, Node::Element(el))?;
                }
                Event::End(_) => {
                    let el = stack.pop().ok_or_else(|| FreezeError::Xml {
                        message: "unexpected closing tag".to_string(),
                    })?;
                    tree.attach(&mut stack, Node::Element(el))?;
                }
                Event::Text(ref e) => {
                    let text = e.unescape().map_err(|e| FreezeError::Xml {
                        message: format!("bad text content: {e}"),
                    })?;
                    if !text.trim().is_empty() {
                        tree.attach(&mut stack, Node::Text(text.into_owned()))?;
                    }
                }
                Event::CData(ref e) => {
                    let text = String::from_utf8_lossy(e).into_owned();
                    tree.attach(&mut stack, Node::CData(text))?;
                }
                Event::Comment(ref e) => {
                    let text = String::from_utf8_lossy(e).into_owned();
                    tree.attach(&mut stack, Node::Comment(text))?;
                }
                Event::PI(ref e) => {
                    let text = String::from_utf8_lossy(e).into_owned();
                    tree.attach(&mut stack, Node::ProcessingInstruction(text))?;
                }
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(FreezeError::Xml {
                message: format!("unclosed element <{}>", open.name),
            });
        }
        let root = tree.root.ok_or_else(|| FreezeError::Xml {
            message: "document has no root element".to_string(),
        })?;

        Ok(Self {
            prolog: tree.prolog,
            root,
            epilog: tree.epilog,
        })
    }

    /// Serialize with an XML declaration and two-space indentation.
    pub fn to_pretty_string(&self) -> Result<String, FreezeError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        write_event(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
        )?;
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;
        for node in &self.epilog {
            write_node(&mut writer, node)?;
        }

        let mut out = String::from_utf8(writer.into_inner()).map_err(|e| FreezeError::Xml {
            message: format!("serialized document is not UTF-8: {e}"),
        })?;
        out.push('\n');
        Ok(out)
    }
}

#[derive(Default)]
struct TreeBuilder {
    prolog: Vec<Node>,
    root: Option<Element>,
    epilog: Vec<Node>,
}

impl TreeBuilder {
    fn attach(&mut self, stack: &mut [Element], node: Node) -> Result<(), FreezeError> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        match node {
            Node::Element(el) => {
                if self.root.is_some() {
                    return Err(FreezeError::Xml {
                        message: format!("second root element <{}>", el.name),
                    });
                }
                self.root = Some(el);
            }
            Node::Text(text) => {
                return Err(FreezeError::Xml {
                    message: format!("text outside the root element: {text}"),
                });
            }
            other if self.root.is_none() => self.prolog.push(other),
            other => self.epilog.push(other),
        }
        Ok(())
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, FreezeError> {
    let mut el = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| FreezeError::Xml {
            message: format!("bad attribute on <{}>: {e}", el.name),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| FreezeError::Xml {
            message: format!("bad value for attribute '{key}' on <{}>: {e}", el.name),
        })?;
        el.attributes.push((key, value.into_owned()));
    }
    Ok(el)
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), FreezeError> {
    writer.write_event(event).map_err(|e| FreezeError::Xml {
        message: format!("failed to write document: {e}"),
    })
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), FreezeError> {
    match node {
        Node::Element(el) => write_element(writer, el),
        Node::Text(text) => write_event(writer, Event::Text(BytesText::new(text))),
        Node::CData(text) => write_event(writer, Event::CData(BytesCData::new(text.as_str()))),
        Node::Comment(text) => write_event(
            writer,
            Event::Comment(BytesText::from_escaped(text.as_str())),
        ),
        Node::ProcessingInstruction(text) => {
            write_event(writer, Event::PI(BytesPI::new(text.as_str())))
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &Element) -> Result<(), FreezeError> {
    let mut start = BytesStart::new(el.name.as_str());
    for (key, value) in &el.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if el.children.is_empty() {
        return write_event(writer, Event::Empty(start));
    }
    write_event(writer, Event::Start(start))?;
    for child in &el.children {
        write_node(writer, child)?;
    }
    write_event(writer, Event::End(BytesEnd::new(el.name.as_str())))
}
