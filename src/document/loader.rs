//! Document loading
//!
//! Turns serialized XML into a [`RawDocument`] tree using `quick-xml`.

use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{ATTRIBUTE_PREFIX, Node, NodeMap, RawDocument, TEXT_KEY};
use crate::error::LoadError;

/// Source of parsed documents for the batch coordinator
pub trait DocumentLoader: Send + Sync {
    /// Load the document stored at `path`
    fn load(&self, path: &Path) -> Result<RawDocument, LoadError>;
}

/// Loads XML files from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlFileLoader;

impl XmlFileLoader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for XmlFileLoader {
    fn load(&self, path: &Path) -> Result<RawDocument, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_document(path, &content)
    }
}

/// Element being assembled while its children are read
struct Frame {
    name: String,
    children: NodeMap,
    text: String,
}

impl Frame {
    fn open(path: &Path, start: &BytesStart<'_>) -> Result<Self, LoadError> {
        Ok(Self {
            name: element_name(start),
            children: attributes(path, start)?,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Node) {
        let Self {
            name,
            mut children,
            text,
        } = self;
        let text = text.trim();
        let node = if children.is_empty() {
            Node::text(text)
        } else {
            if !text.is_empty() {
                children.push(TEXT_KEY, Node::text(text));
            }
            Node::Map(children)
        };
        (name, node)
    }
}

/// Parse XML `content` read from `path` into a document tree
///
/// # Errors
/// Returns [`LoadError::Xml`] if the content is not well-formed or has no root element
pub fn parse_document(path: &Path, content: &str) -> Result<RawDocument, LoadError> {
    let xml_error = |detail: String| LoadError::Xml {
        path: path.to_path_buf(),
        detail,
    };

    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<NodeMap> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            xml_error(format!("{e} at position {}", reader.buffer_position()))
        })?;

        match event {
            Event::Start(start) => stack.push(Frame::open(path, &start)?),
            Event::Empty(start) => {
                let (name, node) = Frame::open(path, &start)?.close();
                attach(&mut stack, &mut root, name, node);
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| xml_error("closing tag without opening tag".to_string()))?;
                let (name, node) = frame.close();
                attach(&mut stack, &mut root, name, node);
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    let value = text.unescape().map_err(|e| xml_error(e.to_string()))?;
                    frame.text.push_str(&value);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(xml_error(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    let root = root.ok_or_else(|| xml_error("document has no root element".to_string()))?;
    Ok(RawDocument::new(path, Node::Map(root)))
}

fn attach(stack: &mut [Frame], root: &mut Option<NodeMap>, name: String, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(name, node),
        None => root.get_or_insert_with(NodeMap::new).push(name, node),
    }
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn attributes(path: &Path, start: &BytesStart<'_>) -> Result<NodeMap, LoadError> {
    let mut map = NodeMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| LoadError::Xml {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let key = format!(
            "{ATTRIBUTE_PREFIX}{}",
            String::from_utf8_lossy(attr.key.as_ref())
        );
        let value = attr.unescape_value().map_err(|e| LoadError::Xml {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        map.push(key, Node::text(value));
    }
    Ok(map)
}
