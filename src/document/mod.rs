//! In-memory document tree.
//!
//! A [`RawDocument`] is the nested string-keyed tree produced from one input
//! file. Keys keep their document order, repeated sibling elements collapse
//! into a [`Node::List`], and leaf elements become [`Node::Text`].

pub mod loader;

use std::path::{Path, PathBuf};

pub use loader::{DocumentLoader, XmlFileLoader};

/// Key under which element text is stored when the element also has
/// attributes or children
pub const TEXT_KEY: &str = "#text";

/// Prefix given to attribute keys
pub const ATTRIBUTE_PREFIX: char = '@';

/// One node of a document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Leaf text value (empty for empty elements)
    Text(String),
    /// Ordered string-keyed mapping
    Map(NodeMap),
    /// Ordered sequence of repeated elements
    List(Vec<Node>),
}

impl Node {
    /// Build a text node
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Build a mapping node from key/value pairs
    #[must_use]
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Node)>) -> Self {
        Self::Map(entries.into_iter().collect())
    }

    /// Build a sequence node
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Node>) -> Self {
        Self::List(items.into_iter().collect())
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&NodeMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Look up `key` if this node is a mapping
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Scalar value of this node.
    ///
    /// Text nodes yield their content; mappings that carry a `#text` entry
    /// (elements with attributes) yield that text. Anything else has no
    /// scalar value.
    #[must_use]
    pub fn scalar(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Map(map) => map.get(TEXT_KEY).and_then(Node::as_text),
            Self::List(_) => None,
        }
    }

    /// View this node as a sequence of items.
    ///
    /// A single repeated element cannot be told apart from a non-repeated
    /// one in XML, so a lone mapping is viewed as a one-element sequence and
    /// an empty text node as an empty sequence.
    #[must_use]
    pub fn items(&self) -> Option<Vec<&Node>> {
        match self {
            Self::List(items) => Some(items.iter().collect()),
            Self::Map(_) => Some(vec![self]),
            Self::Text(text) if text.trim().is_empty() => Some(Vec::new()),
            Self::Text(_) => None,
        }
    }

    /// Name of the node's shape, used in error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Map(_) => "mapping",
            Self::List(_) => "sequence",
        }
    }
}

/// Ordered mapping of element and attribute names to nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMap {
    entries: Vec<(String, Node)>,
}

impl NodeMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    /// Insert a value, merging repeated keys into a sequence in insertion order
    pub fn push(&mut self, key: impl Into<String>, node: Node) {
        let key = key.into();
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some((_, Node::List(items))) => items.push(node),
            Some((_, existing)) => {
                let first = std::mem::replace(existing, Node::List(Vec::with_capacity(2)));
                if let Node::List(items) = existing {
                    items.push(first);
                    items.push(node);
                }
            }
            None => self.entries.push((key, node)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for NodeMap {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, node) in iter {
            map.push(key, node);
        }
        map
    }
}

/// A parsed input file: its tree plus the file it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    source: PathBuf,
    root: Node,
}

impl RawDocument {
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, root: Node) -> Self {
        Self {
            source: source.into(),
            root,
        }
    }

    /// File the document was loaded from
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }
}
