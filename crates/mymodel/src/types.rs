//! Core address-space identifiers: node ids, qualified names and the namespace table.

use crate::error::ModelError;
use crate::ids::namespaces;
use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use core::fmt;
use core::str::FromStr;

/// The identifier part of a `NodeId`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identifier {
    Numeric(u32),
    String(String),
    /// Application-specific byte string.
    Opaque(Vec<u8>),
}

/// Identifies a node within one server's address space.
///
/// The namespace index refers to the server's `NamespaceTable`, so a `NodeId`
/// is only meaningful together with the table it was created against.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub namespace_index: u16,
    pub identifier: Identifier,
}

impl NodeId {
    /// The null node id (`i=0` in namespace 0).
    pub const NULL: NodeId = NodeId::numeric(0, 0);

    pub const fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: Identifier::Numeric(value),
        }
    }

    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: Identifier::String(value.into()),
        }
    }

    pub fn opaque(namespace_index: u16, value: impl Into<Vec<u8>>) -> Self {
        Self {
            namespace_index,
            identifier: Identifier::Opaque(value.into()),
        }
    }

    pub const fn null() -> Self {
        Self::NULL
    }

    /// True for `i=0` in namespace 0 as well as empty string/opaque identifiers there.
    pub fn is_null(&self) -> bool {
        if self.namespace_index != 0 {
            return false;
        }
        match &self.identifier {
            Identifier::Numeric(v) => *v == 0,
            Identifier::String(s) => s.is_empty(),
            Identifier::Opaque(b) => b.is_empty(),
        }
    }

    /// Creates a numeric node id in the namespace identified by `namespace_uri`.
    ///
    /// Returns the null node id when the URI is not registered in `namespace_uris`.
    pub fn create(value: u32, namespace_uri: &str, namespace_uris: &NamespaceTable) -> Self {
        match namespace_uris.get_index(namespace_uri) {
            Some(index) => Self::numeric(index, value),
            None => Self::NULL,
        }
    }

    /// Returns the numeric identifier, if this is a numeric node id.
    pub fn as_u32(&self) -> Option<u32> {
        match self.identifier {
            Identifier::Numeric(v) => Some(v),
            _ => None,
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index != 0 {
            write!(f, "ns={};", self.namespace_index)?;
        }
        match &self.identifier {
            Identifier::Numeric(v) => write!(f, "i={v}"),
            Identifier::String(s) => write!(f, "s={s}"),
            Identifier::Opaque(b) => write!(f, "b={}", BASE64.encode(b)),
        }
    }
}

impl FromStr for NodeId {
    type Err = ModelError;

    /// Parses the standard text form, e.g. `ns=1;i=2`, `i=85` or `ns=1;s=Boiler`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace_index, rest) = match s.strip_prefix("ns=") {
            Some(tail) => {
                let (ns, rest) = tail.split_once(';').ok_or(ModelError::InvalidNodeIdFormat)?;
                let ns = ns.parse::<u16>().map_err(|_| ModelError::InvalidNodeIdFormat)?;
                (ns, rest)
            }
            None => (0, s),
        };

        let (kind, value) = rest.split_once('=').ok_or(ModelError::InvalidNodeIdFormat)?;
        match kind {
            "i" => value
                .parse::<u32>()
                .map(|v| NodeId::numeric(namespace_index, v))
                .map_err(|_| ModelError::InvalidNodeIdFormat),
            "s" => Ok(NodeId::string(namespace_index, value)),
            "b" => BASE64
                .decode(value)
                .map(|bytes| NodeId::opaque(namespace_index, bytes))
                .map_err(|_| ModelError::InvalidNodeIdFormat),
            _ => Err(ModelError::InvalidNodeIdFormat),
        }
    }
}

/// A node id that may carry its namespace as a URI instead of a table index.
///
/// The model's identifier constants are expanded node ids: they name the
/// MyModel namespace by URI because its index is only known at runtime.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpandedNodeId {
    pub node_id: NodeId,
    pub namespace_uri: Option<Cow<'static, str>>,
    pub server_index: u32,
}

impl ExpandedNodeId {
    /// Numeric id in the namespace named by `namespace_uri` (namespace index left at 0).
    pub const fn new(value: u32, namespace_uri: &'static str) -> Self {
        Self {
            node_id: NodeId::numeric(0, value),
            namespace_uri: Some(Cow::Borrowed(namespace_uri)),
            server_index: 0,
        }
    }

    /// Wraps a local node id without a URI.
    pub const fn local(node_id: NodeId) -> Self {
        Self {
            node_id,
            namespace_uri: None,
            server_index: 0,
        }
    }

    /// Converts a table-relative node id into URI form.
    ///
    /// Namespace 0 stays index-based; any other index is replaced by its URI
    /// so that the result compares equal to the model's constants.
    pub fn from_node_id(node_id: &NodeId, namespace_uris: &NamespaceTable) -> Result<Self, ModelError> {
        if node_id.namespace_index == 0 {
            return Ok(Self::local(node_id.clone()));
        }
        let uri = namespace_uris
            .get_uri(node_id.namespace_index)
            .ok_or(ModelError::UnknownNamespaceIndex(node_id.namespace_index))?;
        Ok(Self {
            node_id: NodeId {
                namespace_index: 0,
                identifier: node_id.identifier.clone(),
            },
            namespace_uri: Some(Cow::Owned(uri.to_string())),
            server_index: 0,
        })
    }

    /// Resolves the URI against `namespace_uris`. Returns `None` if it is not registered.
    pub fn to_node_id(&self, namespace_uris: &NamespaceTable) -> Option<NodeId> {
        match &self.namespace_uri {
            None => Some(self.node_id.clone()),
            Some(uri) => namespace_uris.get_index(uri).map(|index| NodeId {
                namespace_index: index,
                identifier: self.node_id.identifier.clone(),
            }),
        }
    }

    pub fn is_null(&self) -> bool {
        self.namespace_uri.is_none() && self.server_index == 0 && self.node_id.is_null()
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        Self::local(node_id)
    }
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.server_index != 0 {
            write!(f, "svr={};", self.server_index)?;
        }
        match &self.namespace_uri {
            Some(uri) => {
                write!(f, "nsu={uri};")?;
                let local = NodeId {
                    namespace_index: 0,
                    identifier: self.node_id.identifier.clone(),
                };
                write!(f, "{local}")
            }
            None => write!(f, "{}", self.node_id),
        }
    }
}

/// A name qualified by a namespace index; used as the browse name of nodes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct QualifiedName {
    pub namespace_index: u16,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && self.name.is_empty()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index != 0 {
            write!(f, "{}:", self.namespace_index)?;
        }
        write!(f, "{}", self.name)
    }
}

/// Ordered list of namespace URIs; a node id's namespace index points into it.
///
/// Index 0 is always the OPC UA base namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTable {
    uris: Vec<String>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self {
            uris: vec![namespaces::OPC_UA.to_string()],
        }
    }

    /// Appends a URI and returns its index. Existing URIs keep their index.
    pub fn append(&mut self, uri: &str) -> u16 {
        self.get_index_or_append(uri)
    }

    pub fn get_index(&self, uri: &str) -> Option<u16> {
        self.uris
            .iter()
            .position(|u| u == uri)
            .map(|index| index as u16)
    }

    pub fn get_index_or_append(&mut self, uri: &str) -> u16 {
        if let Some(index) = self.get_index(uri) {
            return index;
        }
        self.uris.push(uri.to_string());
        (self.uris.len() - 1) as u16
    }

    pub fn get_uri(&self, index: u16) -> Option<&str> {
        self.uris.get(index as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.uris.iter().map(String::as_str)
    }
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Node classes (OPC UA Part 3), with their wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum NodeClass {
    Unspecified = 0,
    Object = 1,
    Variable = 2,
    Method = 4,
    ObjectType = 8,
    VariableType = 16,
    ReferenceType = 32,
    DataType = 64,
    View = 128,
}
