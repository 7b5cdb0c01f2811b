//! OPC UA binary encoding (Part 6, 5.2): little-endian scalars, Int32
//! length-prefixed strings and arrays, compact NodeId forms.

use super::{Decoder, Encodeable, Encoder, EncodingLimits, NamespaceScope};
use crate::error::ModelError;
use crate::log::{LogContext, my_trace, my_warn};
use crate::types::{ExpandedNodeId, Identifier, NamespaceTable, NodeId};
use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

/// NodeId encoding byte values.
const NODE_ID_TWO_BYTE: u8 = 0x00;
const NODE_ID_FOUR_BYTE: u8 = 0x01;
const NODE_ID_NUMERIC: u8 = 0x02;
const NODE_ID_STRING: u8 = 0x03;
const NODE_ID_BYTE_STRING: u8 = 0x05;

/// ExpandedNodeId flags OR'ed into the NodeId encoding byte.
const EXPANDED_NAMESPACE_URI_FLAG: u8 = 0x80;
const EXPANDED_SERVER_INDEX_FLAG: u8 = 0x40;

/// Length prefix of a null string, byte string or array.
const NULL_LENGTH: i32 = -1;

/// Writes values into a growable buffer in the UA binary encoding.
#[derive(Debug, Clone)]
pub struct BinaryEncoder {
    buffer: Vec<u8>,
    namespaces: Vec<String>,
    namespace_uris: NamespaceTable,
    limits: EncodingLimits,
    depth: usize,
}

impl BinaryEncoder {
    pub fn new() -> Self {
        Self::with_context(NamespaceTable::new(), EncodingLimits::default())
    }

    /// Creates an encoder that resolves namespace URIs against `namespace_uris`.
    pub fn with_context(namespace_uris: NamespaceTable, limits: EncodingLimits) -> Self {
        Self {
            buffer: Vec::new(),
            namespaces: Vec::new(),
            namespace_uris,
            limits,
            depth: 0,
        }
    }

    pub fn namespace_uris(&self) -> &NamespaceTable {
        &self.namespace_uris
    }

    pub fn limits(&self) -> &EncodingLimits {
        &self.limits
    }

    /// The innermost pushed namespace, if any.
    pub fn current_namespace(&self) -> Option<&str> {
        self.namespaces.last().map(String::as_str)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_byte(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_uint16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a ByteString; `None` is encoded as the null length -1.
    pub fn write_byte_string(&mut self, value: Option<&[u8]>) -> Result<(), ModelError> {
        match value {
            None => self.write_i32(NULL_LENGTH),
            Some(bytes) => {
                self.limits.check_byte_string(bytes.len())?;
                self.write_length(bytes.len())?;
                self.buffer.extend_from_slice(bytes);
            }
        }
        Ok(())
    }

    /// Writes a NodeId in the most compact form that can hold it.
    pub fn write_node_id(&mut self, node_id: &NodeId) -> Result<(), ModelError> {
        let ns = node_id.namespace_index;
        match &node_id.identifier {
            Identifier::Numeric(value) => {
                if ns == 0 && *value <= u8::MAX as u32 {
                    self.write_byte(NODE_ID_TWO_BYTE);
                    self.write_byte(*value as u8);
                } else if ns <= u8::MAX as u16 && *value <= u16::MAX as u32 {
                    self.write_byte(NODE_ID_FOUR_BYTE);
                    self.write_byte(ns as u8);
                    self.write_uint16(*value as u16);
                } else {
                    self.write_byte(NODE_ID_NUMERIC);
                    self.write_uint16(ns);
                    self.write_u32(*value);
                }
            }
            Identifier::String(value) => {
                self.write_byte(NODE_ID_STRING);
                self.write_uint16(ns);
                self.write_str(Some(value.as_str()))?;
            }
            Identifier::Opaque(value) => {
                self.write_byte(NODE_ID_BYTE_STRING);
                self.write_uint16(ns);
                self.write_byte_string(Some(value.as_slice()))?;
            }
        }
        Ok(())
    }

    /// Writes an ExpandedNodeId, carrying the namespace URI and server index when set.
    pub fn write_expanded_node_id(&mut self, id: &ExpandedNodeId) -> Result<(), ModelError> {
        let start = self.buffer.len();
        if id.namespace_uri.is_some() {
            // The URI replaces the namespace index on the wire.
            let local = NodeId {
                namespace_index: 0,
                identifier: id.node_id.identifier.clone(),
            };
            self.write_node_id(&local)?;
        } else {
            self.write_node_id(&id.node_id)?;
        }

        let mut flags = 0;
        if id.namespace_uri.is_some() {
            flags |= EXPANDED_NAMESPACE_URI_FLAG;
        }
        if id.server_index != 0 {
            flags |= EXPANDED_SERVER_INDEX_FLAG;
        }
        self.buffer[start] |= flags;

        if let Some(uri) = &id.namespace_uri {
            self.write_str(Some(uri.as_ref()))?;
        }
        if id.server_index != 0 {
            self.write_u32(id.server_index);
        }
        Ok(())
    }

    fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    fn write_length(&mut self, length: usize) -> Result<(), ModelError> {
        let length = i32::try_from(length).map_err(|_| ModelError::ArrayTooLong {
            length,
            max: i32::MAX as usize,
        })?;
        self.write_i32(length);
        Ok(())
    }

    fn write_str(&mut self, value: Option<&str>) -> Result<(), ModelError> {
        match value {
            None => self.write_i32(NULL_LENGTH),
            Some(s) => {
                self.limits.check_string(s.len())?;
                self.write_length(s.len())?;
                self.buffer.extend_from_slice(s.as_bytes());
            }
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<(), ModelError> {
        let depth = self.depth + 1;
        self.limits.check_depth(depth)?;
        self.depth = depth;
        Ok(())
    }
}

impl Default for BinaryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceScope for BinaryEncoder {
    fn push_namespace(&mut self, namespace_uri: &str) {
        self.namespaces.push(namespace_uri.into());
    }

    fn pop_namespace(&mut self) {
        if self.namespaces.pop().is_none() {
            my_warn!(
                LogContext::codec("BinaryEncoder"),
                "pop_namespace called with an empty namespace stack"
            );
        }
    }
}

impl Encoder for BinaryEncoder {
    type Error = ModelError;

    fn write_boolean(&mut self, _field_name: &str, value: bool) -> Result<(), ModelError> {
        self.write_byte(value as u8);
        Ok(())
    }

    fn write_int32(&mut self, _field_name: &str, value: i32) -> Result<(), ModelError> {
        self.write_i32(value);
        Ok(())
    }

    fn write_uint32(&mut self, _field_name: &str, value: u32) -> Result<(), ModelError> {
        self.write_u32(value);
        Ok(())
    }

    fn write_double(&mut self, _field_name: &str, value: f64) -> Result<(), ModelError> {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn write_string(&mut self, _field_name: &str, value: Option<&str>) -> Result<(), ModelError> {
        self.write_str(value)
    }

    fn write_encodeable<T: Encodeable>(&mut self, _field_name: &str, value: &T) -> Result<(), ModelError> {
        self.enter()?;
        let result = value.encode(self);
        self.depth -= 1;
        result
    }

    fn write_encodeable_array<T: Encodeable>(
        &mut self,
        field_name: &str,
        values: Option<&[T]>,
    ) -> Result<(), ModelError> {
        let Some(values) = values else {
            self.write_i32(NULL_LENGTH);
            return Ok(());
        };
        self.limits.check_array(values.len())?;
        self.write_length(values.len())?;
        for value in values {
            self.write_encodeable(field_name, value)?;
        }
        Ok(())
    }
}

/// Reads UA binary values from a borrowed buffer.
///
/// Every read is bounds-checked; truncated or malformed input yields an
/// error, never a panic.
#[derive(Debug, Clone)]
pub struct BinaryDecoder<'a> {
    data: &'a [u8],
    position: usize,
    namespaces: Vec<String>,
    namespace_uris: NamespaceTable,
    limits: EncodingLimits,
    depth: usize,
}

// Helper macro for fixed-size little-endian reads.
macro_rules! read_le {
    ($self:expr, $type:ty) => {{
        let bytes = $self.take(core::mem::size_of::<$type>())?;
        Ok::<$type, ModelError>(<$type>::from_le_bytes(bytes.try_into()?))
    }};
}

impl<'a> BinaryDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_context(data, NamespaceTable::new(), EncodingLimits::default())
    }

    pub fn with_limits(data: &'a [u8], limits: EncodingLimits) -> Self {
        Self::with_context(data, NamespaceTable::new(), limits)
    }

    pub fn with_namespace_uris(data: &'a [u8], namespace_uris: NamespaceTable) -> Self {
        Self::with_context(data, namespace_uris, EncodingLimits::default())
    }

    pub fn with_context(data: &'a [u8], namespace_uris: NamespaceTable, limits: EncodingLimits) -> Self {
        Self {
            data,
            position: 0,
            namespaces: Vec::new(),
            namespace_uris,
            limits,
            depth: 0,
        }
    }

    pub fn namespace_uris(&self) -> &NamespaceTable {
        &self.namespace_uris
    }

    pub fn limits(&self) -> &EncodingLimits {
        &self.limits
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_byte(&mut self) -> Result<u8, ModelError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_uint16(&mut self) -> Result<u16, ModelError> {
        read_le!(self, u16)
    }

    pub fn read_byte_string(&mut self) -> Result<Option<Vec<u8>>, ModelError> {
        let Some(length) = self.read_length()? else {
            return Ok(None);
        };
        self.limits.check_byte_string(length)?;
        Ok(Some(self.take(length)?.to_vec()))
    }

    pub fn read_node_id(&mut self) -> Result<NodeId, ModelError> {
        let encoding = self.read_byte()?;
        self.read_node_id_body(encoding)
    }

    pub fn read_expanded_node_id(&mut self) -> Result<ExpandedNodeId, ModelError> {
        let encoding = self.read_byte()?;
        let flags = encoding & (EXPANDED_NAMESPACE_URI_FLAG | EXPANDED_SERVER_INDEX_FLAG);
        let node_id = self.read_node_id_body(encoding & !flags)?;

        let namespace_uri = if flags & EXPANDED_NAMESPACE_URI_FLAG != 0 {
            self.read_str()?.map(Cow::Owned)
        } else {
            None
        };
        let server_index = if flags & EXPANDED_SERVER_INDEX_FLAG != 0 {
            read_le!(self, u32)?
        } else {
            0
        };
        Ok(ExpandedNodeId {
            node_id,
            namespace_uri,
            server_index,
        })
    }

    fn read_node_id_body(&mut self, encoding: u8) -> Result<NodeId, ModelError> {
        let node_id = match encoding {
            NODE_ID_TWO_BYTE => NodeId::numeric(0, self.read_byte()? as u32),
            NODE_ID_FOUR_BYTE => {
                let ns = self.read_byte()? as u16;
                NodeId::numeric(ns, self.read_uint16()? as u32)
            }
            NODE_ID_NUMERIC => {
                let ns = self.read_uint16()?;
                NodeId::numeric(ns, read_le!(self, u32)?)
            }
            NODE_ID_STRING => {
                let ns = self.read_uint16()?;
                NodeId::string(ns, self.read_str()?.unwrap_or_default())
            }
            NODE_ID_BYTE_STRING => {
                let ns = self.read_uint16()?;
                NodeId::opaque(ns, self.read_byte_string()?.unwrap_or_default())
            }
            other => return Err(ModelError::InvalidEncodingByte(other)),
        };
        Ok(node_id)
    }

    fn take(&mut self, length: usize) -> Result<&'a [u8], ModelError> {
        let end = self
            .position
            .checked_add(length)
            .ok_or(ModelError::BufferTooShort)?;
        let bytes = self
            .data
            .get(self.position..end)
            .ok_or(ModelError::BufferTooShort)?;
        self.position = end;
        Ok(bytes)
    }

    /// Reads an Int32 length prefix; -1 is null, other negatives are rejected.
    fn read_length(&mut self) -> Result<Option<usize>, ModelError> {
        let length = read_le!(self, i32)?;
        match length {
            NULL_LENGTH => Ok(None),
            l if l < 0 => Err(ModelError::InvalidLength(l)),
            l => Ok(Some(l as usize)),
        }
    }

    fn read_str(&mut self) -> Result<Option<String>, ModelError> {
        let Some(length) = self.read_length()? else {
            return Ok(None);
        };
        self.limits.check_string(length)?;
        let bytes = self.take(length)?;
        Ok(Some(String::from(core::str::from_utf8(bytes)?)))
    }

    fn enter(&mut self) -> Result<(), ModelError> {
        let depth = self.depth + 1;
        self.limits.check_depth(depth)?;
        self.depth = depth;
        Ok(())
    }
}

impl NamespaceScope for BinaryDecoder<'_> {
    fn push_namespace(&mut self, namespace_uri: &str) {
        self.namespaces.push(namespace_uri.into());
    }

    fn pop_namespace(&mut self) {
        if self.namespaces.pop().is_none() {
            my_warn!(
                LogContext::codec("BinaryDecoder"),
                "pop_namespace called with an empty namespace stack"
            );
        }
    }
}

impl Decoder for BinaryDecoder<'_> {
    type Error = ModelError;

    fn read_boolean(&mut self, _field_name: &str) -> Result<bool, ModelError> {
        Ok(self.read_byte()? != 0)
    }

    fn read_int32(&mut self, _field_name: &str) -> Result<i32, ModelError> {
        read_le!(self, i32)
    }

    fn read_uint32(&mut self, _field_name: &str) -> Result<u32, ModelError> {
        read_le!(self, u32)
    }

    fn read_double(&mut self, _field_name: &str) -> Result<f64, ModelError> {
        read_le!(self, f64)
    }

    fn read_string(&mut self, _field_name: &str) -> Result<Option<String>, ModelError> {
        self.read_str()
    }

    fn read_encodeable<T: Encodeable>(&mut self, field_name: &str) -> Result<T, ModelError> {
        self.enter()?;
        my_trace!(
            LogContext::codec("BinaryDecoder"),
            "Decoding {} '{}' at offset {}",
            T::TYPE_NAME,
            field_name,
            self.position
        );
        let result = T::decode(self);
        self.depth -= 1;
        result
    }

    fn read_encodeable_array<T: Encodeable>(
        &mut self,
        field_name: &str,
    ) -> Result<Option<Vec<T>>, ModelError> {
        let Some(length) = self.read_length()? else {
            return Ok(None);
        };
        self.limits.check_array(length)?;
        // Never trust the prefix for the allocation size.
        let mut values = Vec::with_capacity(length.min(self.remaining()));
        for _ in 0..length {
            values.push(self.read_encodeable(field_name)?);
        }
        Ok(Some(values))
    }
}
