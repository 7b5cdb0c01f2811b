//! ExtensionObject: a structure value tagged with its encoding id, and the
//! factory that maps encoding ids back to concrete types.

use super::{BinaryDecoder, BinaryEncoder, Decoder, Encodeable, Encoder, EncodingLimits};
use crate::datatypes::TemperatureReading;
use crate::error::ModelError;
use crate::log::{LogContext, my_debug};
use crate::types::{ExpandedNodeId, NamespaceTable};
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::Any;

const BODY_NONE: u8 = 0x00;
const BODY_BINARY: u8 = 0x01;
const BODY_XML: u8 = 0x02;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtensionObjectBody {
    #[default]
    None,
    Binary(Vec<u8>),
    Xml(String),
}

/// A structure value wrapped with the id of the encoding its body uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionObject {
    pub type_id: ExpandedNodeId,
    pub body: ExtensionObjectBody,
}

impl ExtensionObject {
    pub fn null() -> Self {
        Self {
            type_id: ExpandedNodeId::local(crate::types::NodeId::NULL),
            body: ExtensionObjectBody::None,
        }
    }

    pub fn is_null(&self) -> bool {
        self.type_id.is_null() && self.body == ExtensionObjectBody::None
    }

    /// Binary-encodes `value` and tags it with its binary encoding id.
    pub fn from_encodeable<T: Encodeable>(value: &T) -> Result<Self, ModelError> {
        let mut encoder = BinaryEncoder::new();
        value.encode(&mut encoder)?;
        Ok(Self {
            type_id: T::BINARY_ENCODING_ID,
            body: ExtensionObjectBody::Binary(encoder.into_bytes()),
        })
    }

    /// Decodes the body as `T`.
    ///
    /// Fails with `TypeMismatch` when the type id is not `T`'s binary encoding
    /// id, and with `UnsupportedBodyEncoding` for XML or empty bodies.
    pub fn decode_body<T: Encodeable>(&self) -> Result<T, ModelError> {
        self.decode_body_with_limits(EncodingLimits::default())
    }

    pub fn decode_body_with_limits<T: Encodeable>(&self, limits: EncodingLimits) -> Result<T, ModelError> {
        if self.type_id != T::BINARY_ENCODING_ID {
            return Err(ModelError::TypeMismatch);
        }
        let ExtensionObjectBody::Binary(bytes) = &self.body else {
            return Err(ModelError::UnsupportedBodyEncoding);
        };
        let mut decoder = BinaryDecoder::with_limits(bytes, limits);
        T::decode(&mut decoder)
    }

    /// Writes the type id as a NodeId resolved against the encoder's namespace
    /// table, followed by the encoding byte and the length-prefixed body.
    pub fn encode(&self, encoder: &mut BinaryEncoder) -> Result<(), ModelError> {
        let type_id = self
            .type_id
            .to_node_id(encoder.namespace_uris())
            .ok_or_else(|| {
                ModelError::UnknownNamespace(
                    self.type_id
                        .namespace_uri
                        .as_deref()
                        .unwrap_or_default()
                        .to_string(),
                )
            })?;
        encoder.write_node_id(&type_id)?;
        match &self.body {
            ExtensionObjectBody::None => encoder.write_byte(BODY_NONE),
            ExtensionObjectBody::Binary(bytes) => {
                encoder.write_byte(BODY_BINARY);
                encoder.write_byte_string(Some(bytes.as_slice()))?;
            }
            ExtensionObjectBody::Xml(xml) => {
                encoder.write_byte(BODY_XML);
                encoder.write_string("", Some(xml.as_str()))?;
            }
        }
        Ok(())
    }

    /// Reads an ExtensionObject; the type id is converted back to URI form so
    /// it can be compared with the model's constants.
    pub fn decode(decoder: &mut BinaryDecoder<'_>) -> Result<Self, ModelError> {
        let node_id = decoder.read_node_id()?;
        let type_id = ExpandedNodeId::from_node_id(&node_id, decoder.namespace_uris())?;
        let body = match decoder.read_byte()? {
            BODY_NONE => ExtensionObjectBody::None,
            BODY_BINARY => {
                ExtensionObjectBody::Binary(decoder.read_byte_string()?.unwrap_or_default())
            }
            BODY_XML => ExtensionObjectBody::Xml(decoder.read_string("")?.unwrap_or_default()),
            other => return Err(ModelError::InvalidEncodingByte(other)),
        };
        Ok(Self { type_id, body })
    }
}

impl Default for ExtensionObject {
    fn default() -> Self {
        Self::null()
    }
}

type DecodeFn = fn(&mut BinaryDecoder<'_>) -> Result<Box<dyn Any>, ModelError>;

fn decode_boxed<T: Encodeable>(decoder: &mut BinaryDecoder<'_>) -> Result<Box<dyn Any>, ModelError> {
    Ok(Box::new(T::decode(decoder)?))
}

/// Registry of encodeable types keyed by binary encoding id.
#[derive(Debug, Clone, Default)]
pub struct EncodeableFactory {
    types: BTreeMap<ExpandedNodeId, DecodeFn>,
}

impl EncodeableFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory with every data type this model defines.
    pub fn with_model_types() -> Self {
        let mut factory = Self::new();
        factory.register::<TemperatureReading>();
        factory
    }

    /// Registers `T` under its binary encoding id. Re-registering replaces the entry.
    pub fn register<T: Encodeable>(&mut self) {
        my_debug!(
            LogContext::node(T::TYPE_NAME, T::BINARY_ENCODING_ID.node_id.as_u32().unwrap_or_default()),
            "Registering encodeable type"
        );
        self.types.insert(T::BINARY_ENCODING_ID, decode_boxed::<T>);
    }

    pub fn contains(&self, encoding_id: &ExpandedNodeId) -> bool {
        self.types.contains_key(encoding_id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Decodes the body of `object` into the type registered for its type id.
    pub fn decode(&self, object: &ExtensionObject) -> Result<Box<dyn Any>, ModelError> {
        self.decode_with_limits(object, EncodingLimits::default())
    }

    /// Like `decode`, with `limits` applied to the body.
    pub fn decode_with_limits(
        &self,
        object: &ExtensionObject,
        limits: EncodingLimits,
    ) -> Result<Box<dyn Any>, ModelError> {
        let decode = self
            .types
            .get(&object.type_id)
            .ok_or_else(|| ModelError::UnknownEncodingId(object.type_id.to_string()))?;
        let ExtensionObjectBody::Binary(bytes) = &object.body else {
            return Err(ModelError::UnsupportedBodyEncoding);
        };
        decode(&mut BinaryDecoder::with_limits(bytes, limits))
    }
}

/// Convenience for callers holding a namespace table: encodes an
/// ExtensionObject into a fresh buffer.
pub fn encode_extension_object(
    object: &ExtensionObject,
    namespace_uris: &NamespaceTable,
) -> Result<Vec<u8>, ModelError> {
    let mut encoder = BinaryEncoder::with_context(namespace_uris.clone(), EncodingLimits::default());
    object.encode(&mut encoder)?;
    Ok(encoder.into_bytes())
}
