//! The serialized instance declaration of the `temperatureSensor` type.
//!
//! The blob is UA binary: a namespace URI array, a server URI array, then the
//! node tree. Only the two URI arrays are interpreted here; the node tree is
//! rebuilt in code by `TemperatureSensorState::initialize`.

use crate::codec::{BinaryDecoder, Decoder};
use crate::error::ModelError;
use alloc::string::String;
use alloc::vec::Vec;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

pub const INITIALIZATION_STRING: &str = concat!(
    "AQAAACUAAABodHRwOi8vd3d3Lm9wY2ZvdW5kYXRpb24ub3JnL015TW9kZWwv/////wRggAIBAAAAAQAZ",
    "AAAAdGVtcGVyYXR1cmVTZW5zb3JJbnN0YW5jZQEBAgABAQIAAgAAAP////8CAAAAFWCJCgIAAAABAAoA",
    "AABzZW5zb3JOYW1lAQEEAAAuAEQEAAAAAAz/////AQH/////AAAAABVgiQoCAAAAAQARAAAAdGVtcGVy",
    "YXR1cmVWYWx1ZUMBAQUAAC8APwUAAAABAQEA/////wEB/////wAAAAA=",
);

/// Leading tables of the initialization string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializationHeader {
    /// Namespaces the node tree's indices refer to, starting at index 1.
    pub namespace_uris: Vec<String>,
    pub server_uris: Vec<String>,
    /// Offset of the node tree within the decoded bytes.
    pub body_offset: usize,
}

/// Base64-decodes `INITIALIZATION_STRING`.
pub fn decode_initialization_string() -> Result<Vec<u8>, ModelError> {
    Ok(BASE64.decode(INITIALIZATION_STRING)?)
}

/// Reads the namespace and server URI arrays from decoded initialization bytes.
pub fn read_initialization_header(bytes: &[u8]) -> Result<InitializationHeader, ModelError> {
    let mut decoder = BinaryDecoder::new(bytes);
    let namespace_uris = read_uri_array(&mut decoder, "NamespaceUris")?;
    let server_uris = read_uri_array(&mut decoder, "ServerUris")?;
    Ok(InitializationHeader {
        namespace_uris,
        server_uris,
        body_offset: decoder.position(),
    })
}

fn read_uri_array(decoder: &mut BinaryDecoder<'_>, field_name: &str) -> Result<Vec<String>, ModelError> {
    let count = match decoder.read_int32(field_name)? {
        -1 => return Ok(Vec::new()),
        n if n < 0 => return Err(ModelError::InvalidLength(n)),
        n => n as usize,
    };
    decoder.limits().check_array(count)?;
    let mut uris = Vec::with_capacity(count.min(decoder.remaining()));
    for _ in 0..count {
        uris.push(decoder.read_string(field_name)?.unwrap_or_default());
    }
    Ok(uris)
}
