// crates/mymodel-json/src/decoder.rs

//! Reads UA JSON objects back into encodeables.

use crate::error::JsonCodecError;
use log::{trace, warn};
use mymodel::{Decoder, Encodeable, EncodingLimits, NamespaceScope};
use serde_json::{Map, Value};

/// Parses a Double from a number or one of the non-finite spellings.
pub(crate) fn value_to_double(field_name: &str, value: &Value) -> Result<f64, JsonCodecError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| JsonCodecError::mismatch(field_name, "Double")),
        Value::String(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            _ => Err(JsonCodecError::mismatch(field_name, "Double")),
        },
        _ => Err(JsonCodecError::mismatch(field_name, "Double")),
    }
}

/// A `Decoder` over a stack of JSON objects.
///
/// Each read removes its field from the current object; an absent or `null`
/// field decodes to its default.
pub struct JsonDecoder {
    frames: Vec<Map<String, Value>>,
    namespaces: Vec<String>,
    limits: EncodingLimits,
    depth: usize,
}

impl JsonDecoder {
    pub fn new(root: Map<String, Value>) -> Self {
        Self::with_limits(root, EncodingLimits::default())
    }

    pub fn with_limits(root: Map<String, Value>, limits: EncodingLimits) -> Self {
        Self {
            frames: vec![root],
            namespaces: Vec::new(),
            limits,
            depth: 0,
        }
    }

    /// Removes a field, treating `null` as absent.
    fn take(&mut self, field_name: &str) -> Option<Value> {
        match self.frames.last_mut()?.remove(field_name)? {
            Value::Null => None,
            value => Some(value),
        }
    }

    fn enter(&mut self) -> Result<(), JsonCodecError> {
        let depth = self.depth + 1;
        self.limits.check_depth(depth)?;
        self.depth = depth;
        Ok(())
    }

    fn decode_object<T: Encodeable>(&mut self, field_name: &str, value: Option<Value>) -> Result<T, JsonCodecError> {
        let frame = match value {
            None => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(JsonCodecError::mismatch(field_name, T::TYPE_NAME)),
        };
        self.enter()?;
        self.frames.push(frame);
        let result = T::decode(self);
        self.frames.pop();
        self.depth -= 1;
        result
    }
}

impl NamespaceScope for JsonDecoder {
    fn push_namespace(&mut self, namespace_uri: &str) {
        self.namespaces.push(namespace_uri.into());
    }

    fn pop_namespace(&mut self) {
        if self.namespaces.pop().is_none() {
            warn!("JsonDecoder: pop_namespace called with an empty namespace stack");
        }
    }
}

impl Decoder for JsonDecoder {
    type Error = JsonCodecError;

    fn read_boolean(&mut self, field_name: &str) -> Result<bool, JsonCodecError> {
        match self.take(field_name) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(b),
            Some(_) => Err(JsonCodecError::mismatch(field_name, "Boolean")),
        }
    }

    fn read_int32(&mut self, field_name: &str) -> Result<i32, JsonCodecError> {
        match self.take(field_name) {
            None => Ok(0),
            Some(value) => value
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| JsonCodecError::mismatch(field_name, "Int32")),
        }
    }

    fn read_uint32(&mut self, field_name: &str) -> Result<u32, JsonCodecError> {
        match self.take(field_name) {
            None => Ok(0),
            Some(value) => value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| JsonCodecError::mismatch(field_name, "UInt32")),
        }
    }

    fn read_double(&mut self, field_name: &str) -> Result<f64, JsonCodecError> {
        match self.take(field_name) {
            None => Ok(0.0),
            Some(value) => value_to_double(field_name, &value),
        }
    }

    fn read_string(&mut self, field_name: &str) -> Result<Option<String>, JsonCodecError> {
        match self.take(field_name) {
            None => Ok(None),
            Some(Value::String(s)) => {
                self.limits.check_string(s.len())?;
                Ok(Some(s))
            }
            Some(_) => Err(JsonCodecError::mismatch(field_name, "String")),
        }
    }

    fn read_encodeable<T: Encodeable>(&mut self, field_name: &str) -> Result<T, JsonCodecError> {
        trace!("JsonDecoder: reading {} from '{}'", T::TYPE_NAME, field_name);
        let value = self.take(field_name);
        self.decode_object(field_name, value)
    }

    fn read_encodeable_array<T: Encodeable>(
        &mut self,
        field_name: &str,
    ) -> Result<Option<Vec<T>>, JsonCodecError> {
        let items = match self.take(field_name) {
            None => return Ok(None),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(JsonCodecError::mismatch(field_name, "Array")),
        };
        self.limits.check_array(items.len())?;

        let mut values = Vec::with_capacity(items.len());
        for item in items {
            let item = match item {
                Value::Null => None,
                other => Some(other),
            };
            values.push(self.decode_object(field_name, item)?);
        }
        Ok(Some(values))
    }
}

/// Decodes `T` from a JSON object.
pub fn from_json_value<T: Encodeable>(value: Value) -> Result<T, JsonCodecError> {
    from_json_value_with_limits(value, EncodingLimits::default())
}

pub fn from_json_value_with_limits<T: Encodeable>(value: Value, limits: EncodingLimits) -> Result<T, JsonCodecError> {
    let Value::Object(root) = value else {
        return Err(JsonCodecError::NotAnObject);
    };
    let mut decoder = JsonDecoder::with_limits(root, limits);
    T::decode(&mut decoder)
}

/// Parses JSON text and decodes `T` from it.
pub fn from_json_str<T: Encodeable>(json: &str) -> Result<T, JsonCodecError> {
    from_json_value(serde_json::from_str(json)?)
}
