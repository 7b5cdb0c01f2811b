// crates/mymodel-json/src/encoder.rs

//! Writes encodeables as UA JSON objects.

use crate::error::JsonCodecError;
use log::{trace, warn};
use mymodel::{Encodeable, Encoder, EncodingLimits, NamespaceScope};
use serde_json::{Map, Number, Value};

/// The JSON spelling of a Double: a number when finite, otherwise one of
/// `"NaN"`, `"Infinity"`, `"-Infinity"`.
pub(crate) fn double_to_value(value: f64) -> Value {
    match Number::from_f64(value) {
        Some(number) => Value::Number(number),
        None if value.is_nan() => Value::String("NaN".into()),
        None if value > 0.0 => Value::String("Infinity".into()),
        None => Value::String("-Infinity".into()),
    }
}

/// An `Encoder` that builds one `serde_json::Map` per structure.
///
/// Field names are used as keys; namespaces do not appear in the output.
pub struct JsonEncoder {
    frames: Vec<Map<String, Value>>,
    namespaces: Vec<String>,
    limits: EncodingLimits,
    depth: usize,
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::with_limits(EncodingLimits::default())
    }

    pub fn with_limits(limits: EncodingLimits) -> Self {
        Self {
            frames: vec![Map::new()],
            namespaces: Vec::new(),
            limits,
            depth: 0,
        }
    }

    /// Consumes the encoder and returns the root object.
    pub fn into_value(mut self) -> Value {
        Value::Object(self.frames.swap_remove(0))
    }

    fn insert(&mut self, field_name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(field_name.into(), value);
        }
    }

    fn enter(&mut self) -> Result<(), JsonCodecError> {
        let depth = self.depth + 1;
        self.limits.check_depth(depth)?;
        self.depth = depth;
        Ok(())
    }

    /// Encodes `value` into a fresh frame and returns it as an object.
    fn encode_object<T: Encodeable>(&mut self, value: &T) -> Result<Value, JsonCodecError> {
        self.enter()?;
        self.frames.push(Map::new());
        let result = value.encode(self);
        let frame = self.frames.pop().unwrap_or_default();
        self.depth -= 1;
        result.map(|()| Value::Object(frame))
    }
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceScope for JsonEncoder {
    fn push_namespace(&mut self, namespace_uri: &str) {
        self.namespaces.push(namespace_uri.into());
    }

    fn pop_namespace(&mut self) {
        if self.namespaces.pop().is_none() {
            warn!("JsonEncoder: pop_namespace called with an empty namespace stack");
        }
    }
}

impl Encoder for JsonEncoder {
    type Error = JsonCodecError;

    fn write_boolean(&mut self, field_name: &str, value: bool) -> Result<(), JsonCodecError> {
        self.insert(field_name, Value::Bool(value));
        Ok(())
    }

    fn write_int32(&mut self, field_name: &str, value: i32) -> Result<(), JsonCodecError> {
        self.insert(field_name, Value::from(value));
        Ok(())
    }

    fn write_uint32(&mut self, field_name: &str, value: u32) -> Result<(), JsonCodecError> {
        self.insert(field_name, Value::from(value));
        Ok(())
    }

    fn write_double(&mut self, field_name: &str, value: f64) -> Result<(), JsonCodecError> {
        self.insert(field_name, double_to_value(value));
        Ok(())
    }

    fn write_string(&mut self, field_name: &str, value: Option<&str>) -> Result<(), JsonCodecError> {
        if let Some(text) = value {
            self.limits.check_string(text.len())?;
            self.insert(field_name, Value::String(text.into()));
        }
        Ok(())
    }

    fn write_encodeable<T: Encodeable>(&mut self, field_name: &str, value: &T) -> Result<(), JsonCodecError> {
        trace!("JsonEncoder: writing {} as '{}'", T::TYPE_NAME, field_name);
        let object = self.encode_object(value)?;
        self.insert(field_name, object);
        Ok(())
    }

    fn write_encodeable_array<T: Encodeable>(
        &mut self,
        field_name: &str,
        values: Option<&[T]>,
    ) -> Result<(), JsonCodecError> {
        let Some(values) = values else {
            return Ok(());
        };
        self.limits.check_array(values.len())?;
        let mut items = Vec::with_capacity(values.len());
        for value in values {
            items.push(self.encode_object(value)?);
        }
        self.insert(field_name, Value::Array(items));
        Ok(())
    }
}

/// Encodes `value` as a JSON object.
pub fn to_json_value<T: Encodeable>(value: &T) -> Result<Value, JsonCodecError> {
    let mut encoder = JsonEncoder::new();
    value.encode(&mut encoder)?;
    Ok(encoder.into_value())
}

/// Encodes `value` as compact JSON text.
pub fn to_json_string<T: Encodeable>(value: &T) -> Result<String, JsonCodecError> {
    Ok(serde_json::to_string(&to_json_value(value)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mymodel::TemperatureReading;
    use serde_json::json;

    #[test]
    fn test_reading_object_layout() {
        let reading = TemperatureReading::new(21.5, Some("C".into()));
        assert_eq!(
            to_json_value(&reading).unwrap(),
            json!({ "TemperatureValueC": 21.5, "Unit": "C" })
        );
    }

    #[test]
    fn test_null_unit_is_omitted() {
        let value = to_json_value(&TemperatureReading::new(-4.0, None)).unwrap();
        assert_eq!(value, json!({ "TemperatureValueC": -4.0 }));
    }

    #[test]
    fn test_non_finite_doubles_are_strings() {
        assert_eq!(double_to_value(f64::NAN), json!("NaN"));
        assert_eq!(double_to_value(f64::INFINITY), json!("Infinity"));
        assert_eq!(double_to_value(f64::NEG_INFINITY), json!("-Infinity"));
        assert_eq!(double_to_value(0.25), json!(0.25));
    }

    #[test]
    fn test_array_limit() {
        let limits = EncodingLimits {
            max_array_length: 1,
            ..EncodingLimits::default()
        };
        let mut encoder = JsonEncoder::with_limits(limits);
        let readings = [TemperatureReading::default(), TemperatureReading::default()];
        assert!(matches!(
            encoder.write_encodeable_array("Readings", Some(&readings[..])),
            Err(JsonCodecError::Model(mymodel::ModelError::ArrayTooLong { length: 2, max: 1 }))
        ));
    }

    #[test]
    fn test_nested_objects() {
        let mut encoder = JsonEncoder::new();
        encoder
            .write_encodeable("Last", &TemperatureReading::new(1.0, None))
            .unwrap();
        encoder.write_encodeable_array::<TemperatureReading>("Empty", Some(&[])).unwrap();
        encoder.write_encodeable_array::<TemperatureReading>("Null", None).unwrap();
        assert_eq!(
            encoder.into_value(),
            json!({ "Last": { "TemperatureValueC": 1.0 }, "Empty": [] })
        );
    }
}
