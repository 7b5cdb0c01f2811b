//! Structured DataTypes defined by the model.

use crate::codec::{Decoder, Encodeable, Encoder, with_namespace};
use crate::ids::{browse_names, data_type_ids, namespaces, object_ids};
use crate::types::ExpandedNodeId;
use crate::utils::{is_equal_f64, is_equal_opt};
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::ops::{Deref, DerefMut};

/// A temperature measurement and the unit it was taken in.
#[derive(Debug, Clone, Default)]
pub struct TemperatureReading {
    pub temperature_value_c: f64,
    /// `None` is the null string.
    pub unit: Option<String>,
}

impl TemperatureReading {
    pub fn new(temperature_value_c: f64, unit: Option<String>) -> Self {
        Self {
            temperature_value_c,
            unit,
        }
    }
}

impl PartialEq for TemperatureReading {
    fn eq(&self, other: &Self) -> bool {
        if core::ptr::eq(self, other) {
            return true;
        }
        is_equal_f64(self.temperature_value_c, other.temperature_value_c)
            && is_equal_opt(self.unit.as_deref(), other.unit.as_deref())
    }
}

impl Encodeable for TemperatureReading {
    const TYPE_NAME: &'static str = browse_names::TEMPERATURE_READING;
    const DATA_TYPE_ID: ExpandedNodeId = data_type_ids::TEMPERATURE_READING;
    const BINARY_ENCODING_ID: ExpandedNodeId = object_ids::TEMPERATURE_READING_ENCODING_DEFAULT_BINARY;
    const XML_ENCODING_ID: ExpandedNodeId = object_ids::TEMPERATURE_READING_ENCODING_DEFAULT_XML;
    const JSON_ENCODING_ID: ExpandedNodeId = object_ids::TEMPERATURE_READING_ENCODING_DEFAULT_JSON;

    fn encode<E: Encoder + ?Sized>(&self, encoder: &mut E) -> Result<(), E::Error> {
        with_namespace(encoder, namespaces::MY_MODEL, |e| {
            e.write_double("TemperatureValueC", self.temperature_value_c)?;
            e.write_string("Unit", self.unit.as_deref())
        })
    }

    fn decode<D: Decoder + ?Sized>(decoder: &mut D) -> Result<Self, D::Error> {
        with_namespace(decoder, namespaces::MY_MODEL, |d| {
            let temperature_value_c = d.read_double("TemperatureValueC")?;
            let unit = d.read_string("Unit")?;
            Ok(Self {
                temperature_value_c,
                unit,
            })
        })
    }

    fn is_equal(&self, other: &dyn Any) -> bool {
        other
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }
}

/// An ordered list of readings (`ListOftemperature_reading`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemperatureReadingCollection(Vec<TemperatureReading>);

impl TemperatureReadingCollection {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn into_vec(self) -> Vec<TemperatureReading> {
        self.0
    }

    /// Deep copy of the elements as a plain vector.
    pub fn to_vec(&self) -> Vec<TemperatureReading> {
        self.0.clone()
    }

    /// Writes the collection as an encodeable array field.
    pub fn encode_as<E: Encoder + ?Sized>(&self, encoder: &mut E, field_name: &str) -> Result<(), E::Error> {
        encoder.write_encodeable_array(field_name, Some(self.0.as_slice()))
    }

    /// Reads an encodeable array field; a null array yields an empty collection.
    pub fn decode_from<D: Decoder + ?Sized>(decoder: &mut D, field_name: &str) -> Result<Self, D::Error> {
        Ok(decoder
            .read_encodeable_array::<TemperatureReading>(field_name)?
            .into())
    }
}

impl Deref for TemperatureReadingCollection {
    type Target = Vec<TemperatureReading>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for TemperatureReadingCollection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<TemperatureReading>> for TemperatureReadingCollection {
    fn from(values: Vec<TemperatureReading>) -> Self {
        Self(values)
    }
}

impl From<&[TemperatureReading]> for TemperatureReadingCollection {
    fn from(values: &[TemperatureReading]) -> Self {
        Self(values.to_vec())
    }
}

impl<const N: usize> From<[TemperatureReading; N]> for TemperatureReadingCollection {
    fn from(values: [TemperatureReading; N]) -> Self {
        Self(Vec::from(values))
    }
}

impl From<Option<Vec<TemperatureReading>>> for TemperatureReadingCollection {
    fn from(values: Option<Vec<TemperatureReading>>) -> Self {
        Self(values.unwrap_or_default())
    }
}

impl From<TemperatureReadingCollection> for Vec<TemperatureReading> {
    fn from(collection: TemperatureReadingCollection) -> Self {
        collection.0
    }
}

impl FromIterator<TemperatureReading> for TemperatureReadingCollection {
    fn from_iter<I: IntoIterator<Item = TemperatureReading>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for TemperatureReadingCollection {
    type Item = TemperatureReading;
    type IntoIter = alloc::vec::IntoIter<TemperatureReading>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TemperatureReadingCollection {
    type Item = &'a TemperatureReading;
    type IntoIter = core::slice::Iter<'a, TemperatureReading>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{BinaryDecoder, BinaryEncoder};
    use crate::error::ModelError;
    use alloc::vec;

    fn reading(value: f64, unit: Option<&str>) -> TemperatureReading {
        TemperatureReading::new(value, unit.map(String::from))
    }

    #[test]
    fn test_defaults_are_equal() {
        let a = TemperatureReading::default();
        assert_eq!(a.temperature_value_c, 0.0);
        assert_eq!(a.unit, None);
        assert_eq!(a, TemperatureReading::default());
    }

    #[test]
    fn test_changing_a_field_breaks_equality() {
        let a = reading(20.0, Some("C"));
        assert_ne!(a, reading(20.5, Some("C")));
        assert_ne!(a, reading(20.0, Some("F")));
        assert_ne!(a, reading(20.0, None));
    }

    #[test]
    fn test_nan_readings_are_equal() {
        assert_eq!(reading(f64::NAN, None), reading(f64::NAN, None));
    }

    #[test]
    fn test_is_equal_rejects_other_types() {
        let a = reading(1.0, None);
        assert!(a.is_equal(&reading(1.0, None)));
        assert!(!a.is_equal(&1.0f64));
        assert!(!a.is_equal(&String::from("1.0")));
    }

    #[test]
    fn test_encoding_ids() {
        let a = TemperatureReading::default();
        assert_eq!(a.data_type_id().node_id.as_u32(), Some(1));
        assert_eq!(a.binary_encoding_id().node_id.as_u32(), Some(10));
        assert_eq!(a.xml_encoding_id().node_id.as_u32(), Some(18));
        assert_eq!(a.json_encoding_id().node_id.as_u32(), Some(26));
    }

    #[test]
    fn test_binary_round_trip_keeps_null_unit() {
        for value in [reading(-40.0, Some("C")), reading(0.0, None), reading(f64::INFINITY, Some(""))] {
            let mut encoder = BinaryEncoder::new();
            value.encode(&mut encoder).unwrap();
            let mut decoder = BinaryDecoder::new(encoder.as_bytes());
            assert_eq!(TemperatureReading::decode(&mut decoder).unwrap(), value);
            assert!(decoder.is_at_end());
        }
    }

    #[test]
    fn test_truncated_reading_is_rejected() {
        let mut encoder = BinaryEncoder::new();
        reading(1.0, Some("Kelvin")).encode(&mut encoder).unwrap();
        let bytes = encoder.into_bytes();
        let mut decoder = BinaryDecoder::new(&bytes[..bytes.len() - 1]);
        assert_eq!(
            TemperatureReading::decode(&mut decoder),
            Err(ModelError::BufferTooShort)
        );
    }

    #[test]
    fn test_collection_conversions_keep_order() {
        let items = vec![reading(1.0, None), reading(2.0, Some("C")), reading(3.0, None)];
        let collection = TemperatureReadingCollection::from(items.clone());
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.to_vec(), items);
        assert_eq!(collection.into_vec(), items);

        assert!(TemperatureReadingCollection::from(None).is_empty());
        let from_array = TemperatureReadingCollection::from([reading(5.0, None)]);
        assert_eq!(from_array[0].temperature_value_c, 5.0);
        let collected: TemperatureReadingCollection = items.iter().cloned().collect();
        assert_eq!(Vec::from(collected), items);
    }

    #[test]
    fn test_collection_clone_is_deep() {
        let original = TemperatureReadingCollection::from(vec![reading(1.0, Some("C"))]);
        let mut copy = original.clone();
        assert_eq!(copy, original);
        assert!(!core::ptr::eq(&copy[0], &original[0]));
        copy[0].unit = Some(String::from("F"));
        assert_eq!(original[0].unit.as_deref(), Some("C"));
    }

    #[test]
    fn test_collection_array_field() {
        let collection = TemperatureReadingCollection::from(vec![reading(1.0, None), reading(2.0, None)]);
        let mut encoder = BinaryEncoder::new();
        collection.encode_as(&mut encoder, "Readings").unwrap();
        assert_eq!(&encoder.as_bytes()[..4], &[2, 0, 0, 0]);

        let mut decoder = BinaryDecoder::new(encoder.as_bytes());
        let decoded = TemperatureReadingCollection::decode_from(&mut decoder, "Readings").unwrap();
        assert_eq!(decoded, collection);

        let null_array = (-1i32).to_le_bytes();
        let mut decoder = BinaryDecoder::new(&null_array);
        let decoded = TemperatureReadingCollection::decode_from(&mut decoder, "Readings").unwrap();
        assert!(decoded.is_empty());
    }
}
