// src/lib.rs

#![doc = "UA XML encoding for the MyModel OPC UA information model."]
#![doc = ""]
#![doc = "It provides:"]
#![doc = "- `to_xml_string` / `from_xml_str`: encoding any `Encodeable` as a UA XML document."]
#![doc = "- `XmlEncoder` / `XmlDecoder`: the field-level codec behind them."]
#![doc = "- `binary_schema` / `xml_schema`: the type dictionaries describing the model's structures."]

// --- Crate Modules ---

mod decoder;
mod encoder;
mod error;
mod model;
mod schema;

// --- Public API Re-exports ---

pub use decoder::{XmlDecoder, XmlElement, from_xml_str, from_xml_str_with_limits, parse_document};
pub use encoder::{XmlEncoder, to_xml_string, to_xml_string_pretty};
pub use error::XmlCodecError;
pub use schema::{FieldType, MODEL_STRUCTURES, StructureDescription, binary_schema, xml_schema};
