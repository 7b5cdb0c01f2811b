// src/lib.rs

#![doc = "UA JSON encoding for the MyModel OPC UA information model."]
#![doc = ""]
#![doc = "Structures are written as JSON objects keyed by field name. Non-finite"]
#![doc = "Doubles are written as the strings `\"NaN\"`, `\"Infinity\"` and `\"-Infinity\"`;"]
#![doc = "null strings and null arrays are omitted."]

// --- Crate Modules ---

mod decoder;
mod encoder;
mod error;

// --- Public API Re-exports ---

pub use decoder::{JsonDecoder, from_json_str, from_json_value, from_json_value_with_limits};
pub use encoder::{JsonEncoder, to_json_string, to_json_value};
pub use error::JsonCodecError;
