//! Encoder/decoder interfaces shared by every wire encoding of the model.
//!
//! Data types implement `Encodeable` once, in terms of named field
//! reads and writes; each concrete encoding (UA binary here, XML and JSON in
//! the satellite crates) implements `Encoder`/`Decoder`.

pub mod binary;
pub mod extension;

pub use binary::{BinaryDecoder, BinaryEncoder};
pub use extension::{EncodeableFactory, ExtensionObject, ExtensionObjectBody};

use crate::error::ModelError;
use crate::types::ExpandedNodeId;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

/// Namespace scoping used while encoding the fields of a structure.
///
/// XML writes field elements in the pushed namespace; binary and JSON only
/// track the stack.
pub trait NamespaceScope {
    fn push_namespace(&mut self, namespace_uri: &str);
    fn pop_namespace(&mut self);
}

/// Runs `f` inside a pushed namespace and pops it again on every exit path.
pub fn with_namespace<S, R, E, F>(scope: &mut S, namespace_uri: &str, f: F) -> Result<R, E>
where
    S: NamespaceScope + ?Sized,
    F: FnOnce(&mut S) -> Result<R, E>,
{
    scope.push_namespace(namespace_uri);
    let result = f(scope);
    scope.pop_namespace();
    result
}

/// Writes named fields into some wire representation.
pub trait Encoder: NamespaceScope {
    type Error;

    fn write_boolean(&mut self, field_name: &str, value: bool) -> Result<(), Self::Error>;
    fn write_int32(&mut self, field_name: &str, value: i32) -> Result<(), Self::Error>;
    fn write_uint32(&mut self, field_name: &str, value: u32) -> Result<(), Self::Error>;
    fn write_double(&mut self, field_name: &str, value: f64) -> Result<(), Self::Error>;
    /// `None` is the null string, which is distinct from the empty string.
    fn write_string(&mut self, field_name: &str, value: Option<&str>) -> Result<(), Self::Error>;
    fn write_encodeable<T: Encodeable>(&mut self, field_name: &str, value: &T) -> Result<(), Self::Error>;
    /// `None` is the null array, which is distinct from the empty array.
    fn write_encodeable_array<T: Encodeable>(
        &mut self,
        field_name: &str,
        values: Option<&[T]>,
    ) -> Result<(), Self::Error>;
}

/// Reads named fields back, in the order they were written.
pub trait Decoder: NamespaceScope {
    type Error;

    fn read_boolean(&mut self, field_name: &str) -> Result<bool, Self::Error>;
    fn read_int32(&mut self, field_name: &str) -> Result<i32, Self::Error>;
    fn read_uint32(&mut self, field_name: &str) -> Result<u32, Self::Error>;
    fn read_double(&mut self, field_name: &str) -> Result<f64, Self::Error>;
    fn read_string(&mut self, field_name: &str) -> Result<Option<String>, Self::Error>;
    fn read_encodeable<T: Encodeable>(&mut self, field_name: &str) -> Result<T, Self::Error>;
    fn read_encodeable_array<T: Encodeable>(
        &mut self,
        field_name: &str,
    ) -> Result<Option<Vec<T>>, Self::Error>;
}

/// A structured data type with binary, XML and JSON representations.
pub trait Encodeable: Sized + 'static {
    /// Browse name of the DataType; also the XML element name of array items.
    const TYPE_NAME: &'static str;
    const DATA_TYPE_ID: ExpandedNodeId;
    const BINARY_ENCODING_ID: ExpandedNodeId;
    const XML_ENCODING_ID: ExpandedNodeId;
    const JSON_ENCODING_ID: ExpandedNodeId;

    fn data_type_id(&self) -> ExpandedNodeId {
        Self::DATA_TYPE_ID
    }

    fn binary_encoding_id(&self) -> ExpandedNodeId {
        Self::BINARY_ENCODING_ID
    }

    fn xml_encoding_id(&self) -> ExpandedNodeId {
        Self::XML_ENCODING_ID
    }

    fn json_encoding_id(&self) -> ExpandedNodeId {
        Self::JSON_ENCODING_ID
    }

    /// Writes every field in declaration order.
    fn encode<E: Encoder + ?Sized>(&self, encoder: &mut E) -> Result<(), E::Error>;

    /// Reads every field in the same order `encode` wrote them.
    fn decode<D: Decoder + ?Sized>(decoder: &mut D) -> Result<Self, D::Error>;

    /// Structural equality against a value of any type; `false` for other types.
    fn is_equal(&self, other: &dyn Any) -> bool;
}

/// Bounds applied by decoders (and the binary encoder) to untrusted lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingLimits {
    /// Maximum string length in bytes.
    pub max_string_length: usize,
    /// Maximum ByteString length in bytes.
    pub max_byte_string_length: usize,
    /// Maximum number of elements in an array.
    pub max_array_length: usize,
    /// Maximum nesting of encodeables within encodeables.
    pub max_encodeable_depth: usize,
}

impl Default for EncodingLimits {
    fn default() -> Self {
        Self {
            max_string_length: 65_535,
            max_byte_string_length: 1024 * 1024,
            max_array_length: 65_535,
            max_encodeable_depth: 100,
        }
    }
}

impl EncodingLimits {
    pub fn check_string(&self, length: usize) -> Result<(), ModelError> {
        if length > self.max_string_length {
            return Err(ModelError::StringTooLong {
                length,
                max: self.max_string_length,
            });
        }
        Ok(())
    }

    pub fn check_byte_string(&self, length: usize) -> Result<(), ModelError> {
        if length > self.max_byte_string_length {
            return Err(ModelError::ByteStringTooLong {
                length,
                max: self.max_byte_string_length,
            });
        }
        Ok(())
    }

    pub fn check_array(&self, length: usize) -> Result<(), ModelError> {
        if length > self.max_array_length {
            return Err(ModelError::ArrayTooLong {
                length,
                max: self.max_array_length,
            });
        }
        Ok(())
    }

    /// Checks the depth reached when entering one more nested encodeable.
    pub fn check_depth(&self, depth: usize) -> Result<(), ModelError> {
        if depth > self.max_encodeable_depth {
            return Err(ModelError::MaxDepthExceeded(self.max_encodeable_depth));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[derive(Default)]
    struct ScopeRecorder {
        stack: Vec<String>,
        events: Vec<&'static str>,
    }

    impl NamespaceScope for ScopeRecorder {
        fn push_namespace(&mut self, namespace_uri: &str) {
            self.stack.push(namespace_uri.into());
            self.events.push("push");
        }

        fn pop_namespace(&mut self) {
            self.stack.pop();
            self.events.push("pop");
        }
    }

    #[test]
    fn test_with_namespace_pops_on_success() {
        let mut scope = ScopeRecorder::default();
        let result: Result<u8, ModelError> = with_namespace(&mut scope, "urn:a", |s| {
            assert_eq!(s.stack, vec![String::from("urn:a")]);
            Ok(7)
        });
        assert_eq!(result, Ok(7));
        assert!(scope.stack.is_empty());
        assert_eq!(scope.events, vec!["push", "pop"]);
    }

    #[test]
    fn test_with_namespace_pops_on_error() {
        let mut scope = ScopeRecorder::default();
        let result: Result<(), ModelError> =
            with_namespace(&mut scope, "urn:a", |_| Err(ModelError::BufferTooShort));
        assert_eq!(result, Err(ModelError::BufferTooShort));
        assert!(scope.stack.is_empty());
        assert_eq!(scope.events, vec!["push", "pop"]);
    }

    #[test]
    fn test_limits_checks() {
        let limits = EncodingLimits {
            max_string_length: 4,
            max_byte_string_length: 2,
            max_array_length: 3,
            max_encodeable_depth: 1,
        };
        assert!(limits.check_string(4).is_ok());
        assert_eq!(
            limits.check_string(5),
            Err(ModelError::StringTooLong { length: 5, max: 4 })
        );
        assert_eq!(
            limits.check_byte_string(3),
            Err(ModelError::ByteStringTooLong { length: 3, max: 2 })
        );
        assert_eq!(
            limits.check_array(4),
            Err(ModelError::ArrayTooLong { length: 4, max: 3 })
        );
        assert!(limits.check_depth(1).is_ok());
        assert_eq!(limits.check_depth(2), Err(ModelError::MaxDepthExceeded(1)));
    }
}
