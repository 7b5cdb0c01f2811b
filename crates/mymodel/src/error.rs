use alloc::string::String;
use core::fmt;

/// Defines a portable, descriptive Error type for the MyModel core crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The input ended before the value being decoded was complete.
    BufferTooShort,
    /// A length prefix was negative (other than the null marker -1).
    InvalidLength(i32),
    /// A string or byte string did not contain valid UTF-8.
    InvalidUtf8,
    /// An encoding byte (NodeId form, ExtensionObject body) was not recognised.
    InvalidEncodingByte(u8),
    /// A decoded string exceeded `EncodingLimits::max_string_length`.
    StringTooLong { length: usize, max: usize },
    /// A decoded byte string exceeded `EncodingLimits::max_byte_string_length`.
    ByteStringTooLong { length: usize, max: usize },
    /// An array exceeded `EncodingLimits::max_array_length`.
    ArrayTooLong { length: usize, max: usize },
    /// Nested encodeables went deeper than `EncodingLimits::max_encodeable_depth`.
    MaxDepthExceeded(usize),
    /// A namespace URI is not registered in the namespace table.
    UnknownNamespace(String),
    /// A namespace index has no entry in the namespace table.
    UnknownNamespaceIndex(u16),
    /// No encodeable type is registered for the given encoding id.
    UnknownEncodingId(String),
    /// A value or node did not have the expected type.
    TypeMismatch,
    /// The ExtensionObject body is not in the binary encoding.
    UnsupportedBodyEncoding,
    /// A textual NodeId could not be parsed.
    InvalidNodeIdFormat,
    /// The embedded initialization string could not be decoded.
    InvalidInitializationString,
    /// The method is not defined on this object.
    MethodNotFound,
    /// The variable has no value yet.
    ValueNotSet,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooShort => write!(f, "Buffer is too short for the value being decoded"),
            Self::InvalidLength(v) => write!(f, "Invalid length prefix: {v}"),
            Self::InvalidUtf8 => write!(f, "String is not valid UTF-8"),
            Self::InvalidEncodingByte(v) => write!(f, "Invalid encoding byte: {v:#04x}"),
            Self::StringTooLong { length, max } => {
                write!(f, "String length {length} exceeds the limit of {max}")
            }
            Self::ByteStringTooLong { length, max } => {
                write!(f, "ByteString length {length} exceeds the limit of {max}")
            }
            Self::ArrayTooLong { length, max } => {
                write!(f, "Array length {length} exceeds the limit of {max}")
            }
            Self::MaxDepthExceeded(max) => {
                write!(f, "Encodeable nesting exceeds the maximum depth of {max}")
            }
            Self::UnknownNamespace(uri) => write!(f, "Namespace URI is not registered: {uri}"),
            Self::UnknownNamespaceIndex(index) => {
                write!(f, "Namespace index {index} is not in the namespace table")
            }
            Self::UnknownEncodingId(id) => write!(f, "No encodeable type registered for {id}"),
            Self::TypeMismatch => write!(f, "The value's type does not match the expected type"),
            Self::UnsupportedBodyEncoding => {
                write!(f, "ExtensionObject body is not binary encoded")
            }
            Self::InvalidNodeIdFormat => write!(f, "Invalid NodeId format"),
            Self::InvalidInitializationString => {
                write!(f, "The embedded initialization string is malformed")
            }
            Self::MethodNotFound => write!(f, "The method is not defined on this object"),
            Self::ValueNotSet => write!(f, "The variable does not hold a value"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ModelError {}

// --- From Implementations for Error Conversion ---

impl From<core::str::Utf8Error> for ModelError {
    fn from(_: core::str::Utf8Error) -> Self {
        ModelError::InvalidUtf8
    }
}

impl From<alloc::string::FromUtf8Error> for ModelError {
    fn from(_: alloc::string::FromUtf8Error) -> Self {
        ModelError::InvalidUtf8
    }
}

impl From<core::array::TryFromSliceError> for ModelError {
    fn from(_: core::array::TryFromSliceError) -> Self {
        ModelError::BufferTooShort
    }
}

impl From<base64::DecodeError> for ModelError {
    fn from(_: base64::DecodeError) -> Self {
        ModelError::InvalidInitializationString
    }
}
