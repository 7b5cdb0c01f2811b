// crates/mymodel-xml/src/error.rs

use core::fmt;
use core::num::{ParseFloatError, ParseIntError};
use mymodel::ModelError;
use quick_xml::Error as XmlError;
use quick_xml::errors::serialize::SeError;
use quick_xml::escape::EscapeError;
use quick_xml::events::attributes::AttrError;
use std::string::{FromUtf8Error, String};

/// Errors that can occur while reading or writing UA XML.
#[derive(Debug)]
pub enum XmlCodecError {
    /// An error from the underlying `quick-xml` reader.
    XmlParsing(XmlError),

    /// A malformed attribute.
    Attribute(AttrError),

    /// Text or an attribute value contained an invalid escape sequence.
    Escape(EscapeError),

    /// An error from the `quick-xml` writer's sink.
    Io(std::io::Error),

    /// An error from the `quick-xml` serde serializer (schema dictionaries).
    XmlSerializing(SeError),

    /// An error during string formatting.
    FmtError(fmt::Error),

    /// Element text or a name was not valid UTF-8.
    Utf8,

    /// A Double field did not hold a number, `INF`, `-INF` or `NaN`.
    ParseFloat(ParseFloatError),

    /// An integer field did not hold a number in range.
    ParseInt(ParseIntError),

    /// A Boolean field held something other than `true`, `false`, `1` or `0`.
    InvalidBoolean(String),

    /// An entity reference other than the predefined ones or a character reference.
    UnknownEntity(String),

    /// An element or attribute used a namespace prefix that is not declared.
    UnknownPrefix(String),

    /// The document's root element is not the one being decoded.
    UnexpectedElement { expected: String, found: String },

    /// The document has no root element, more than one, or is truncated.
    MalformedDocument(&'static str),

    /// A limit or model-level error.
    Model(ModelError),
}

impl From<XmlError> for XmlCodecError {
    fn from(e: XmlError) -> Self {
        XmlCodecError::XmlParsing(e)
    }
}

impl From<AttrError> for XmlCodecError {
    fn from(e: AttrError) -> Self {
        XmlCodecError::Attribute(e)
    }
}

impl From<EscapeError> for XmlCodecError {
    fn from(e: EscapeError) -> Self {
        XmlCodecError::Escape(e)
    }
}

impl From<std::io::Error> for XmlCodecError {
    fn from(e: std::io::Error) -> Self {
        XmlCodecError::Io(e)
    }
}

impl From<SeError> for XmlCodecError {
    fn from(e: SeError) -> Self {
        XmlCodecError::XmlSerializing(e)
    }
}

impl From<fmt::Error> for XmlCodecError {
    fn from(e: fmt::Error) -> Self {
        XmlCodecError::FmtError(e)
    }
}

impl From<core::str::Utf8Error> for XmlCodecError {
    fn from(_: core::str::Utf8Error) -> Self {
        XmlCodecError::Utf8
    }
}

impl From<FromUtf8Error> for XmlCodecError {
    fn from(_: FromUtf8Error) -> Self {
        XmlCodecError::Utf8
    }
}

impl From<ParseFloatError> for XmlCodecError {
    fn from(e: ParseFloatError) -> Self {
        XmlCodecError::ParseFloat(e)
    }
}

impl From<ParseIntError> for XmlCodecError {
    fn from(e: ParseIntError) -> Self {
        XmlCodecError::ParseInt(e)
    }
}

impl From<ModelError> for XmlCodecError {
    fn from(e: ModelError) -> Self {
        XmlCodecError::Model(e)
    }
}

impl fmt::Display for XmlCodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlCodecError::XmlParsing(e) => write!(f, "XML parsing error: {}", e),
            XmlCodecError::Attribute(e) => write!(f, "XML attribute error: {}", e),
            XmlCodecError::Escape(e) => write!(f, "XML escape error: {}", e),
            XmlCodecError::Io(e) => write!(f, "XML writing error: {}", e),
            XmlCodecError::XmlSerializing(e) => write!(f, "XML serializing error: {}", e),
            XmlCodecError::FmtError(e) => write!(f, "Formatting error: {}", e),
            XmlCodecError::Utf8 => write!(f, "XML content is not valid UTF-8"),
            XmlCodecError::ParseFloat(e) => write!(f, "Invalid Double value: {}", e),
            XmlCodecError::ParseInt(e) => write!(f, "Invalid integer value: {}", e),
            XmlCodecError::InvalidBoolean(v) => write!(f, "Invalid Boolean value: {}", v),
            XmlCodecError::UnknownEntity(name) => write!(f, "Unknown entity reference: &{};", name),
            XmlCodecError::UnknownPrefix(prefix) => {
                write!(f, "Undeclared namespace prefix: {}", prefix)
            }
            XmlCodecError::UnexpectedElement { expected, found } => {
                write!(f, "Expected element {} but found {}", expected, found)
            }
            XmlCodecError::MalformedDocument(msg) => write!(f, "Malformed XML document: {}", msg),
            XmlCodecError::Model(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for XmlCodecError {}
