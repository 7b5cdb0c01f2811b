// crates/mymodel-json/src/error.rs

use core::fmt;
use mymodel::ModelError;

/// Errors that can occur while reading or writing UA JSON.
#[derive(Debug)]
pub enum JsonCodecError {
    /// The text was not valid JSON.
    Json(serde_json::Error),

    /// A field held a JSON value of the wrong kind or out of range.
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    /// The document root is not a JSON object.
    NotAnObject,

    /// A limit or model-level error.
    Model(ModelError),
}

impl JsonCodecError {
    pub(crate) fn mismatch(field: &str, expected: &'static str) -> Self {
        JsonCodecError::TypeMismatch {
            field: field.into(),
            expected,
        }
    }
}

impl From<serde_json::Error> for JsonCodecError {
    fn from(e: serde_json::Error) -> Self {
        JsonCodecError::Json(e)
    }
}

impl From<ModelError> for JsonCodecError {
    fn from(e: ModelError) -> Self {
        JsonCodecError::Model(e)
    }
}

impl fmt::Display for JsonCodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonCodecError::Json(e) => write!(f, "JSON error: {}", e),
            JsonCodecError::TypeMismatch { field, expected } => {
                write!(f, "Field '{}' is not a valid {}", field, expected)
            }
            JsonCodecError::NotAnObject => write!(f, "JSON document is not an object"),
            JsonCodecError::Model(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for JsonCodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JsonCodecError::Json(e) => Some(e),
            JsonCodecError::Model(e) => Some(e),
            _ => None,
        }
    }
}
