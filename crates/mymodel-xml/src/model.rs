// crates/mymodel-xml/src/model.rs

//! `serde` structures mapping the OPC binary type dictionary and the XML
//! schema of the model's data types.

#![allow(clippy::pedantic)] // Schema element names are not idiomatic Rust

use mymodel::ids::namespaces;
use serde::Serialize;

pub const BINARY_SCHEMA_NS: &str = "http://opcfoundation.org/BinarySchema/";
pub const XML_SCHEMA_NS: &str = "http://www.w3.org/2001/XMLSchema";
pub const XML_SCHEMA_INSTANCE_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

// --- Binary type dictionary (OPC UA Part 5, Annex C) ---

/// `<opc:TypeDictionary>`, the value of `MyModel_BinarySchema`.
#[derive(Debug, Serialize)]
#[serde(rename = "opc:TypeDictionary")]
pub struct TypeDictionary {
    #[serde(rename = "@xmlns:opc")]
    pub xmlns_opc: String,

    #[serde(rename = "@xmlns:xsi")]
    pub xmlns_xsi: String,

    #[serde(rename = "@xmlns:ua")]
    pub xmlns_ua: String,

    #[serde(rename = "@xmlns:tns")]
    pub xmlns_tns: String,

    #[serde(rename = "@DefaultByteOrder")]
    pub default_byte_order: String,

    #[serde(rename = "@TargetNamespace")]
    pub target_namespace: String,

    #[serde(rename = "opc:Import")]
    pub import: Vec<Import>,

    #[serde(rename = "opc:StructuredType")]
    pub structured_type: Vec<StructuredType>,
}

impl Default for TypeDictionary {
    fn default() -> Self {
        Self {
            xmlns_opc: BINARY_SCHEMA_NS.into(),
            xmlns_xsi: XML_SCHEMA_INSTANCE_NS.into(),
            xmlns_ua: namespaces::OPC_UA.into(),
            xmlns_tns: namespaces::MY_MODEL.into(),
            default_byte_order: "LittleEndian".into(),
            target_namespace: namespaces::MY_MODEL.into(),
            import: Vec::new(),
            structured_type: Vec::new(),
        }
    }
}

/// `<opc:Import>` of another dictionary.
#[derive(Debug, Serialize, Default)]
pub struct Import {
    #[serde(rename = "@Namespace")]
    pub namespace: String,

    #[serde(rename = "@Location", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct StructuredType {
    #[serde(rename = "@Name")]
    pub name: String,

    #[serde(rename = "@BaseType")]
    pub base_type: String,

    #[serde(rename = "opc:Field")]
    pub field: Vec<Field>,
}

#[derive(Debug, Serialize, Default)]
pub struct Field {
    #[serde(rename = "@Name")]
    pub name: String,

    #[serde(rename = "@TypeName")]
    pub type_name: String,
}

// --- XML schema ---

/// `<xs:schema>`, the value of `MyModel_XmlSchema`.
#[derive(Debug, Serialize)]
#[serde(rename = "xs:schema")]
pub struct Schema {
    #[serde(rename = "@xmlns:xs")]
    pub xmlns_xs: String,

    #[serde(rename = "@xmlns:ua")]
    pub xmlns_ua: String,

    #[serde(rename = "@xmlns:tns")]
    pub xmlns_tns: String,

    #[serde(rename = "@targetNamespace")]
    pub target_namespace: String,

    #[serde(rename = "@elementFormDefault")]
    pub element_form_default: String,

    /// Imports, complex types and global elements in document order.
    #[serde(rename = "$value")]
    pub items: Vec<SchemaItem>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            xmlns_xs: XML_SCHEMA_NS.into(),
            xmlns_ua: namespaces::OPC_UA_XSD.into(),
            xmlns_tns: namespaces::MY_MODEL.into(),
            target_namespace: namespaces::MY_MODEL.into(),
            element_form_default: "qualified".into(),
            items: Vec::new(),
        }
    }
}

/// A top-level child of `<xs:schema>`.
#[derive(Debug, Serialize)]
pub enum SchemaItem {
    #[serde(rename = "xs:import")]
    Import(SchemaImport),

    #[serde(rename = "xs:complexType")]
    ComplexType(ComplexType),

    #[serde(rename = "xs:element")]
    Element(SchemaElement),
}

#[derive(Debug, Serialize, Default)]
pub struct SchemaImport {
    #[serde(rename = "@namespace")]
    pub namespace: String,
}

#[derive(Debug, Serialize, Default)]
pub struct ComplexType {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "xs:sequence")]
    pub sequence: Sequence,
}

#[derive(Debug, Serialize, Default)]
pub struct Sequence {
    #[serde(rename = "xs:element")]
    pub element: Vec<SchemaElement>,
}

/// `<xs:element>`, both as a sequence member and as a global declaration.
#[derive(Debug, Serialize, Default)]
pub struct SchemaElement {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@type")]
    pub type_name: String,

    #[serde(rename = "@minOccurs", skip_serializing_if = "Option::is_none")]
    pub min_occurs: Option<String>,

    #[serde(rename = "@maxOccurs", skip_serializing_if = "Option::is_none")]
    pub max_occurs: Option<String>,

    #[serde(rename = "@nillable", skip_serializing_if = "Option::is_none")]
    pub nillable: Option<bool>,
}
