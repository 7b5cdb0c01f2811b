// crates/mymodel-xml/src/schema.rs

//! Builders for the schema dictionaries published by the `MyModel_BinarySchema`
//! and `MyModel_XmlSchema` variables.

use crate::error::XmlCodecError;
use crate::model;
use core::fmt::Write;
use mymodel::ids::{browse_names, namespaces};
use serde::Serialize;

/// Built-in types used by the model's structure fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Double,
    String,
}

impl FieldType {
    fn binary_type_name(self) -> &'static str {
        match self {
            FieldType::Double => "opc:Double",
            FieldType::String => "opc:String",
        }
    }

    fn xml_type_name(self) -> &'static str {
        match self {
            FieldType::Double => "xs:double",
            FieldType::String => "xs:string",
        }
    }

    /// Strings may be null; value types may not.
    fn nillable(self) -> bool {
        matches!(self, FieldType::String)
    }
}

/// Name and fields of one structured DataType, in encoding order.
#[derive(Debug, Clone, Copy)]
pub struct StructureDescription {
    pub name: &'static str,
    pub fields: &'static [(&'static str, FieldType)],
}

/// The structures the model defines.
pub const MODEL_STRUCTURES: &[StructureDescription] = &[StructureDescription {
    name: browse_names::TEMPERATURE_READING,
    fields: &[
        ("TemperatureValueC", FieldType::Double),
        ("Unit", FieldType::String),
    ],
}];

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

fn serialize_document<T: Serialize>(document: &T) -> Result<String, XmlCodecError> {
    let mut buffer = String::new();
    write!(&mut buffer, "{}", XML_DECLARATION)?;

    let mut serializer = quick_xml::se::Serializer::new(&mut buffer);
    serializer.indent(' ', 2);
    document.serialize(serializer)?;
    Ok(buffer)
}

/// Builds the OPC binary type dictionary for the model's structures.
pub fn binary_schema() -> Result<String, XmlCodecError> {
    let dictionary = build_type_dictionary(MODEL_STRUCTURES);
    log::debug!(
        "binary_schema: {} structured type(s) for {}",
        dictionary.structured_type.len(),
        dictionary.target_namespace
    );
    serialize_document(&dictionary)
}

/// Builds the XML schema for the model's structures.
pub fn xml_schema() -> Result<String, XmlCodecError> {
    let schema = build_schema(MODEL_STRUCTURES);
    log::debug!(
        "xml_schema: {} item(s) for {}",
        schema.items.len(),
        schema.target_namespace
    );
    serialize_document(&schema)
}

fn build_type_dictionary(structures: &[StructureDescription]) -> model::TypeDictionary {
    let structured_type = structures
        .iter()
        .map(|s| model::StructuredType {
            name: s.name.into(),
            base_type: "ua:ExtensionObject".into(),
            field: s
                .fields
                .iter()
                .map(|(name, ty)| model::Field {
                    name: (*name).into(),
                    type_name: ty.binary_type_name().into(),
                })
                .collect(),
        })
        .collect();

    model::TypeDictionary {
        import: vec![model::Import {
            namespace: namespaces::OPC_UA.into(),
            location: Some("Opc.Ua.BinarySchema.bsd".into()),
        }],
        structured_type,
        ..Default::default()
    }
}

fn build_schema(structures: &[StructureDescription]) -> model::Schema {
    let mut items = vec![model::SchemaItem::Import(model::SchemaImport {
        namespace: namespaces::OPC_UA_XSD.into(),
    })];

    for s in structures {
        let fields = s
            .fields
            .iter()
            .map(|(name, ty)| model::SchemaElement {
                name: (*name).into(),
                type_name: ty.xml_type_name().into(),
                min_occurs: Some("0".into()),
                max_occurs: None,
                nillable: ty.nillable().then_some(true),
            })
            .collect();
        items.push(model::SchemaItem::ComplexType(model::ComplexType {
            name: s.name.into(),
            sequence: model::Sequence { element: fields },
        }));
        items.push(model::SchemaItem::Element(model::SchemaElement {
            name: s.name.into(),
            type_name: format!("tns:{}", s.name),
            ..Default::default()
        }));

        // The array wrapper: List<Name> holding zero or more <Name> items.
        let list_name = format!("List{}", s.name);
        items.push(model::SchemaItem::ComplexType(model::ComplexType {
            name: list_name.clone(),
            sequence: model::Sequence {
                element: vec![model::SchemaElement {
                    name: s.name.into(),
                    type_name: format!("tns:{}", s.name),
                    min_occurs: Some("0".into()),
                    max_occurs: Some("unbounded".into()),
                    nillable: Some(true),
                }],
            },
        }));
        items.push(model::SchemaItem::Element(model::SchemaElement {
            name: list_name.clone(),
            type_name: format!("tns:{}", list_name),
            nillable: Some(true),
            ..Default::default()
        }));
    }

    model::Schema {
        items,
        ..Default::default()
    }
}
