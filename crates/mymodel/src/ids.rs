//! Central repository for the identifiers declared by the MyModel design.
//!
//! The numeric tables (`data_types`, `methods`, `objects`, `object_types`,
//! `variables`) hold the raw identifiers within the MyModel namespace. The
//! `*_ids` tables pair each of them with the namespace URI so they can be
//! resolved against any server's namespace table at runtime.

/// Numeric identifiers of the DataTypes in the model.
pub mod data_types {
    pub const TEMPERATURE_READING: u32 = 1;
}

/// Numeric identifiers of the Methods in the model.
pub mod methods {
    pub const TEMPERATURE_SENSOR_READ: u32 = 3;
}

/// Numeric identifiers of the Objects in the model.
pub mod objects {
    pub const TEMPERATURE_SENSOR1: u32 = 6;
    pub const TEMPERATURE_READING_ENCODING_DEFAULT_BINARY: u32 = 10;
    pub const TEMPERATURE_READING_ENCODING_DEFAULT_XML: u32 = 18;
    pub const TEMPERATURE_READING_ENCODING_DEFAULT_JSON: u32 = 26;
}

/// Numeric identifiers of the ObjectTypes in the model.
pub mod object_types {
    pub const TEMPERATURE_SENSOR: u32 = 2;
}

/// Numeric identifiers of the Variables in the model.
pub mod variables {
    pub const TEMPERATURE_SENSOR_SENSOR_NAME: u32 = 4;
    pub const TEMPERATURE_SENSOR_TEMPERATURE_VALUE_C: u32 = 5;
    pub const TEMPERATURE_SENSOR1_SENSOR_NAME: u32 = 8;
    pub const TEMPERATURE_SENSOR1_TEMPERATURE_VALUE_C: u32 = 9;
    pub const MY_MODEL_BINARY_SCHEMA: u32 = 11;
    pub const MY_MODEL_BINARY_SCHEMA_NAMESPACE_URI: u32 = 13;
    pub const MY_MODEL_BINARY_SCHEMA_DEPRECATED: u32 = 14;
    pub const MY_MODEL_BINARY_SCHEMA_TEMPERATURE_READING: u32 = 15;
    pub const MY_MODEL_XML_SCHEMA: u32 = 19;
    pub const MY_MODEL_XML_SCHEMA_NAMESPACE_URI: u32 = 21;
    pub const MY_MODEL_XML_SCHEMA_DEPRECATED: u32 = 22;
    pub const MY_MODEL_XML_SCHEMA_TEMPERATURE_READING: u32 = 23;
}

pub mod data_type_ids {
    use super::{data_types, namespaces::MY_MODEL};
    use crate::types::ExpandedNodeId;

    pub const TEMPERATURE_READING: ExpandedNodeId =
        ExpandedNodeId::new(data_types::TEMPERATURE_READING, MY_MODEL);
}

pub mod method_ids {
    use super::{methods, namespaces::MY_MODEL};
    use crate::types::ExpandedNodeId;

    pub const TEMPERATURE_SENSOR_READ: ExpandedNodeId =
        ExpandedNodeId::new(methods::TEMPERATURE_SENSOR_READ, MY_MODEL);
}

pub mod object_ids {
    use super::{namespaces::MY_MODEL, objects};
    use crate::types::ExpandedNodeId;

    pub const TEMPERATURE_SENSOR1: ExpandedNodeId =
        ExpandedNodeId::new(objects::TEMPERATURE_SENSOR1, MY_MODEL);
    pub const TEMPERATURE_READING_ENCODING_DEFAULT_BINARY: ExpandedNodeId =
        ExpandedNodeId::new(objects::TEMPERATURE_READING_ENCODING_DEFAULT_BINARY, MY_MODEL);
    pub const TEMPERATURE_READING_ENCODING_DEFAULT_XML: ExpandedNodeId =
        ExpandedNodeId::new(objects::TEMPERATURE_READING_ENCODING_DEFAULT_XML, MY_MODEL);
    pub const TEMPERATURE_READING_ENCODING_DEFAULT_JSON: ExpandedNodeId =
        ExpandedNodeId::new(objects::TEMPERATURE_READING_ENCODING_DEFAULT_JSON, MY_MODEL);
}

pub mod object_type_ids {
    use super::{namespaces::MY_MODEL, object_types};
    use crate::types::ExpandedNodeId;

    pub const TEMPERATURE_SENSOR: ExpandedNodeId =
        ExpandedNodeId::new(object_types::TEMPERATURE_SENSOR, MY_MODEL);
}

pub mod variable_ids {
    use super::{namespaces::MY_MODEL, variables};
    use crate::types::ExpandedNodeId;

    pub const TEMPERATURE_SENSOR_SENSOR_NAME: ExpandedNodeId =
        ExpandedNodeId::new(variables::TEMPERATURE_SENSOR_SENSOR_NAME, MY_MODEL);
    pub const TEMPERATURE_SENSOR_TEMPERATURE_VALUE_C: ExpandedNodeId =
        ExpandedNodeId::new(variables::TEMPERATURE_SENSOR_TEMPERATURE_VALUE_C, MY_MODEL);
    pub const TEMPERATURE_SENSOR1_SENSOR_NAME: ExpandedNodeId =
        ExpandedNodeId::new(variables::TEMPERATURE_SENSOR1_SENSOR_NAME, MY_MODEL);
    pub const TEMPERATURE_SENSOR1_TEMPERATURE_VALUE_C: ExpandedNodeId =
        ExpandedNodeId::new(variables::TEMPERATURE_SENSOR1_TEMPERATURE_VALUE_C, MY_MODEL);
    pub const MY_MODEL_BINARY_SCHEMA: ExpandedNodeId =
        ExpandedNodeId::new(variables::MY_MODEL_BINARY_SCHEMA, MY_MODEL);
    pub const MY_MODEL_BINARY_SCHEMA_NAMESPACE_URI: ExpandedNodeId =
        ExpandedNodeId::new(variables::MY_MODEL_BINARY_SCHEMA_NAMESPACE_URI, MY_MODEL);
    pub const MY_MODEL_BINARY_SCHEMA_DEPRECATED: ExpandedNodeId =
        ExpandedNodeId::new(variables::MY_MODEL_BINARY_SCHEMA_DEPRECATED, MY_MODEL);
    pub const MY_MODEL_BINARY_SCHEMA_TEMPERATURE_READING: ExpandedNodeId =
        ExpandedNodeId::new(variables::MY_MODEL_BINARY_SCHEMA_TEMPERATURE_READING, MY_MODEL);
    pub const MY_MODEL_XML_SCHEMA: ExpandedNodeId =
        ExpandedNodeId::new(variables::MY_MODEL_XML_SCHEMA, MY_MODEL);
    pub const MY_MODEL_XML_SCHEMA_NAMESPACE_URI: ExpandedNodeId =
        ExpandedNodeId::new(variables::MY_MODEL_XML_SCHEMA_NAMESPACE_URI, MY_MODEL);
    pub const MY_MODEL_XML_SCHEMA_DEPRECATED: ExpandedNodeId =
        ExpandedNodeId::new(variables::MY_MODEL_XML_SCHEMA_DEPRECATED, MY_MODEL);
    pub const MY_MODEL_XML_SCHEMA_TEMPERATURE_READING: ExpandedNodeId =
        ExpandedNodeId::new(variables::MY_MODEL_XML_SCHEMA_TEMPERATURE_READING, MY_MODEL);
}

/// Browse names used by the model. Both schema dictionaries are browsed as "MyModel".
pub mod browse_names {
    pub const MY_MODEL_BINARY_SCHEMA: &str = "MyModel";
    pub const MY_MODEL_XML_SCHEMA: &str = "MyModel";
    pub const READ: &str = "Read";
    pub const SENSOR_NAME: &str = "sensorName";
    pub const TEMPERATURE_READING: &str = "temperature_reading";
    pub const TEMPERATURE_SENSOR: &str = "temperatureSensor";
    pub const TEMPERATURE_SENSOR1: &str = "temperatureSensor1";
    pub const TEMPERATURE_VALUE_C: &str = "temperatureValueC";
}

/// Namespace URIs referenced by the model.
pub mod namespaces {
    pub const MY_MODEL: &str = "http://www.opcfoundation.org/MyModel/";
    pub const OPC_UA: &str = "http://opcfoundation.org/UA/";
    pub const OPC_UA_XSD: &str = "http://opcfoundation.org/UA/2008/02/Types.xsd";
}

/// Identifiers from the OPC UA base namespace (namespace 0) that the model refers to.
pub mod opcua {
    // DataTypes
    pub const BOOLEAN: u32 = 1;
    pub const INT32: u32 = 6;
    pub const UINT32: u32 = 7;
    pub const DOUBLE: u32 = 11;
    pub const STRING: u32 = 12;

    // ReferenceTypes
    pub const ORGANIZES: u32 = 35;
    pub const HAS_TYPE_DEFINITION: u32 = 40;
    pub const HAS_PROPERTY: u32 = 46;
    pub const HAS_COMPONENT: u32 = 47;

    // Types
    pub const BASE_OBJECT_TYPE: u32 = 58;
    pub const BASE_DATA_VARIABLE_TYPE: u32 = 63;
    pub const PROPERTY_TYPE: u32 = 68;

    // Objects
    pub const OBJECTS_FOLDER: u32 = 85;

    // Value ranks and access levels
    pub const VALUE_RANK_SCALAR: i32 = -1;
    pub const ACCESS_LEVEL_CURRENT_READ: u8 = 0x01;
    pub const ACCESS_LEVEL_CURRENT_WRITE: u8 = 0x02;
}
