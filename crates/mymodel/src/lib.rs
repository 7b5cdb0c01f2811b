#![cfg_attr(not(feature = "std"), no_std)]


// 'alloc' is used for dynamic allocation (e.g., strings, child lists, encoded buffers)
extern crate alloc;

// --- Foundation Modules ---
pub(crate) mod log;
pub mod error;
pub mod types;
pub mod ids;
pub mod utils;

// --- Encoding ---
pub mod codec;

// --- Model ---
pub mod datatypes;
pub mod node;

// --- Top-level Exports ---
pub use error::ModelError;
pub use types::{ExpandedNodeId, Identifier, NamespaceTable, NodeClass, NodeId, QualifiedName};
pub use codec::{
    BinaryDecoder, BinaryEncoder, Decoder, Encodeable, EncodeableFactory, Encoder,
    EncodingLimits, ExtensionObject, NamespaceScope, with_namespace,
};
pub use datatypes::{TemperatureReading, TemperatureReadingCollection};
pub use node::{
    BaseDataVariableState, BaseObjectState, ChangeMasks, InstanceState, NodeState,
    PropertyState, SystemContext, TemperatureSensorState,
};
