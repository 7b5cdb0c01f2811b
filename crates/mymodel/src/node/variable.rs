use super::{ChangeMasks, InstanceState, NodeState};
use crate::codec::Encodeable;
use crate::datatypes::TemperatureReading;
use crate::ids::opcua;
use crate::types::{NamespaceTable, NodeClass, NodeId};
use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::fmt;
use core::ops::{Deref, DerefMut};

/// A type that can be the value of a variable node.
pub trait VariableValue: Any + fmt::Debug {
    /// The DataType node for values of this type, resolved against `namespace_uris`.
    fn data_type(namespace_uris: &NamespaceTable) -> NodeId;
}

macro_rules! builtin_value {
    ($type:ty, $id:expr) => {
        impl VariableValue for $type {
            fn data_type(_namespace_uris: &NamespaceTable) -> NodeId {
                NodeId::numeric(0, $id)
            }
        }
    };
}

builtin_value!(bool, opcua::BOOLEAN);
builtin_value!(i32, opcua::INT32);
builtin_value!(u32, opcua::UINT32);
builtin_value!(f64, opcua::DOUBLE);
builtin_value!(String, opcua::STRING);

impl VariableValue for TemperatureReading {
    fn data_type(namespace_uris: &NamespaceTable) -> NodeId {
        Self::DATA_TYPE_ID
            .to_node_id(namespace_uris)
            .unwrap_or(NodeId::NULL)
    }
}

/// State shared by all variable nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseVariableState<T> {
    pub node: NodeState,
    value: Option<T>,
    pub data_type: NodeId,
    pub value_rank: i32,
    pub access_level: u8,
}

impl<T: VariableValue> BaseVariableState<T> {
    /// A scalar, readable variable with no value.
    pub fn new(
        parent: Option<&NodeState>,
        namespace_uris: &NamespaceTable,
        type_definition: u32,
        reference_type: u32,
    ) -> Self {
        let mut node = NodeState::new(NodeClass::Variable, parent);
        node.type_definition_id = NodeId::numeric(0, type_definition);
        node.reference_type_id = NodeId::numeric(0, reference_type);
        Self {
            node,
            value: None,
            data_type: T::data_type(namespace_uris),
            value_rank: opcua::VALUE_RANK_SCALAR,
            access_level: opcua::ACCESS_LEVEL_CURRENT_READ,
        }
    }
}

impl<T> BaseVariableState<T> {
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: T) {
        self.value = Some(value);
        self.node.change_masks.insert(ChangeMasks::VALUE);
    }

    /// Removes the value, leaving the variable empty.
    pub fn take_value(&mut self) -> Option<T> {
        let value = self.value.take();
        if value.is_some() {
            self.node.change_masks.insert(ChangeMasks::VALUE);
        }
        value
    }

    pub fn is_readable(&self) -> bool {
        self.access_level & opcua::ACCESS_LEVEL_CURRENT_READ != 0
    }

    pub fn is_writable(&self) -> bool {
        self.access_level & opcua::ACCESS_LEVEL_CURRENT_WRITE != 0
    }
}

macro_rules! variable_state {
    ($(#[$meta:meta])* $name:ident, $type_definition:expr, $reference_type:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name<T>(BaseVariableState<T>);

        impl<T: VariableValue> $name<T> {
            pub fn new(parent: Option<&NodeState>, namespace_uris: &NamespaceTable) -> Self {
                Self(BaseVariableState::new(
                    parent,
                    namespace_uris,
                    $type_definition,
                    $reference_type,
                ))
            }

            pub fn into_inner(self) -> BaseVariableState<T> {
                self.0
            }
        }

        impl<T> Deref for $name<T> {
            type Target = BaseVariableState<T>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<T> DerefMut for $name<T> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl<T: VariableValue> InstanceState for $name<T> {
            fn node(&self) -> &NodeState {
                &self.0.node
            }

            fn node_mut(&mut self) -> &mut NodeState {
                &mut self.0.node
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn Any> {
                self
            }
        }
    };
}

variable_state!(
    /// A property of its parent (PropertyType, referenced by HasProperty).
    PropertyState,
    opcua::PROPERTY_TYPE,
    opcua::HAS_PROPERTY
);

variable_state!(
    /// A data variable component of its parent (BaseDataVariableType, referenced by HasComponent).
    BaseDataVariableState,
    opcua::BASE_DATA_VARIABLE_TYPE,
    opcua::HAS_COMPONENT
);
