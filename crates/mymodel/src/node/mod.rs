//! In-memory address-space nodes for the model's types.

pub mod init;
mod object;
mod sensor;
mod variable;

pub use object::BaseObjectState;
pub use sensor::TemperatureSensorState;
pub use variable::{BaseDataVariableState, BaseVariableState, PropertyState, VariableValue};

use crate::codec::{EncodeableFactory, EncodingLimits, ExtensionObject};
use crate::error::ModelError;
use crate::ids::namespaces;
use crate::types::{NamespaceTable, NodeClass, NodeId, QualifiedName};
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::ops::BitOr;

/// Runtime context shared by node operations: the server's namespace table
/// and the encoding limits applied when values are decoded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemContext {
    pub namespace_uris: NamespaceTable,
    pub limits: EncodingLimits,
}

impl SystemContext {
    pub fn new(namespace_uris: NamespaceTable, limits: EncodingLimits) -> Self {
        Self {
            namespace_uris,
            limits,
        }
    }

    /// A context whose namespace table has the MyModel namespace at index 1.
    pub fn for_model() -> Self {
        let mut namespace_uris = NamespaceTable::new();
        namespace_uris.append(namespaces::MY_MODEL);
        Self::new(namespace_uris, EncodingLimits::default())
    }

    /// Index of the MyModel namespace in this context's table.
    pub fn model_namespace_index(&self) -> Result<u16, ModelError> {
        self.namespace_uris
            .get_index(namespaces::MY_MODEL)
            .ok_or_else(|| ModelError::UnknownNamespace(namespaces::MY_MODEL.into()))
    }

    /// Decodes an ExtensionObject through `factory` under this context's limits.
    pub fn decode_extension_object(
        &self,
        factory: &EncodeableFactory,
        object: &ExtensionObject,
    ) -> Result<Box<dyn Any>, ModelError> {
        factory.decode_with_limits(object, self.limits)
    }
}

/// Which parts of a node changed since the masks were last cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeMasks(pub u32);

impl ChangeMasks {
    pub const NONE: Self = Self(0);
    pub const CHILDREN: Self = Self(1 << 0);
    pub const REFERENCES: Self = Self(1 << 1);
    pub const NON_VALUE: Self = Self(1 << 2);
    pub const VALUE: Self = Self(1 << 3);
    pub const DELETED: Self = Self(1 << 4);

    /// Checks if all of the specified flags are set.
    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for ChangeMasks {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Attributes common to every node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    pub node_id: NodeId,
    pub node_class: NodeClass,
    pub browse_name: QualifiedName,
    pub display_name: String,
    pub type_definition_id: NodeId,
    /// Reference type from the parent to this node.
    pub reference_type_id: NodeId,
    pub parent_id: Option<NodeId>,
    pub change_masks: ChangeMasks,
}

impl NodeState {
    /// A node of `node_class` whose parent is `parent`, with null ids and names.
    pub fn new(node_class: NodeClass, parent: Option<&NodeState>) -> Self {
        Self {
            node_id: NodeId::NULL,
            node_class,
            browse_name: QualifiedName::default(),
            display_name: String::new(),
            type_definition_id: NodeId::NULL,
            reference_type_id: NodeId::NULL,
            parent_id: parent.map(|p| p.node_id.clone()),
            change_masks: ChangeMasks::NONE,
        }
    }

    /// Sets the browse name and uses its name part as the display name.
    pub fn set_browse_name(&mut self, browse_name: QualifiedName) {
        self.display_name = browse_name.name.clone();
        self.browse_name = browse_name;
        self.change_masks.insert(ChangeMasks::NON_VALUE);
    }

    pub fn clear_change_masks(&mut self) {
        self.change_masks = ChangeMasks::NONE;
    }
}

/// A node that is an instance within the address space: an object or a
/// variable that can have children addressed by browse name.
pub trait InstanceState: Any + fmt::Debug {
    fn node(&self) -> &NodeState;

    fn node_mut(&mut self) -> &mut NodeState;

    /// Appends the node's children to `children`.
    fn get_children<'a>(&'a self, _context: &SystemContext, _children: &mut Vec<&'a dyn InstanceState>) {}

    /// Finds the child with `browse_name`.
    ///
    /// With `create_or_replace`, a missing child may be created, or installed
    /// from `replacement`. Returns `Ok(None)` when no child matches.
    fn find_child(
        &mut self,
        _context: &SystemContext,
        _browse_name: &QualifiedName,
        _create_or_replace: bool,
        _replacement: Option<Box<dyn InstanceState>>,
    ) -> Result<Option<&mut dyn InstanceState>, ModelError> {
        Ok(None)
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Unboxes `replacement` as a `T`, or fails with `TypeMismatch`.
pub(crate) fn downcast_replacement<T: InstanceState>(
    replacement: Box<dyn InstanceState>,
) -> Result<T, ModelError> {
    replacement
        .into_any()
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| ModelError::TypeMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_masks_bitor() {
        let masks = ChangeMasks::CHILDREN | ChangeMasks::VALUE;
        assert_eq!(masks.0, 0b1001);
        assert!(masks.contains(ChangeMasks::CHILDREN));
        assert!(!masks.contains(ChangeMasks::REFERENCES));

        let mut masks = masks;
        masks.remove(ChangeMasks::CHILDREN);
        assert_eq!(masks, ChangeMasks::VALUE);
        masks.remove(ChangeMasks::VALUE);
        assert!(masks.is_empty());
    }

    #[test]
    fn test_context_for_model() {
        let context = SystemContext::for_model();
        assert_eq!(context.model_namespace_index(), Ok(1));
        assert_eq!(
            SystemContext::default().model_namespace_index(),
            Err(ModelError::UnknownNamespace(namespaces::MY_MODEL.into()))
        );
    }

    #[test]
    fn test_context_limits_apply_to_extension_objects() {
        use crate::datatypes::TemperatureReading;

        let mut context = SystemContext::for_model();
        context.limits.max_string_length = 2;
        let factory = EncodeableFactory::with_model_types();
        let object =
            ExtensionObject::from_encodeable(&TemperatureReading::new(1.0, Some("Kelvin".into()))).unwrap();
        assert_eq!(
            context.decode_extension_object(&factory, &object).err(),
            Some(ModelError::StringTooLong { length: 6, max: 2 })
        );

        context.limits = EncodingLimits::default();
        let value = context.decode_extension_object(&factory, &object).unwrap();
        assert_eq!(
            value.downcast_ref::<TemperatureReading>().and_then(|r| r.unit.as_deref()),
            Some("Kelvin")
        );
    }

    #[test]
    fn test_node_state_takes_parent_id() {
        let mut parent = NodeState::new(NodeClass::Object, None);
        parent.node_id = NodeId::numeric(1, 6);
        let child = NodeState::new(NodeClass::Variable, Some(&parent));
        assert_eq!(child.parent_id, Some(NodeId::numeric(1, 6)));
        assert!(child.node_id.is_null());
    }
}
