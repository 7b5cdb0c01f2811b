use super::{ChangeMasks, InstanceState, NodeState, SystemContext};
use crate::error::ModelError;
use crate::ids::opcua;
use crate::types::{NodeClass, NodeId, QualifiedName};
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

/// An object node with an ordered list of arbitrary children.
#[derive(Debug)]
pub struct BaseObjectState {
    pub node: NodeState,
    children: Vec<Box<dyn InstanceState>>,
}

impl BaseObjectState {
    /// An object of type BaseObjectType under `parent`, reached via HasComponent.
    pub fn new(parent: Option<&NodeState>) -> Self {
        let mut node = NodeState::new(NodeClass::Object, parent);
        node.type_definition_id = NodeId::numeric(0, opcua::BASE_OBJECT_TYPE);
        node.reference_type_id = NodeId::numeric(0, opcua::HAS_COMPONENT);
        Self {
            node,
            children: Vec::new(),
        }
    }

    /// Appends a child after the existing ones.
    pub fn add_child(&mut self, child: Box<dyn InstanceState>) {
        self.children.push(child);
        self.node.change_masks.insert(ChangeMasks::CHILDREN);
    }

    pub fn children(&self) -> &[Box<dyn InstanceState>] {
        &self.children
    }
}

impl InstanceState for BaseObjectState {
    fn node(&self) -> &NodeState {
        &self.node
    }

    fn node_mut(&mut self) -> &mut NodeState {
        &mut self.node
    }

    fn get_children<'a>(&'a self, _context: &SystemContext, children: &mut Vec<&'a dyn InstanceState>) {
        for child in &self.children {
            children.push(child.as_ref());
        }
    }

    fn find_child(
        &mut self,
        _context: &SystemContext,
        browse_name: &QualifiedName,
        create_or_replace: bool,
        replacement: Option<Box<dyn InstanceState>>,
    ) -> Result<Option<&mut dyn InstanceState>, ModelError> {
        if browse_name.is_null() {
            return Ok(None);
        }
        let position = self
            .children
            .iter()
            .position(|child| &child.node().browse_name == browse_name);

        let index = match (position, create_or_replace.then_some(replacement).flatten()) {
            (Some(index), Some(replacement)) => {
                self.children[index] = replacement;
                self.node.change_masks.insert(ChangeMasks::CHILDREN);
                index
            }
            (Some(index), None) => index,
            (None, Some(replacement)) => {
                self.add_child(replacement);
                self.children.len() - 1
            }
            (None, None) => return Ok(None),
        };
        let child: &mut dyn InstanceState = self.children[index].as_mut();
        Ok(Some(child))
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
