use super::init::{decode_initialization_string, read_initialization_header};
use super::{
    BaseDataVariableState, BaseObjectState, ChangeMasks, InstanceState, NodeState, PropertyState,
    SystemContext, downcast_replacement,
};
use crate::datatypes::TemperatureReading;
use crate::error::ModelError;
use crate::ids::{browse_names, methods, namespaces, object_types, objects, opcua, variables};
use crate::log::{LogContext, my_debug, my_info, my_trace};
use crate::types::{NamespaceTable, NodeId, QualifiedName};
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

/// An instance of the `temperatureSensor` ObjectType.
///
/// Both children are optional slots: they are filled by `initialize`, by
/// `find_child` with `create_or_replace`, or through the setters.
#[derive(Debug)]
pub struct TemperatureSensorState {
    base: BaseObjectState,
    sensor_name: Option<PropertyState<String>>,
    temperature_value_c: Option<BaseDataVariableState<TemperatureReading>>,
}

impl TemperatureSensorState {
    pub fn new(parent: Option<&NodeState>) -> Self {
        Self {
            base: BaseObjectState::new(parent),
            sensor_name: None,
            temperature_value_c: None,
        }
    }

    pub fn base(&self) -> &BaseObjectState {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut BaseObjectState {
        &mut self.base
    }

    /// The `temperatureSensor` ObjectType id in `namespace_uris`, or the null
    /// id when the MyModel namespace is not registered.
    pub fn default_type_definition_id(&self, namespace_uris: &NamespaceTable) -> NodeId {
        NodeId::create(object_types::TEMPERATURE_SENSOR, namespaces::MY_MODEL, namespace_uris)
    }

    pub fn sensor_name(&self) -> Option<&PropertyState<String>> {
        self.sensor_name.as_ref()
    }

    pub fn sensor_name_mut(&mut self) -> Option<&mut PropertyState<String>> {
        self.sensor_name.as_mut()
    }

    /// Replaces the `sensorName` slot and returns the previous child.
    pub fn set_sensor_name(&mut self, child: Option<PropertyState<String>>) -> Option<PropertyState<String>> {
        if self.sensor_name.is_some() || child.is_some() {
            self.base.node.change_masks.insert(ChangeMasks::CHILDREN);
        }
        core::mem::replace(&mut self.sensor_name, child)
    }

    pub fn temperature_value_c(&self) -> Option<&BaseDataVariableState<TemperatureReading>> {
        self.temperature_value_c.as_ref()
    }

    pub fn temperature_value_c_mut(&mut self) -> Option<&mut BaseDataVariableState<TemperatureReading>> {
        self.temperature_value_c.as_mut()
    }

    /// Replaces the `temperatureValueC` slot and returns the previous child.
    pub fn set_temperature_value_c(
        &mut self,
        child: Option<BaseDataVariableState<TemperatureReading>>,
    ) -> Option<BaseDataVariableState<TemperatureReading>> {
        if self.temperature_value_c.is_some() || child.is_some() {
            self.base.node.change_masks.insert(ChangeMasks::CHILDREN);
        }
        core::mem::replace(&mut self.temperature_value_c, child)
    }

    /// Applies the type's instance declaration: sets the type definition and
    /// creates the mandatory children that are still missing.
    ///
    /// Fails with `UnknownNamespace` if a namespace used by the declaration is
    /// not registered in the context.
    pub fn initialize(&mut self, context: &SystemContext) -> Result<(), ModelError> {
        let bytes = decode_initialization_string()?;
        let header = read_initialization_header(&bytes)?;
        for uri in &header.namespace_uris {
            if context.namespace_uris.get_index(uri).is_none() {
                return Err(ModelError::UnknownNamespace(uri.clone()));
            }
        }
        let ns = context.model_namespace_index()?;

        if self.base.node.type_definition_id.is_null()
            || self.base.node.type_definition_id == NodeId::numeric(0, opcua::BASE_OBJECT_TYPE)
        {
            self.base.node.type_definition_id = self.default_type_definition_id(&context.namespace_uris);
        }

        if self.sensor_name.is_none() {
            let mut child = self.new_sensor_name(context)?;
            child.node.node_id = NodeId::numeric(ns, variables::TEMPERATURE_SENSOR_SENSOR_NAME);
            self.set_sensor_name(Some(child));
        }
        if self.temperature_value_c.is_none() {
            let mut child = self.new_temperature_value_c(context)?;
            child.node.node_id = NodeId::numeric(ns, variables::TEMPERATURE_SENSOR_TEMPERATURE_VALUE_C);
            self.set_temperature_value_c(Some(child));
        }

        my_debug!(
            self.log_context(),
            "Initialized from declaration ({} namespace(s), {} bytes of node data)",
            header.namespace_uris.len(),
            bytes.len() - header.body_offset
        );
        Ok(())
    }

    /// Builds the `temperatureSensor1` object organised under the Objects folder.
    pub fn create_temperature_sensor1(context: &SystemContext) -> Result<Self, ModelError> {
        let ns = context.model_namespace_index()?;
        let mut sensor = Self::new(None);
        sensor.base.node.node_id = NodeId::numeric(ns, objects::TEMPERATURE_SENSOR1);
        sensor
            .base
            .node
            .set_browse_name(QualifiedName::new(ns, browse_names::TEMPERATURE_SENSOR1));
        sensor.base.node.reference_type_id = NodeId::numeric(0, opcua::ORGANIZES);
        sensor.base.node.parent_id = Some(NodeId::numeric(0, opcua::OBJECTS_FOLDER));
        sensor.initialize(context)?;

        let parent_id = sensor.base.node.node_id.clone();
        if let Some(child) = sensor.sensor_name.as_mut() {
            child.node.node_id = NodeId::numeric(ns, variables::TEMPERATURE_SENSOR1_SENSOR_NAME);
            child.node.parent_id = Some(parent_id.clone());
        }
        if let Some(child) = sensor.temperature_value_c.as_mut() {
            child.node.node_id = NodeId::numeric(ns, variables::TEMPERATURE_SENSOR1_TEMPERATURE_VALUE_C);
            child.node.parent_id = Some(parent_id);
        }
        my_info!(sensor.log_context(), "Created {}", browse_names::TEMPERATURE_SENSOR1);
        Ok(sensor)
    }

    /// Invokes a method of the type. `Read` returns the current
    /// `temperatureValueC` reading.
    pub fn call_method(&self, method_id: &NodeId, context: &SystemContext) -> Result<TemperatureReading, ModelError> {
        let read_id = NodeId::create(methods::TEMPERATURE_SENSOR_READ, namespaces::MY_MODEL, &context.namespace_uris);
        if read_id.is_null() || *method_id != read_id {
            return Err(ModelError::MethodNotFound);
        }
        my_trace!(self.log_context(), "Read called");
        self.temperature_value_c
            .as_ref()
            .and_then(|child| child.value())
            .cloned()
            .ok_or(ModelError::ValueNotSet)
    }

    fn new_sensor_name(&self, context: &SystemContext) -> Result<PropertyState<String>, ModelError> {
        let ns = context.model_namespace_index()?;
        let mut child = PropertyState::new(Some(&self.base.node), &context.namespace_uris);
        child
            .node
            .set_browse_name(QualifiedName::new(ns, browse_names::SENSOR_NAME));
        child.node.clear_change_masks();
        Ok(child)
    }

    fn new_temperature_value_c(
        &self,
        context: &SystemContext,
    ) -> Result<BaseDataVariableState<TemperatureReading>, ModelError> {
        let ns = context.model_namespace_index()?;
        let mut child = BaseDataVariableState::new(Some(&self.base.node), &context.namespace_uris);
        child
            .node
            .set_browse_name(QualifiedName::new(ns, browse_names::TEMPERATURE_VALUE_C));
        child.node.clear_change_masks();
        Ok(child)
    }

    fn log_context(&self) -> LogContext {
        LogContext::node(
            "TemperatureSensorState",
            self.base.node.node_id.as_u32().unwrap_or_default(),
        )
    }
}

impl InstanceState for TemperatureSensorState {
    fn node(&self) -> &NodeState {
        &self.base.node
    }

    fn node_mut(&mut self) -> &mut NodeState {
        &mut self.base.node
    }

    fn get_children<'a>(&'a self, context: &SystemContext, children: &mut Vec<&'a dyn InstanceState>) {
        if let Some(child) = &self.sensor_name {
            children.push(child);
        }
        if let Some(child) = &self.temperature_value_c {
            children.push(child);
        }
        self.base.get_children(context, children);
    }

    /// Matches the fixed slots by the name part of `browse_name`, then falls
    /// back to the generic children.
    fn find_child(
        &mut self,
        context: &SystemContext,
        browse_name: &QualifiedName,
        create_or_replace: bool,
        mut replacement: Option<Box<dyn InstanceState>>,
    ) -> Result<Option<&mut dyn InstanceState>, ModelError> {
        if browse_name.is_null() {
            return Ok(None);
        }

        match browse_name.name.as_str() {
            browse_names::SENSOR_NAME => {
                if create_or_replace && self.sensor_name.is_none() {
                    let child = match replacement.take() {
                        Some(replacement) => downcast_replacement(replacement)?,
                        None => self.new_sensor_name(context)?,
                    };
                    my_debug!(self.log_context(), "Created child {}", browse_names::SENSOR_NAME);
                    self.set_sensor_name(Some(child));
                }
                if let Some(child) = self.sensor_name.as_mut() {
                    let child: &mut dyn InstanceState = child;
                    return Ok(Some(child));
                }
            }
            browse_names::TEMPERATURE_VALUE_C => {
                if create_or_replace && self.temperature_value_c.is_none() {
                    let child = match replacement.take() {
                        Some(replacement) => downcast_replacement(replacement)?,
                        None => self.new_temperature_value_c(context)?,
                    };
                    my_debug!(self.log_context(), "Created child {}", browse_names::TEMPERATURE_VALUE_C);
                    self.set_temperature_value_c(Some(child));
                }
                if let Some(child) = self.temperature_value_c.as_mut() {
                    let child: &mut dyn InstanceState = child;
                    return Ok(Some(child));
                }
            }
            _ => {}
        }

        self.base
            .find_child(context, browse_name, create_or_replace, replacement)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized() -> (SystemContext, TemperatureSensorState) {
        let context = SystemContext::for_model();
        let sensor = TemperatureSensorState::create_temperature_sensor1(&context).unwrap();
        (context, sensor)
    }

    #[test]
    fn test_default_type_definition() {
        let context = SystemContext::for_model();
        let sensor = TemperatureSensorState::new(None);
        assert_eq!(
            sensor.default_type_definition_id(&context.namespace_uris),
            NodeId::numeric(1, 2)
        );
        assert!(sensor
            .default_type_definition_id(&NamespaceTable::new())
            .is_null());
    }

    #[test]
    fn test_fresh_instance_has_no_children() {
        let context = SystemContext::for_model();
        let sensor = TemperatureSensorState::new(None);
        let mut children = Vec::new();
        sensor.get_children(&context, &mut children);
        assert!(children.is_empty());
    }

    #[test]
    fn test_create_temperature_sensor1_layout() {
        let (context, sensor) = initialized();
        let node = sensor.node();
        assert_eq!(node.node_id, NodeId::numeric(1, 6));
        assert_eq!(node.browse_name, QualifiedName::new(1, "temperatureSensor1"));
        assert_eq!(node.type_definition_id, NodeId::numeric(1, 2));
        assert_eq!(node.parent_id, Some(NodeId::numeric(0, opcua::OBJECTS_FOLDER)));
        assert_eq!(node.reference_type_id, NodeId::numeric(0, opcua::ORGANIZES));

        let mut children = Vec::new();
        sensor.get_children(&context, &mut children);
        let ids: Vec<_> = children.iter().map(|c| c.node().node_id.clone()).collect();
        assert_eq!(ids, [NodeId::numeric(1, 8), NodeId::numeric(1, 9)]);
        assert!(children
            .iter()
            .all(|c| c.node().parent_id == Some(NodeId::numeric(1, 6))));
    }

    #[test]
    fn test_initialize_requires_model_namespace() {
        let mut sensor = TemperatureSensorState::new(None);
        assert_eq!(
            sensor.initialize(&SystemContext::default()),
            Err(ModelError::UnknownNamespace(namespaces::MY_MODEL.into()))
        );
        assert!(sensor.sensor_name().is_none());
    }

    #[test]
    fn test_initialize_uses_declaration_ids() {
        let context = SystemContext::for_model();
        let mut sensor = TemperatureSensorState::new(None);
        sensor.initialize(&context).unwrap();
        let name = sensor.sensor_name().unwrap();
        assert_eq!(name.node.node_id, NodeId::numeric(1, 4));
        assert_eq!(name.data_type, NodeId::numeric(0, opcua::STRING));
        let value = sensor.temperature_value_c().unwrap();
        assert_eq!(value.node.node_id, NodeId::numeric(1, 5));
        assert_eq!(value.data_type, NodeId::numeric(1, 1));
        assert!(sensor.node().change_masks.contains(ChangeMasks::CHILDREN));
    }

    #[test]
    fn test_find_child_null_name() {
        let (context, mut sensor) = initialized();
        assert!(sensor
            .find_child(&context, &QualifiedName::default(), true, None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_find_child_matches_name_part_only() {
        let (context, mut sensor) = initialized();
        let found = sensor
            .find_child(&context, &QualifiedName::new(7, "sensorName"), false, None)
            .unwrap()
            .unwrap();
        assert_eq!(found.node().node_id, NodeId::numeric(1, 8));
    }

    #[test]
    fn test_find_child_creates_then_finds_same_instance() {
        let context = SystemContext::for_model();
        let mut sensor = TemperatureSensorState::new(None);
        let name = QualifiedName::new(1, "temperatureValueC");

        assert!(sensor.find_child(&context, &name, false, None).unwrap().is_none());

        let created = sensor.find_child(&context, &name, true, None).unwrap().unwrap();
        created
            .as_any_mut()
            .downcast_mut::<BaseDataVariableState<TemperatureReading>>()
            .unwrap()
            .set_value(TemperatureReading::new(19.0, Some("C".into())));

        let found = sensor.find_child(&context, &name, false, None).unwrap().unwrap();
        let variable = found
            .as_any()
            .downcast_ref::<BaseDataVariableState<TemperatureReading>>()
            .unwrap();
        assert_eq!(variable.value().map(|r| r.temperature_value_c), Some(19.0));
    }

    #[test]
    fn test_find_child_create_requires_model_namespace() {
        let context = SystemContext::default();
        let mut sensor = TemperatureSensorState::new(None);
        for name in ["sensorName", "temperatureValueC"] {
            let result = sensor.find_child(&context, &QualifiedName::new(1, name), true, None);
            assert_eq!(
                result.err(),
                Some(ModelError::UnknownNamespace(namespaces::MY_MODEL.into()))
            );
        }
        assert!(sensor.sensor_name().is_none());
        assert!(sensor.temperature_value_c().is_none());
        assert!(sensor.node().change_masks.is_empty());
    }

    #[test]
    fn test_find_child_installs_replacement() {
        let context = SystemContext::for_model();
        let mut sensor = TemperatureSensorState::new(None);
        let mut replacement = PropertyState::<String>::new(None, &context.namespace_uris);
        replacement.set_value(String::from("probe-7"));

        let name = QualifiedName::new(1, "sensorName");
        sensor
            .find_child(&context, &name, true, Some(Box::new(replacement)))
            .unwrap();
        assert_eq!(
            sensor.sensor_name().and_then(|p| p.value()).map(String::as_str),
            Some("probe-7")
        );
    }

    #[test]
    fn test_find_child_rejects_wrong_replacement_type() {
        let context = SystemContext::for_model();
        let mut sensor = TemperatureSensorState::new(None);
        let wrong = PropertyState::<f64>::new(None, &context.namespace_uris);
        let result = sensor.find_child(
            &context,
            &QualifiedName::new(1, "sensorName"),
            true,
            Some(Box::new(wrong)),
        );
        assert_eq!(result.err(), Some(ModelError::TypeMismatch));
        assert!(sensor.sensor_name().is_none());
    }

    #[test]
    fn test_find_child_falls_back_to_base_children() {
        let (context, mut sensor) = initialized();
        let mut extra = PropertyState::<String>::new(None, &context.namespace_uris);
        extra.node.set_browse_name(QualifiedName::new(1, "location"));
        sensor.base_mut().add_child(Box::new(extra));

        let found = sensor
            .find_child(&context, &QualifiedName::new(1, "location"), false, None)
            .unwrap();
        assert!(found.is_some());
        assert!(sensor
            .find_child(&context, &QualifiedName::new(1, "unknown"), false, None)
            .unwrap()
            .is_none());

        let mut children = Vec::new();
        sensor.get_children(&context, &mut children);
        let names: Vec<_> = children.iter().map(|c| c.node().browse_name.name.as_str()).collect();
        assert_eq!(names, ["sensorName", "temperatureValueC", "location"]);
    }

    #[test]
    fn test_slot_assignment_raises_children_mask() {
        let context = SystemContext::for_model();
        let mut sensor = TemperatureSensorState::new(None);
        sensor.set_sensor_name(None);
        assert!(sensor.node().change_masks.is_empty());

        let child = PropertyState::<String>::new(None, &context.namespace_uris);
        assert!(sensor.set_sensor_name(Some(child)).is_none());
        assert!(sensor.node().change_masks.contains(ChangeMasks::CHILDREN));

        sensor.node_mut().clear_change_masks();
        assert!(sensor.set_sensor_name(None).is_some());
        assert!(sensor.node().change_masks.contains(ChangeMasks::CHILDREN));
    }

    #[test]
    fn test_read_method() {
        let (context, mut sensor) = initialized();
        let read = NodeId::numeric(1, methods::TEMPERATURE_SENSOR_READ);
        assert_eq!(sensor.call_method(&read, &context), Err(ModelError::ValueNotSet));

        sensor
            .temperature_value_c_mut()
            .unwrap()
            .set_value(TemperatureReading::new(22.5, Some("C".into())));
        assert_eq!(
            sensor.call_method(&read, &context),
            Ok(TemperatureReading::new(22.5, Some("C".into())))
        );
        assert_eq!(
            sensor.call_method(&NodeId::numeric(1, 99), &context),
            Err(ModelError::MethodNotFound)
        );
    }
}
