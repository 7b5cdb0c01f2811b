// crates/mymodel/tests/address_space_test.rs

use mymodel::ids::{browse_names, methods, namespaces, opcua};
use mymodel::node::init::{decode_initialization_string, read_initialization_header};
use mymodel::{
    BaseDataVariableState, ChangeMasks, InstanceState, ModelError, NamespaceTable, NodeId,
    PropertyState, QualifiedName, SystemContext, TemperatureReading, TemperatureSensorState,
};

fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();
}

/// A server table where MyModel is not at index 1.
fn shifted_context() -> SystemContext {
    let mut table = NamespaceTable::new();
    table.append("urn:vendor:other");
    table.append("urn:vendor:another");
    table.append(namespaces::MY_MODEL);
    SystemContext::new(table, Default::default())
}

#[test]
fn test_sensor_ids_follow_namespace_table() {
    init_logger();
    let context = shifted_context();
    let sensor = TemperatureSensorState::create_temperature_sensor1(&context).unwrap();

    assert_eq!(sensor.node().node_id, NodeId::numeric(3, 6));
    assert_eq!(sensor.node().type_definition_id, NodeId::numeric(3, 2));
    assert_eq!(
        sensor.temperature_value_c().unwrap().data_type,
        NodeId::numeric(3, 1)
    );
    assert_eq!(
        sensor.sensor_name().unwrap().node.browse_name,
        QualifiedName::new(3, browse_names::SENSOR_NAME)
    );
}

#[test]
fn test_populate_and_browse() {
    init_logger();
    let context = SystemContext::for_model();
    let mut sensor = TemperatureSensorState::create_temperature_sensor1(&context).unwrap();

    let name = QualifiedName::new(1, browse_names::SENSOR_NAME);
    let child = sensor.find_child(&context, &name, false, None).unwrap().unwrap();
    child
        .as_any_mut()
        .downcast_mut::<PropertyState<String>>()
        .unwrap()
        .set_value("lab-probe-1".to_string());

    let mut children = Vec::new();
    sensor.get_children(&context, &mut children);
    assert_eq!(children.len(), 2);
    let property = children[0]
        .as_any()
        .downcast_ref::<PropertyState<String>>()
        .unwrap();
    assert_eq!(property.value().map(String::as_str), Some("lab-probe-1"));
    assert!(property.node.change_masks.contains(ChangeMasks::VALUE));
    assert_eq!(
        children[1].node().reference_type_id,
        NodeId::numeric(0, opcua::HAS_COMPONENT)
    );
}

#[test]
fn test_find_child_create_is_idempotent() {
    init_logger();
    let context = SystemContext::for_model();
    let mut sensor = TemperatureSensorState::new(None);
    let name = QualifiedName::new(1, browse_names::TEMPERATURE_VALUE_C);

    type ValueVariable = BaseDataVariableState<TemperatureReading>;

    let first: *const ValueVariable = {
        let child = sensor.find_child(&context, &name, true, None).unwrap().unwrap();
        child.node_mut().node_id = NodeId::numeric(1, 500);
        child.as_any().downcast_ref::<ValueVariable>().unwrap()
    };
    // A second create must not replace the existing slot.
    let second = sensor.find_child(&context, &name, true, None).unwrap().unwrap();
    assert_eq!(second.node().node_id, NodeId::numeric(1, 500));
    let second: *const ValueVariable = second.as_any().downcast_ref::<ValueVariable>().unwrap();
    assert_eq!(second, first);
}

#[test]
fn test_read_method_returns_current_value() {
    init_logger();
    let context = shifted_context();
    let mut sensor = TemperatureSensorState::create_temperature_sensor1(&context).unwrap();
    let reading = TemperatureReading::new(-3.25, Some("C".into()));
    sensor
        .temperature_value_c_mut()
        .unwrap()
        .set_value(reading.clone());

    let read = NodeId::numeric(3, methods::TEMPERATURE_SENSOR_READ);
    assert_eq!(sensor.call_method(&read, &context), Ok(reading));

    // The same numeric id in another namespace is not the Read method.
    let wrong_ns = NodeId::numeric(1, methods::TEMPERATURE_SENSOR_READ);
    assert_eq!(
        sensor.call_method(&wrong_ns, &context),
        Err(ModelError::MethodNotFound)
    );
}

#[test]
fn test_replacement_of_wrong_type_is_rejected() {
    init_logger();
    let context = SystemContext::for_model();
    let mut sensor = TemperatureSensorState::new(None);
    let wrong = BaseDataVariableState::<String>::new(None, &context.namespace_uris);
    let result = sensor.find_child(
        &context,
        &QualifiedName::new(1, browse_names::TEMPERATURE_VALUE_C),
        true,
        Some(Box::new(wrong)),
    );
    assert!(matches!(result, Err(ModelError::TypeMismatch)));
}

#[test]
fn test_initialization_header() {
    let bytes = decode_initialization_string().unwrap();
    let header = read_initialization_header(&bytes).unwrap();
    assert_eq!(header.namespace_uris, [namespaces::MY_MODEL]);
    assert!(header.body_offset < bytes.len());
}
