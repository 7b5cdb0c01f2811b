// crates/mymodel-json/tests/json_round_trip.rs

use mymodel::{
    Decoder, Encoder, EncodingLimits, ModelError, TemperatureReading,
    TemperatureReadingCollection,
};
use mymodel_json::{
    JsonCodecError, JsonDecoder, JsonEncoder, from_json_str, from_json_value_with_limits,
    to_json_string, to_json_value,
};
use serde_json::{Value, json};

fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();
}

#[test]
fn test_reading_round_trips() {
    init_logger();
    let readings = [
        TemperatureReading::new(21.5, Some("C".into())),
        TemperatureReading::new(-273.15, None),
        TemperatureReading::new(0.0, Some(String::new())),
        TemperatureReading::new(f64::MAX, Some("\"quoted\" \u{00b0}".into())),
        TemperatureReading::new(f64::NAN, None),
        TemperatureReading::new(f64::INFINITY, Some("K".into())),
        TemperatureReading::new(f64::NEG_INFINITY, None),
    ];
    for reading in readings {
        let text = to_json_string(&reading).unwrap();
        let decoded: TemperatureReading = from_json_str(&text).unwrap();
        assert_eq!(decoded, reading, "{}", text);
    }
}

#[test]
fn test_non_finite_text() {
    let text = to_json_string(&TemperatureReading::new(f64::NEG_INFINITY, None)).unwrap();
    assert_eq!(text, r#"{"TemperatureValueC":"-Infinity"}"#);
}

#[test]
fn test_collection_round_trips_in_order() {
    init_logger();
    let collection: TemperatureReadingCollection = (0..4)
        .map(|i| TemperatureReading::new(f64::from(i), Some(format!("probe-{}", i))))
        .collect();

    let mut encoder = JsonEncoder::new();
    collection.encode_as(&mut encoder, "Readings").unwrap();
    encoder.write_int32("Count", 4).unwrap();
    let value = encoder.into_value();
    assert_eq!(value["Readings"].as_array().map(Vec::len), Some(4));
    assert_eq!(value["Readings"][2]["Unit"], json!("probe-2"));

    let Value::Object(root) = value else {
        panic!("root is not an object");
    };
    let mut decoder = JsonDecoder::new(root);
    let decoded = TemperatureReadingCollection::decode_from(&mut decoder, "Readings").unwrap();
    assert_eq!(decoded, collection);
    assert_eq!(decoder.read_int32("Count").unwrap(), 4);
}

#[test]
fn test_null_array_elements_decode_as_defaults() {
    let Value::Object(root) = json!({ "Readings": [null, { "TemperatureValueC": 2.0 }] }) else {
        unreachable!();
    };
    let mut decoder = JsonDecoder::new(root);
    let decoded = TemperatureReadingCollection::decode_from(&mut decoder, "Readings").unwrap();
    assert_eq!(
        decoded.into_vec(),
        [TemperatureReading::default(), TemperatureReading::new(2.0, None)]
    );
}

#[test]
fn test_absent_array_is_none() {
    let mut decoder = JsonDecoder::new(Default::default());
    assert!(decoder
        .read_encodeable_array::<TemperatureReading>("Readings")
        .unwrap()
        .is_none());
}

#[test]
fn test_limits_on_decode() {
    let limits = EncodingLimits {
        max_string_length: 3,
        ..EncodingLimits::default()
    };
    let value = to_json_value(&TemperatureReading::new(1.0, Some("Kelvin".into()))).unwrap();
    assert!(matches!(
        from_json_value_with_limits::<TemperatureReading>(value, limits),
        Err(JsonCodecError::Model(ModelError::StringTooLong { length: 6, max: 3 }))
    ));
}

#[test]
fn test_invalid_text_is_a_json_error() {
    assert!(matches!(
        from_json_str::<TemperatureReading>("{\"TemperatureValueC\": "),
        Err(JsonCodecError::Json(_))
    ));
}
