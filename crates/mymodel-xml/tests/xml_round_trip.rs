// crates/mymodel-xml/tests/xml_round_trip.rs

use mymodel::{
    Decoder, EncodingLimits, ModelError, TemperatureReading, TemperatureReadingCollection,
    with_namespace,
};
use mymodel::ids::namespaces;
use mymodel_xml::{
    XmlCodecError, XmlDecoder, XmlEncoder, from_xml_str, from_xml_str_with_limits, to_xml_string,
    to_xml_string_pretty,
};

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
        TemperatureReading::new(1e-300, Some("°F & <K>".into())),
        TemperatureReading::new(f64::INFINITY, Some("K".into())),
        TemperatureReading::new(f64::NEG_INFINITY, None),
    ];
    for reading in readings {
        let xml = to_xml_string(&reading).unwrap();
        let decoded: TemperatureReading = from_xml_str(&xml).unwrap();
        assert_eq!(decoded, reading, "{}", xml);
    }

    let nan = TemperatureReading::new(f64::NAN, None);
    let decoded: TemperatureReading = from_xml_str(&to_xml_string(&nan).unwrap()).unwrap();
    assert!(decoded.temperature_value_c.is_nan());
    assert_eq!(decoded, nan);
}

#[test]
fn test_pretty_document_round_trips() {
    init_logger();
    let reading = TemperatureReading::new(36.6, Some("C".into()));
    let xml = to_xml_string_pretty(&reading).unwrap();
    assert!(xml.contains("\n  <TemperatureValueC>"));
    assert_eq!(from_xml_str::<TemperatureReading>(&xml).unwrap(), reading);
}

#[test]
fn test_prefixed_document_is_accepted() {
    let xml = format!(
        "<?xml version=\"1.0\"?>\
         <m:temperature_reading xmlns:m=\"{ns}\">\
         <m:TemperatureValueC> 12.25 </m:TemperatureValueC>\
         <m:Unit>C&#176;</m:Unit>\
         </m:temperature_reading>",
        ns = namespaces::MY_MODEL
    );
    let reading: TemperatureReading = from_xml_str(&xml).unwrap();
    assert_eq!(reading, TemperatureReading::new(12.25, Some("C°".into())));
}

#[test]
fn test_malformed_double_is_an_error() {
    let xml = format!(
        "<temperature_reading xmlns=\"{}\"><TemperatureValueC>warm</TemperatureValueC></temperature_reading>",
        namespaces::MY_MODEL
    );
    assert!(matches!(
        from_xml_str::<TemperatureReading>(&xml),
        Err(XmlCodecError::ParseFloat(_))
    ));
}

#[test]
fn test_string_limit_on_decode() {
    let xml = to_xml_string(&TemperatureReading::new(1.0, Some("Celsius".into()))).unwrap();
    let limits = EncodingLimits {
        max_string_length: 4,
        ..EncodingLimits::default()
    };
    assert!(matches!(
        from_xml_str_with_limits::<TemperatureReading>(&xml, limits),
        Err(XmlCodecError::Model(ModelError::StringTooLong { length: 7, max: 4 }))
    ));
}

/// Writes a collection under a `Readings` wrapper inside a `Log` root.
fn collection_document(collection: &TemperatureReadingCollection) -> String {
    let mut encoder = XmlEncoder::new();
    with_namespace(&mut encoder, namespaces::MY_MODEL, |e| {
        collection.encode_as(e, "Readings")
    })
    .unwrap();
    format!(
        "<Log xmlns=\"{}\">{}</Log>",
        namespaces::MY_MODEL,
        encoder.into_string().unwrap()
    )
}

#[test]
fn test_collection_round_trips_in_order() {
    init_logger();
    let collection: TemperatureReadingCollection = (0..5)
        .map(|i| TemperatureReading::new(f64::from(i) * 0.5, Some(format!("probe-{}", i))))
        .collect();
    let xml = collection_document(&collection);
    assert_eq!(xml.matches("<temperature_reading>").count(), 5);

    let mut decoder = XmlDecoder::from_xml(&xml).unwrap();
    let decoded = with_namespace(&mut decoder, namespaces::MY_MODEL, |d| {
        TemperatureReadingCollection::decode_from(d, "Readings")
    })
    .unwrap();
    assert_eq!(decoded, collection);
}

#[test]
fn test_empty_and_absent_collections_decode_empty() {
    let xml = collection_document(&TemperatureReadingCollection::new());
    assert!(xml.contains(&format!("<Readings xmlns=\"{}\"/>", namespaces::MY_MODEL)));

    for document in [xml, format!("<Log xmlns=\"{}\"/>", namespaces::MY_MODEL)] {
        let mut decoder = XmlDecoder::from_xml(&document).unwrap();
        let decoded = with_namespace(&mut decoder, namespaces::MY_MODEL, |d| {
            d.read_encodeable_array::<TemperatureReading>("Readings")
        })
        .unwrap();
        assert!(decoded.unwrap_or_default().is_empty());
    }
}

#[test]
fn test_array_limit_on_decode() {
    let collection: TemperatureReadingCollection =
        vec![TemperatureReading::default(); 3].into();
    let xml = collection_document(&collection);
    let limits = EncodingLimits {
        max_array_length: 2,
        ..EncodingLimits::default()
    };
    let root = mymodel_xml::parse_document(&xml).unwrap();
    let mut decoder = XmlDecoder::with_limits(root, limits);
    let result = with_namespace(&mut decoder, namespaces::MY_MODEL, |d| {
        TemperatureReadingCollection::decode_from(d, "Readings")
    });
    assert!(matches!(
        result,
        Err(XmlCodecError::Model(ModelError::ArrayTooLong { length: 3, max: 2 }))
    ));
}
