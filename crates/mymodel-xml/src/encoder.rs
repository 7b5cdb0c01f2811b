// crates/mymodel-xml/src/encoder.rs

//! Writes encodeables as UA XML (Part 6, 5.3).

use crate::error::XmlCodecError;
use log::{trace, warn};
use mymodel::{Encodeable, Encoder, EncodingLimits, NamespaceScope};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

/// Formats a Double the way xs:double spells the special values.
pub(crate) fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".into()
    } else if value == f64::INFINITY {
        "INF".into()
    } else if value == f64::NEG_INFINITY {
        "-INF".into()
    } else {
        value.to_string()
    }
}

/// An `Encoder` that writes one XML element per field.
///
/// Elements are unprefixed; an element is in the namespace that was pushed
/// when it was opened, declared with `xmlns` whenever it differs from the
/// enclosing element's.
pub struct XmlEncoder {
    writer: Writer<Vec<u8>>,
    namespaces: Vec<String>,
    /// Namespace of each open element, innermost last.
    open: Vec<String>,
    limits: EncodingLimits,
    depth: usize,
}

impl XmlEncoder {
    pub fn new() -> Self {
        Self::with_limits(EncodingLimits::default())
    }

    pub fn with_limits(limits: EncodingLimits) -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            namespaces: Vec::new(),
            open: Vec::new(),
            limits,
            depth: 0,
        }
    }

    /// An encoder that indents nested elements by `indent_size` spaces.
    pub fn with_indent(indent_size: usize) -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', indent_size),
            ..Self::new()
        }
    }

    /// Consumes the encoder and returns the document text.
    pub fn into_string(self) -> Result<String, XmlCodecError> {
        if !self.open.is_empty() {
            return Err(XmlCodecError::MalformedDocument("unclosed element"));
        }
        Ok(String::from_utf8(self.writer.into_inner())?)
    }

    fn current_namespace(&self) -> &str {
        self.namespaces.last().map(String::as_str).unwrap_or_default()
    }

    fn start_tag<'a>(&mut self, name: &'a str) -> BytesStart<'a> {
        let namespace = self.current_namespace().to_string();
        let mut start = BytesStart::new(name);
        let inherited = self.open.last().map(String::as_str).unwrap_or_default();
        if namespace != inherited {
            start.push_attribute(("xmlns", namespace.as_str()));
        }
        self.open.push(namespace);
        start
    }

    fn open_element(&mut self, name: &str) -> Result<(), XmlCodecError> {
        let start = self.start_tag(name);
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn close_element(&mut self, name: &str) -> Result<(), XmlCodecError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        self.open.pop();
        Ok(())
    }

    fn empty_element(&mut self, name: &str) -> Result<(), XmlCodecError> {
        let start = self.start_tag(name);
        self.open.pop();
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), XmlCodecError> {
        if text.is_empty() {
            return self.empty_element(name);
        }
        self.open_element(name)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.close_element(name)
    }

    fn enter(&mut self) -> Result<(), XmlCodecError> {
        let depth = self.depth + 1;
        self.limits.check_depth(depth)?;
        self.depth = depth;
        Ok(())
    }
}

impl Default for XmlEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceScope for XmlEncoder {
    fn push_namespace(&mut self, namespace_uri: &str) {
        self.namespaces.push(namespace_uri.into());
    }

    fn pop_namespace(&mut self) {
        if self.namespaces.pop().is_none() {
            warn!("XmlEncoder: pop_namespace called with an empty namespace stack");
        }
    }
}

impl Encoder for XmlEncoder {
    type Error = XmlCodecError;

    fn write_boolean(&mut self, field_name: &str, value: bool) -> Result<(), XmlCodecError> {
        self.text_element(field_name, if value { "true" } else { "false" })
    }

    fn write_int32(&mut self, field_name: &str, value: i32) -> Result<(), XmlCodecError> {
        self.text_element(field_name, &value.to_string())
    }

    fn write_uint32(&mut self, field_name: &str, value: u32) -> Result<(), XmlCodecError> {
        self.text_element(field_name, &value.to_string())
    }

    fn write_double(&mut self, field_name: &str, value: f64) -> Result<(), XmlCodecError> {
        self.text_element(field_name, &format_double(value))
    }

    fn write_string(&mut self, field_name: &str, value: Option<&str>) -> Result<(), XmlCodecError> {
        match value {
            None => Ok(()),
            Some(text) => {
                self.limits.check_string(text.len())?;
                self.text_element(field_name, text)
            }
        }
    }

    fn write_encodeable<T: Encodeable>(&mut self, field_name: &str, value: &T) -> Result<(), XmlCodecError> {
        self.enter()?;
        trace!("XmlEncoder: writing {} as <{}>", T::TYPE_NAME, field_name);
        let result = self
            .open_element(field_name)
            .and_then(|()| value.encode(self))
            .and_then(|()| self.close_element(field_name));
        self.depth -= 1;
        result
    }

    fn write_encodeable_array<T: Encodeable>(
        &mut self,
        field_name: &str,
        values: Option<&[T]>,
    ) -> Result<(), XmlCodecError> {
        let Some(values) = values else {
            return Ok(());
        };
        self.limits.check_array(values.len())?;
        if values.is_empty() {
            return self.empty_element(field_name);
        }
        self.open_element(field_name)?;
        for value in values {
            self.write_encodeable(T::TYPE_NAME, value)?;
        }
        self.close_element(field_name)
    }
}

/// Serializes `value` as a document whose root element is `T::TYPE_NAME` in
/// the namespace of `T`'s DataType.
pub fn to_xml_string<T: Encodeable>(value: &T) -> Result<String, XmlCodecError> {
    let mut encoder = XmlEncoder::new();
    write_root(&mut encoder, value)?;
    encoder.into_string()
}

/// Like `to_xml_string`, indenting nested elements by two spaces.
pub fn to_xml_string_pretty<T: Encodeable>(value: &T) -> Result<String, XmlCodecError> {
    let mut encoder = XmlEncoder::with_indent(2);
    write_root(&mut encoder, value)?;
    encoder.into_string()
}

fn write_root<T: Encodeable>(encoder: &mut XmlEncoder, value: &T) -> Result<(), XmlCodecError> {
    let namespace = T::DATA_TYPE_ID.namespace_uri.unwrap_or_default();
    mymodel::with_namespace(encoder, &namespace, |e| e.write_encodeable(T::TYPE_NAME, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mymodel::TemperatureReading;
    use mymodel::ids::namespaces;

    #[test]
    fn test_reading_document_layout() {
        let reading = TemperatureReading::new(21.5, Some("C".into()));
        let xml = to_xml_string(&reading).unwrap();
        assert_eq!(
            xml,
            "<temperature_reading xmlns=\"http://www.opcfoundation.org/MyModel/\">\
             <TemperatureValueC>21.5</TemperatureValueC><Unit>C</Unit></temperature_reading>"
        );
    }

    #[test]
    fn test_null_unit_is_omitted_and_empty_unit_is_kept() {
        let xml = to_xml_string(&TemperatureReading::new(0.0, None)).unwrap();
        assert!(!xml.contains("Unit"));

        let xml = to_xml_string(&TemperatureReading::new(0.0, Some(String::new()))).unwrap();
        assert!(xml.contains("<Unit/>"));
    }

    #[test]
    fn test_special_doubles() {
        assert_eq!(format_double(f64::NAN), "NaN");
        assert_eq!(format_double(f64::INFINITY), "INF");
        assert_eq!(format_double(f64::NEG_INFINITY), "-INF");
        assert_eq!(format_double(-1.25), "-1.25");
    }

    #[test]
    fn test_text_is_escaped() {
        let reading = TemperatureReading::new(1.0, Some("<&>".into()));
        let xml = to_xml_string(&reading).unwrap();
        assert!(xml.contains("<Unit>&lt;&amp;&gt;</Unit>"));
    }

    #[test]
    fn test_xmlns_written_only_on_namespace_change() {
        let mut encoder = XmlEncoder::new();
        encoder.push_namespace("urn:outer");
        encoder.open_element("Outer").unwrap();
        encoder.write_int32("Same", 1).unwrap();
        encoder.push_namespace(namespaces::MY_MODEL);
        encoder.write_int32("Inner", 2).unwrap();
        encoder.pop_namespace();
        encoder.close_element("Outer").unwrap();
        encoder.pop_namespace();
        assert_eq!(
            encoder.into_string().unwrap(),
            "<Outer xmlns=\"urn:outer\"><Same>1</Same>\
             <Inner xmlns=\"http://www.opcfoundation.org/MyModel/\">2</Inner></Outer>"
        );
    }

    #[test]
    fn test_string_limit() {
        let limits = EncodingLimits {
            max_string_length: 2,
            ..EncodingLimits::default()
        };
        let mut encoder = XmlEncoder::with_limits(limits);
        let err = encoder.write_string("Unit", Some("abc")).unwrap_err();
        assert!(matches!(
            err,
            XmlCodecError::Model(mymodel::ModelError::StringTooLong { length: 3, max: 2 })
        ));
    }
}
