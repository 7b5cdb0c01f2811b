// crates/mymodel-xml/src/decoder.rs

//! Reads UA XML documents back into encodeables.

use crate::error::XmlCodecError;
use log::{debug, trace, warn};
use mymodel::{Decoder, Encodeable, EncodingLimits, NamespaceScope};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;

/// One parsed element with its namespace resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Namespace URI, empty when the element is in no namespace.
    pub namespace: String,
    /// Local name, without any prefix.
    pub name: String,
    /// Attributes other than namespace declarations, keyed by qualified name.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    /// Concatenated character data directly inside the element.
    pub text: String,
}

impl XmlElement {
    /// First child with the given namespace and local name.
    pub fn child(&self, namespace: &str, name: &str) -> Option<&XmlElement> {
        self.children
            .iter()
            .find(|c| c.namespace == namespace && c.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn position_from(&self, start: usize, namespace: &str, name: &str) -> Option<usize> {
        self.children
            .iter()
            .skip(start)
            .position(|c| c.namespace == namespace && c.name == name)
            .map(|offset| start + offset)
    }
}

/// In-scope namespace declarations: `None` is the default namespace.
type Bindings = Vec<(Option<String>, String)>;

fn resolve<'b>(bindings: &'b Bindings, prefix: Option<&str>) -> Option<&'b str> {
    bindings
        .iter()
        .rev()
        .find(|(p, _)| p.as_deref() == prefix)
        .map(|(_, uri)| uri.as_str())
}

fn open_element(start: &BytesStart<'_>, bindings: &mut Bindings) -> Result<XmlElement, XmlCodecError> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = unescape(std::str::from_utf8(&attr.value)?)?.into_owned();
        if key == "xmlns" {
            bindings.push((None, value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            bindings.push((Some(prefix.to_string()), value));
        } else {
            attributes.push((key.to_string(), value));
        }
    }

    let qname = std::str::from_utf8(start.name().as_ref())?.to_string();
    let (prefix, name) = match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname.as_str()),
    };
    let namespace = match resolve(bindings, prefix) {
        Some(uri) => uri.to_string(),
        None if prefix.is_none() => String::new(),
        None => return Err(XmlCodecError::UnknownPrefix(prefix.unwrap_or_default().into())),
    };
    Ok(XmlElement {
        namespace,
        name: name.to_string(),
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn resolve_entity(name: &str) -> Result<char, XmlCodecError> {
    let c = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok()
            } else {
                None
            };
            code.and_then(char::from_u32)
        }
    };
    c.ok_or_else(|| XmlCodecError::UnknownEntity(name.to_string()))
}

/// Parses `xml` into an element tree and returns the root element.
pub fn parse_document(xml: &str) -> Result<XmlElement, XmlCodecError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().expand_empty_elements = false;

    // Each open element with the bindings length to restore when it closes.
    let mut stack: Vec<(XmlElement, usize)> = Vec::new();
    let mut bindings: Bindings = Vec::new();
    let mut root: Option<XmlElement> = None;

    let mut close = |element: XmlElement, stack: &mut Vec<(XmlElement, usize)>| {
        match stack.last_mut() {
            Some((parent, _)) => {
                parent.children.push(element);
                Ok(())
            }
            None if root.is_none() => {
                root = Some(element);
                Ok(())
            }
            None => Err(XmlCodecError::MalformedDocument("more than one root element")),
        }
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let mark = bindings.len();
                let element = open_element(&e, &mut bindings)?;
                stack.push((element, mark));
            }
            Event::Empty(e) => {
                let mark = bindings.len();
                let element = open_element(&e, &mut bindings)?;
                bindings.truncate(mark);
                close(element, &mut stack)?;
            }
            Event::End(_) => {
                let (element, mark) = stack
                    .pop()
                    .ok_or(XmlCodecError::MalformedDocument("unbalanced end tag"))?;
                bindings.truncate(mark);
                close(element, &mut stack)?;
            }
            Event::Text(e) => {
                if let Some((element, _)) = stack.last_mut() {
                    let raw = std::str::from_utf8(&e)?;
                    element.text.push_str(&unescape(raw)?);
                }
            }
            Event::CData(e) => {
                if let Some((element, _)) = stack.last_mut() {
                    element.text.push_str(std::str::from_utf8(&e)?);
                }
            }
            Event::GeneralRef(e) => {
                if let Some((element, _)) = stack.last_mut() {
                    element.text.push(resolve_entity(std::str::from_utf8(&e)?)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlCodecError::MalformedDocument("unexpected end of document"));
    }
    drop(close);
    root.ok_or(XmlCodecError::MalformedDocument("no root element"))
}

/// Parses a Double, accepting the xs:double spellings of the special values.
pub(crate) fn parse_double(text: &str) -> Result<f64, XmlCodecError> {
    Ok(match text.trim() {
        "INF" => f64::INFINITY,
        "-INF" => f64::NEG_INFINITY,
        "NaN" => f64::NAN,
        other => other.parse::<f64>()?,
    })
}

struct Frame {
    element: XmlElement,
    cursor: usize,
}

/// A `Decoder` over a parsed document.
///
/// Fields are looked up by local name in the current namespace, scanning
/// forward from the last field read; an absent field decodes to its default.
pub struct XmlDecoder {
    frames: Vec<Frame>,
    namespaces: Vec<String>,
    limits: EncodingLimits,
    depth: usize,
}

impl XmlDecoder {
    /// A decoder positioned inside `root`.
    pub fn new(root: XmlElement) -> Self {
        Self::with_limits(root, EncodingLimits::default())
    }

    pub fn with_limits(root: XmlElement, limits: EncodingLimits) -> Self {
        Self {
            frames: vec![Frame {
                element: root,
                cursor: 0,
            }],
            namespaces: Vec::new(),
            limits,
            depth: 0,
        }
    }

    /// Parses `xml` and positions the decoder inside its root element.
    pub fn from_xml(xml: &str) -> Result<Self, XmlCodecError> {
        Ok(Self::new(parse_document(xml)?))
    }

    fn current_namespace(&self) -> &str {
        self.namespaces.last().map(String::as_str).unwrap_or_default()
    }

    /// Removes and returns the next field element named `field_name`.
    fn take_field(&mut self, field_name: &str) -> Option<XmlElement> {
        let namespace = self.current_namespace().to_string();
        let frame = self.frames.last_mut()?;
        let index = frame
            .element
            .position_from(frame.cursor, &namespace, field_name)?;
        frame.cursor = index + 1;
        Some(std::mem::take(&mut frame.element.children[index]))
    }

    fn field_text(&mut self, field_name: &str) -> Option<String> {
        self.take_field(field_name).map(|element| element.text)
    }

    fn enter(&mut self) -> Result<(), XmlCodecError> {
        let depth = self.depth + 1;
        self.limits.check_depth(depth)?;
        self.depth = depth;
        Ok(())
    }

    fn decode_element<T: Encodeable>(&mut self, element: XmlElement) -> Result<T, XmlCodecError> {
        self.enter()?;
        self.frames.push(Frame { element, cursor: 0 });
        let result = T::decode(self);
        self.frames.pop();
        self.depth -= 1;
        result
    }
}

impl NamespaceScope for XmlDecoder {
    fn push_namespace(&mut self, namespace_uri: &str) {
        self.namespaces.push(namespace_uri.into());
    }

    fn pop_namespace(&mut self) {
        if self.namespaces.pop().is_none() {
            warn!("XmlDecoder: pop_namespace called with an empty namespace stack");
        }
    }
}

impl Decoder for XmlDecoder {
    type Error = XmlCodecError;

    fn read_boolean(&mut self, field_name: &str) -> Result<bool, XmlCodecError> {
        match self.field_text(field_name).as_deref().map(str::trim) {
            None => Ok(false),
            Some("true") | Some("1") => Ok(true),
            Some("false") | Some("0") => Ok(false),
            Some(other) => Err(XmlCodecError::InvalidBoolean(other.to_string())),
        }
    }

    fn read_int32(&mut self, field_name: &str) -> Result<i32, XmlCodecError> {
        match self.field_text(field_name) {
            None => Ok(0),
            Some(text) => Ok(text.trim().parse()?),
        }
    }

    fn read_uint32(&mut self, field_name: &str) -> Result<u32, XmlCodecError> {
        match self.field_text(field_name) {
            None => Ok(0),
            Some(text) => Ok(text.trim().parse()?),
        }
    }

    fn read_double(&mut self, field_name: &str) -> Result<f64, XmlCodecError> {
        match self.field_text(field_name) {
            None => Ok(0.0),
            Some(text) => parse_double(&text),
        }
    }

    fn read_string(&mut self, field_name: &str) -> Result<Option<String>, XmlCodecError> {
        let text = self.field_text(field_name);
        if let Some(text) = &text {
            self.limits.check_string(text.len())?;
        }
        Ok(text)
    }

    fn read_encodeable<T: Encodeable>(&mut self, field_name: &str) -> Result<T, XmlCodecError> {
        match self.take_field(field_name) {
            Some(element) => self.decode_element(element),
            None => {
                trace!("XmlDecoder: <{}> absent, decoding {} from an empty element", field_name, T::TYPE_NAME);
                self.decode_element(XmlElement::default())
            }
        }
    }

    fn read_encodeable_array<T: Encodeable>(
        &mut self,
        field_name: &str,
    ) -> Result<Option<Vec<T>>, XmlCodecError> {
        let Some(wrapper) = self.take_field(field_name) else {
            return Ok(None);
        };
        let namespace = self.current_namespace().to_string();
        let items: Vec<XmlElement> = wrapper
            .children
            .into_iter()
            .filter(|c| c.namespace == namespace && c.name == T::TYPE_NAME)
            .collect();
        self.limits.check_array(items.len())?;

        let mut values = Vec::with_capacity(items.len());
        for item in items {
            values.push(self.decode_element(item)?);
        }
        Ok(Some(values))
    }
}

/// Decodes a document written by `to_xml_string`.
///
/// The root element must be `T::TYPE_NAME` in the namespace of `T`'s DataType.
pub fn from_xml_str<T: Encodeable>(xml: &str) -> Result<T, XmlCodecError> {
    from_xml_str_with_limits(xml, EncodingLimits::default())
}

pub fn from_xml_str_with_limits<T: Encodeable>(xml: &str, limits: EncodingLimits) -> Result<T, XmlCodecError> {
    let root = parse_document(xml)?;
    let namespace: Cow<'static, str> = T::DATA_TYPE_ID.namespace_uri.unwrap_or_default();
    if root.name != T::TYPE_NAME || root.namespace != namespace {
        debug!(
            "from_xml_str: expected {{{}}}{} but found {{{}}}{}",
            namespace, T::TYPE_NAME, root.namespace, root.name
        );
        return Err(XmlCodecError::UnexpectedElement {
            expected: T::TYPE_NAME.to_string(),
            found: root.name,
        });
    }
    let mut decoder = XmlDecoder::with_limits(root, limits);
    T::decode(&mut decoder)
}
