//! The XML codec driver.
//!
//! The driver owns the prolog and the element-name dispatch; everything
//! inside an element belongs to the codec that claimed it. Only
//! element-begin and element-empty events select codecs — text, comments
//! and stray end tags at the top level are skipped here and never reach a
//! codec.

use obx_stream::{Sink, Source};
use obx_xml::{XmlEvent, XmlReader, XmlWriter};

use crate::error::Error;
use crate::object::Object;
use crate::registry::CodecRegistry;

// -----------------------------------------------------------------------------
// Driver

/// Read one object from an XML stream.
///
/// The first element whose name has a registered reader produces the
/// result; an element with no reader is [`Error::UnsupportedElement`] and
/// a document with no elements at all is [`Error::NoObject`].
pub fn read(registry: &CodecRegistry, src: &mut dyn Source) -> Result<Object, Error> {
    let mut xml = XmlReader::new(src);
    loop {
        let event = xml.next_event()?;
        match &event {
            XmlEvent::Done => return Err(Error::NoObject),
            XmlEvent::ElementBeg(name) | XmlEvent::ElementEmpty(name) => {
                log::trace!("element: {name}");
                let codec = registry
                    .xml_reader(name)
                    .ok_or_else(|| Error::UnsupportedElement(name.clone()))?
                    .clone();
                return codec.read_xml(&mut xml, &event, registry);
            }
            // Text, comments and unbalanced end tags are not object
            // material at this level.
            _ => {}
        }
    }
}

/// Write one object as a complete XML document: prolog, the object's
/// element tree, flush. `compact` suppresses all newlines and
/// indentation.
pub fn write(
    registry: &CodecRegistry,
    object: &Object,
    sink: &mut dyn Sink,
    compact: bool,
) -> Result<(), Error> {
    let tag = object.type_tag();
    let codec = registry
        .xml_writer(tag)
        .ok_or(Error::UnsupportedType(tag))?
        .clone();

    let mut xml = XmlWriter::new(sink, compact);
    xml.prolog()?;
    codec.write_xml(object, &mut xml, registry)?;
    xml.flush()?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Codec-side helpers

/// Decode one child element for a container codec, given the begin/empty
/// event that introduced it.
pub fn read_child(
    registry: &CodecRegistry,
    xml: &mut XmlReader<'_>,
    event: &XmlEvent,
) -> Result<Object, Error> {
    let name = event
        .element_name()
        .ok_or(Error::MalformedPayload("element"))?;
    let codec = registry
        .xml_reader(name)
        .ok_or_else(|| Error::UnsupportedElement(name.to_owned()))?
        .clone();
    codec.read_xml(xml, event, registry)
}

/// Encode one child element for a container codec.
pub fn write_child(
    registry: &CodecRegistry,
    object: &Object,
    xml: &mut XmlWriter<'_>,
) -> Result<(), Error> {
    let tag = object.type_tag();
    let codec = registry
        .xml_writer(tag)
        .ok_or(Error::UnsupportedType(tag))?
        .clone();
    codec.write_xml(object, xml, registry)
}

/// Collect the character data of a leaf element whose begin/empty event
/// was just consumed, through its matching end tag.
///
/// An empty element yields the empty string. Nested markup inside a leaf
/// is a payload error, attributed to `what`.
pub fn read_leaf_text(
    xml: &mut XmlReader<'_>,
    event: &XmlEvent,
    what: &'static str,
) -> Result<String, Error> {
    if matches!(event, XmlEvent::ElementEmpty(_)) {
        return Ok(String::new());
    }
    let mut text = String::new();
    loop {
        match xml.next_event()? {
            XmlEvent::Text(chunk) => text.push_str(&chunk),
            XmlEvent::ElementEnd(_) => return Ok(text),
            XmlEvent::Done => return Err(Error::Xml(obx_xml::XmlError::UnexpectedEof)),
            XmlEvent::ElementBeg(_) | XmlEvent::ElementEmpty(_) => {
                return Err(Error::MalformedPayload(what));
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use obx_stream::{Reader, Writer};

    use super::*;

    fn read_doc(doc: &str) -> Result<Object, Error> {
        let registry = CodecRegistry::new();
        let mut src = Reader::from_slice(doc.as_bytes());
        read(&registry, &mut src)
    }

    fn write_doc(object: &Object, compact: bool) -> String {
        let registry = CodecRegistry::new();
        let mut sink = Writer::to_vec();
        write(&registry, object, &mut sink, compact).unwrap();
        String::from_utf8(sink.into_vec()).unwrap()
    }

    #[test]
    fn prolog_and_noise_are_skipped() {
        let obj = read_doc(
            "<?xml version=\"2.0\" encoding=\"utf-8\"?>\n<!-- noise -->\n  <true/>",
        )
        .unwrap();
        assert_eq!(obj.as_bool(), Some(true));
    }

    #[test]
    fn unknown_element_is_reported() {
        assert!(matches!(
            read_doc("<mystery/>"),
            Err(Error::UnsupportedElement(name)) if name == "mystery"
        ));
    }

    #[test]
    fn empty_document_produces_no_object() {
        assert!(matches!(read_doc("  \n "), Err(Error::NoObject)));
    }

    #[test]
    fn compact_output_carries_the_prolog_only_once() {
        let doc = write_doc(&Object::bool(false), true);
        assert_eq!(doc, "<?xml version=\"2.0\" encoding=\"utf-8\"?><false/>");
    }

    #[test]
    fn pretty_output_is_line_structured() {
        let array = Object::array();
        array.append(Object::string("x")).unwrap();
        let doc = write_doc(&array, false);
        assert_eq!(
            doc,
            "<?xml version=\"2.0\" encoding=\"utf-8\"?>\n<array>\n\t<string>x</string>\n</array>\n"
        );
    }
}
