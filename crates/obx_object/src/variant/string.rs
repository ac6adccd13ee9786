//! The string variant. Binary payload: raw UTF-8. XML form:
//! `<string>escaped text</string>`, empty strings collapsing to
//! `<string/>`.

use alloc::sync::Arc;

use obx_stream::{Sink, Source};
use obx_xml::{XmlEvent, XmlReader, XmlWriter};

use crate::codec::{BinCodec, XmlCodec, bin, xml};
use crate::error::Error;
use crate::object::Object;
use crate::registry::CodecRegistry;
use crate::tag::TypeTag;

pub struct StringCodec;

impl BinCodec for StringCodec {
    fn read_bin(
        &self,
        src: &mut dyn Source,
        _registry: &CodecRegistry,
        _tag: TypeTag,
        size: usize,
    ) -> Result<Object, Error> {
        let payload = bin::read_payload(src, size)?;
        let text =
            String::from_utf8(payload).map_err(|_| Error::MalformedPayload("string"))?;
        Ok(Object::string(text))
    }

    fn write_bin(
        &self,
        object: &Object,
        sink: &mut dyn Sink,
        _registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let text = object
            .as_str()
            .ok_or(Error::UnsupportedOperation("string codec on non-string"))?;
        bin::write_tag(sink, TypeTag::STRING, text.len())?;
        sink.write_all(text.as_bytes())?;
        Ok(())
    }
}

impl XmlCodec for StringCodec {
    fn read_xml(
        &self,
        reader: &mut XmlReader<'_>,
        event: &XmlEvent,
        _registry: &CodecRegistry,
    ) -> Result<Object, Error> {
        // Character data is taken verbatim; strings own their whitespace.
        let text = xml::read_leaf_text(reader, event, "string")?;
        Ok(Object::string(text))
    }

    fn write_xml(
        &self,
        object: &Object,
        writer: &mut XmlWriter<'_>,
        _registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let text = object
            .as_str()
            .ok_or(Error::UnsupportedOperation("string codec on non-string"))?;
        writer.leaf("string", &text)?;
        Ok(())
    }
}

pub fn register(registry: &mut CodecRegistry) -> Result<(), Error> {
    let codec = Arc::new(StringCodec);
    registry.set_xml_reader("string", codec.clone())?;
    registry.set_xml_writer(TypeTag::STRING, codec.clone())?;
    registry.set_bin_reader(TypeTag::STRING, codec.clone())?;
    registry.set_bin_writer(TypeTag::STRING, codec)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use obx_stream::Reader;

    use super::*;

    #[test]
    fn invalid_utf8_payload_is_malformed() {
        let registry = CodecRegistry::new();
        let mut frame = vec![(TypeTag::STRING.raw() << 4) | 0x02, 0xFF, 0xFE];
        frame.push(0x00);
        let mut src = Reader::from_slice(&frame);
        assert!(matches!(
            bin::read_child(&registry, &mut src),
            Err(Error::MalformedPayload("string"))
        ));
    }

    #[test]
    fn markup_characters_survive_xml() {
        let registry = CodecRegistry::new();
        let mut sink = obx_stream::Writer::to_vec();
        xml::write(&registry, &Object::string("a<b>&c"), &mut sink, true).unwrap();
        let doc = sink.into_vec();

        let mut src = Reader::from_slice(&doc);
        let obj = xml::read(&registry, &mut src).unwrap();
        assert_eq!(obj.as_str().as_deref(), Some("a<b>&c"));
    }
}
