//! The data (blob) variant. Binary payload: the raw bytes. XML form:
//! `<data>base64</data>`.

use alloc::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use obx_stream::{Sink, Source};
use obx_xml::{XmlEvent, XmlReader, XmlWriter};

use crate::codec::{BinCodec, XmlCodec, bin, xml};
use crate::error::Error;
use crate::object::Object;
use crate::registry::CodecRegistry;
use crate::tag::TypeTag;

pub struct DataCodec;

impl BinCodec for DataCodec {
    fn read_bin(
        &self,
        src: &mut dyn Source,
        _registry: &CodecRegistry,
        _tag: TypeTag,
        size: usize,
    ) -> Result<Object, Error> {
        Ok(Object::blob(bin::read_payload(src, size)?))
    }

    fn write_bin(
        &self,
        object: &Object,
        sink: &mut dyn Sink,
        _registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let bytes = object
            .as_blob()
            .ok_or(Error::UnsupportedOperation("data codec on non-data"))?;
        bin::write_tag(sink, TypeTag::DATA, bytes.len())?;
        sink.write_all(&bytes)?;
        Ok(())
    }
}

impl XmlCodec for DataCodec {
    fn read_xml(
        &self,
        reader: &mut XmlReader<'_>,
        event: &XmlEvent,
        _registry: &CodecRegistry,
    ) -> Result<Object, Error> {
        let text = xml::read_leaf_text(reader, event, "data")?;
        // Encoders are free to wrap base64 lines; whitespace is noise.
        let clean: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = BASE64
            .decode(clean.as_bytes())
            .map_err(|_| Error::MalformedPayload("data"))?;
        Ok(Object::blob(bytes))
    }

    fn write_xml(
        &self,
        object: &Object,
        writer: &mut XmlWriter<'_>,
        _registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let bytes = object
            .as_blob()
            .ok_or(Error::UnsupportedOperation("data codec on non-data"))?;
        writer.leaf("data", &BASE64.encode(&*bytes))?;
        Ok(())
    }
}

pub fn register(registry: &mut CodecRegistry) -> Result<(), Error> {
    let codec = Arc::new(DataCodec);
    registry.set_xml_reader("data", codec.clone())?;
    registry.set_xml_writer(TypeTag::DATA, codec.clone())?;
    registry.set_bin_reader(TypeTag::DATA, codec.clone())?;
    registry.set_bin_writer(TypeTag::DATA, codec)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use obx_stream::{Reader, Writer};

    use super::*;

    #[test]
    fn xml_form_is_base64() {
        let registry = CodecRegistry::new();
        let blob = Object::blob(vec![0x00, 0xFF, 0x10, 0x20]);

        let mut sink = Writer::to_vec();
        xml::write(&registry, &blob, &mut sink, true).unwrap();
        let doc = String::from_utf8(sink.into_vec()).unwrap();
        assert!(doc.contains("<data>AP8QIA==</data>"), "{doc}");

        let mut src = Reader::from_slice(doc.as_bytes());
        let back = xml::read(&registry, &mut src).unwrap();
        assert_eq!(back, blob);
    }

    #[test]
    fn wrapped_base64_still_decodes() {
        let registry = CodecRegistry::new();
        let mut src = Reader::from_slice(b"<data>\n\tAP8Q\n\tIA==\n</data>");
        let obj = xml::read(&registry, &mut src).unwrap();
        assert_eq!(
            obj.as_blob().as_deref(),
            Some(&[0x00u8, 0xFF, 0x10, 0x20][..])
        );
    }

    #[test]
    fn bad_base64_is_malformed() {
        let registry = CodecRegistry::new();
        let mut src = Reader::from_slice(b"<data>!!!</data>");
        assert!(matches!(
            xml::read(&registry, &mut src),
            Err(Error::MalformedPayload("data"))
        ));
    }
}
