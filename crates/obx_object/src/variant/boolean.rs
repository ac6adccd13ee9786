//! The boolean variant.
//!
//! Binary form: the frame tag alone, with the size field carrying the
//! truth value (0 or 1) and no payload bytes. XML form: `<true/>` or
//! `<false/>`.

use alloc::sync::Arc;

use obx_stream::{Sink, Source};
use obx_xml::{XmlEvent, XmlReader, XmlWriter};

use crate::codec::{BinCodec, XmlCodec, bin};
use crate::error::Error;
use crate::object::Object;
use crate::registry::CodecRegistry;
use crate::tag::TypeTag;

pub struct BooleanCodec;

impl BinCodec for BooleanCodec {
    fn read_bin(
        &self,
        _src: &mut dyn Source,
        _registry: &CodecRegistry,
        _tag: TypeTag,
        size: usize,
    ) -> Result<Object, Error> {
        Ok(Object::bool(size != 0))
    }

    fn write_bin(
        &self,
        object: &Object,
        sink: &mut dyn Sink,
        _registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let value = object
            .as_bool()
            .ok_or(Error::UnsupportedOperation("boolean codec on non-boolean"))?;
        bin::write_tag(sink, TypeTag::BOOLEAN, value as usize)
    }
}

impl XmlCodec for BooleanCodec {
    fn read_xml(
        &self,
        xml: &mut XmlReader<'_>,
        event: &XmlEvent,
        _registry: &CodecRegistry,
    ) -> Result<Object, Error> {
        let value = event.element_name() == Some("true");
        if matches!(event, XmlEvent::ElementBeg(_)) {
            xml.skip_element()?;
        }
        Ok(Object::bool(value))
    }

    fn write_xml(
        &self,
        object: &Object,
        xml: &mut XmlWriter<'_>,
        _registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let value = object
            .as_bool()
            .ok_or(Error::UnsupportedOperation("boolean codec on non-boolean"))?;
        xml.empty(if value { "true" } else { "false" })?;
        Ok(())
    }
}

pub fn register(registry: &mut CodecRegistry) -> Result<(), Error> {
    let codec = Arc::new(BooleanCodec);
    registry.set_xml_reader("true", codec.clone())?;
    registry.set_xml_reader("false", codec.clone())?;
    registry.set_xml_writer(TypeTag::BOOLEAN, codec.clone())?;
    registry.set_bin_reader(TypeTag::BOOLEAN, codec.clone())?;
    registry.set_bin_writer(TypeTag::BOOLEAN, codec)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use obx_stream::Reader;

    use super::*;

    #[test]
    fn long_form_true_consumes_its_end_tag() {
        let registry = CodecRegistry::new();
        let mut src = Reader::from_slice(b"<true></true><false/>");
        let obj = crate::codec::xml::read(&registry, &mut src).unwrap();
        assert_eq!(obj.as_bool(), Some(true));
    }
}
