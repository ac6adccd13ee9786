//! The array variant.
//!
//! Binary form: the frame tag carries the element count, and the payload
//! is that many nested frames, each encoded by its own codec. XML form:
//! `<array>…children…</array>`, empty arrays collapsing to `<array/>`.

use alloc::sync::Arc;

use obx_stream::{Sink, Source};
use obx_xml::{XmlEvent, XmlReader, XmlWriter};

use crate::codec::{BinCodec, XmlCodec, bin, xml};
use crate::error::Error;
use crate::object::Object;
use crate::registry::CodecRegistry;
use crate::tag::TypeTag;
use crate::value::Value;

pub struct ArrayCodec;

impl BinCodec for ArrayCodec {
    fn read_bin(
        &self,
        src: &mut dyn Source,
        registry: &CodecRegistry,
        _tag: TypeTag,
        size: usize,
    ) -> Result<Object, Error> {
        // `size` is an element count here. The driver has already bounded
        // it by the remaining stream length; the capacity hint is capped
        // anyway so a hostile count cannot reserve memory up front.
        let mut items = Vec::with_capacity(size.min(4096));
        for _ in 0..size {
            let child = bin::read_child(registry, src)?
                .ok_or(Error::MalformedPayload("array"))?;
            items.push(child);
        }
        Ok(Object::new(Value::Array(items)))
    }

    fn write_bin(
        &self,
        object: &Object,
        sink: &mut dyn Sink,
        registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let value = object.value();
        let Value::Array(items) = &*value else {
            return Err(Error::UnsupportedOperation("array codec on non-array"));
        };
        bin::write_tag(sink, TypeTag::ARRAY, items.len())?;
        for child in items {
            bin::write_child(registry, child, sink)?;
        }
        Ok(())
    }
}

impl XmlCodec for ArrayCodec {
    fn read_xml(
        &self,
        reader: &mut XmlReader<'_>,
        event: &XmlEvent,
        registry: &CodecRegistry,
    ) -> Result<Object, Error> {
        let mut items = Vec::new();
        if matches!(event, XmlEvent::ElementBeg(_)) {
            loop {
                let child_event = reader.next_event()?;
                match &child_event {
                    XmlEvent::ElementEnd(_) => break,
                    XmlEvent::ElementBeg(_) | XmlEvent::ElementEmpty(_) => {
                        items.push(xml::read_child(registry, reader, &child_event)?);
                    }
                    XmlEvent::Text(_) => {}
                    XmlEvent::Done => {
                        return Err(Error::Xml(obx_xml::XmlError::UnexpectedEof));
                    }
                }
            }
        }
        Ok(Object::new(Value::Array(items)))
    }

    fn write_xml(
        &self,
        object: &Object,
        writer: &mut XmlWriter<'_>,
        registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let value = object.value();
        let Value::Array(items) = &*value else {
            return Err(Error::UnsupportedOperation("array codec on non-array"));
        };
        if items.is_empty() {
            writer.empty("array")?;
            return Ok(());
        }
        writer.open("array")?;
        for child in items {
            xml::write_child(registry, child, writer)?;
        }
        writer.close("array")?;
        Ok(())
    }
}

pub fn register(registry: &mut CodecRegistry) -> Result<(), Error> {
    let codec = Arc::new(ArrayCodec);
    registry.set_xml_reader("array", codec.clone())?;
    registry.set_xml_writer(TypeTag::ARRAY, codec.clone())?;
    registry.set_bin_reader(TypeTag::ARRAY, codec.clone())?;
    registry.set_bin_writer(TypeTag::ARRAY, codec)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests
