//! The number variant.
//!
//! Binary payload: one kind byte followed by the value in big-endian.
//! XML form: `<number>decimal text</number>`; the text form cannot carry
//! the machine kind, so reads normalize to `u64`/`i64`/`f64`.

use alloc::sync::Arc;

use obx_stream::{Sink, Source};
use obx_xml::{XmlEvent, XmlReader, XmlWriter};

use crate::codec::{BinCodec, XmlCodec, bin, xml};
use crate::error::Error;
use crate::object::Object;
use crate::registry::CodecRegistry;
use crate::tag::TypeTag;
use crate::value::{Number, NumberKind};

pub struct NumberCodec;

impl NumberCodec {
    fn value_of(object: &Object) -> Result<Number, Error> {
        object
            .as_number()
            .ok_or(Error::UnsupportedOperation("number codec on non-number"))
    }
}

impl BinCodec for NumberCodec {
    fn read_bin(
        &self,
        src: &mut dyn Source,
        _registry: &CodecRegistry,
        _tag: TypeTag,
        size: usize,
    ) -> Result<Object, Error> {
        let payload = bin::read_payload(src, size)?;
        let (&code, value) = payload
            .split_first()
            .ok_or(Error::MalformedPayload("number"))?;
        let kind =
            NumberKind::from_wire(code).ok_or(Error::MalformedPayload("number"))?;
        let number = Number::from_be_bytes(kind, value)
            .ok_or(Error::MalformedPayload("number"))?;
        Ok(Object::number(number))
    }

    fn write_bin(
        &self,
        object: &Object,
        sink: &mut dyn Sink,
        _registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let number = Self::value_of(object)?;
        let (bytes, len) = number.be_bytes();
        bin::write_tag(sink, TypeTag::NUMBER, 1 + len)?;
        sink.write_all(&[number.kind().wire_code()])?;
        sink.write_all(&bytes[..len])?;
        Ok(())
    }
}

impl XmlCodec for NumberCodec {
    fn read_xml(
        &self,
        reader: &mut XmlReader<'_>,
        event: &XmlEvent,
        _registry: &CodecRegistry,
    ) -> Result<Object, Error> {
        let text = xml::read_leaf_text(reader, event, "number")?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Object::number(0u64));
        }
        let number =
            Number::parse_decimal(trimmed).ok_or(Error::MalformedPayload("number"))?;
        Ok(Object::number(number))
    }

    fn write_xml(
        &self,
        object: &Object,
        writer: &mut XmlWriter<'_>,
        _registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let number = Self::value_of(object)?;
        writer.leaf("number", &number.to_string())?;
        Ok(())
    }
}

pub fn register(registry: &mut CodecRegistry) -> Result<(), Error> {
    let codec = Arc::new(NumberCodec);
    registry.set_xml_reader("number", codec.clone())?;
    registry.set_xml_writer(TypeTag::NUMBER, codec.clone())?;
    registry.set_bin_reader(TypeTag::NUMBER, codec.clone())?;
    registry.set_bin_writer(TypeTag::NUMBER, codec)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use obx_stream::{Reader, Writer};

    use super::*;

    fn bin_round_trip(number: Number) -> Number {
        let registry = CodecRegistry::new();
        let mut sink = Writer::to_vec();
        bin::write_child(&registry, &Object::number(number), &mut sink).unwrap();
        let bytes = sink.into_vec();

        let mut src = Reader::from_slice(&bytes);
        let obj = bin::read_child(&registry, &mut src).unwrap().unwrap();
        obj.as_number().unwrap()
    }

    #[test]
    fn binary_preserves_the_machine_kind() {
        for number in [
            Number::U8(200),
            Number::I16(-12345),
            Number::U64(u64::MAX),
            Number::I64(i64::MIN),
            Number::F32(1.5),
            Number::F64(-0.125),
        ] {
            let back = bin_round_trip(number);
            assert_eq!(back, number);
            assert_eq!(back.kind(), number.kind());
        }
    }

    #[test]
    fn truncated_payload_is_malformed() {
        let registry = CodecRegistry::new();
        // Kind byte promises a u64 but only two value bytes follow.
        let mut frame = Vec::new();
        let mut sink = Writer::to_vec();
        bin::write_tag(&mut sink, TypeTag::NUMBER, 3).unwrap();
        frame.extend_from_slice(&sink.into_vec());
        frame.extend_from_slice(&[NumberKind::U64.wire_code(), 0x01, 0x02]);

        let mut src = Reader::from_slice(&frame);
        assert!(matches!(
            bin::read_child(&registry, &mut src),
            Err(Error::MalformedPayload("number"))
        ));
    }

    #[test]
    fn empty_xml_number_is_zero() {
        let registry = CodecRegistry::new();
        let mut src = Reader::from_slice(b"<number/>");
        let obj = xml::read(&registry, &mut src).unwrap();
        assert_eq!(obj.as_number(), Some(Number::U64(0)));
    }
}
