//! The date variant: UTC seconds since the epoch.
//!
//! Binary payload: 8 bytes, the seconds as a big-endian two's-complement
//! value. XML form: `<date>YYYY-MM-DD HH:MM:SS</date>` in UTC.

use alloc::sync::Arc;

use chrono::{DateTime, NaiveDateTime};
use obx_stream::{Sink, Source};
use obx_xml::{XmlEvent, XmlReader, XmlWriter};

use crate::codec::{BinCodec, XmlCodec, bin, xml};
use crate::error::Error;
use crate::object::Object;
use crate::registry::CodecRegistry;
use crate::tag::TypeTag;

const TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct DateCodec;

impl DateCodec {
    fn value_of(object: &Object) -> Result<i64, Error> {
        object
            .as_date()
            .ok_or(Error::UnsupportedOperation("date codec on non-date"))
    }
}

impl BinCodec for DateCodec {
    fn read_bin(
        &self,
        src: &mut dyn Source,
        _registry: &CodecRegistry,
        _tag: TypeTag,
        size: usize,
    ) -> Result<Object, Error> {
        if size != 8 {
            return Err(Error::MalformedPayload("date"));
        }
        let seconds = src.read_u64_be()? as i64;
        Ok(Object::date(seconds))
    }

    fn write_bin(
        &self,
        object: &Object,
        sink: &mut dyn Sink,
        _registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let seconds = Self::value_of(object)?;
        bin::write_tag(sink, TypeTag::DATE, 8)?;
        sink.write_all(&(seconds as u64).to_be_bytes())?;
        Ok(())
    }
}

impl XmlCodec for DateCodec {
    fn read_xml(
        &self,
        reader: &mut XmlReader<'_>,
        event: &XmlEvent,
        _registry: &CodecRegistry,
    ) -> Result<Object, Error> {
        let text = xml::read_leaf_text(reader, event, "date")?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Object::date(0));
        }
        let parsed = NaiveDateTime::parse_from_str(trimmed, TEXT_FORMAT)
            .map_err(|_| Error::MalformedPayload("date"))?;
        Ok(Object::date(parsed.and_utc().timestamp()))
    }

    fn write_xml(
        &self,
        object: &Object,
        writer: &mut XmlWriter<'_>,
        _registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let seconds = Self::value_of(object)?;
        let moment = DateTime::from_timestamp(seconds, 0)
            .ok_or(Error::MalformedPayload("date"))?;
        writer.leaf("date", &moment.format(TEXT_FORMAT).to_string())?;
        Ok(())
    }
}

pub fn register(registry: &mut CodecRegistry) -> Result<(), Error> {
    let codec = Arc::new(DateCodec);
    registry.set_xml_reader("date", codec.clone())?;
    registry.set_xml_writer(TypeTag::DATE, codec.clone())?;
    registry.set_bin_reader(TypeTag::DATE, codec.clone())?;
    registry.set_bin_writer(TypeTag::DATE, codec)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests
