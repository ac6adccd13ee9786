//! Codec contracts and the two format drivers.
//!
//! A codec owns one variant's mapping to and from one wire format. The
//! drivers own only the envelopes (magic + terminator, XML prolog) and the
//! dispatch; payload layout is each codec's private contract. Container
//! codecs recurse by calling back into the driver helpers with the same
//! registry they were handed.

use obx_stream::{Sink, Source};
use obx_xml::{XmlEvent, XmlReader, XmlWriter};

use crate::error::Error;
use crate::object::Object;
use crate::registry::CodecRegistry;
use crate::tag::TypeTag;

// -----------------------------------------------------------------------------
// Modules

pub mod bin;
pub mod xml;

// -----------------------------------------------------------------------------
// Codec contracts

/// One variant's binary wire form.
pub trait BinCodec: Send + Sync {
    /// Decode one object. The stream is positioned at the payload start;
    /// `size` is the value from the frame tag. Byte-payload codecs must
    /// consume exactly `size` bytes; container codecs treat `size` as
    /// their element count and recurse through [`bin::read_child`].
    fn read_bin(
        &self,
        src: &mut dyn Source,
        registry: &CodecRegistry,
        tag: TypeTag,
        size: usize,
    ) -> Result<Object, Error>;

    /// Encode one object, emitting its own frame tag(s) via
    /// [`bin::write_tag`] followed by the payload.
    fn write_bin(
        &self,
        object: &Object,
        sink: &mut dyn Sink,
        registry: &CodecRegistry,
    ) -> Result<(), Error>;
}

/// One variant's XML form.
pub trait XmlCodec: Send + Sync {
    /// Decode one object. `event` is the element-begin or element-empty
    /// event that selected this codec; the codec owns consuming the
    /// matching end tag (if any) and every nested element.
    fn read_xml(
        &self,
        xml: &mut XmlReader<'_>,
        event: &XmlEvent,
        registry: &CodecRegistry,
    ) -> Result<Object, Error>;

    /// Encode one object as a complete element (children included).
    fn write_xml(
        &self,
        object: &Object,
        xml: &mut XmlWriter<'_>,
        registry: &CodecRegistry,
    ) -> Result<(), Error>;
}
