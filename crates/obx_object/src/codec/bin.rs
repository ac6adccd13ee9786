//! The binary codec driver.
//!
//! Envelope: the 5-byte magic `tbo00`, zero or more frames, one
//! terminating `0x00` lead byte. A frame is a variable-length tag
//! `(type, size)` followed by its payload; container payloads are nested
//! frame sequences, sized by their declared element count.
//!
//! Lead byte layout: high nibble is the type (`0xF` escapes to one full
//! tag byte that follows), low nibble is the size class — `0x0`–`0xC`
//! inline, `0xD` one extra byte, `0xE` two big-endian bytes, `0xF` four
//! big-endian bytes. Writers always emit the canonical (smallest) form.

use obx_stream::{Sink, Source};

use crate::error::Error;
use crate::object::Object;
use crate::registry::CodecRegistry;
use crate::tag::TypeTag;

/// The fixed stream magic.
pub const MAGIC: &[u8; 5] = b"tbo00";

/// Payloads are pulled in bounded steps so truncated input surfaces
/// before any oversized allocation.
const READ_CHUNK: usize = 64 * 1024;

// -----------------------------------------------------------------------------
// Tag encoding

/// Emit the canonical variable-length tag for `(tag, size)`.
///
/// Codecs call this for their own frames; the driver itself never emits
/// tags, only the envelope.
pub fn write_tag(sink: &mut dyn Sink, tag: TypeTag, size: usize) -> Result<(), Error> {
    if tag.is_none() {
        return Err(Error::InvalidArgument("reserved type tag"));
    }
    let raw = tag.raw();
    let nibble = if tag.is_inline() { raw } else { 0xF };

    if size <= 0xC {
        sink.write_all(&[(nibble << 4) | size as u8])?;
        if !tag.is_inline() {
            sink.write_all(&[raw])?;
        }
    } else if size <= 0xFF {
        sink.write_all(&[(nibble << 4) | 0xD])?;
        if !tag.is_inline() {
            sink.write_all(&[raw])?;
        }
        sink.write_all(&[size as u8])?;
    } else if size <= 0xFFFF {
        sink.write_all(&[(nibble << 4) | 0xE])?;
        if !tag.is_inline() {
            sink.write_all(&[raw])?;
        }
        sink.write_all(&(size as u16).to_be_bytes())?;
    } else if size <= u32::MAX as usize {
        sink.write_all(&[(nibble << 4) | 0xF])?;
        if !tag.is_inline() {
            sink.write_all(&[raw])?;
        }
        sink.write_all(&(size as u32).to_be_bytes())?;
    } else {
        return Err(Error::InvalidArgument("frame size exceeds the tag encoding"));
    }
    Ok(())
}

/// Decode one tag, or `None` on the `0x00` terminator / end of input.
pub fn read_tag(src: &mut dyn Source) -> Result<Option<(TypeTag, usize)>, Error> {
    let lead = match src.peek(1)? {
        [] => return Ok(None),
        head => head[0],
    };
    src.skip(1)?;
    if lead == 0 {
        return Ok(None);
    }

    let nibble = lead >> 4;
    let tag = if nibble == 0xF {
        TypeTag::new(src.read_u8()?)
    } else {
        TypeTag::new(nibble)
    };
    let size = match lead & 0x0F {
        0xD => src.read_u8()? as usize,
        0xE => src.read_u16_be()? as usize,
        0xF => src.read_u32_be()? as usize,
        inline => inline as usize,
    };
    Ok(Some((tag, size)))
}

/// Read a byte payload of exactly `size` bytes, range-checked against the
/// remaining stream length where that is known.
pub fn read_payload(src: &mut dyn Source, size: usize) -> Result<Vec<u8>, Error> {
    check_size(src, size)?;
    let mut buf = Vec::with_capacity(size.min(READ_CHUNK));
    let mut left = size;
    while left > 0 {
        let step = left.min(READ_CHUNK);
        let start = buf.len();
        buf.resize(start + step, 0);
        src.read_exact(&mut buf[start..])?;
        left -= step;
    }
    Ok(buf)
}

/// Reject a declared size that cannot possibly fit the rest of the
/// stream. A frame of `n` children occupies at least `n` bytes, so the
/// check is sound for count-sized container frames too.
fn check_size(src: &mut dyn Source, size: usize) -> Result<(), Error> {
    if let Some(remaining) = src.remaining() {
        if size as u64 > remaining {
            return Err(Error::Truncated {
                needed: size as u64,
                remaining,
            });
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Driver

/// Decode one child frame for a container codec.
///
/// Returns `None` on a terminator or end of input; container codecs that
/// still expect children treat that as truncation.
pub fn read_child(
    registry: &CodecRegistry,
    src: &mut dyn Source,
) -> Result<Option<Object>, Error> {
    let Some((tag, size)) = read_tag(src)? else {
        return Ok(None);
    };
    log::trace!("frame type: {tag}, size: {size}");
    check_size(src, size)?;
    let codec = registry
        .bin_reader(tag)
        .ok_or(Error::UnsupportedType(tag))?
        .clone();
    codec.read_bin(src, registry, tag, size).map(Some)
}

/// Encode one child frame for a container codec.
pub fn write_child(
    registry: &CodecRegistry,
    object: &Object,
    sink: &mut dyn Sink,
) -> Result<(), Error> {
    let tag = object.type_tag();
    let codec = registry
        .bin_writer(tag)
        .ok_or(Error::UnsupportedType(tag))?
        .clone();
    codec.write_bin(object, sink, registry)
}

/// Read one object from a binary stream.
///
/// The magic is verified case-insensitively; a mismatch is the
/// recoverable [`Error::FormatUnrecognized`], not a fault. The first
/// successfully produced top-level frame wins and reading stops
/// immediately — trailing frames are left unconsumed.
pub fn read(registry: &CodecRegistry, src: &mut dyn Source) -> Result<Object, Error> {
    let head = src.peek(MAGIC.len())?;
    if head.len() < MAGIC.len() || !head.eq_ignore_ascii_case(MAGIC) {
        return Err(Error::FormatUnrecognized);
    }
    src.skip(MAGIC.len() as u64)?;

    read_child(registry, src)?.ok_or(Error::NoObject)
}

/// Write one object as a complete binary stream: magic, the object's
/// frames, the terminator, flush.
pub fn write(
    registry: &CodecRegistry,
    object: &Object,
    sink: &mut dyn Sink,
) -> Result<(), Error> {
    let tag = object.type_tag();
    let codec = registry
        .bin_writer(tag)
        .ok_or(Error::UnsupportedType(tag))?
        .clone();

    sink.write_all(MAGIC)?;
    codec.write_bin(object, sink, registry)?;
    sink.write_all(&[0])?;
    sink.flush()?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use obx_stream::{Reader, Writer};

    use super::*;

    fn encode_tag(tag: TypeTag, size: usize) -> Vec<u8> {
        let mut sink = Writer::to_vec();
        write_tag(&mut sink, tag, size).unwrap();
        sink.into_vec()
    }

    fn decode_tag(bytes: &[u8]) -> Option<(TypeTag, usize)> {
        let mut src = Reader::from_slice(bytes);
        read_tag(&mut src).unwrap()
    }

    #[test]
    fn size_class_boundaries() {
        // (size, expected lead-byte low nibble, expected total length)
        let cases = [
            (0usize, 0x0u8, 1usize),
            (12, 0xC, 1),
            (13, 0xD, 2),
            (255, 0xD, 2),
            (256, 0xE, 3),
            (65535, 0xE, 3),
            (65536, 0xF, 5),
        ];
        for (size, class, len) in cases {
            let bytes = encode_tag(TypeTag::STRING, size);
            assert_eq!(bytes.len(), len, "size {size}");
            assert_eq!(bytes[0] & 0x0F, class, "size {size}");
            assert_eq!(bytes[0] >> 4, TypeTag::STRING.raw());
            assert_eq!(decode_tag(&bytes), Some((TypeTag::STRING, size)));
        }
    }

    #[test]
    fn inline_tags_never_use_the_escape_form() {
        for raw in 1u8..=14 {
            let bytes = encode_tag(TypeTag::new(raw), 5);
            assert_eq!(bytes.len(), 1);
            assert_eq!(bytes[0] >> 4, raw);
        }
    }

    #[test]
    fn extended_tags_round_trip() {
        for raw in [15u8, 16, 100, 255] {
            let bytes = encode_tag(TypeTag::new(raw), 3);
            assert_eq!(bytes[0] >> 4, 0xF);
            assert_eq!(bytes[1], raw);
            assert_eq!(decode_tag(&bytes), Some((TypeTag::new(raw), 3)));
        }
    }

    #[test]
    fn extended_tag_with_extended_size() {
        let bytes = encode_tag(TypeTag::new(200), 70_000);
        assert_eq!(bytes[0], 0xFF);
        assert_eq!(bytes[1], 200);
        assert_eq!(decode_tag(&bytes), Some((TypeTag::new(200), 70_000)));
    }

    #[test]
    fn terminator_and_eof_read_as_none() {
        assert_eq!(decode_tag(&[0x00]), None);
        assert_eq!(decode_tag(&[]), None);
    }

    #[test]
    fn reserved_tag_is_rejected_on_write() {
        let mut sink = Writer::to_vec();
        assert!(matches!(
            write_tag(&mut sink, TypeTag::NONE, 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn oversized_payload_is_truncation_not_allocation() {
        // Declared size far beyond the actual stream length.
        let mut data = encode_tag(TypeTag::STRING, 0x00FF_FFFF);
        data.extend_from_slice(b"short");
        let mut src = Reader::from_slice(&data);
        read_tag(&mut src).unwrap();
        assert!(matches!(
            read_payload(&mut src, 0x00FF_FFFF),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn unsized_stream_still_fails_cleanly() {
        let data = b"abc";
        let mut src = Reader::new(&data[..]); // length hint withheld
        assert!(read_payload(&mut src, 1_000_000).is_err());
    }

    #[test]
    fn bad_magic_is_recoverable_and_unconsumed() {
        let registry = CodecRegistry::new();
        let mut src = Reader::from_slice(b"nope!");
        assert!(matches!(
            read(&registry, &mut src),
            Err(Error::FormatUnrecognized)
        ));
        assert_eq!(src.offset(), 0);
    }

    #[test]
    fn magic_is_case_insensitive() {
        let registry = CodecRegistry::new();
        let mut stream = b"TBO00".to_vec();
        stream.extend_from_slice(&encode_tag(TypeTag::BOOLEAN, 1));
        stream.push(0x00);
        let mut src = Reader::from_slice(&stream);
        let obj = read(&registry, &mut src).unwrap();
        assert_eq!(obj.as_bool(), Some(true));
    }

    #[test]
    fn empty_frame_sequence_produces_no_object() {
        let registry = CodecRegistry::new();
        let mut stream = MAGIC.to_vec();
        stream.push(0x00);
        let mut src = Reader::from_slice(&stream);
        assert!(matches!(read(&registry, &mut src), Err(Error::NoObject)));
    }

    #[test]
    fn unknown_type_is_reported_not_fatal() {
        let registry = CodecRegistry::new();
        let mut stream = MAGIC.to_vec();
        stream.extend_from_slice(&encode_tag(TypeTag::new(99), 0));
        stream.push(0x00);
        let mut src = Reader::from_slice(&stream);
        assert!(matches!(
            read(&registry, &mut src),
            Err(Error::UnsupportedType(tag)) if tag == TypeTag::new(99)
        ));
    }

    #[test]
    fn first_top_level_frame_wins() {
        let registry = CodecRegistry::new();

        let mut sink = Writer::to_vec();
        sink.write_all(MAGIC).unwrap();
        write_child(&registry, &Object::bool(true), &mut sink).unwrap();
        write_child(&registry, &Object::bool(false), &mut sink).unwrap();
        sink.write_all(&[0]).unwrap();
        let stream = sink.into_vec();

        let mut src = Reader::from_slice(&stream);
        let obj = read(&registry, &mut src).unwrap();
        assert_eq!(obj.as_bool(), Some(true));
        // The second frame stays in the stream, untouched.
        assert!(src.remaining().unwrap() > 1);
    }
}
