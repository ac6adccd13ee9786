//! Top-level read/write orchestration.
//!
//! Reading auto-detects the format by sniffing the stream head; writing
//! dispatches on an explicit [`Format`]. Every convenience entry point
//! that opens a stream also releases it, success or not (RAII).

use std::path::Path;

use obx_stream::{FileReader, FileWriter, Reader, Sink, Source, Writer};

use crate::codec::{bin, xml};
use crate::error::Error;
use crate::format::{Format, FormatKind};
use crate::object::Object;
use crate::registry::CodecRegistry;

/// Chunk size for the diagnostic dump.
const DUMP_CHUNK: usize = 4096;

// -----------------------------------------------------------------------------
// Read

/// Read one object, auto-detecting the format.
///
/// The first three bytes are peeked without consuming: a case-insensitive
/// `tbo` selects the binary driver, anything else falls through to the
/// XML driver. Streams shorter than three bytes are
/// [`Error::FormatUnrecognized`].
pub fn read(registry: &CodecRegistry, src: &mut dyn Source) -> Result<Object, Error> {
    let head = src.peek(3)?;
    if head.len() < 3 {
        return Err(Error::FormatUnrecognized);
    }
    if head.eq_ignore_ascii_case(b"tbo") {
        bin::read(registry, src)
    } else {
        xml::read(registry, src)
    }
}

/// Read one object from a memory block.
pub fn read_from_bytes(registry: &CodecRegistry, data: &[u8]) -> Result<Object, Error> {
    let mut src = Reader::from_slice(data);
    read(registry, &mut src)
}

/// Read one object from a named file.
pub fn read_from_path(
    registry: &CodecRegistry,
    path: impl AsRef<Path>,
) -> Result<Object, Error> {
    let mut src = FileReader::open_path(path)?;
    read(registry, &mut src)
}

// -----------------------------------------------------------------------------
// Write

/// Write one object in the given format. The driver flushes the sink
/// before returning.
pub fn write(
    registry: &CodecRegistry,
    object: &Object,
    sink: &mut dyn Sink,
    format: Format,
) -> Result<(), Error> {
    match format.kind() {
        FormatKind::Xml => xml::write(registry, object, sink, format.is_deflate()),
        FormatKind::Bin => bin::write(registry, object, sink),
    }
}

/// Create (or truncate) a named file and write one object into it.
pub fn write_to_path(
    registry: &CodecRegistry,
    object: &Object,
    path: impl AsRef<Path>,
    format: Format,
) -> Result<(), Error> {
    let mut sink = FileWriter::create_path(path)?;
    write(registry, object, &mut sink, format)
}

/// Serialize one object into memory and wrap the bytes in a data object.
///
/// The sink grows as needed — the result holds exactly the serialized
/// bytes, with no truncation and no re-serialization pass.
pub fn to_blob(
    registry: &CodecRegistry,
    object: &Object,
    format: Format,
) -> Result<Object, Error> {
    Ok(Object::blob(to_bytes(registry, object, format)?))
}

fn to_bytes(
    registry: &CodecRegistry,
    object: &Object,
    format: Format,
) -> Result<Vec<u8>, Error> {
    let mut sink = Writer::to_vec();
    write(registry, object, &mut sink, format)?;
    Ok(sink.into_vec())
}

// -----------------------------------------------------------------------------
// Dump

/// Render one object as XML on the diagnostic output. Purely a debug
/// convenience.
pub fn dump(registry: &CodecRegistry, object: &Object) -> Result<(), Error> {
    dump_to(registry, object, &mut std::io::stdout().lock())
}

/// [`dump`], but to an arbitrary output.
///
/// The XML prolog — everything through the first `?>` plus any following
/// whitespace — is stripped, and the remainder streams out in fixed-size
/// chunks with a trailing newline.
pub fn dump_to(
    registry: &CodecRegistry,
    object: &Object,
    out: &mut dyn std::io::Write,
) -> Result<(), Error> {
    let data = to_bytes(registry, object, Format::XML)?;

    let Some(prolog_end) = data.windows(2).position(|pair| pair == b"?>") else {
        return Ok(());
    };
    let mut body = &data[prolog_end + 2..];
    while let [first, rest @ ..] = body {
        if !first.is_ascii_whitespace() {
            break;
        }
        body = rest;
    }

    for chunk in body.chunks(DUMP_CHUNK) {
        out.write_all(chunk)?;
    }
    out.write_all(b"\n")?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests
