use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

// -----------------------------------------------------------------------------
// Sink

/// Sequential byte output.
///
/// The write half of the stream contract: raw byte writes, an explicit
/// flush, and a monotonically increasing byte offset.
pub trait Sink {
    /// Write all of `data`.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Push buffered bytes down to the underlying stream.
    fn flush(&mut self) -> io::Result<()>;

    /// The number of bytes written so far.
    fn offset(&self) -> u64;
}

// -----------------------------------------------------------------------------
// Writer

/// A [`Sink`] over any [`io::Write`].
///
/// The in-memory form (`Writer<Vec<u8>>`) is a genuinely growable sink:
/// serializing into it never truncates and never needs a retry pass.
///
/// # Examples
///
/// ```
/// use obx_stream::{Sink, Writer};
///
/// let mut sink = Writer::to_vec();
/// sink.write_all(b"abc").unwrap();
/// assert_eq!(sink.offset(), 3);
/// assert_eq!(sink.into_vec(), b"abc");
/// ```
pub struct Writer<W> {
    inner: W,
    offset: u64,
}

/// A [`Writer`] over a buffered regular file.
pub type FileWriter = Writer<BufWriter<File>>;

impl<W: Write> Writer<W> {
    /// Wrap a raw writer.
    pub fn new(inner: W) -> Self {
        Self { inner, offset: 0 }
    }

    /// Consume the writer and return the wrapped stream.
    ///
    /// Buffered bytes are **not** flushed first; call [`Sink::flush`] when
    /// that matters.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl Writer<Vec<u8>> {
    /// Open a growable in-memory sink.
    pub fn to_vec() -> Self {
        Self::new(Vec::new())
    }

    /// Consume the sink and return the written bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.inner
    }
}

impl FileWriter {
    /// Create (or truncate) a named file and open a sink over it.
    pub fn create_path(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> Sink for Writer<W> {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.inner.write_all(data)?;
        self.offset += data.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn offset(&self) -> u64 {
        self.offset
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_tracks_written_bytes() {
        let mut sink = Writer::to_vec();
        assert_eq!(sink.offset(), 0);
        sink.write_all(b"hello ").unwrap();
        sink.write_all(b"world").unwrap();
        assert_eq!(sink.offset(), 11);
        assert_eq!(sink.into_vec(), b"hello world");
    }

    #[test]
    fn grows_without_bound() {
        let mut sink = Writer::to_vec();
        for _ in 0..100 {
            sink.write_all(&[0xAB; 1000]).unwrap();
        }
        assert_eq!(sink.offset(), 100_000);
        assert_eq!(sink.into_vec().len(), 100_000);
    }
}
