use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

// -----------------------------------------------------------------------------
// Source

/// Sequential byte input with lookahead.
///
/// This is the read half of the stream contract the codec drivers consume:
/// sequential reads, peek-without-consume, big-endian fixed-width integer
/// reads and a monotonically increasing byte offset.
///
/// The trait is object-safe; drivers take `&mut dyn Source` so codec
/// implementations stay free of stream type parameters.
pub trait Source {
    /// Fill the lookahead with up to `n` bytes and return them **without**
    /// consuming.
    ///
    /// Returns fewer than `n` bytes only when the stream ends first. The
    /// returned slice stays valid until the next call on the source.
    fn peek(&mut self, n: usize) -> io::Result<&[u8]>;

    /// Read exactly `out.len()` bytes.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] when the stream is
    /// exhausted first; the stream state is unspecified after an error.
    fn read_exact(&mut self, out: &mut [u8]) -> io::Result<()>;

    /// The number of bytes consumed so far.
    ///
    /// Peeking does not advance the offset.
    fn offset(&self) -> u64;

    /// The number of bytes left before the end of the stream, when the
    /// total length is known (memory blocks, regular files).
    fn remaining(&self) -> Option<u64>;

    /// Consume and discard `n` bytes.
    fn skip(&mut self, mut n: u64) -> io::Result<()> {
        let mut scratch = [0u8; 512];
        while n > 0 {
            let take = n.min(scratch.len() as u64) as usize;
            self.read_exact(&mut scratch[..take])?;
            n -= take as u64;
        }
        Ok(())
    }

    fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u16_be(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn read_u32_be(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    fn read_u64_be(&mut self) -> io::Result<u64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(u64::from_be_bytes(buf))
    }
}

// -----------------------------------------------------------------------------
// Reader

/// A lookahead-buffered [`Source`] over any [`io::Read`].
///
/// # Examples
///
/// ```
/// use obx_stream::{Reader, Source};
///
/// let mut src = Reader::from_slice(b"\x12\x34rest");
/// assert_eq!(src.peek(2).unwrap(), b"\x12\x34");
/// assert_eq!(src.offset(), 0);
/// assert_eq!(src.read_u16_be().unwrap(), 0x1234);
/// assert_eq!(src.offset(), 2);
/// assert_eq!(src.remaining(), Some(4));
/// ```
pub struct Reader<R> {
    inner: R,
    /// Peeked bytes not yet consumed; `pos` indexes the first live byte.
    buf: Vec<u8>,
    pos: usize,
    offset: u64,
    len: Option<u64>,
}

/// A [`Reader`] over a buffered regular file.
pub type FileReader = Reader<BufReader<File>>;

impl<R: Read> Reader<R> {
    /// Wrap a raw reader with unknown total length.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            pos: 0,
            offset: 0,
            len: None,
        }
    }

    /// Wrap a raw reader whose total byte length is known up front,
    /// enabling [`Source::remaining`] based range checks.
    pub fn with_len(inner: R, len: u64) -> Self {
        Self {
            len: Some(len),
            ..Self::new(inner)
        }
    }

    /// Consume the reader and return the wrapped stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn buffered(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Drop the consumed prefix once the lookahead is drained.
    fn compact(&mut self) {
        if self.pos == self.buf.len() {
            self.buf.clear();
            self.pos = 0;
        }
    }
}

impl<'a> Reader<&'a [u8]> {
    /// Open a source over a memory block.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::with_len(data, data.len() as u64)
    }
}

impl FileReader {
    /// Open a source over a named file.
    pub fn open_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self::with_len(BufReader::new(file), len))
    }
}

impl<R: Read> Source for Reader<R> {
    fn peek(&mut self, n: usize) -> io::Result<&[u8]> {
        let mut chunk = [0u8; 4096];
        while self.buffered() < n {
            let want = (n - self.buffered()).min(chunk.len());
            let got = self.inner.read(&mut chunk[..want])?;
            if got == 0 {
                break;
            }
            self.buf.extend_from_slice(&chunk[..got]);
        }
        let end = self.pos + n.min(self.buffered());
        Ok(&self.buf[self.pos..end])
    }

    fn read_exact(&mut self, out: &mut [u8]) -> io::Result<()> {
        let take = self.buffered().min(out.len());
        if take > 0 {
            out[..take].copy_from_slice(&self.buf[self.pos..self.pos + take]);
            self.pos += take;
            self.compact();
        }
        if take < out.len() {
            self.inner.read_exact(&mut out[take..])?;
        }
        self.offset += out.len() as u64;
        Ok(())
    }

    fn offset(&self) -> u64 {
        self.offset
    }

    fn remaining(&self) -> Option<u64> {
        self.len.map(|len| len.saturating_sub(self.offset))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_consume() {
        let mut src = Reader::from_slice(b"abcdef");
        assert_eq!(src.peek(3).unwrap(), b"abc");
        assert_eq!(src.peek(3).unwrap(), b"abc");
        assert_eq!(src.offset(), 0);

        let mut out = [0u8; 4];
        src.read_exact(&mut out).unwrap();
        assert_eq!(&out, b"abcd");
        assert_eq!(src.offset(), 4);
        assert_eq!(src.remaining(), Some(2));
    }

    #[test]
    fn peek_past_end_is_short() {
        let mut src = Reader::from_slice(b"ab");
        assert_eq!(src.peek(8).unwrap(), b"ab");
    }

    #[test]
    fn big_endian_reads() {
        let mut src = Reader::from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
        assert_eq!(src.read_u8().unwrap(), 0x01);
        assert_eq!(src.read_u16_be().unwrap(), 0x0203);
        assert_eq!(src.read_u32_be().unwrap(), 0x0405_0607);
        assert!(src.read_u8().is_err());
    }

    #[test]
    fn skip_advances_offset() {
        let mut src = Reader::from_slice(&[0u8; 1000]);
        src.skip(700).unwrap();
        assert_eq!(src.offset(), 700);
        assert_eq!(src.remaining(), Some(300));
        assert!(src.skip(301).is_err());
    }

    #[test]
    fn read_after_peek_mixes_buffered_and_fresh() {
        let mut src = Reader::from_slice(b"0123456789");
        assert_eq!(src.peek(2).unwrap(), b"01");
        let mut out = [0u8; 6];
        src.read_exact(&mut out).unwrap();
        assert_eq!(&out, b"012345");
        assert_eq!(src.read_u8().unwrap(), b'6');
    }

    #[test]
    fn unknown_length_has_no_remaining() {
        let data: &[u8] = b"xy";
        let mut src = Reader::new(data);
        assert_eq!(src.remaining(), None);
        assert_eq!(src.peek(1).unwrap(), b"x");
    }
}
