use alloc::borrow::Cow;
use std::io;

use obx_stream::Sink;

// -----------------------------------------------------------------------------
// escape

/// Escape `&`, `<` and `>` for use in character data.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.bytes().any(|b| matches!(b, b'&' | b'<' | b'>')) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

// -----------------------------------------------------------------------------
// XmlWriter

/// An element writer over a byte [`Sink`].
///
/// In pretty mode each element sits on its own line, indented one tab per
/// nesting level. Compact mode emits no newlines and no indentation at
/// all; the byte stream is otherwise identical.
///
/// # Examples
///
/// ```
/// use obx_stream::Writer;
/// use obx_xml::XmlWriter;
///
/// let mut sink = Writer::to_vec();
/// let mut xml = XmlWriter::new(&mut sink, true);
/// xml.open("array").unwrap();
/// xml.leaf("string", "hi").unwrap();
/// xml.close("array").unwrap();
/// drop(xml);
///
/// assert_eq!(sink.into_vec(), b"<array><string>hi</string></array>");
/// ```
pub struct XmlWriter<'a> {
    sink: &'a mut dyn Sink,
    compact: bool,
    depth: usize,
}

impl<'a> XmlWriter<'a> {
    pub fn new(sink: &'a mut dyn Sink, compact: bool) -> Self {
        Self {
            sink,
            compact,
            depth: 0,
        }
    }

    /// Whether the writer is in compact mode.
    pub fn compact(&self) -> bool {
        self.compact
    }

    /// Current nesting depth; 0 at the document root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Emit the document prolog.
    pub fn prolog(&mut self) -> io::Result<()> {
        self.sink
            .write_all(b"<?xml version=\"2.0\" encoding=\"utf-8\"?>")?;
        self.newline()
    }

    /// Emit `<name>` and descend one level.
    pub fn open(&mut self, name: &str) -> io::Result<()> {
        self.indent()?;
        self.sink.write_all(b"<")?;
        self.sink.write_all(name.as_bytes())?;
        self.sink.write_all(b">")?;
        self.newline()?;
        self.depth += 1;
        Ok(())
    }

    /// Ascend one level and emit `</name>`.
    pub fn close(&mut self, name: &str) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.indent()?;
        self.sink.write_all(b"</")?;
        self.sink.write_all(name.as_bytes())?;
        self.sink.write_all(b">")?;
        self.newline()
    }

    /// Emit `<name/>`.
    pub fn empty(&mut self, name: &str) -> io::Result<()> {
        self.indent()?;
        self.sink.write_all(b"<")?;
        self.sink.write_all(name.as_bytes())?;
        self.sink.write_all(b"/>")?;
        self.newline()
    }

    /// Emit `<name>text</name>`, escaping the text. Empty text collapses
    /// to the empty-element form.
    pub fn leaf(&mut self, name: &str, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return self.empty(name);
        }
        self.indent()?;
        self.sink.write_all(b"<")?;
        self.sink.write_all(name.as_bytes())?;
        self.sink.write_all(b">")?;
        self.sink.write_all(escape_text(text).as_bytes())?;
        self.sink.write_all(b"</")?;
        self.sink.write_all(name.as_bytes())?;
        self.sink.write_all(b">")?;
        self.newline()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    fn indent(&mut self) -> io::Result<()> {
        if !self.compact {
            for _ in 0..self.depth {
                self.sink.write_all(b"\t")?;
            }
        }
        Ok(())
    }

    fn newline(&mut self) -> io::Result<()> {
        if !self.compact {
            self.sink.write_all(b"\n")?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use obx_stream::Writer;

    use super::*;

    fn render(compact: bool, build: impl FnOnce(&mut XmlWriter<'_>)) -> String {
        let mut sink = Writer::to_vec();
        let mut xml = XmlWriter::new(&mut sink, compact);
        build(&mut xml);
        String::from_utf8(sink.into_vec()).unwrap()
    }

    #[test]
    fn pretty_indents_with_tabs() {
        let doc = render(false, |xml| {
            xml.open("dict").unwrap();
            xml.leaf("key", "a").unwrap();
            xml.empty("true").unwrap();
            xml.close("dict").unwrap();
        });
        assert_eq!(doc, "<dict>\n\t<key>a</key>\n\t<true/>\n</dict>\n");
    }

    #[test]
    fn compact_has_no_whitespace() {
        let doc = render(true, |xml| {
            xml.prolog().unwrap();
            xml.open("array").unwrap();
            xml.leaf("string", "x").unwrap();
            xml.close("array").unwrap();
        });
        assert_eq!(
            doc,
            "<?xml version=\"2.0\" encoding=\"utf-8\"?><array><string>x</string></array>"
        );
    }

    #[test]
    fn leaf_escapes_text() {
        let doc = render(true, |xml| {
            xml.leaf("string", "a<b&c>d").unwrap();
        });
        assert_eq!(doc, "<string>a&lt;b&amp;c&gt;d</string>");
    }

    #[test]
    fn empty_leaf_collapses() {
        let doc = render(true, |xml| {
            xml.leaf("string", "").unwrap();
        });
        assert_eq!(doc, "<string/>");
    }
}
