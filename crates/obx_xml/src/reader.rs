use obx_stream::Source;

use crate::XmlError;

// -----------------------------------------------------------------------------
// XmlEvent

/// One pull-parsing step.
///
/// Only the kinds the object codecs dispatch on are modeled. Prologs,
/// comments and doctypes are consumed internally by the reader and never
/// surface; attributes are skipped, not forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// `<name ...>`
    ElementBeg(String),
    /// `<name ... />`
    ElementEmpty(String),
    /// `</name>`
    ElementEnd(String),
    /// Character data between markup, entities resolved. Whitespace runs
    /// are preserved; consumers trim where it matters.
    Text(String),
    /// End of input.
    Done,
}

impl XmlEvent {
    /// The element name, for the three element event kinds.
    pub fn element_name(&self) -> Option<&str> {
        match self {
            Self::ElementBeg(name) | Self::ElementEmpty(name) | Self::ElementEnd(name) => {
                Some(name)
            }
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// XmlReader

/// A pull tokenizer over a byte [`Source`].
///
/// # Examples
///
/// ```
/// use obx_stream::Reader;
/// use obx_xml::{XmlEvent, XmlReader};
///
/// let mut src = Reader::from_slice(b"<array><true/></array>");
/// let mut xml = XmlReader::new(&mut src);
///
/// assert_eq!(xml.next_event().unwrap(), XmlEvent::ElementBeg("array".into()));
/// assert_eq!(xml.next_event().unwrap(), XmlEvent::ElementEmpty("true".into()));
/// assert_eq!(xml.next_event().unwrap(), XmlEvent::ElementEnd("array".into()));
/// assert_eq!(xml.next_event().unwrap(), XmlEvent::Done);
/// ```
pub struct XmlReader<'a> {
    src: &'a mut dyn Source,
}

impl<'a> XmlReader<'a> {
    pub fn new(src: &'a mut dyn Source) -> Self {
        Self { src }
    }

    /// The byte offset of the underlying source.
    pub fn offset(&self) -> u64 {
        self.src.offset()
    }

    /// Pull the next event, or [`XmlEvent::Done`] at end of input.
    pub fn next_event(&mut self) -> Result<XmlEvent, XmlError> {
        loop {
            match self.peek_byte()? {
                None => return Ok(XmlEvent::Done),
                Some(b'<') => {
                    if let Some(event) = self.read_markup()? {
                        return Ok(event);
                    }
                }
                Some(_) => return Ok(XmlEvent::Text(self.read_text()?)),
            }
        }
    }

    /// Consume events until the end tag matching the element whose begin
    /// event was just returned. Nested elements are balanced by depth.
    pub fn skip_element(&mut self) -> Result<(), XmlError> {
        let mut depth = 1usize;
        loop {
            match self.next_event()? {
                XmlEvent::ElementBeg(_) => depth += 1,
                XmlEvent::ElementEnd(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                XmlEvent::Done => return Err(XmlError::UnexpectedEof),
                _ => {}
            }
        }
    }

    fn peek_byte(&mut self) -> Result<Option<u8>, XmlError> {
        Ok(self.src.peek(1)?.first().copied())
    }

    fn next_byte(&mut self) -> Result<u8, XmlError> {
        Ok(self.src.read_u8()?)
    }

    /// Parse one `<...>` construct. Returns `None` for markup the reader
    /// swallows itself (prolog, comment, doctype).
    fn read_markup(&mut self) -> Result<Option<XmlEvent>, XmlError> {
        self.src.skip(1)?; // '<'
        match self.peek_byte()?.ok_or(XmlError::UnexpectedEof)? {
            b'?' => {
                self.skip_until(b"?>")?;
                Ok(None)
            }
            b'!' => self.read_bang(),
            b'/' => {
                self.src.skip(1)?;
                let name = self.read_name()?;
                self.finish_tag()?;
                Ok(Some(XmlEvent::ElementEnd(name)))
            }
            _ => {
                let name = self.read_name()?;
                let empty = self.finish_tag()?;
                Ok(Some(if empty {
                    XmlEvent::ElementEmpty(name)
                } else {
                    XmlEvent::ElementBeg(name)
                }))
            }
        }
    }

    /// `<!-- ... -->`, `<![CDATA[ ... ]]>` or `<!DOCTYPE ...>`, with the
    /// leading `!` not yet consumed.
    fn read_bang(&mut self) -> Result<Option<XmlEvent>, XmlError> {
        self.src.skip(1)?; // '!'
        let head = self.src.peek(7)?;
        if head.starts_with(b"--") {
            self.src.skip(2)?;
            self.skip_until(b"-->")?;
            Ok(None)
        } else if head.starts_with(b"[CDATA[") {
            self.src.skip(7)?;
            let offset = self.src.offset();
            let raw = self.read_until(b"]]>")?;
            let text =
                String::from_utf8(raw).map_err(|_| XmlError::InvalidUtf8 { offset })?;
            Ok(Some(XmlEvent::Text(text)))
        } else {
            self.skip_until(b">")?;
            Ok(None)
        }
    }

    fn read_name(&mut self) -> Result<String, XmlError> {
        let offset = self.src.offset();
        let mut name = Vec::new();
        while let Some(b) = self.peek_byte()? {
            if b.is_ascii_whitespace() || b == b'/' || b == b'>' {
                break;
            }
            if b == b'<' {
                return Err(XmlError::Syntax { offset });
            }
            name.push(self.next_byte()?);
        }
        if name.is_empty() {
            return Err(XmlError::Syntax { offset });
        }
        String::from_utf8(name).map_err(|_| XmlError::InvalidUtf8 { offset })
    }

    /// Consume through the closing `>` of the current tag, skipping
    /// attributes. Quoted attribute values may contain `>`.
    fn finish_tag(&mut self) -> Result<bool, XmlError> {
        let mut quote: Option<u8> = None;
        let mut last = 0u8;
        loop {
            let b = self.next_byte()?;
            match quote {
                Some(q) => {
                    if b == q {
                        quote = None;
                    }
                }
                None => match b {
                    b'"' | b'\'' => quote = Some(b),
                    b'>' => return Ok(last == b'/'),
                    _ => {}
                },
            }
            last = b;
        }
    }

    fn read_text(&mut self) -> Result<String, XmlError> {
        let offset = self.src.offset();
        let mut raw = Vec::new();
        while let Some(b) = self.peek_byte()? {
            if b == b'<' {
                break;
            }
            raw.push(self.next_byte()?);
        }
        let resolved = resolve_entities(&raw, offset)?;
        String::from_utf8(resolved).map_err(|_| XmlError::InvalidUtf8 { offset })
    }

    /// Consume and discard bytes through `pat`.
    fn skip_until(&mut self, pat: &[u8]) -> Result<(), XmlError> {
        let mut tail: Vec<u8> = Vec::with_capacity(pat.len());
        loop {
            let b = self.next_byte()?;
            if tail.len() == pat.len() {
                tail.remove(0);
            }
            tail.push(b);
            if tail == pat {
                return Ok(());
            }
        }
    }

    /// Collect bytes up to (excluding) `pat`, consuming `pat`.
    fn read_until(&mut self, pat: &[u8]) -> Result<Vec<u8>, XmlError> {
        let mut out = Vec::new();
        loop {
            out.push(self.next_byte()?);
            if out.ends_with(pat) {
                out.truncate(out.len() - pat.len());
                return Ok(out);
            }
        }
    }
}

/// Replace `&...;` entity references with their byte expansion.
fn resolve_entities(raw: &[u8], offset: u64) -> Result<Vec<u8>, XmlError> {
    if !raw.contains(&b'&') {
        return Ok(raw.to_vec());
    }
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] != b'&' {
            out.push(raw[i]);
            i += 1;
            continue;
        }
        let end = raw[i..]
            .iter()
            .take(12)
            .position(|&b| b == b';')
            .map(|p| i + p)
            .ok_or(XmlError::Syntax { offset })?;
        let entity = &raw[i + 1..end];
        match entity {
            b"amp" => out.push(b'&'),
            b"lt" => out.push(b'<'),
            b"gt" => out.push(b'>'),
            b"quot" => out.push(b'"'),
            b"apos" => out.push(b'\''),
            _ => {
                let text = core::str::from_utf8(entity)
                    .map_err(|_| XmlError::Syntax { offset })?;
                let code = if let Some(hex) = text.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = text.strip_prefix('#') {
                    dec.parse::<u32>().ok()
                } else {
                    None
                };
                let ch = code
                    .and_then(char::from_u32)
                    .ok_or(XmlError::Syntax { offset })?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
        }
        i = end + 1;
    }
    Ok(out)
}

// -----------------------------------------------------------------------------
// Tests
