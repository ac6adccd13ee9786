use core::fmt;

// -----------------------------------------------------------------------------
// Format

/// Which wire encoding a write produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Xml,
    Bin,
}

/// A write format: the encoding plus the deflate flag.
///
/// The flag is opaque to the drivers — for the XML encoding it selects
/// compact output (no newlines, no indentation); the binary encoding is
/// already compact and ignores it.
///
/// An unknown encoding is unrepresentable by construction, so the
/// historical "unknown format byte" caller bug cannot be written.
///
/// # Examples
///
/// ```
/// use obx_object::Format;
///
/// let pretty = Format::XML;
/// let compact = Format::XML.deflate();
/// assert!(!pretty.is_deflate());
/// assert!(compact.is_deflate());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Format {
    kind: FormatKind,
    deflate: bool,
}

impl Format {
    /// Pretty-printed XML.
    pub const XML: Format = Format {
        kind: FormatKind::Xml,
        deflate: false,
    };

    /// The binary encoding.
    pub const BIN: Format = Format {
        kind: FormatKind::Bin,
        deflate: false,
    };

    /// The same encoding with the deflate flag set.
    pub const fn deflate(self) -> Format {
        Format {
            deflate: true,
            ..self
        }
    }

    pub const fn kind(self) -> FormatKind {
        self.kind
    }

    pub const fn is_deflate(self) -> bool {
        self.deflate
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            FormatKind::Xml => "xml",
            FormatKind::Bin => "bin",
        };
        if self.deflate {
            write!(f, "{name}+deflate")
        } else {
            f.write_str(name)
        }
    }
}
