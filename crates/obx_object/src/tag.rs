use core::fmt;

use bitflags::bitflags;

// -----------------------------------------------------------------------------
// TypeTag

/// The integer tag identifying an object's variant.
///
/// Tags 0–14 travel inline in the binary lead byte; tags 15–255 use the
/// escaped one-extra-byte form. Tag 0 is reserved for "no type" and never
/// appears on the wire. The built-in variants occupy 1–7; everything from
/// [`TypeTag::CUSTOM_BASE`] up is free for embedder extensions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(u8);

impl TypeTag {
    pub const NONE: TypeTag = TypeTag(0);
    pub const DATA: TypeTag = TypeTag(1);
    pub const DATE: TypeTag = TypeTag(2);
    pub const ARRAY: TypeTag = TypeTag(3);
    pub const STRING: TypeTag = TypeTag(4);
    pub const NUMBER: TypeTag = TypeTag(5);
    pub const BOOLEAN: TypeTag = TypeTag(6);
    pub const DICTIONARY: TypeTag = TypeTag(7);

    /// First tag value not claimed by a built-in variant.
    pub const CUSTOM_BASE: TypeTag = TypeTag(8);

    #[inline]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Whether the tag fits the inline nibble of a binary lead byte.
    #[inline]
    pub const fn is_inline(self) -> bool {
        self.0 < 0x0F
    }

    const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("none"),
            1 => Some("data"),
            2 => Some("date"),
            3 => Some("array"),
            4 => Some("string"),
            5 => Some("number"),
            6 => Some("boolean"),
            7 => Some("dictionary"),
            _ => None,
        }
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "TypeTag({name})"),
            None => write!(f, "TypeTag({})", self.0),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

// -----------------------------------------------------------------------------
// ObjectFlags

bitflags! {
    /// Per-object behavior flags.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct ObjectFlags: u8 {
        /// Content mutation is disabled: `clear`, `value_mut` and the
        /// container helpers reject or no-op. The private slot stays
        /// writable (it is metadata, not content).
        const READONLY = 1 << 0;
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_boundary() {
        assert!(TypeTag::new(14).is_inline());
        assert!(!TypeTag::new(15).is_inline());
        assert!(TypeTag::DICTIONARY.is_inline());
    }

    #[test]
    fn debug_names_builtins() {
        assert_eq!(format!("{:?}", TypeTag::BOOLEAN), "TypeTag(boolean)");
        assert_eq!(format!("{:?}", TypeTag::new(42)), "TypeTag(42)");
    }
}
