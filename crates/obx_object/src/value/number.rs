use core::fmt;

// -----------------------------------------------------------------------------
// NumberKind

/// The machine kind behind a [`Number`].
///
/// The binary wire form carries the kind explicitly, so a `u16` written is
/// a `u16` read back. The XML text form cannot (it is plain decimal text)
/// and normalizes to `u64`/`i64`/`f64` on read.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NumberKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl NumberKind {
    /// The kind byte leading a binary number payload.
    pub const fn wire_code(self) -> u8 {
        match self {
            Self::U8 => 0x01,
            Self::U16 => 0x02,
            Self::U32 => 0x03,
            Self::U64 => 0x04,
            Self::I8 => 0x11,
            Self::I16 => 0x12,
            Self::I32 => 0x13,
            Self::I64 => 0x14,
            Self::F32 => 0x21,
            Self::F64 => 0x22,
        }
    }

    pub const fn from_wire(code: u8) -> Option<Self> {
        Some(match code {
            0x01 => Self::U8,
            0x02 => Self::U16,
            0x03 => Self::U32,
            0x04 => Self::U64,
            0x11 => Self::I8,
            0x12 => Self::I16,
            0x13 => Self::I32,
            0x14 => Self::I64,
            0x21 => Self::F32,
            0x22 => Self::F64,
            _ => return None,
        })
    }

    /// Big-endian value width in bytes.
    pub const fn payload_len(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }
}

// -----------------------------------------------------------------------------
// Number

/// A numeric value that remembers its machine kind.
///
/// Equality is numeric, not representational: `Number::from(1u8)` equals
/// `Number::from(1u64)` and `Number::from(1.0f64)`. When either side is an
/// `f32` the comparison happens at `f32` precision, so an `f32` survives a
/// text round trip that re-reads it as `f64`. Comparisons between huge
/// integers and floats share `f64`'s usual precision limits.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Number {
    pub const fn kind(self) -> NumberKind {
        match self {
            Self::U8(_) => NumberKind::U8,
            Self::U16(_) => NumberKind::U16,
            Self::U32(_) => NumberKind::U32,
            Self::U64(_) => NumberKind::U64,
            Self::I8(_) => NumberKind::I8,
            Self::I16(_) => NumberKind::I16,
            Self::I32(_) => NumberKind::I32,
            Self::I64(_) => NumberKind::I64,
            Self::F32(_) => NumberKind::F32,
            Self::F64(_) => NumberKind::F64,
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32(_) | Self::F64(_))
    }

    /// Zero of the given kind; used by `clear` to keep the kind stable.
    pub const fn zero(kind: NumberKind) -> Self {
        match kind {
            NumberKind::U8 => Self::U8(0),
            NumberKind::U16 => Self::U16(0),
            NumberKind::U32 => Self::U32(0),
            NumberKind::U64 => Self::U64(0),
            NumberKind::I8 => Self::I8(0),
            NumberKind::I16 => Self::I16(0),
            NumberKind::I32 => Self::I32(0),
            NumberKind::I64 => Self::I64(0),
            NumberKind::F32 => Self::F32(0.0),
            NumberKind::F64 => Self::F64(0.0),
        }
    }

    /// Exact integer view, when the kind is integral.
    fn as_int(self) -> Option<i128> {
        Some(match self {
            Self::U8(v) => v as i128,
            Self::U16(v) => v as i128,
            Self::U32(v) => v as i128,
            Self::U64(v) => v as i128,
            Self::I8(v) => v as i128,
            Self::I16(v) => v as i128,
            Self::I32(v) => v as i128,
            Self::I64(v) => v as i128,
            Self::F32(_) | Self::F64(_) => return None,
        })
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::U8(v) => v as f64,
            Self::U16(v) => v as f64,
            Self::U32(v) => v as f64,
            Self::U64(v) => v as f64,
            Self::I8(v) => v as f64,
            Self::I16(v) => v as f64,
            Self::I32(v) => v as f64,
            Self::I64(v) => v as f64,
            Self::F32(v) => v as f64,
            Self::F64(v) => v,
        }
    }

    pub fn as_u64(self) -> Option<u64> {
        u64::try_from(self.as_int()?).ok()
    }

    pub fn as_i64(self) -> Option<i64> {
        i64::try_from(self.as_int()?).ok()
    }

    /// Big-endian value bytes, kind byte not included.
    pub fn be_bytes(self) -> ([u8; 8], usize) {
        let mut buf = [0u8; 8];
        let len = self.kind().payload_len();
        match self {
            Self::U8(v) => buf[..1].copy_from_slice(&v.to_be_bytes()),
            Self::U16(v) => buf[..2].copy_from_slice(&v.to_be_bytes()),
            Self::U32(v) => buf[..4].copy_from_slice(&v.to_be_bytes()),
            Self::U64(v) => buf[..8].copy_from_slice(&v.to_be_bytes()),
            Self::I8(v) => buf[..1].copy_from_slice(&v.to_be_bytes()),
            Self::I16(v) => buf[..2].copy_from_slice(&v.to_be_bytes()),
            Self::I32(v) => buf[..4].copy_from_slice(&v.to_be_bytes()),
            Self::I64(v) => buf[..8].copy_from_slice(&v.to_be_bytes()),
            Self::F32(v) => buf[..4].copy_from_slice(&v.to_be_bytes()),
            Self::F64(v) => buf[..8].copy_from_slice(&v.to_be_bytes()),
        }
        (buf, len)
    }

    /// Rebuild from a kind and its big-endian value bytes.
    pub fn from_be_bytes(kind: NumberKind, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != kind.payload_len() {
            return None;
        }
        let mut buf = [0u8; 8];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(match kind {
            NumberKind::U8 => Self::U8(bytes[0]),
            NumberKind::U16 => Self::U16(u16::from_be_bytes([bytes[0], bytes[1]])),
            NumberKind::U32 => {
                Self::U32(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            NumberKind::U64 => Self::U64(u64::from_be_bytes(buf)),
            NumberKind::I8 => Self::I8(bytes[0] as i8),
            NumberKind::I16 => Self::I16(i16::from_be_bytes([bytes[0], bytes[1]])),
            NumberKind::I32 => {
                Self::I32(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            NumberKind::I64 => Self::I64(i64::from_be_bytes(buf)),
            NumberKind::F32 => {
                Self::F32(f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            NumberKind::F64 => Self::F64(f64::from_be_bytes(buf)),
        })
    }

    /// Parse the decimal text form used by the XML encoding.
    ///
    /// A dot or exponent selects `f64`; a leading minus selects `i64`;
    /// everything else is `u64`.
    pub fn parse_decimal(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let float_like = text.contains(['.', 'e', 'E'])
            || text.eq_ignore_ascii_case("nan")
            || text.trim_start_matches('-').eq_ignore_ascii_case("inf");
        if float_like {
            return text.parse::<f64>().ok().map(Self::F64);
        }
        if text.starts_with('-') {
            return text.parse::<i64>().ok().map(Self::I64);
        }
        text.parse::<u64>().ok().map(Self::U64)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_int(), other.as_int()) {
            (Some(a), Some(b)) => a == b,
            _ => {
                if matches!(self, Self::F32(_)) || matches!(other, Self::F32(_)) {
                    (self.as_f64() as f32) == (other.as_f64() as f32)
                } else {
                    self.as_f64() == other.as_f64()
                }
            }
        }
    }
}

/// Floats must stay recognizably floats in text, so whole values gain a
/// trailing `.0`. Rendering happens at the value's own precision.
macro_rules! write_float {
    ($f:expr, $v:expr) => {{
        let v = $v;
        if v.is_nan() {
            $f.write_str("nan")
        } else if v.is_infinite() {
            $f.write_str(if v < 0.0 { "-inf" } else { "inf" })
        } else {
            let text = v.to_string();
            if text.contains(['.', 'e', 'E']) {
                $f.write_str(&text)
            } else {
                write!($f, "{text}.0")
            }
        }
    }};
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::F32(v) => write_float!(f, v),
            Self::F64(v) => write_float!(f, v),
        }
    }
}

macro_rules! impl_number_from {
    ($($kind:ident: $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Number {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$kind(value)
                }
            }
        )*
    };
}

impl_number_from! {
    U8: u8, U16: u16, U32: u32, U64: u64,
    I8: i8, I16: i16, I32: i32, I64: i64,
    F32: f32, F64: f64,
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_numeric_across_kinds() {
        assert_eq!(Number::U8(7), Number::U64(7));
        assert_eq!(Number::I32(-3), Number::I64(-3));
        assert_eq!(Number::U16(2), Number::F64(2.0));
        assert_ne!(Number::U8(7), Number::U8(8));
        assert_ne!(Number::I64(-1), Number::U64(u64::MAX));
    }

    #[test]
    fn f32_round_trips_through_f64_text() {
        let original = Number::F32(0.1);
        let reread = Number::parse_decimal(&original.to_string()).unwrap();
        assert_eq!(reread.kind(), NumberKind::F64);
        assert_eq!(original, reread);
    }

    #[test]
    fn parse_selects_kind() {
        assert_eq!(Number::parse_decimal("42"), Some(Number::U64(42)));
        assert_eq!(Number::parse_decimal("-42"), Some(Number::I64(-42)));
        assert_eq!(Number::parse_decimal("1.5"), Some(Number::F64(1.5)));
        assert_eq!(Number::parse_decimal("1e3"), Some(Number::F64(1000.0)));
        assert_eq!(
            Number::parse_decimal("-9223372036854775808"),
            Some(Number::I64(i64::MIN))
        );
        assert_eq!(Number::parse_decimal("x"), None);
        assert_eq!(Number::parse_decimal(""), None);
    }

    #[test]
    fn whole_floats_keep_a_marker() {
        assert_eq!(Number::F64(3.0).to_string(), "3.0");
        assert_eq!(Number::F64(0.25).to_string(), "0.25");
        assert_eq!(Number::F64(f64::INFINITY).to_string(), "inf");
    }

    #[test]
    fn be_bytes_round_trip() {
        for n in [
            Number::U8(0xAB),
            Number::U16(0xABCD),
            Number::U32(0xDEAD_BEEF),
            Number::U64(u64::MAX - 1),
            Number::I8(-5),
            Number::I16(-300),
            Number::I32(i32::MIN),
            Number::I64(i64::MIN),
            Number::F32(1.25),
            Number::F64(-2.5),
        ] {
            let (buf, len) = n.be_bytes();
            let back = Number::from_be_bytes(n.kind(), &buf[..len]).unwrap();
            assert_eq!(n, back);
            assert_eq!(n.kind(), back.kind());
        }
    }

    #[test]
    fn wire_codes_round_trip() {
        for kind in [
            NumberKind::U8,
            NumberKind::U16,
            NumberKind::U32,
            NumberKind::U64,
            NumberKind::I8,
            NumberKind::I16,
            NumberKind::I32,
            NumberKind::I64,
            NumberKind::F32,
            NumberKind::F64,
        ] {
            assert_eq!(NumberKind::from_wire(kind.wire_code()), Some(kind));
        }
        assert_eq!(NumberKind::from_wire(0x7F), None);
    }
}
