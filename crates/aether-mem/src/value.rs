//! Input coercion for write operations.
//!
//! The store itself only accepts `&[u8]`. Callers that hold a scalar, an
//! integer sequence, or text go through [`WriteValue`]: a closed set of
//! tagged variants resolved into raw bytes *before* any address arithmetic
//! happens. The encoded byte count is what determines how many addresses a
//! write occupies.

/// Text encodings understood by [`encode_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// UTF-8 (the default).
    #[default]
    Utf8,
    /// One byte per character, masked to the low 7 bits.
    Ascii,
    /// UTF-16 code units serialized little-endian, two bytes each.
    Wide,
}

/// Encode `text` into the byte sequence a write would store.
pub fn encode_text(text: &str, encoding: Encoding) -> Vec<u8> {
    match encoding {
        Encoding::Utf8 => text.as_bytes().to_vec(),
        Encoding::Ascii => text.chars().map(|c| (c as u32 & 0x7F) as u8).collect(),
        Encoding::Wide => text
            .encode_utf16()
            .flat_map(|unit| unit.to_le_bytes())
            .collect(),
    }
}

/// Mask an arbitrary integer down to its low 8 bits.
///
/// This is the canonical byte coercion: out-of-range and negative values are
/// folded, never rejected (`257` becomes `1`, `-1` becomes `255`).
#[inline]
pub fn mask_byte(value: i64) -> u8 {
    (value & 0xFF) as u8
}

/// A value accepted by [`SparseMemory::write_value`](crate::SparseMemory::write_value).
///
/// The variants replace runtime shape introspection with a closed set: a
/// scalar is a one-element sequence, sequence elements pass through
/// [`mask_byte`], and text is converted by its [`Encoding`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteValue {
    Scalar(i64),
    Sequence(Vec<i64>),
    Text(String, Encoding),
}

impl WriteValue {
    /// Resolve to the raw bytes a write stores.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            WriteValue::Scalar(value) => vec![mask_byte(value)],
            WriteValue::Sequence(values) => values.into_iter().map(mask_byte).collect(),
            WriteValue::Text(text, encoding) => encode_text(&text, encoding),
        }
    }
}

impl From<i64> for WriteValue {
    fn from(value: i64) -> Self {
        WriteValue::Scalar(value)
    }
}

impl From<Vec<i64>> for WriteValue {
    fn from(values: Vec<i64>) -> Self {
        WriteValue::Sequence(values)
    }
}

impl From<&[i64]> for WriteValue {
    fn from(values: &[i64]) -> Self {
        WriteValue::Sequence(values.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for WriteValue {
    fn from(values: [i64; N]) -> Self {
        WriteValue::Sequence(values.to_vec())
    }
}

impl From<&str> for WriteValue {
    fn from(text: &str) -> Self {
        WriteValue::Text(text.to_owned(), Encoding::default())
    }
}

impl From<String> for WriteValue {
    fn from(text: String) -> Self {
        WriteValue::Text(text, Encoding::default())
    }
}

impl From<(&str, Encoding)> for WriteValue {
    fn from((text, encoding): (&str, Encoding)) -> Self {
        WriteValue::Text(text.to_owned(), encoding)
    }
}

impl From<(String, Encoding)> for WriteValue {
    fn from((text, encoding): (String, Encoding)) -> Self {
        WriteValue::Text(text, encoding)
    }
}
