//! Primitive binary codecs shared by every generated schema module.
//!
//! This file is also emitted verbatim as the `kernel` module of
//! self-contained generated output, so it depends on `std` only.
//!
//! | Type   | Encoding                                  |
//! |--------|-------------------------------------------|
//! | UInt32 | unsigned LEB128, at most 5 bytes          |
//! | Int32  | signed LEB128, at most 5 bytes            |
//! | Bool   | 1 byte, nonzero decodes as `true`         |
//! | String | UInt32 byte length + UTF-8 bytes          |
//! | Binary | UInt32 byte length + raw bytes            |
//! | Hex    | `byte_size` raw bytes, lowercase hex text |
//! | List   | UInt32 element count + elements           |

use std::fmt;

/// One decoded value and the offset just past its last byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub result: T,
    pub next_offset: usize,
}

impl<T> Decoded<T> {
    /// Transform the decoded value, keeping the offset.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            result: f(self.result),
            next_offset: self.next_offset,
        }
    }
}

/// A malformed byte stream. Decoding never recovers from these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended before `needed` more bytes could be read at `offset`.
    UnexpectedEnd { offset: usize, needed: usize },
    /// A varint starting at `offset` does not fit in 32 bits.
    VarintOverflow { offset: usize },
    /// String bytes starting at `offset` are not valid UTF-8.
    InvalidUtf8 { offset: usize },
    /// A sum discriminant outside the declared pattern range.
    UnknownPattern { type_name: &'static str, index: u32 },
    /// Bytes remain after a complete top-level value.
    TrailingBytes { offset: usize, len: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEnd { offset, needed } => {
                write!(f, "unexpected end of input at offset {offset} (needed {needed} more bytes)")
            }
            Self::VarintOverflow { offset } => {
                write!(f, "varint at offset {offset} exceeds 32 bits")
            }
            Self::InvalidUtf8 { offset } => write!(f, "invalid UTF-8 in string at offset {offset}"),
            Self::UnknownPattern { type_name, index } => {
                write!(f, "unknown pattern index {index} for {type_name}")
            }
            Self::TrailingBytes { offset, len } => {
                write!(f, "{} trailing bytes after value ending at offset {offset}", len - offset)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

// ══════════════════════════════════════════════════════════════════════════════
// Codec trait
// ══════════════════════════════════════════════════════════════════════════════

/// An encode/decode pair for one value type.
///
/// Composite codecs are built by composing lower codecs; only the
/// primitives in this module know the wire layout.
pub trait Codec {
    type Value;

    /// Append the encoding of `value` to `out`.
    fn encode(&self, value: &Self::Value, out: &mut Vec<u8>);

    /// Decode one value starting at `offset`.
    fn decode(&self, offset: usize, bytes: &[u8]) -> Result<Decoded<Self::Value>, DecodeError>;

    /// Encode `value` into a fresh buffer.
    fn to_bytes(&self, value: &Self::Value) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(value, &mut out);
        out
    }

    /// Decode exactly one value spanning all of `bytes`.
    fn from_bytes(&self, bytes: &[u8]) -> Result<Self::Value, DecodeError> {
        let decoded = self.decode(0, bytes)?;
        if decoded.next_offset != bytes.len() {
            return Err(DecodeError::TrailingBytes {
                offset: decoded.next_offset,
                len: bytes.len(),
            });
        }
        Ok(decoded.result)
    }
}

impl<C: Codec + ?Sized> Codec for &C {
    type Value = C::Value;

    fn encode(&self, value: &Self::Value, out: &mut Vec<u8>) {
        (**self).encode(value, out)
    }

    fn decode(&self, offset: usize, bytes: &[u8]) -> Result<Decoded<Self::Value>, DecodeError> {
        (**self).decode(offset, bytes)
    }
}

fn read_byte(offset: usize, bytes: &[u8]) -> Result<u8, DecodeError> {
    bytes
        .get(offset)
        .copied()
        .ok_or(DecodeError::UnexpectedEnd { offset, needed: 1 })
}

fn read_slice(offset: usize, len: usize, bytes: &[u8]) -> Result<&[u8], DecodeError> {
    offset
        .checked_add(len)
        .and_then(|end| bytes.get(offset..end))
        .ok_or(DecodeError::UnexpectedEnd {
            offset,
            needed: len,
        })
}

/// Lengths beyond `u32::MAX` are clamped; such values cannot round-trip.
fn length_prefix(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

// ══════════════════════════════════════════════════════════════════════════════
// Integers
// ══════════════════════════════════════════════════════════════════════════════

/// Unsigned LEB128 `u32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UInt32Codec;

impl Codec for UInt32Codec {
    type Value = u32;

    fn encode(&self, value: &u32, out: &mut Vec<u8>) {
        let mut rest = *value;
        loop {
            let byte = (rest & 0x7f) as u8;
            rest >>= 7;
            if rest == 0 {
                out.push(byte);
                return;
            }
            out.push(byte | 0x80);
        }
    }

    fn decode(&self, offset: usize, bytes: &[u8]) -> Result<Decoded<u32>, DecodeError> {
        let mut result: u32 = 0;
        let mut shift = 0;
        let mut position = offset;
        loop {
            let byte = read_byte(position, bytes)?;
            position += 1;
            let low = u32::from(byte & 0x7f);
            // The fifth byte may only carry the top 4 bits and must end the varint.
            if shift == 28 && (byte & 0x80 != 0 || low > 0x0f) {
                return Err(DecodeError::VarintOverflow { offset });
            }
            result |= low << shift;
            if byte & 0x80 == 0 {
                return Ok(Decoded {
                    result,
                    next_offset: position,
                });
            }
            shift += 7;
        }
    }
}

/// Signed LEB128 `i32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Int32Codec;

impl Codec for Int32Codec {
    type Value = i32;

    fn encode(&self, value: &i32, out: &mut Vec<u8>) {
        let mut rest = *value;
        loop {
            let byte = (rest & 0x7f) as u8;
            rest >>= 7;
            let sign_bit_set = byte & 0x40 != 0;
            if (rest == 0 && !sign_bit_set) || (rest == -1 && sign_bit_set) {
                out.push(byte);
                return;
            }
            out.push(byte | 0x80);
        }
    }

    fn decode(&self, offset: usize, bytes: &[u8]) -> Result<Decoded<i32>, DecodeError> {
        let mut result: i64 = 0;
        let mut shift = 0;
        let mut position = offset;
        loop {
            let byte = read_byte(position, bytes)?;
            position += 1;
            result |= i64::from(byte & 0x7f) << shift;
            shift += 7;
            if byte & 0x80 == 0 {
                if byte & 0x40 != 0 {
                    result |= -1i64 << shift;
                }
                return i32::try_from(result)
                    .map(|result| Decoded {
                        result,
                        next_offset: position,
                    })
                    .map_err(|_| DecodeError::VarintOverflow { offset });
            }
            if shift >= 35 {
                return Err(DecodeError::VarintOverflow { offset });
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Bool / String / Binary
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolCodec;

impl Codec for BoolCodec {
    type Value = bool;

    fn encode(&self, value: &bool, out: &mut Vec<u8>) {
        out.push(u8::from(*value));
    }

    fn decode(&self, offset: usize, bytes: &[u8]) -> Result<Decoded<bool>, DecodeError> {
        Ok(Decoded {
            result: read_byte(offset, bytes)? != 0,
            next_offset: offset + 1,
        })
    }
}

/// UTF-8 text with a UInt32 byte-length prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringCodec;

impl Codec for StringCodec {
    type Value = String;

    fn encode(&self, value: &String, out: &mut Vec<u8>) {
        UInt32Codec.encode(&length_prefix(value.len()), out);
        out.extend_from_slice(value.as_bytes());
    }

    fn decode(&self, offset: usize, bytes: &[u8]) -> Result<Decoded<String>, DecodeError> {
        let length = UInt32Codec.decode(offset, bytes)?;
        let start = length.next_offset;
        let raw = read_slice(start, length.result as usize, bytes)?;
        let text = std::str::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8 { offset: start })?;
        Ok(Decoded {
            result: text.to_owned(),
            next_offset: start + raw.len(),
        })
    }
}

/// Raw bytes with a UInt32 length prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryCodec;

impl Codec for BinaryCodec {
    type Value = Vec<u8>;

    fn encode(&self, value: &Vec<u8>, out: &mut Vec<u8>) {
        UInt32Codec.encode(&length_prefix(value.len()), out);
        out.extend_from_slice(value);
    }

    fn decode(&self, offset: usize, bytes: &[u8]) -> Result<Decoded<Vec<u8>>, DecodeError> {
        let length = UInt32Codec.decode(offset, bytes)?;
        let start = length.next_offset;
        let raw = read_slice(start, length.result as usize, bytes)?;
        Ok(Decoded {
            result: raw.to_vec(),
            next_offset: start + raw.len(),
        })
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Fixed-size hex strings
// ══════════════════════════════════════════════════════════════════════════════

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

fn hex_digit_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// True if `text` is exactly `2 * byte_size` hex digits (either case).
pub fn is_hex_string(byte_size: usize, text: &str) -> bool {
    text.len() == byte_size * 2 && text.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Write `text` as exactly `byte_size` raw bytes.
///
/// Missing or non-hex digits are written as zero nibbles, so the output
/// length is always `byte_size`. Use [`is_hex_string`] to reject such input
/// before it reaches the encoder.
pub fn encode_hex_string(byte_size: usize, text: &str, out: &mut Vec<u8>) {
    let digits = text.as_bytes();
    let nibble = |i: usize| digits.get(i).and_then(|&d| hex_digit_value(d)).unwrap_or(0);
    for i in 0..byte_size {
        out.push((nibble(i * 2) << 4) | nibble(i * 2 + 1));
    }
}

/// Read `byte_size` raw bytes as a lowercase, zero-padded hex string.
pub fn decode_hex_string(
    byte_size: usize,
    offset: usize,
    bytes: &[u8],
) -> Result<Decoded<String>, DecodeError> {
    let raw = read_slice(offset, byte_size, bytes)?;
    let mut text = String::with_capacity(byte_size * 2);
    for byte in raw {
        text.push(HEX_DIGITS[usize::from(byte >> 4)] as char);
        text.push(HEX_DIGITS[usize::from(byte & 0x0f)] as char);
    }
    Ok(Decoded {
        result: text,
        next_offset: offset + byte_size,
    })
}

/// Hex-string codec over plain `String` values.
///
/// Generated identifier types wrap [`encode_hex_string`] and
/// [`decode_hex_string`] directly; this codec serves untyped callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexStringCodec {
    pub byte_size: usize,
}

impl HexStringCodec {
    pub const fn new(byte_size: usize) -> Self {
        Self { byte_size }
    }
}

impl Codec for HexStringCodec {
    type Value = String;

    fn encode(&self, value: &String, out: &mut Vec<u8>) {
        encode_hex_string(self.byte_size, value, out)
    }

    fn decode(&self, offset: usize, bytes: &[u8]) -> Result<Decoded<String>, DecodeError> {
        decode_hex_string(self.byte_size, offset, bytes)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Combinators
// ══════════════════════════════════════════════════════════════════════════════

/// `List<T>`: element count followed by each element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCodec<C>(pub C);

impl<C> ListCodec<C> {
    pub fn new(element: C) -> Self {
        Self(element)
    }
}

impl<C: Codec> Codec for ListCodec<C> {
    type Value = Vec<C::Value>;

    fn encode(&self, value: &Vec<C::Value>, out: &mut Vec<u8>) {
        UInt32Codec.encode(&length_prefix(value.len()), out);
        for element in value {
            self.0.encode(element, out);
        }
    }

    fn decode(&self, offset: usize, bytes: &[u8]) -> Result<Decoded<Vec<C::Value>>, DecodeError> {
        let count = UInt32Codec.decode(offset, bytes)?;
        let mut position = count.next_offset;
        // Every element takes at least one byte; cap the reservation by what is left.
        let remaining = bytes.len().saturating_sub(position);
        let mut elements = Vec::with_capacity((count.result as usize).min(remaining));
        for _ in 0..count.result {
            let element = self.0.decode(position, bytes)?;
            elements.push(element.result);
            position = element.next_offset;
        }
        Ok(Decoded {
            result: elements,
            next_offset: position,
        })
    }
}

/// Heap indirection for recursive types; adds no bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoxCodec<C>(pub C);

impl<C> BoxCodec<C> {
    pub fn new(inner: C) -> Self {
        Self(inner)
    }
}

impl<C: Codec> Codec for BoxCodec<C> {
    type Value = Box<C::Value>;

    fn encode(&self, value: &Box<C::Value>, out: &mut Vec<u8>) {
        self.0.encode(&**value, out)
    }

    fn decode(&self, offset: usize, bytes: &[u8]) -> Result<Decoded<Box<C::Value>>, DecodeError> {
        Ok(self.0.decode(offset, bytes)?.map(Box::new))
    }
}
