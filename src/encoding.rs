//! Byte-level helpers shared by the writer and the reader.
//!
//! All integers on disk are little-endian and fixed width. Names are UTF-8.
//! Nothing here range-checks its input: callers validate lengths before
//! narrowing them into a length field.

use byteorder::{ByteOrder, LittleEndian};
use std::str::Utf8Error;

/// Width of the `name_length` field.
pub const NAME_LEN_WIDTH: usize = 2;
/// Width of the `payload_length` field.
pub const PAYLOAD_LEN_WIDTH: usize = 4;

/// Largest encoded name a record can describe.
pub const MAX_NAME_LEN: usize = u16::MAX as usize;
/// Largest compressed payload a record can describe.
pub const MAX_PAYLOAD_LEN: u64 = u32::MAX as u64;

/// Encode text as UTF-8. The result may be longer than the character count.
#[inline]
pub fn encode_text(s: &str) -> &[u8] {
    s.as_bytes()
}

/// Decode UTF-8 bytes back into text.
#[inline]
pub fn decode_text(bytes: &[u8]) -> Result<&str, Utf8Error> {
    std::str::from_utf8(bytes)
}

#[inline]
pub fn encode_u16_le(n: u16) -> [u8; NAME_LEN_WIDTH] {
    let mut buf = [0u8; NAME_LEN_WIDTH];
    LittleEndian::write_u16(&mut buf, n);
    buf
}

#[inline]
pub fn encode_u32_le(n: u32) -> [u8; PAYLOAD_LEN_WIDTH] {
    let mut buf = [0u8; PAYLOAD_LEN_WIDTH];
    LittleEndian::write_u32(&mut buf, n);
    buf
}

#[inline]
pub fn decode_u16_le(bytes: [u8; NAME_LEN_WIDTH]) -> u16 {
    LittleEndian::read_u16(&bytes)
}

#[inline]
pub fn decode_u32_le(bytes: [u8; PAYLOAD_LEN_WIDTH]) -> u32 {
    LittleEndian::read_u32(&bytes)
}

/// Concatenate `parts` in order into one buffer, allocated once.
pub fn concat<B: AsRef<[u8]>>(parts: &[B]) -> Vec<u8> {
    let total = parts.iter().map(|p| p.as_ref().len()).sum();
    let mut out = Vec::with_capacity(total);
    for part in parts {
        out.extend_from_slice(part.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_little_endian() {
        assert_eq!(encode_u16_le(0x1234), [0x34, 0x12]);
        assert_eq!(encode_u32_le(0x1234_5678), [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(decode_u16_le([0xFF, 0x00]), 255);
        assert_eq!(decode_u32_le([0x00, 0x00, 0x00, 0x01]), 1 << 24);
    }

    #[test]
    fn integer_extremes() {
        assert_eq!(decode_u16_le(encode_u16_le(u16::MAX)), u16::MAX);
        assert_eq!(decode_u32_le(encode_u32_le(u32::MAX)), u32::MAX);
        assert_eq!(decode_u32_le(encode_u32_le(0)), 0);
    }

    #[test]
    fn multibyte_text_length_is_bytes() {
        let name = "héllo-世界";
        assert_eq!(name.chars().count(), 8);
        assert_eq!(encode_text(name).len(), 13);
        assert_eq!(decode_text(encode_text(name)).unwrap(), name);
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert!(decode_text(&[0x66, 0x6f, 0xC3]).is_err());
        assert!(decode_text(&[0xFF]).is_err());
    }

    #[test]
    fn concat_preserves_order() {
        let parts: [&[u8]; 4] = [b"ab", b"", b"c", b"def"];
        assert_eq!(concat(&parts), b"abcdef");
        assert!(concat::<&[u8]>(&[]).is_empty());
    }
}
