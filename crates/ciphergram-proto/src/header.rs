//! Fixed-size envelope header.

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{BigEndian, U32},
};

use crate::error::EnvelopeError;

/// Envelope header (8 bytes, big-endian).
///
/// ```text
/// 0       4       8
/// +-------+-------+
/// | dlen  | pad   |
/// +-------+-------+
/// ```
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct EnvelopeHeader {
    data_length: U32<BigEndian>,
    padding_size: U32<BigEndian>,
}

impl EnvelopeHeader {
    /// Header size in bytes.
    pub const SIZE: usize = 8;

    /// Build a header for a ciphertext of `data_length` bytes.
    pub fn new(data_length: u32, padding_size: u32) -> Self {
        Self { data_length: U32::new(data_length), padding_size: U32::new(padding_size) }
    }

    /// Borrow a header from the front of `bytes`, returning the remainder.
    pub fn split(bytes: &[u8]) -> Result<(&Self, &[u8]), EnvelopeError> {
        Self::ref_from_prefix(bytes)
            .map_err(|_| EnvelopeError::TruncatedHeader { actual: bytes.len() })
    }

    /// Exact byte length of the ciphertext segment.
    pub fn data_length(&self) -> u32 {
        self.data_length.get()
    }

    /// Filler bytes the cipher appended to the final block.
    pub fn padding_size(&self) -> u32 {
        self.padding_size.get()
    }

    /// Raw header bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }
}

impl std::fmt::Debug for EnvelopeHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeHeader")
            .field("data_length", &self.data_length())
            .field("padding_size", &self.padding_size())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn header_size() {
        assert_eq!(std::mem::size_of::<EnvelopeHeader>(), EnvelopeHeader::SIZE);
    }

    #[test]
    fn header_layout_is_big_endian() {
        let header = EnvelopeHeader::new(0x0102_0304, 7);
        assert_eq!(header.to_bytes(), hex!("01020304 00000007"));
    }

    #[test]
    fn split_reads_prefix() {
        let bytes = hex!("00000010 00000003 aabb");
        let (header, rest) = EnvelopeHeader::split(&bytes).unwrap();
        assert_eq!(header.data_length(), 16);
        assert_eq!(header.padding_size(), 3);
        assert_eq!(rest, &hex!("aabb"));
    }

    #[test]
    fn split_rejects_short_input() {
        assert_eq!(
            EnvelopeHeader::split(&[0; 7]).unwrap_err(),
            EnvelopeError::TruncatedHeader { actual: 7 }
        );
    }
}
