//! Envelope split and join.

use bytes::BufMut;

use crate::{error::EnvelopeError, header::EnvelopeHeader};

/// A borrowed view over the three envelope segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    /// Filler bytes the cipher appended to the final block.
    pub padding_size: u32,
    /// Ciphertext segment, exactly `data_length` bytes.
    pub ciphertext: &'a [u8],
    /// Packed signature: every byte after the ciphertext.
    pub signature: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Split `bytes` into header, ciphertext and signature.
    ///
    /// # Errors
    ///
    /// - `TruncatedHeader` if fewer than [`EnvelopeHeader::SIZE`] bytes
    /// - `TruncatedCiphertext` if the header declares more ciphertext than
    ///   follows it
    pub fn parse(bytes: &'a [u8]) -> Result<Self, EnvelopeError> {
        let (header, body) = EnvelopeHeader::split(bytes)?;

        // A length beyond the address space is always more than is present.
        let declared = usize::try_from(header.data_length()).unwrap_or(usize::MAX);
        if declared > body.len() {
            return Err(EnvelopeError::TruncatedCiphertext { declared, available: body.len() });
        }

        let (ciphertext, signature) = body.split_at(declared);
        Ok(Self { padding_size: header.padding_size(), ciphertext, signature })
    }

    /// Header describing this envelope.
    pub fn header(&self) -> Result<EnvelopeHeader, EnvelopeError> {
        let data_length = u32::try_from(self.ciphertext.len())
            .map_err(|_| EnvelopeError::Oversized { len: self.ciphertext.len() })?;
        Ok(EnvelopeHeader::new(data_length, self.padding_size))
    }

    /// Total encoded size.
    pub fn encoded_len(&self) -> usize {
        EnvelopeHeader::SIZE + self.ciphertext.len() + self.signature.len()
    }

    /// Write `header || ciphertext || signature` into `dst`.
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<(), EnvelopeError> {
        let header = self.header()?;
        dst.put_slice(&header.to_bytes());
        dst.put_slice(self.ciphertext);
        dst.put_slice(self.signature);
        Ok(())
    }

    /// Encode into a fresh buffer.
    pub fn to_vec(&self) -> Result<Vec<u8>, EnvelopeError> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode(&mut out)?;
        Ok(out)
    }
}
