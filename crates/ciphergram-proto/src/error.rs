//! Envelope framing errors.

use thiserror::Error;

use crate::header::EnvelopeHeader;

/// Bytes that do not form an envelope, or segments too large to frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Fewer bytes than the fixed header.
    #[error("truncated header: need {} bytes, got {actual}", EnvelopeHeader::SIZE)]
    TruncatedHeader {
        /// Bytes available.
        actual: usize,
    },

    /// The header declares more ciphertext than is present.
    #[error("truncated ciphertext: header declares {declared} bytes, {available} available")]
    TruncatedCiphertext {
        /// Ciphertext length from the header.
        declared: usize,
        /// Bytes following the header.
        available: usize,
    },

    /// A segment length does not fit the 32-bit header field.
    #[error("segment of {len} bytes exceeds the header field range")]
    Oversized {
        /// Offending length.
        len: usize,
    },
}
