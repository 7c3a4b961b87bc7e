//! Ciphergram wire format.
//!
//! An envelope is the only unit that crosses the transport:
//!
//! ```text
//! Envelope := header (8 bytes) || ciphertext (data_length bytes) || signature (rest)
//! header   := data_length: u32 BE || padding_size: u32 BE
//! ```
//!
//! The signature segment has no length field; it is whatever follows the
//! ciphertext. This crate only splits and joins the segments. Interpreting
//! them (decryption, signature unpacking) belongs to the codec.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod envelope;
mod error;
mod header;

pub use envelope::Envelope;
pub use error::EnvelopeError;
pub use header::EnvelopeHeader;
