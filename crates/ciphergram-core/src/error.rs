//! Codec and channel error types.

use std::{io, string::FromUtf8Error};

use ciphergram_crypto::{CipherError, ConfigError, SignatureError};
use ciphergram_proto::EnvelopeError;
use thiserror::Error;

use crate::env::EntropyError;

/// Received bytes that do not form a well-formed message.
///
/// Never indicates a forged message; that is
/// [`CodecError::Verification`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Header or ciphertext segment truncated.
    #[error("malformed envelope: {0}")]
    Envelope(#[from] EnvelopeError),

    /// Signature segment has the wrong shape.
    #[error("{0}")]
    Signature(#[from] SignatureError),

    /// Ciphertext length, padding or filler inconsistent.
    #[error("undecryptable ciphertext: {0}")]
    Cipher(#[from] CipherError),

    /// Verified plaintext is not UTF-8 text.
    #[error("message is not valid UTF-8")]
    Utf8(#[from] FromUtf8Error),
}

/// Errors from framing or parsing a single message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The envelope could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The signature does not validate against any accepted public key.
    #[error("signature not verified")]
    Verification,

    /// No randomness for the signing nonce.
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// Ciphertext does not fit the 32-bit length field.
    #[error("message of {len} bytes is too large to frame")]
    MessageTooLarge {
        /// Plaintext length.
        len: usize,
    },
}

impl From<EnvelopeError> for CodecError {
    fn from(err: EnvelopeError) -> Self {
        Self::Parse(err.into())
    }
}

impl From<SignatureError> for CodecError {
    fn from(err: SignatureError) -> Self {
        Self::Parse(err.into())
    }
}

impl From<CipherError> for CodecError {
    fn from(err: CipherError) -> Self {
        Self::Parse(err.into())
    }
}

/// Errors surfaced by [`SecureChannel`](crate::SecureChannel).
///
/// Each failure class stays distinct so a forged message can never be
/// mistaken for a transport hiccup.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Invalid key material or public parameters.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Malformed envelope. The connection is unaffected.
    #[error("parse error: {0}")]
    Parse(ParseError),

    /// Peer not trusted. The plaintext was discarded.
    #[error("verification error: signature not verified")]
    Verification,

    /// Underlying transport failure, propagated unchanged.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// No randomness for the signing nonce.
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// Outgoing message does not fit one envelope.
    #[error("message of {len} bytes is too large to frame")]
    MessageTooLarge {
        /// Plaintext length.
        len: usize,
    },

    /// The channel was closed.
    #[error("channel closed")]
    Closed,
}

impl ChannelError {
    /// Returns true if this error is fatal (unrecoverable).
    ///
    /// Fatal errors mean the peer is not trusted or the channel cannot be
    /// used again. Transient errors leave the connection usable; the caller
    /// may retry.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Configuration(_) | Self::Verification | Self::Transport(_) | Self::Closed => true,

            Self::Parse(_) | Self::Entropy(_) | Self::MessageTooLarge { .. } => false,
        }
    }
}

impl From<ParseError> for ChannelError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<CodecError> for ChannelError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Parse(e) => Self::Parse(e),
            CodecError::Verification => Self::Verification,
            CodecError::Entropy(e) => Self::Entropy(e),
            CodecError::MessageTooLarge { len } => Self::MessageTooLarge { len },
        }
    }
}
