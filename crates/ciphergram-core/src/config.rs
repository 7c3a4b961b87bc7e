//! Codec configuration and protocol constants.

use ciphergram_crypto::SchnorrParams;

/// Default TCP port for the server.
pub const DEFAULT_PORT: u16 = 50005;

/// Default `max_size` for a single receive.
pub const DEFAULT_RECEIVE_SIZE: usize = 1024;

/// Text the server sends first on every connection. A client that receives
/// anything else, or cannot verify it, must not continue.
pub const CONFIRMATION_TEXT: &str = "The paranoia is in bloom";

/// Whether envelopes are sealed or passed through as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptionMode {
    /// Sign, encrypt and frame every message.
    #[default]
    Sealed,

    /// No signing, no encryption, no framing. Message bytes cross the
    /// transport as-is. Only for testing and interoperability; must be
    /// selected explicitly.
    Disabled,
}

/// Fixed configuration for a [`MessageCodec`](crate::MessageCodec).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecConfig {
    /// Public Schnorr parameters shared by every party.
    pub params: SchnorrParams,
    /// Sealed or disabled.
    pub mode: EncryptionMode,
}

impl CodecConfig {
    /// Sealed mode with the given parameters.
    pub fn sealed(params: SchnorrParams) -> Self {
        Self { params, mode: EncryptionMode::Sealed }
    }

    /// Disabled mode.
    pub fn disabled() -> Self {
        Self { params: SchnorrParams::default(), mode: EncryptionMode::Disabled }
    }
}
