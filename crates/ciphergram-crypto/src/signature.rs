//! Signature capability and the packed signature form.

use crate::{error::SignatureError, schnorr::RANDOM_SIZE};

/// Size of a packed [`Signature`] in bytes.
pub const SIGNATURE_SIZE: usize = 16;

/// Challenge/response pair over exactly one message.
///
/// Packs to a fixed 16 bytes, `challenge || response`, each big-endian, so
/// the packed form is self-delimiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// `H(commitment || message) mod q`.
    pub challenge: u64,
    /// `nonce - secret * challenge mod (q - 1)`.
    pub response: u64,
}

impl Signature {
    /// Serialize to the fixed wire form.
    pub fn pack(&self) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        out[..8].copy_from_slice(&self.challenge.to_be_bytes());
        out[8..].copy_from_slice(&self.response.to_be_bytes());
        out
    }

    /// Parse the fixed wire form.
    ///
    /// # Errors
    ///
    /// `SignatureError::Malformed` if `bytes` is not exactly
    /// [`SIGNATURE_SIZE`] long.
    pub fn unpack(bytes: &[u8]) -> Result<Self, SignatureError> {
        let malformed = || SignatureError::Malformed { expected: SIGNATURE_SIZE, actual: bytes.len() };

        let packed: &[u8; SIGNATURE_SIZE] = bytes.try_into().map_err(|_| malformed())?;
        let (challenge, response) = packed.split_at(8);

        Ok(Self {
            challenge: u64::from_be_bytes(challenge.try_into().map_err(|_| malformed())?),
            response: u64::from_be_bytes(response.try_into().map_err(|_| malformed())?),
        })
    }
}

/// Produces signatures bound to a single local secret.
pub trait Signer: Send + Sync {
    /// Sign `message`.
    ///
    /// `random` seeds the per-message nonce. It must be fresh for every call;
    /// reusing it across two messages reveals the secret.
    fn sign(&self, message: &[u8], random: [u8; RANDOM_SIZE]) -> Signature;
}

/// Checks signatures against a set of trusted signers.
pub trait Verifier: Send + Sync {
    /// True if `signature` over `message` validates against any accepted key.
    fn verify(&self, message: &[u8], signature: &Signature) -> bool;
}
