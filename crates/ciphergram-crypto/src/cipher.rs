//! Block cipher capability.

use crate::error::CipherError;

/// Block size in bytes shared by every [`BlockCipher`] in this crate.
pub const BLOCK_SIZE: usize = 8;

/// Ciphertext together with the number of filler bytes appended to the
/// plaintext before encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Padded {
    /// Encrypted blocks.
    pub ciphertext: Vec<u8>,
    /// Filler bytes added to the final block.
    ///
    /// `0..BLOCK_SIZE` for non-empty plaintext. Empty plaintext still emits
    /// one block, made entirely of filler, so its padding is `BLOCK_SIZE`.
    pub padding: usize,
}

/// A keyed symmetric cipher over arbitrary-length byte strings.
///
/// Implementations are blockwise deterministic: the same key and plaintext
/// block always produce the same ciphertext block. Integrity comes from the
/// signature layer, not from the cipher mode.
pub trait BlockCipher: Send + Sync {
    /// Encrypt `plaintext`, padding the final block.
    fn encrypt(&self, plaintext: &[u8]) -> Padded;

    /// Decrypt `ciphertext` and strip `padding` filler bytes from the end.
    ///
    /// The stripped bytes must all decrypt to the filler value; anything else
    /// is [`CipherError::InvalidFiller`].
    fn decrypt(&self, ciphertext: &[u8], padding: usize) -> Result<Vec<u8>, CipherError>;
}

/// Number of filler bytes needed to bring `len` to a block boundary.
pub(crate) fn padding_for(len: usize) -> usize {
    if len == 0 { BLOCK_SIZE } else { (BLOCK_SIZE - len % BLOCK_SIZE) % BLOCK_SIZE }
}

/// Checks that `padding` is consistent with a ciphertext of `len` bytes.
pub(crate) fn check_layout(len: usize, padding: usize) -> Result<(), CipherError> {
    if len == 0 {
        return Err(CipherError::EmptyCiphertext);
    }
    if len % BLOCK_SIZE != 0 {
        return Err(CipherError::UnalignedCiphertext { len });
    }
    // A whole block of filler only ever encodes the empty message.
    let valid = padding < BLOCK_SIZE || (padding == BLOCK_SIZE && len == BLOCK_SIZE);
    if !valid {
        return Err(CipherError::InvalidPadding { padding, len });
    }
    Ok(())
}
