//! Error types for the cryptographic primitives.

use thiserror::Error;

/// Invalid key material or public parameters.
///
/// Raised at construction time only. Once a cipher, signer or verifier
/// exists, its configuration is known to be valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Cipher key length outside the supported range.
    #[error("invalid cipher key length: expected {min}..={max} bytes, got {actual}")]
    InvalidKeyLength {
        /// Shortest accepted key.
        min: usize,
        /// Longest accepted key.
        max: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// The modulus `q` is not prime or is too small.
    #[error("modulus {q} is not a usable prime")]
    InvalidModulus {
        /// The rejected modulus.
        q: u64,
    },

    /// The base `g` is not in `[2, q - 2]`.
    #[error("generator {g} out of range for modulus {q}")]
    InvalidGenerator {
        /// The rejected base.
        g: u64,
        /// The modulus it was checked against.
        q: u64,
    },

    /// A signing secret outside `[1, q - 2]`.
    #[error("signing secret out of range for modulus {q}")]
    InvalidSecret {
        /// The modulus it was checked against.
        q: u64,
    },

    /// An accepted public key outside `[1, q - 1]`.
    #[error("public key {key} out of range for modulus {q}")]
    InvalidPublicKey {
        /// The rejected key.
        key: u64,
        /// The modulus it was checked against.
        q: u64,
    },
}

/// Ciphertext that cannot be decrypted under the declared padding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// Ciphertext is empty; even empty plaintext encrypts to one block.
    #[error("ciphertext is empty")]
    EmptyCiphertext,

    /// Ciphertext length is not a whole number of blocks.
    #[error("ciphertext length {len} is not a multiple of the block size")]
    UnalignedCiphertext {
        /// Length of the rejected ciphertext.
        len: usize,
    },

    /// Declared padding does not fit the ciphertext.
    #[error("invalid padding {padding} for ciphertext of {len} bytes")]
    InvalidPadding {
        /// Declared padding size.
        padding: usize,
        /// Ciphertext length.
        len: usize,
    },

    /// The trailing filler bytes did not decrypt to the filler value.
    #[error("padding filler does not match")]
    InvalidFiller,
}

/// Packed signature bytes that cannot be unpacked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// Packed form has the wrong length.
    #[error("malformed signature: expected {expected} bytes, got {actual}")]
    Malformed {
        /// Required packed length.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },
}
