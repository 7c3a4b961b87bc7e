//! Environment abstraction for randomness.
//!
//! The `Environment` trait decouples the codec from the entropy source:
//!
//! - Production: [`SystemEnv`](crate::SystemEnv) draws from the OS.
//! - Tests: a seeded implementation makes every nonce, and therefore every
//!   envelope, reproducible.
//!
//! # Invariants
//!
//! - Determinism: given the same seed, a test implementation produces the
//!   same byte sequence
//! - Isolation: implementations must not share global state
//! - No silent fallback: a failed draw is an error, never a zero fill

use thiserror::Error;

/// The entropy source could not produce bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entropy source failed: {reason}")]
pub struct EntropyError {
    /// Description from the underlying source.
    pub reason: String,
}

/// Source of random bytes for key generation and signing nonces.
///
/// # Security
///
/// Production implementations MUST use a cryptographically secure source.
/// Signing nonces come from here; a repeated nonce reveals the signing
/// secret.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills `buffer` with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError>;

    /// Returns `N` random bytes.
    fn random_array<const N: usize>(&self) -> Result<[u8; N], EntropyError> {
        let mut bytes = [0u8; N];
        self.random_bytes(&mut bytes)?;
        Ok(bytes)
    }

    /// Generates a random `u64`.
    fn random_u64(&self) -> Result<u64, EntropyError> {
        self.random_array().map(u64::from_be_bytes)
    }
}
