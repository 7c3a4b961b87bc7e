//! Production Environment implementation backed by the OS entropy pool.

use crate::env::{EntropyError, Environment};

/// Production environment using `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        getrandom::fill(buffer).map_err(|e| {
            tracing::error!("getrandom failed: {}", e);
            EntropyError { reason: e.to_string() }
        })
    }
}
