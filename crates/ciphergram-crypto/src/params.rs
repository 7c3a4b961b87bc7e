//! Public Schnorr parameters.

use crate::{arith, error::ConfigError};

/// Validated public parameters `(g, q)` shared by all parties.
///
/// `q` is a prime modulus and `g` a base in `[2, q - 2]`. Public keys are
/// `g^secret mod q`. Exponents live modulo `q - 1`, so signing and
/// verification hold for any base by Fermat's little theorem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchnorrParams {
    g: u64,
    q: u64,
}

impl SchnorrParams {
    /// Mersenne prime `2^61 - 1`.
    pub const DEFAULT_Q: u64 = (1 << 61) - 1;

    /// Base used with [`Self::DEFAULT_Q`].
    pub const DEFAULT_G: u64 = 3;

    /// Small legacy modulus, kept for interoperability with existing key
    /// files.
    pub const COMPACT_Q: u64 = 2_695_139;

    /// Base used with [`Self::COMPACT_Q`].
    pub const COMPACT_G: u64 = 2;

    /// Validate and build parameters.
    pub fn new(g: u64, q: u64) -> Result<Self, ConfigError> {
        if q < 5 || !arith::is_prime(q) {
            return Err(ConfigError::InvalidModulus { q });
        }
        if g < 2 || g > q - 2 {
            return Err(ConfigError::InvalidGenerator { g, q });
        }
        Ok(Self { g, q })
    }

    /// The legacy `(2, 2695139)` pair.
    pub fn compact() -> Self {
        Self { g: Self::COMPACT_G, q: Self::COMPACT_Q }
    }

    /// The base.
    pub fn g(&self) -> u64 {
        self.g
    }

    /// The prime modulus.
    pub fn q(&self) -> u64 {
        self.q
    }

    /// Order of the exponent group, `q - 1`.
    pub fn exponent_modulus(&self) -> u64 {
        self.q - 1
    }

    /// Maps 128 random bits onto the exponent range `[1, q - 2]`.
    ///
    /// The bias of the reduction is at most `q / 2^128`.
    pub fn exponent_from_random(&self, random: [u8; 16]) -> u64 {
        let span = u128::from(self.q - 2);
        (u128::from_be_bytes(random) % span) as u64 + 1
    }

    /// Whether `x` is a usable secret or nonce exponent.
    pub fn is_valid_exponent(&self, x: u64) -> bool {
        (1..=self.q - 2).contains(&x)
    }

    /// Whether `y` is a usable public key.
    pub fn is_valid_public(&self, y: u64) -> bool {
        (1..self.q).contains(&y)
    }

    /// `g^x mod q`.
    pub fn public_for(&self, x: u64) -> u64 {
        arith::pow_mod(self.g, x, self.q)
    }
}

impl Default for SchnorrParams {
    fn default() -> Self {
        Self { g: Self::DEFAULT_G, q: Self::DEFAULT_Q }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builtin_parameters_validate() {
        let default = SchnorrParams::default();
        assert_eq!(SchnorrParams::new(default.g(), default.q()), Ok(default));

        let compact = SchnorrParams::compact();
        assert_eq!(SchnorrParams::new(compact.g(), compact.q()), Ok(compact));
    }

    #[test]
    fn composite_modulus_rejected() {
        assert_eq!(SchnorrParams::new(2, 1_373_653), Err(ConfigError::InvalidModulus {
            q: 1_373_653
        }));
        assert!(matches!(SchnorrParams::new(2, 3), Err(ConfigError::InvalidModulus { .. })));
    }

    #[test]
    fn generator_bounds() {
        assert!(matches!(SchnorrParams::new(1, 23), Err(ConfigError::InvalidGenerator { .. })));
        assert!(matches!(SchnorrParams::new(22, 23), Err(ConfigError::InvalidGenerator { .. })));
        assert!(SchnorrParams::new(21, 23).is_ok());
    }

    #[test]
    fn exponent_sampling_stays_in_range() {
        let params = SchnorrParams::new(2, 5).unwrap();
        for byte in [0u8, 1, 2, 3, 0x7f, 0xff] {
            let x = params.exponent_from_random([byte; 16]);
            assert!(params.is_valid_exponent(x), "{x}");
        }
    }
}
