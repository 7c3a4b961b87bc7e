//! Schnorr signatures over the multiplicative group modulo a prime `q`.
//!
//! # Construction
//!
//! ```text
//! keygen:  x in [1, q-2],  y = g^x mod q
//! sign:    k in [1, q-2],  r = g^k mod q
//!          e = SHA-256(r || m) mod q
//!          s = k - x*e mod (q-1)
//! verify:  r' = g^s * y^e mod q
//!          accept iff SHA-256(r' || m) mod q == e
//! ```
//!
//! `r` is hashed as a big-endian `u64`. Verification against a key set
//! accepts if any key validates.

use std::{collections::BTreeSet, fmt};

use sha2::{Digest, Sha256};

use crate::{
    arith,
    error::ConfigError,
    params::SchnorrParams,
    signature::{Signature, Signer, Verifier},
};

/// Random bytes consumed per secret or nonce draw.
pub const RANDOM_SIZE: usize = 16;

/// Challenge for commitment `r` over `message`.
pub fn challenge_hash(params: &SchnorrParams, commitment: u64, message: &[u8]) -> u64 {
    let digest = Sha256::new().chain_update(commitment.to_be_bytes()).chain_update(message).finalize();
    arith::reduce_be_bytes(&digest, params.q())
}

/// A Schnorr key pair.
///
/// The `Debug` impl never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    secret: u64,
    public: u64,
}

impl KeyPair {
    /// Draw a fresh secret from `random` and derive its public key.
    pub fn generate(params: &SchnorrParams, random: [u8; RANDOM_SIZE]) -> Self {
        let secret = params.exponent_from_random(random);
        Self { secret, public: params.public_for(secret) }
    }

    /// Rebuild a key pair from a provisioned secret.
    pub fn from_secret(params: &SchnorrParams, secret: u64) -> Result<Self, ConfigError> {
        if !params.is_valid_exponent(secret) {
            return Err(ConfigError::InvalidSecret { q: params.q() });
        }
        Ok(Self { secret, public: params.public_for(secret) })
    }

    /// The secret exponent. Must never leave the owning party.
    pub fn secret(&self) -> u64 {
        self.secret
    }

    /// `g^secret mod q`.
    pub fn public(&self) -> u64 {
        self.public
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("secret", &"<redacted>")
            .field("public", &self.public)
            .finish()
    }
}

/// Public keys this party treats as authentic remote signers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptedPublicKeys(BTreeSet<u64>);

impl AcceptedPublicKeys {
    /// Validate each key against `params`.
    pub fn new(
        params: &SchnorrParams,
        keys: impl IntoIterator<Item = u64>,
    ) -> Result<Self, ConfigError> {
        let mut set = BTreeSet::new();
        for key in keys {
            if !params.is_valid_public(key) {
                return Err(ConfigError::InvalidPublicKey { key, q: params.q() });
            }
            set.insert(key);
        }
        Ok(Self(set))
    }

    /// Whether `key` is accepted.
    pub fn contains(&self, key: u64) -> bool {
        self.0.contains(&key)
    }

    /// Number of accepted keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no key is accepted; every verification will fail.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the accepted keys in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }
}

/// Signs with one local key pair.
#[derive(Clone)]
pub struct SchnorrSigner {
    params: SchnorrParams,
    keys: KeyPair,
}

impl SchnorrSigner {
    /// Create a signer for `keys` under `params`.
    pub fn new(params: SchnorrParams, keys: KeyPair) -> Self {
        Self { params, keys }
    }

    /// Public key matching this signer.
    pub fn public(&self) -> u64 {
        self.keys.public()
    }

    /// Sign with an explicit nonce exponent.
    fn sign_with_nonce(&self, message: &[u8], nonce: u64) -> Signature {
        let order = self.params.exponent_modulus();

        let commitment = self.params.public_for(nonce);
        let challenge = challenge_hash(&self.params, commitment, message);
        let bound = arith::mul_mod(self.keys.secret(), challenge % order, order);
        let response = arith::sub_mod(nonce % order, bound, order);

        Signature { challenge, response }
    }
}

impl Signer for SchnorrSigner {
    fn sign(&self, message: &[u8], random: [u8; RANDOM_SIZE]) -> Signature {
        let nonce = self.params.exponent_from_random(random);
        self.sign_with_nonce(message, nonce)
    }
}

impl fmt::Debug for SchnorrSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchnorrSigner")
            .field("params", &self.params)
            .field("keys", &self.keys)
            .finish()
    }
}

/// Verifies against a set of accepted public keys.
#[derive(Debug, Clone)]
pub struct SchnorrVerifier {
    params: SchnorrParams,
    accepted: AcceptedPublicKeys,
}

impl SchnorrVerifier {
    /// Create a verifier trusting `accepted`.
    pub fn new(params: SchnorrParams, accepted: AcceptedPublicKeys) -> Self {
        Self { params, accepted }
    }

    /// The trusted keys.
    pub fn accepted(&self) -> &AcceptedPublicKeys {
        &self.accepted
    }

    /// Check `signature` against a single public key.
    pub fn verify_with(&self, public: u64, message: &[u8], signature: &Signature) -> bool {
        let q = self.params.q();
        if signature.challenge >= q || signature.response >= self.params.exponent_modulus() {
            return false;
        }

        let commitment = arith::mul_mod(
            self.params.public_for(signature.response),
            arith::pow_mod(public, signature.challenge, q),
            q,
        );

        challenge_hash(&self.params, commitment, message) == signature.challenge
    }
}

impl Verifier for SchnorrVerifier {
    fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.accepted.iter().any(|public| self.verify_with(public, message, signature))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params() -> SchnorrParams {
        SchnorrParams::compact()
    }

    fn keys(secret: u64) -> KeyPair {
        KeyPair::from_secret(&params(), secret).unwrap()
    }

    fn verifier(publics: &[u64]) -> SchnorrVerifier {
        SchnorrVerifier::new(
            params(),
            AcceptedPublicKeys::new(&params(), publics.iter().copied()).unwrap(),
        )
    }

    #[test]
    fn public_key_is_generator_power() {
        let pair = keys(12_345);
        assert_eq!(pair.public(), arith::pow_mod(2, 12_345, 2_695_139));
    }

    #[test]
    fn sign_then_verify() {
        let pair = keys(54_321);
        let signer = SchnorrSigner::new(params(), pair.clone());
        let sig = signer.sign(b"hello", [7; RANDOM_SIZE]);
        assert!(verifier(&[pair.public()]).verify(b"hello", &sig));
    }

    #[test]
    fn different_message_fails() {
        let pair = keys(54_321);
        let signer = SchnorrSigner::new(params(), pair.clone());
        let sig = signer.sign(b"hello", [7; RANDOM_SIZE]);
        assert!(!verifier(&[pair.public()]).verify(b"hellp", &sig));
    }

    #[test]
    fn any_accepted_key_suffices() {
        let alice = keys(1_000);
        let bob = keys(99_999);
        let sig = SchnorrSigner::new(params(), bob.clone()).sign(b"msg", [3; RANDOM_SIZE]);

        assert!(verifier(&[alice.public(), bob.public()]).verify(b"msg", &sig));
        assert!(!verifier(&[alice.public()]).verify(b"msg", &sig));
        assert!(!verifier(&[]).verify(b"msg", &sig));
    }

    #[test]
    fn out_of_range_signature_rejected() {
        let pair = keys(4_242);
        let v = verifier(&[pair.public()]);
        assert!(!v.verify(b"m", &Signature { challenge: u64::MAX, response: 0 }));
        assert!(!v.verify(b"m", &Signature { challenge: 0, response: 2_695_138 }));
    }

    #[test]
    fn nonce_changes_signature() {
        let signer = SchnorrSigner::new(params(), keys(777));
        let a = signer.sign(b"same", [1; RANDOM_SIZE]);
        let b = signer.sign(b"same", [2; RANDOM_SIZE]);
        assert_ne!(a, b);
    }

    #[test]
    fn secret_bounds() {
        let p = params();
        assert_eq!(KeyPair::from_secret(&p, 0), Err(ConfigError::InvalidSecret { q: p.q() }));
        assert_eq!(KeyPair::from_secret(&p, p.q() - 1), Err(ConfigError::InvalidSecret {
            q: p.q()
        }));
        assert!(KeyPair::from_secret(&p, p.q() - 2).is_ok());
    }

    #[test]
    fn public_key_bounds() {
        let p = params();
        assert!(matches!(
            AcceptedPublicKeys::new(&p, [0]),
            Err(ConfigError::InvalidPublicKey { key: 0, .. })
        ));
        assert!(AcceptedPublicKeys::new(&p, [p.q()]).is_err());
        assert_eq!(AcceptedPublicKeys::new(&p, [5, 5, 9]).unwrap().len(), 2);
    }

    #[test]
    fn debug_redacts_secret() {
        let pair = keys(31_337);
        let rendered = format!("{pair:?}");
        assert!(!rendered.contains("31337"));
        assert!(rendered.contains("<redacted>"));
    }
}
