//! Ciphergram Cryptographic Primitives
//!
//! This crate provides the two primitives the Ciphergram channel is built
//! from: a Blowfish block cipher for confidentiality and a Schnorr signature
//! scheme for authenticity.
//!
//! # Design
//!
//! All functions in this crate are pure. Random bytes required for key
//! generation and signing are provided by the caller, enabling:
//!
//! - Deterministic testing with seeded RNG
//! - Sans-IO architecture compatibility
//! - No coupling to an entropy source
//!
//! # Components
//!
//! - [`BlockCipher`] / [`Blowfish`]: 64-bit block Feistel cipher with explicit
//!   padding accounting
//! - [`Signer`] / [`Verifier`]: signature capabilities, implemented by
//!   [`SchnorrSigner`] and [`SchnorrVerifier`]
//! - [`SchnorrParams`]: validated public parameters `(g, q)` shared by all
//!   parties
//! - [`arith`]: modular arithmetic over `u64` with `u128` intermediates

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod arith;
mod blowfish;
mod blowfish_tables;
mod cipher;
mod error;
mod params;
mod schnorr;
mod signature;

pub use blowfish::{Blowfish, MAX_KEY_LEN, MIN_KEY_LEN};
pub use cipher::{BLOCK_SIZE, BlockCipher, Padded};
pub use error::{CipherError, ConfigError, SignatureError};
pub use params::SchnorrParams;
pub use schnorr::{
    AcceptedPublicKeys, KeyPair, RANDOM_SIZE, SchnorrSigner, SchnorrVerifier, challenge_hash,
};
pub use signature::{SIGNATURE_SIZE, Signature, Signer, Verifier};
