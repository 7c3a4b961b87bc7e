//! Ciphergram core.
//!
//! Turns provisioned key material into a secure point-to-point channel over
//! any reliable byte stream. Every message sent is signed by its originator
//! and then encrypted; every message received is decrypted and its signature
//! verified before it reaches the caller.
//!
//! # Architecture
//!
//! ```text
//! send:    plaintext ─► sign ─► encrypt ─► frame ─► write
//! receive: read ─► split ─► decrypt ─► verify ─► plaintext
//! ```
//!
//! # Components
//!
//! - [`MessageCodec`]: the sign-then-encrypt pipeline and its inverse
//! - [`SecureChannel`]: frames codec output over a `Read + Write` transport
//! - [`KeyMaterial`]: the provisioned cipher key, signing secret and trusted
//!   public keys
//! - [`Environment`]: source of randomness, with [`SystemEnv`] for production
//!
//! # Limitations
//!
//! There is no replay protection: a captured, validly signed envelope is
//! accepted again if re-sent. One `receive` call reads one transport chunk
//! and parses it as exactly one envelope.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod channel;
pub mod codec;
pub mod config;
pub mod env;
mod error;
pub mod keys;
mod system_env;

pub use channel::SecureChannel;
pub use codec::MessageCodec;
pub use config::{CodecConfig, EncryptionMode};
pub use env::{EntropyError, Environment};
pub use error::{ChannelError, CodecError, ParseError};
pub use keys::{KeyMaterial, KeyMaterialError, provision_pair};
pub use system_env::SystemEnv;
