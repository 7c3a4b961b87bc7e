//! Provisioned key material.
//!
//! Key material is created out of band and loaded once at startup. The
//! on-disk form is a JSON key file:
//!
//! ```json
//! {
//!   "blowfish": { "secret": "s3cretKey" },
//!   "schnorr": { "secret": 48211, "accepted_public": [1837266] }
//! }
//! ```

use std::{fmt, fs, io, path::Path};

use ciphergram_crypto::{
    ConfigError, KeyPair, MAX_KEY_LEN, MIN_KEY_LEN, RANDOM_SIZE, SchnorrParams,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::env::{EntropyError, Environment};

const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Errors loading key material.
#[derive(Debug, Error)]
pub enum KeyMaterialError {
    /// The key file could not be read or written.
    #[error("key file {path}: {source}")]
    Io {
        /// Path of the key file.
        path: String,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// The key file is not valid JSON of the expected shape.
    #[error("invalid key file: {0}")]
    Json(#[from] serde_json::Error),

    /// A key value is out of range.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The cipher key cannot be stored as a JSON string.
    #[error("cipher key is not UTF-8 text")]
    NonTextCipherKey,

    /// No randomness for key generation.
    #[error(transparent)]
    Entropy(#[from] EntropyError),
}

#[derive(Serialize, Deserialize)]
struct KeyFile {
    blowfish: BlowfishSection,
    schnorr: SchnorrSection,
}

#[derive(Serialize, Deserialize)]
struct BlowfishSection {
    secret: String,
}

#[derive(Serialize, Deserialize)]
struct SchnorrSection {
    secret: u64,
    #[serde(default)]
    accepted_public: Vec<u64>,
}

/// Everything one party needs to build a codec.
///
/// # Security
///
/// The `Debug` impl redacts the cipher key and signing secret.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    /// Symmetric cipher key, shared by both parties.
    pub cipher_key: Vec<u8>,
    /// Local Schnorr signing secret.
    pub signing_secret: u64,
    /// Remote public keys treated as authentic.
    pub accepted_public_keys: Vec<u64>,
}

impl KeyMaterial {
    /// Parse a JSON key file body.
    pub fn from_json_str(json: &str) -> Result<Self, KeyMaterialError> {
        let file: KeyFile = serde_json::from_str(json)?;
        Ok(Self {
            cipher_key: file.blowfish.secret.into_bytes(),
            signing_secret: file.schnorr.secret,
            accepted_public_keys: file.schnorr.accepted_public,
        })
    }

    /// Load a JSON key file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KeyMaterialError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|source| KeyMaterialError::Io { path: path.display().to_string(), source })?;
        let keys = Self::from_json_str(&json)?;

        tracing::debug!(
            path = %path.display(),
            accepted_keys = keys.accepted_public_keys.len(),
            "loaded key material"
        );
        Ok(keys)
    }

    /// Render as a JSON key file body.
    ///
    /// Fails if the cipher key is not UTF-8, since the file stores it as a
    /// string.
    pub fn to_json_string(&self) -> Result<String, KeyMaterialError> {
        let secret = String::from_utf8(self.cipher_key.clone())
            .map_err(|_| KeyMaterialError::NonTextCipherKey)?;
        let file = KeyFile {
            blowfish: BlowfishSection { secret },
            schnorr: SchnorrSection {
                secret: self.signing_secret,
                accepted_public: self.accepted_public_keys.clone(),
            },
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Write a JSON key file to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), KeyMaterialError> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string()?)
            .map_err(|source| KeyMaterialError::Io { path: path.display().to_string(), source })
    }

    /// Public key matching the local signing secret.
    pub fn public_key(&self, params: &SchnorrParams) -> Result<u64, ConfigError> {
        KeyPair::from_secret(params, self.signing_secret).map(|pair| pair.public())
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("cipher_key", &format!("<redacted {} bytes>", self.cipher_key.len()))
            .field("signing_secret", &"<redacted>")
            .field("accepted_public_keys", &self.accepted_public_keys)
            .finish()
    }
}

/// Provision two parties that trust each other.
///
/// Both share one fresh cipher key; each gets its own signing secret and
/// accepts only the other's public key. Returns `(client, server)`.
pub fn provision_pair(
    params: &SchnorrParams,
    env: &impl Environment,
) -> Result<(KeyMaterial, KeyMaterial), EntropyError> {
    let cipher_key = generate_cipher_key(env)?.into_bytes();
    let client = generate_key_pair(params, env)?;
    let server = generate_key_pair(params, env)?;

    let client_keys = KeyMaterial {
        cipher_key: cipher_key.clone(),
        signing_secret: client.secret(),
        accepted_public_keys: vec![server.public()],
    };
    let server_keys = KeyMaterial {
        cipher_key,
        signing_secret: server.secret(),
        accepted_public_keys: vec![client.public()],
    };
    Ok((client_keys, server_keys))
}

/// Generate a fresh Schnorr key pair.
pub fn generate_key_pair(
    params: &SchnorrParams,
    env: &impl Environment,
) -> Result<KeyPair, EntropyError> {
    let random: [u8; RANDOM_SIZE] = env.random_array()?;
    Ok(KeyPair::generate(params, random))
}

/// Generate a random alphanumeric cipher key of 8 to 56 characters.
pub fn generate_cipher_key(env: &impl Environment) -> Result<String, EntropyError> {
    let span = MAX_KEY_LEN - MIN_KEY_LEN + 1;
    let [len_byte] = env.random_array::<1>()?;
    let len = MIN_KEY_LEN + usize::from(len_byte) % span;

    // Largest multiple of the alphabet size below 256, so every symbol is
    // equally likely.
    let limit = 256 - 256 % KEY_ALPHABET.len();

    let mut key = String::with_capacity(len);
    while key.len() < len {
        let [byte] = env.random_array::<1>()?;
        if usize::from(byte) < limit {
            key.push(char::from(KEY_ALPHABET[usize::from(byte) % KEY_ALPHABET.len()]));
        }
    }
    Ok(key)
}
