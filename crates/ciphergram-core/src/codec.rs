//! Message codec.
//!
//! Combines a [`BlockCipher`] and a [`Signer`]/[`Verifier`] pair into one
//! authenticated wire format.
//!
//! ## Send pipeline
//!
//! 1. Sign the plaintext (the signature binds the original text)
//! 2. Encrypt the plaintext, recording the padding
//! 3. Frame `header || ciphertext || packed signature`
//!
//! ## Receive pipeline
//!
//! 1. Split the envelope into header, ciphertext and signature
//! 2. Unpack the signature
//! 3. Decrypt, trimming the declared padding
//! 4. Verify the plaintext against every accepted key
//!
//! Plaintext is released only after step 4 succeeds. A verification failure
//! drops it.

use ciphergram_crypto::{
    AcceptedPublicKeys, BlockCipher, Blowfish, ConfigError, KeyPair, Padded, RANDOM_SIZE,
    SchnorrSigner, SchnorrVerifier, Signature, Signer, Verifier,
};
use ciphergram_proto::Envelope;

use crate::{
    config::{CodecConfig, EncryptionMode},
    env::Environment,
    error::CodecError,
    keys::KeyMaterial,
};

/// The three keyed stages of a sealed codec.
struct Stages {
    cipher: Box<dyn BlockCipher>,
    signer: Box<dyn Signer>,
    verifier: Box<dyn Verifier>,
}

enum Mode {
    Disabled,
    Sealed(Stages),
}

/// Frames plaintext into envelopes and parses envelopes back into verified
/// plaintext.
///
/// # Type Parameters
///
/// - `E`: Environment implementation supplying signing nonces
pub struct MessageCodec<E: Environment> {
    mode: Mode,
    env: E,
}

impl<E: Environment> MessageCodec<E> {
    /// Build a codec from provisioned key material.
    ///
    /// In [`EncryptionMode::Disabled`] the key material is not used.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the cipher key length, signing secret or any accepted
    /// public key is invalid for `config.params`.
    pub fn new(config: &CodecConfig, keys: &KeyMaterial, env: E) -> Result<Self, ConfigError> {
        if config.mode == EncryptionMode::Disabled {
            tracing::warn!("encryption disabled: messages cross the transport in the clear");
            return Ok(Self::disabled(env));
        }

        let params = config.params;
        let cipher = Blowfish::new(&keys.cipher_key)?;
        let signer = SchnorrSigner::new(params, KeyPair::from_secret(&params, keys.signing_secret)?);
        let accepted = AcceptedPublicKeys::new(&params, keys.accepted_public_keys.iter().copied())?;

        if accepted.is_empty() {
            tracing::warn!("no accepted public keys: every incoming message will be rejected");
        }
        tracing::debug!(
            q = params.q(),
            g = params.g(),
            accepted_keys = accepted.len(),
            "codec configured"
        );

        Ok(Self::from_parts(cipher, signer, SchnorrVerifier::new(params, accepted), env))
    }

    /// Build a sealed codec from explicit stages.
    pub fn from_parts(
        cipher: impl BlockCipher + 'static,
        signer: impl Signer + 'static,
        verifier: impl Verifier + 'static,
        env: E,
    ) -> Self {
        let stages =
            Stages { cipher: Box::new(cipher), signer: Box::new(signer), verifier: Box::new(verifier) };
        Self { mode: Mode::Sealed(stages), env }
    }

    /// A pass-through codec: no signing, no encryption, no framing.
    pub fn disabled(env: E) -> Self {
        Self { mode: Mode::Disabled, env }
    }

    /// True if messages pass through unprotected.
    pub fn is_disabled(&self) -> bool {
        matches!(self.mode, Mode::Disabled)
    }

    /// Sign, encrypt and frame `plaintext`.
    pub fn frame(&self, plaintext: &[u8]) -> Result<Vec<u8>, CodecError> {
        let Mode::Sealed(stages) = &self.mode else {
            return Ok(plaintext.to_vec());
        };

        let random: [u8; RANDOM_SIZE] = self.env.random_array()?;
        let signature = stages.signer.sign(plaintext, random);
        let Padded { ciphertext, padding } = stages.cipher.encrypt(plaintext);
        let packed = signature.pack();

        let too_large = || CodecError::MessageTooLarge { len: plaintext.len() };
        let envelope = Envelope {
            padding_size: u32::try_from(padding).map_err(|_| too_large())?,
            ciphertext: &ciphertext,
            signature: &packed,
        };
        let bytes = envelope.to_vec().map_err(|_| too_large())?;

        tracing::debug!(
            ciphertext_len = ciphertext.len(),
            padding,
            envelope_len = bytes.len(),
            "framed envelope"
        );
        Ok(bytes)
    }

    /// Split, decrypt and verify an envelope.
    ///
    /// # Errors
    ///
    /// - `CodecError::Parse` if the bytes are not a well-formed envelope
    /// - `CodecError::Verification` if the signature does not validate
    ///   against any accepted public key
    pub fn parse(&self, bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
        let Mode::Sealed(stages) = &self.mode else {
            return Ok(bytes.to_vec());
        };

        let envelope = Envelope::parse(bytes)?;
        let signature = Signature::unpack(envelope.signature)?;
        let padding = usize::try_from(envelope.padding_size).unwrap_or(usize::MAX);
        let plaintext = stages.cipher.decrypt(envelope.ciphertext, padding)?;

        if !stages.verifier.verify(&plaintext, &signature) {
            tracing::warn!(
                envelope_len = bytes.len(),
                ciphertext_len = envelope.ciphertext.len(),
                "rejected envelope: signature not verified"
            );
            return Err(CodecError::Verification);
        }

        tracing::debug!(
            ciphertext_len = envelope.ciphertext.len(),
            padding = envelope.padding_size,
            "verified envelope"
        );
        Ok(plaintext)
    }
}

impl<E: Environment> std::fmt::Debug for MessageCodec<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = if self.is_disabled() { "disabled" } else { "sealed" };
        f.debug_struct("MessageCodec").field("mode", &mode).finish_non_exhaustive()
    }
}
