//! Two provisioned parties joined by an in-memory duplex.

use ciphergram_core::{
    ChannelError, CodecConfig, EncryptionMode, KeyMaterial, MessageCodec, SecureChannel,
    provision_pair,
};

use crate::{
    duplex::{DuplexEnd, duplex},
    seeded_env::SeededEnv,
};

/// A secure channel over one end of an in-memory duplex.
pub type ScenarioChannel = SecureChannel<DuplexEnd, SeededEnv>;

/// A connected client and server with mutually trusted keys.
///
/// Everything random (cipher key, signing secrets, nonces) is drawn from
/// one [`SeededEnv`], so two scenarios built from the same seed and driven
/// the same way produce identical bytes.
#[derive(Debug)]
pub struct Scenario {
    /// Client end.
    pub client: ScenarioChannel,
    /// Server end.
    pub server: ScenarioChannel,
    /// Client key material.
    pub client_keys: KeyMaterial,
    /// Server key material.
    pub server_keys: KeyMaterial,
    /// Shared environment.
    pub env: SeededEnv,
}

impl Scenario {
    /// Provision and connect two parties under the default parameters.
    pub fn new(seed: u64) -> Result<Self, ChannelError> {
        Self::with_config(seed, CodecConfig::default())
    }

    /// Provision and connect two parties under `config`.
    pub fn with_config(seed: u64, config: CodecConfig) -> Result<Self, ChannelError> {
        let env = SeededEnv::new(seed);
        let (client_keys, server_keys) = provision_pair(&config.params, &env)?;
        let (client_end, server_end) = duplex();

        let client_codec = MessageCodec::new(&config, &client_keys, env.clone())?;
        let server_codec = MessageCodec::new(&config, &server_keys, env.clone())?;
        let client = SecureChannel::new(client_end, client_codec);
        let server = SecureChannel::new(server_end, server_codec);

        tracing::debug!(seed, disabled = config.mode == EncryptionMode::Disabled, "scenario connected");
        Ok(Self { client, server, client_keys, server_keys, env })
    }
}
