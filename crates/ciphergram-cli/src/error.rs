//! Command errors.

use std::io;

use ciphergram_core::{ChannelError, CodecError, EntropyError, KeyMaterialError};
use ciphergram_crypto::ConfigError;
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Key file unreadable or invalid.
    #[error(transparent)]
    Keys(#[from] KeyMaterialError),

    /// Key material or parameters rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No randomness available.
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// Channel failure.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Codec failure outside a channel.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Socket or terminal I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The server greeted with unexpected text.
    #[error("unexpected confirmation {received:?}")]
    WrongConfirmation {
        /// What the server sent.
        received: String,
    },

    /// A corrupted envelope was accepted.
    #[error("tampered {region} was accepted")]
    TamperAccepted {
        /// Envelope region that was corrupted.
        region: &'static str,
    },
}
