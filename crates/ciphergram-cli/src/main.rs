//! Ciphergram binary.
//!
//! # Usage
//!
//! ```bash
//! # Provision a client and a server that trust each other
//! ciphergram keygen pair --client client_secrets.json --server server_secrets.json
//!
//! # Accept clients and log their verified messages
//! ciphergram serve --bind 0.0.0.0:50005 --keys server_secrets.json
//!
//! # Connect and type messages
//! ciphergram connect --addr 127.0.0.1:50005 --keys client_secrets.json
//! ```

mod demo;
mod error;
mod keygen;
mod session;

use std::{io, path::PathBuf};

use ciphergram_core::{CodecConfig, EncryptionMode, SystemEnv, config::DEFAULT_RECEIVE_SIZE};
use ciphergram_crypto::SchnorrParams;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::keygen::KeygenKind;

/// Ciphergram messaging tool
#[derive(Parser, Debug)]
#[command(name = "ciphergram")]
#[command(about = "Signed and encrypted point-to-point messaging")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate key material
    Keygen {
        #[command(subcommand)]
        kind: KeygenKind,
    },

    /// Accept clients one at a time, greet each and log its verified
    /// messages
    Serve {
        /// Address to bind to
        #[arg(short, long, default_value = "0.0.0.0:50005")]
        bind: String,

        /// Path to the server key file (JSON)
        #[arg(short, long, default_value = "server_secrets.json")]
        keys: PathBuf,

        #[command(flatten)]
        protocol: ProtocolOpts,
    },

    /// Connect to a server, check its greeting, then send typed lines
    Connect {
        /// Server address
        #[arg(short, long, default_value = "127.0.0.1:50005")]
        addr: String,

        /// Path to the client key file (JSON)
        #[arg(short, long, default_value = "client_secrets.json")]
        keys: PathBuf,

        #[command(flatten)]
        protocol: ProtocolOpts,
    },

    /// Frame a message, corrupt it in flight and show the receiver
    /// rejecting it
    DemoTamper {
        /// Message to protect
        #[arg(short, long, default_value = "Its the final countdown")]
        message: String,

        #[command(flatten)]
        params: ParamsOpts,
    },
}

/// Public parameter selection.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
struct ParamsOpts {
    /// Use the small legacy group (q = 2695139, g = 2)
    #[arg(long)]
    compact_params: bool,
}

impl ParamsOpts {
    fn params(self) -> SchnorrParams {
        if self.compact_params { SchnorrParams::compact() } else { SchnorrParams::default() }
    }
}

/// Options shared by both ends of a connection.
#[derive(clap::Args, Debug, Clone, Copy)]
struct ProtocolOpts {
    #[command(flatten)]
    params: ParamsOpts,

    /// Send and accept raw, unsigned, unencrypted messages
    #[arg(long)]
    disable_encryption: bool,

    /// Largest number of bytes read for one message
    #[arg(long, default_value_t = DEFAULT_RECEIVE_SIZE)]
    max_size: usize,
}

impl ProtocolOpts {
    fn codec_config(self) -> CodecConfig {
        let mode =
            if self.disable_encryption { EncryptionMode::Disabled } else { EncryptionMode::Sealed };
        CodecConfig { params: self.params.params(), mode }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Logs go to stderr; stdout carries keys, messages and the prompt.
    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let mut stdout = io::stdout().lock();
    match args.command {
        Command::Keygen { kind } => keygen::run(&kind, &SystemEnv, &mut stdout)?,
        Command::Serve { bind, keys, protocol } => {
            session::serve(&bind, &keys, protocol, &mut stdout)?;
        },
        Command::Connect { addr, keys, protocol } => {
            session::connect(&addr, &keys, protocol, io::stdin().lock(), &mut stdout)?;
        },
        Command::DemoTamper { message, params } => {
            demo::run(&message, params.params(), &SystemEnv, &mut stdout)?;
        },
    }

    Ok(())
}
