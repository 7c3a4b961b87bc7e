//! `ciphergram keygen`.

use std::{io::Write, path::PathBuf};

use ciphergram_core::{
    Environment,
    keys::{generate_cipher_key, generate_key_pair},
    provision_pair,
};
use ciphergram_crypto::KeyPair;
use clap::Subcommand;

use crate::{ParamsOpts, error::CliError};

/// What to generate.
#[derive(Subcommand, Debug)]
pub enum KeygenKind {
    /// A Schnorr key pair, or the public key for an existing secret
    Schnorr {
        /// Derive the public key for this secret instead of generating one
        #[arg(long)]
        secret: Option<u64>,

        #[command(flatten)]
        params: ParamsOpts,
    },

    /// A random Blowfish key
    Blowfish,

    /// Key files for a client and a server that trust each other
    Pair {
        /// Where to write the client key file
        #[arg(long, default_value = "client_secrets.json")]
        client: PathBuf,

        /// Where to write the server key file
        #[arg(long, default_value = "server_secrets.json")]
        server: PathBuf,

        #[command(flatten)]
        params: ParamsOpts,
    },
}

pub fn run(kind: &KeygenKind, env: &impl Environment, out: &mut impl Write) -> Result<(), CliError> {
    match kind {
        KeygenKind::Schnorr { secret, params } => {
            let params = params.params();
            let pair = match secret {
                Some(secret) => KeyPair::from_secret(&params, *secret)?,
                None => generate_key_pair(&params, env)?,
            };
            writeln!(out, "Schnorr (q = {}, g = {})", params.q(), params.g())?;
            writeln!(out, "Secret key {}", pair.secret())?;
            writeln!(out, "Public key {}", pair.public())?;
        },
        KeygenKind::Blowfish => {
            let key = generate_cipher_key(env)?;
            writeln!(out, "Blowfish")?;
            writeln!(out, "Secret key {key}")?;
        },
        KeygenKind::Pair { client, server, params } => {
            let params = params.params();
            let (client_keys, server_keys) = provision_pair(&params, env)?;
            client_keys.save(client)?;
            server_keys.save(server)?;

            tracing::info!(
                client_public = client_keys.public_key(&params)?,
                server_public = server_keys.public_key(&params)?,
                "provisioned key pair"
            );
            writeln!(out, "Wrote {} and {}", client.display(), server.display())?;
        },
    }
    Ok(())
}
