//! `ciphergram serve` and `ciphergram connect`.
//!
//! The server speaks first: on every connection it sends
//! [`CONFIRMATION_TEXT`]. A client that cannot verify the greeting, or reads
//! different text, has reached the wrong server and stops.

use std::{
    io::{self, BufRead, Read, Write},
    net::{TcpListener, TcpStream},
    path::Path,
};

use ciphergram_core::{
    ChannelError, Environment, KeyMaterial, MessageCodec, SecureChannel, SystemEnv,
    config::CONFIRMATION_TEXT,
};

use crate::{ProtocolOpts, error::CliError};

const PROMPT: &str = "(ctrl+d to exit)> ";

pub fn serve(
    bind: &str,
    keys: &Path,
    protocol: ProtocolOpts,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let keys = KeyMaterial::load(keys)?;
    let config = protocol.codec_config();
    // Reject bad key material before accepting anyone.
    MessageCodec::new(&config, &keys, SystemEnv)?;

    let listener = TcpListener::bind(bind)?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                continue;
            },
        };

        let peer = stream.peer_addr().map(|a| a.to_string()).unwrap_or_default();
        tracing::info!(%peer, "client connected");

        let channel = SecureChannel::new(stream, MessageCodec::new(&config, &keys, SystemEnv)?);
        match handle_client(channel, protocol.max_size, out) {
            Ok(received) => tracing::info!(%peer, received, "client disconnected"),
            Err(e) => tracing::warn!(%peer, error = %e, "client dropped"),
        }
    }

    Ok(())
}

/// Greet one client, then write each verified message to `out` on its own
/// line until the client disconnects.
///
/// Malformed envelopes are skipped. A message that fails verification ends
/// the session. Returns the number of messages received.
pub fn handle_client<T: Read + Write, E: Environment>(
    mut channel: SecureChannel<T, E>,
    max_size: usize,
    out: &mut impl Write,
) -> Result<usize, CliError> {
    channel.send(CONFIRMATION_TEXT)?;

    let mut received = 0;
    loop {
        match channel.receive(max_size) {
            Ok(message) => {
                received += 1;
                writeln!(out, "{message}")?;
                out.flush()?;
            },
            Err(ChannelError::Transport(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Ok(received);
            },
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => tracing::warn!(error = %e, "discarded message"),
        }
    }
}

pub fn connect(
    addr: &str,
    keys: &Path,
    protocol: ProtocolOpts,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let keys = KeyMaterial::load(keys)?;
    let codec = MessageCodec::new(&protocol.codec_config(), &keys, SystemEnv)?;

    let stream = TcpStream::connect(addr)?;
    tracing::info!(addr, "connected");

    let mut channel = SecureChannel::new(stream, codec);
    confirm_server(&mut channel, protocol.max_size)?;
    let sent = run_prompt(&mut channel, input, out)?;

    tracing::info!(sent, "session ended");
    Ok(())
}

/// Read the server's greeting and check it.
pub fn confirm_server<T: Read + Write, E: Environment>(
    channel: &mut SecureChannel<T, E>,
    max_size: usize,
) -> Result<(), CliError> {
    let received = channel.receive(max_size)?;
    if received != CONFIRMATION_TEXT {
        return Err(CliError::WrongConfirmation { received });
    }

    tracing::info!("server confirmed");
    Ok(())
}

/// Send each line of `input` until end of input, then close the channel.
/// Returns the number of lines sent.
pub fn run_prompt<T: Read + Write, E: Environment>(
    channel: &mut SecureChannel<T, E>,
    mut input: impl BufRead,
    out: &mut impl Write,
) -> Result<usize, CliError> {
    let mut line = String::new();
    let mut sent = 0;

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        channel.send(line.trim_end_matches(['\r', '\n']))?;
        sent += 1;
    }

    channel.close();
    Ok(sent)
}
