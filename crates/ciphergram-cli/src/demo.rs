//! `ciphergram demo-tamper`.
//!
//! Provisions two parties, frames one message, then corrupts a copy of the
//! envelope in each region and shows the receiver refusing it.

use std::{io::Write, ops::Range};

use ciphergram_core::{CodecConfig, Environment, MessageCodec, provision_pair};
use ciphergram_crypto::{SIGNATURE_SIZE, SchnorrParams};
use ciphergram_proto::EnvelopeHeader;

use crate::error::CliError;

pub fn run<E: Environment>(
    message: &str,
    params: SchnorrParams,
    env: &E,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let config = CodecConfig::sealed(params);
    let (sender_keys, receiver_keys) = provision_pair(&params, env)?;
    let sender = MessageCodec::new(&config, &sender_keys, env.clone())?;
    let receiver = MessageCodec::new(&config, &receiver_keys, env.clone())?;

    let envelope = sender.frame(message.as_bytes())?;
    writeln!(out, "envelope ({} bytes): {}", envelope.len(), hex::encode(&envelope))?;

    let intact = receiver.parse(&envelope)?;
    writeln!(out, "intact:     accepted {:?}", String::from_utf8_lossy(&intact))?;

    let signature_start = envelope.len() - SIGNATURE_SIZE;
    let regions: [(&'static str, Range<usize>); 3] = [
        ("header", 0..EnvelopeHeader::SIZE),
        ("ciphertext", EnvelopeHeader::SIZE..signature_start),
        ("signature", signature_start..envelope.len()),
    ];

    for (region, range) in regions {
        let mut tampered = envelope.clone();
        let index = range.start + usize::from(env.random_array::<1>()?[0]) % range.len();
        tampered[index] ^= 0x20;

        match receiver.parse(&tampered) {
            Ok(_) => return Err(CliError::TamperAccepted { region }),
            Err(e) => writeln!(out, "{region:<11} byte {index:>2} flipped: rejected ({e})")?,
        }
    }

    Ok(())
}
