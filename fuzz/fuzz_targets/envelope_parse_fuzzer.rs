//! Fuzz target for envelope parsing
//!
//! Feed arbitrary bytes to every stage of the receive pipeline.
//!
//! # Invariants
//!
//! - NEVER panic, whatever the input
//! - A parsed envelope accounts for every input byte
//! - Re-encoding a parsed envelope reproduces the input exactly
//! - Arbitrary bytes never verify under a fresh key set

#![no_main]

use std::sync::OnceLock;

use ciphergram_core::{CodecError, MessageCodec};
use ciphergram_harness::{Scenario, SeededEnv};
use ciphergram_proto::{Envelope, EnvelopeHeader};
use libfuzzer_sys::fuzz_target;

fn receiver() -> &'static MessageCodec<SeededEnv> {
    static RECEIVER: OnceLock<MessageCodec<SeededEnv>> = OnceLock::new();
    RECEIVER.get_or_init(|| {
        let scenario = Scenario::new(0).expect("provisioning");
        let codec = MessageCodec::new(
            &Default::default(),
            &scenario.server_keys,
            SeededEnv::new(1),
        );
        codec.expect("valid key material")
    })
}

fuzz_target!(|data: &[u8]| {
    if let Ok(envelope) = Envelope::parse(data) {
        assert_eq!(
            EnvelopeHeader::SIZE + envelope.ciphertext.len() + envelope.signature.len(),
            data.len()
        );
        assert_eq!(envelope.to_vec().expect("parsed envelope re-encodes"), data);
    }

    match receiver().parse(data) {
        Err(CodecError::Parse(_) | CodecError::Verification) => {},
        Ok(plaintext) => panic!("arbitrary bytes verified: {plaintext:?}"),
        Err(e) => panic!("unexpected error class: {e}"),
    }
});
