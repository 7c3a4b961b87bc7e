//! Fuzz target for tamper detection
//!
//! Frame a real message between two provisioned parties, apply arbitrary
//! edits to the envelope, and parse the result.
//!
//! # Strategy
//!
//! - Byte flips anywhere in the envelope
//! - Truncation and extension
//! - Splicing bytes from an envelope framed by an untrusted party, whose
//!   cipher key and signing key the receiver does not share
//!
//! # Invariants
//!
//! - An unmodified envelope ALWAYS yields the original message
//! - A modified envelope NEVER yields plaintext
//! - NEVER panic

#![no_main]

use arbitrary::Arbitrary;
use ciphergram_core::CodecError;
use ciphergram_harness::Scenario;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Edit {
    Flip { index: u16, mask: u8 },
    Truncate { len: u16 },
    Extend { bytes: Vec<u8> },
    SpliceFromOther { index: u16, len: u8 },
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    seed: u64,
    message: Vec<u8>,
    other: Vec<u8>,
    edits: Vec<Edit>,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(s) = Scenario::new(input.seed) else {
        return;
    };
    let Ok(stranger) = Scenario::new(input.seed.wrapping_add(1)) else {
        return;
    };
    let message = &input.message[..input.message.len().min(512)];

    let original = s.client.codec().frame(message).expect("frame");
    // Framed under foreign keys, so no splice of it can ever verify.
    let other = stranger.client.codec().frame(&input.other).expect("frame");
    assert_eq!(s.server.codec().parse(&original).expect("intact envelope"), message);

    let mut tampered = original.clone();
    for edit in input.edits {
        match edit {
            Edit::Flip { index, mask } => {
                if let Some(len) = std::num::NonZeroUsize::new(tampered.len()) {
                    tampered[usize::from(index) % len] ^= mask;
                }
            },
            Edit::Truncate { len } => tampered.truncate(usize::from(len)),
            Edit::Extend { bytes } => tampered.extend_from_slice(&bytes),
            Edit::SpliceFromOther { index, len } => {
                let start = usize::from(index).min(tampered.len()).min(other.len());
                let end = (start + usize::from(len)).min(tampered.len()).min(other.len());
                tampered[start..end].copy_from_slice(&other[start..end]);
            },
        }
    }

    match s.server.codec().parse(&tampered) {
        Ok(plaintext) => assert_eq!(tampered, original, "tampered envelope yielded {plaintext:?}"),
        Err(CodecError::Parse(_) | CodecError::Verification) => assert_ne!(tampered, original),
        Err(e) => panic!("unexpected error class: {e}"),
    }
});
