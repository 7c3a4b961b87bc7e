//! Property tests for the message codec.

#![allow(clippy::unwrap_used)]

use ciphergram_core::{CodecConfig, CodecError, KeyMaterial, MessageCodec, ParseError, SystemEnv};
use ciphergram_crypto::{BLOCK_SIZE, CipherError, SIGNATURE_SIZE, SchnorrParams};
use ciphergram_proto::EnvelopeHeader;
use proptest::prelude::*;

const CLIENT_SECRET: u64 = 0x0123_4567_89ab;
const SERVER_SECRET: u64 = 0x0fed_cba9_8765;

fn codec(secret: u64, peer_secret: u64) -> MessageCodec<SystemEnv> {
    let params = SchnorrParams::default();
    let keys = KeyMaterial {
        cipher_key: b"property-test-key".to_vec(),
        signing_secret: secret,
        accepted_public_keys: vec![params.public_for(peer_secret)],
    };
    MessageCodec::new(&CodecConfig::sealed(params), &keys, SystemEnv).unwrap()
}

fn client() -> MessageCodec<SystemEnv> {
    codec(CLIENT_SECRET, SERVER_SECRET)
}

fn server() -> MessageCodec<SystemEnv> {
    codec(SERVER_SECRET, CLIENT_SECRET)
}

#[test]
fn padding_edge_lengths_survive_the_codec() {
    let (client, server) = (client(), server());

    for len in [0usize, 1, 7, 8, 9, 63, 64] {
        let message = vec![b'x'; len];
        let envelope = client.frame(&message).unwrap();
        let recovered = server.parse(&envelope).unwrap();
        assert_eq!(recovered.len(), len);
        assert_eq!(recovered, message);
    }
}

#[test]
fn foreign_signer_is_rejected() {
    let impostor = codec(0x1111, SERVER_SECRET);
    let envelope = impostor.frame(b"trust me").unwrap();
    assert_eq!(server().parse(&envelope), Err(CodecError::Verification));
}

#[test]
fn empty_message_ciphertext_tamper_is_rejected() {
    let (client, server) = (client(), server());
    let envelope = client.frame(b"").unwrap();
    assert_eq!(envelope.len(), EnvelopeHeader::SIZE + BLOCK_SIZE + SIGNATURE_SIZE);

    for index in EnvelopeHeader::SIZE..EnvelopeHeader::SIZE + BLOCK_SIZE {
        for mask in [0x01, 0x20, 0x80, 0xff] {
            let mut tampered = envelope.clone();
            tampered[index] ^= mask;
            assert_eq!(
                server.parse(&tampered),
                Err(CodecError::Parse(ParseError::Cipher(CipherError::InvalidFiller))),
                "byte {index} mask {mask:#04x}"
            );
        }
    }
}

#[test]
fn disabled_mode_has_no_framing() {
    let codec = MessageCodec::disabled(SystemEnv);
    let message = "plain text, ünïcödé";
    let framed = codec.frame(message.as_bytes()).unwrap();

    assert_eq!(framed, message.as_bytes());
    assert_eq!(codec.parse(&framed).unwrap(), message.as_bytes());
}

proptest! {
    #[test]
    fn prop_round_trip(message in ".*") {
        let envelope = client().frame(message.as_bytes()).unwrap();
        let recovered = server().parse(&envelope).unwrap();

        // PROPERTY: parse(frame(m)) == m
        prop_assert_eq!(String::from_utf8(recovered).unwrap(), message);
    }

    #[test]
    fn prop_round_trip_bytes(message in prop::collection::vec(any::<u8>(), 0..300)) {
        let envelope = client().frame(&message).unwrap();
        prop_assert_eq!(
            envelope.len(),
            EnvelopeHeader::SIZE + message.len().div_ceil(8).max(1) * 8 + SIGNATURE_SIZE
        );
        prop_assert_eq!(server().parse(&envelope).unwrap(), message);
    }

    #[test]
    fn prop_tampering_header_or_ciphertext_never_yields_plaintext(
        message in prop::collection::vec(any::<u8>(), 0..96),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let mut envelope = client().frame(&message).unwrap();
        let covered = envelope.len() - SIGNATURE_SIZE;
        envelope[index.index(covered)] ^= flip;

        // PROPERTY: a single flipped byte is a parse or verification failure
        match server().parse(&envelope) {
            Err(CodecError::Parse(_) | CodecError::Verification) => {},
            other => prop_assert!(false, "tampered envelope accepted: {other:?}"),
        }
    }

    #[test]
    fn prop_tampering_signature_is_rejected(
        message in prop::collection::vec(any::<u8>(), 0..64),
        index in 0usize..SIGNATURE_SIZE,
        flip in 1u8..=255,
    ) {
        let mut envelope = client().frame(&message).unwrap();
        let at = envelope.len() - SIGNATURE_SIZE + index;
        envelope[at] ^= flip;

        prop_assert_eq!(server().parse(&envelope), Err(CodecError::Verification));
    }

    #[test]
    fn prop_garbage_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        prop_assert!(server().parse(&bytes).is_err());
    }
}
