//! End-to-end scenarios between two provisioned parties.
//!
//! Each test builds a [`Scenario`] from a fixed seed, so a failure
//! reproduces exactly.

#![allow(clippy::unwrap_used)]

use std::thread;

use ciphergram_core::{
    ChannelError, CodecConfig, ParseError,
    config::{CONFIRMATION_TEXT, DEFAULT_RECEIVE_SIZE},
};
use ciphergram_crypto::{CipherError, SIGNATURE_SIZE, SchnorrParams};
use ciphergram_harness::Scenario;
use ciphergram_proto::EnvelopeHeader;
use proptest::prelude::*;

#[test]
fn hello_is_delivered() {
    let mut s = Scenario::new(1).unwrap();

    s.client.send("hello").unwrap();
    assert_eq!(s.server.receive(DEFAULT_RECEIVE_SIZE).unwrap(), "hello");
}

#[test]
fn confirmation_then_conversation() {
    let mut s = Scenario::new(2).unwrap();

    s.server.send(CONFIRMATION_TEXT).unwrap();
    assert_eq!(s.client.receive(DEFAULT_RECEIVE_SIZE).unwrap(), CONFIRMATION_TEXT);

    for line in ["first", "", "ünïcödé", "a much longer line that spans several cipher blocks"] {
        s.client.send(line).unwrap();
        assert_eq!(s.server.receive(DEFAULT_RECEIVE_SIZE).unwrap(), line);
    }
}

#[test]
fn verbatim_replay_is_accepted() {
    let mut s = Scenario::new(3).unwrap();

    let envelope = s.client.codec().frame(b"hello").unwrap();
    s.client.send_raw(&envelope).unwrap();
    s.client.send_raw(&envelope).unwrap();

    assert_eq!(s.server.receive(DEFAULT_RECEIVE_SIZE).unwrap(), "hello");
    assert_eq!(s.server.receive(DEFAULT_RECEIVE_SIZE).unwrap(), "hello");
}

#[test]
fn tampered_ciphertext_is_rejected() {
    let mut s = Scenario::new(4).unwrap();

    let mut envelope = s.client.codec().frame(b"transfer 10 coins").unwrap();
    envelope[EnvelopeHeader::SIZE] ^= 0x01;
    s.client.send_raw(&envelope).unwrap();

    let err = s.server.receive(DEFAULT_RECEIVE_SIZE).unwrap_err();
    assert!(matches!(err, ChannelError::Verification), "{err:?}");
    assert!(err.is_fatal());
}

#[test]
fn tampered_signature_is_rejected() {
    let mut s = Scenario::new(5).unwrap();

    let mut envelope = s.client.codec().frame(b"hello").unwrap();
    let last = envelope.len() - 1;
    envelope[last] ^= 0x80;
    s.client.send_raw(&envelope).unwrap();

    assert!(matches!(s.server.receive(DEFAULT_RECEIVE_SIZE), Err(ChannelError::Verification)));
}

#[test]
fn truncated_envelope_is_parse_error_and_channel_survives() {
    let mut s = Scenario::new(6).unwrap();

    let envelope = s.client.codec().frame(b"hello").unwrap();
    s.client.send_raw(&envelope[..envelope.len() - SIGNATURE_SIZE / 2]).unwrap();

    let err = s.server.receive(DEFAULT_RECEIVE_SIZE).unwrap_err();
    assert!(matches!(err, ChannelError::Parse(ParseError::Signature(_))), "{err:?}");
    assert!(!err.is_fatal());

    s.client.send("still here").unwrap();
    assert_eq!(s.server.receive(DEFAULT_RECEIVE_SIZE).unwrap(), "still here");
}

#[test]
fn envelope_from_foreign_parties_is_rejected() {
    let mut ours = Scenario::new(7).unwrap();
    let theirs = Scenario::new(8).unwrap();

    // Block-aligned, so no filler to check: the signature decides.
    let aligned = theirs.client.codec().frame(b"trust me").unwrap();
    ours.client.send_raw(&aligned).unwrap();
    assert!(matches!(ours.server.receive(DEFAULT_RECEIVE_SIZE), Err(ChannelError::Verification)));

    // Padded under a foreign cipher key, the filler no longer decrypts to zeros.
    let padded = theirs.client.codec().frame(b"let me in").unwrap();
    ours.client.send_raw(&padded).unwrap();
    assert!(matches!(
        ours.server.receive(DEFAULT_RECEIVE_SIZE),
        Err(ChannelError::Parse(ParseError::Cipher(CipherError::InvalidFiller)))
    ));
}

#[test]
fn own_envelope_reflected_back_is_rejected() {
    let mut s = Scenario::new(9).unwrap();

    let envelope = s.client.codec().frame(b"echo").unwrap();
    s.server.send_raw(&envelope).unwrap();

    assert!(matches!(s.client.receive(DEFAULT_RECEIVE_SIZE), Err(ChannelError::Verification)));
}

#[test]
fn same_seed_same_envelopes() {
    let a = Scenario::new(42).unwrap();
    let b = Scenario::new(42).unwrap();
    let c = Scenario::new(43).unwrap();

    assert_eq!(a.client_keys, b.client_keys);
    assert_eq!(a.server_keys, b.server_keys);

    let from_a = a.client.codec().frame(b"deterministic").unwrap();
    let from_b = b.client.codec().frame(b"deterministic").unwrap();
    let from_c = c.client.codec().frame(b"deterministic").unwrap();
    assert_eq!(from_a, from_b);
    assert_ne!(from_a, from_c);
}

#[test]
fn signing_nonces_differ_between_messages() {
    let s = Scenario::new(10).unwrap();

    let first = s.client.codec().frame(b"same text").unwrap();
    let second = s.client.codec().frame(b"same text").unwrap();

    let split = first.len() - SIGNATURE_SIZE;
    assert_eq!(first[..split], second[..split]);
    assert_ne!(first[split..], second[split..]);
}

#[test]
fn compact_parameters_interoperate() {
    let mut s = Scenario::with_config(11, CodecConfig::sealed(SchnorrParams::compact())).unwrap();

    s.client.send("small group").unwrap();
    assert_eq!(s.server.receive(DEFAULT_RECEIVE_SIZE).unwrap(), "small group");
}

#[test]
fn disabled_mode_sends_plaintext() {
    let mut s = Scenario::with_config(12, CodecConfig::disabled()).unwrap();
    assert!(s.client.codec().is_disabled());

    s.client.send("in the clear").unwrap();
    assert_eq!(s.server.receive_bytes(DEFAULT_RECEIVE_SIZE).unwrap(), b"in the clear");
}

#[test]
fn peer_drop_is_transport_error() {
    let Scenario { client, mut server, .. } = Scenario::new(13).unwrap();
    drop(client);

    let err = server.receive(DEFAULT_RECEIVE_SIZE).unwrap_err();
    assert!(matches!(err, ChannelError::Transport(_)));
    assert!(matches!(server.send("anyone?"), Err(ChannelError::Transport(_))));
}

#[test]
fn closed_channel_refuses_io() {
    let mut s = Scenario::new(14).unwrap();
    s.client.close();

    assert!(matches!(s.client.send("late"), Err(ChannelError::Closed)));
    assert!(matches!(s.server.receive(DEFAULT_RECEIVE_SIZE), Err(ChannelError::Transport(_))));
}

#[test]
fn conversation_across_threads() {
    let Scenario { mut client, mut server, .. } = Scenario::new(15).unwrap();

    let echo = thread::spawn(move || {
        server.send(CONFIRMATION_TEXT).unwrap();
        for _ in 0..8 {
            let line = server.receive(DEFAULT_RECEIVE_SIZE).unwrap();
            server.send(&line.to_uppercase()).unwrap();
        }
    });

    assert_eq!(client.receive(DEFAULT_RECEIVE_SIZE).unwrap(), CONFIRMATION_TEXT);
    for i in 0..8 {
        client.send(&format!("line {i}")).unwrap();
        assert_eq!(client.receive(DEFAULT_RECEIVE_SIZE).unwrap(), format!("LINE {i}"));
    }
    echo.join().unwrap();
}

proptest! {
    #[test]
    fn prop_any_text_is_delivered(seed in any::<u64>(), text in "\\PC{0,200}") {
        let mut s = Scenario::new(seed).unwrap();

        s.client.send(&text).unwrap();
        prop_assert_eq!(s.server.receive(DEFAULT_RECEIVE_SIZE).unwrap(), text);
    }

    #[test]
    fn prop_any_single_bit_flip_is_rejected(
        seed in any::<u64>(),
        text in "[a-z ]{1,64}",
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut s = Scenario::new(seed).unwrap();

        let mut envelope = s.client.codec().frame(text.as_bytes()).unwrap();
        let i = position.index(envelope.len());
        envelope[i] ^= 1 << bit;
        s.client.send_raw(&envelope).unwrap();

        let err = s.server.receive(DEFAULT_RECEIVE_SIZE).unwrap_err();
        prop_assert!(
            matches!(err, ChannelError::Parse(_) | ChannelError::Verification),
            "flip at {} bit {}: {:?}", i, bit, err
        );
    }
}
