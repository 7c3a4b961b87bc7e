//! Secure channel over a byte stream.
//!
//! `SecureChannel` owns one transport and one codec. It is synchronous and
//! blocking: each call either completes or fails, and the caller decides
//! whether to retry. Concurrent use from several threads needs external
//! locking.

use std::io::{self, Read, Write};

use crate::{codec::MessageCodec, env::Environment, error::ChannelError};

/// Sends and receives verified messages over a `Read + Write` transport.
///
/// # Limitations
///
/// - One `receive` call performs one transport read and parses the bytes as
///   exactly one envelope. Envelopes larger than `max_size`, or split across
///   reads, fail to parse.
/// - Replayed envelopes are accepted; there is no sequence numbering.
pub struct SecureChannel<T: Read + Write, E: Environment> {
    transport: Option<T>,
    codec: MessageCodec<E>,
}

impl<T: Read + Write, E: Environment> SecureChannel<T, E> {
    /// Wrap `transport`, which must already be connected.
    pub fn new(transport: T, codec: MessageCodec<E>) -> Self {
        Self { transport: Some(transport), codec }
    }

    /// The codec in use.
    pub fn codec(&self) -> &MessageCodec<E> {
        &self.codec
    }

    /// True once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    fn transport(&mut self) -> Result<&mut T, ChannelError> {
        self.transport.as_mut().ok_or(ChannelError::Closed)
    }

    /// Sign, encrypt and send `text`, blocking until the transport has
    /// accepted every byte.
    pub fn send(&mut self, text: &str) -> Result<(), ChannelError> {
        self.send_bytes(text.as_bytes())
    }

    /// Like [`send`](Self::send) for arbitrary bytes.
    pub fn send_bytes(&mut self, message: &[u8]) -> Result<(), ChannelError> {
        let envelope = self.codec.frame(message)?;

        let transport = self.transport()?;
        transport.write_all(&envelope)?;
        transport.flush()?;

        tracing::trace!(envelope_len = envelope.len(), "sent envelope");
        Ok(())
    }

    /// Send pre-framed envelope bytes without touching the codec.
    ///
    /// Used to replay captured envelopes and to exercise tamper handling.
    pub fn send_raw(&mut self, envelope: &[u8]) -> Result<(), ChannelError> {
        let transport = self.transport()?;
        transport.write_all(envelope)?;
        transport.flush()?;
        Ok(())
    }

    /// Read up to `max_size` bytes and return the verified text they carry.
    ///
    /// Blocks until at least one byte is available.
    ///
    /// # Errors
    ///
    /// - `Verification` if the signature does not validate; no plaintext is
    ///   returned
    /// - `Parse` if the bytes are not a well-formed envelope or the verified
    ///   message is not UTF-8
    /// - `Transport` on I/O failure or end of stream
    pub fn receive(&mut self, max_size: usize) -> Result<String, ChannelError> {
        let message = self.receive_bytes(max_size)?;
        String::from_utf8(message).map_err(|e| ChannelError::Parse(e.into()))
    }

    /// Like [`receive`](Self::receive), returning raw verified bytes.
    pub fn receive_bytes(&mut self, max_size: usize) -> Result<Vec<u8>, ChannelError> {
        let chunk = self.read_chunk(max_size)?;
        Ok(self.codec.parse(&chunk)?)
    }

    /// One transport read of at most `max_size` bytes.
    fn read_chunk(&mut self, max_size: usize) -> Result<Vec<u8>, ChannelError> {
        if max_size == 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "max_size must be non-zero").into());
        }

        let transport = self.transport()?;
        let mut buf = vec![0u8; max_size];
        let read = loop {
            match transport.read(&mut buf) {
                Ok(0) => return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into()),
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {},
                Err(e) => return Err(e.into()),
            }
        };
        buf.truncate(read);

        tracing::trace!(read, max_size, "received chunk");
        Ok(buf)
    }

    /// Release the transport. Idempotent.
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            tracing::debug!("channel closed");
        }
    }
}

impl<T: Read + Write, E: Environment> std::fmt::Debug for SecureChannel<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureChannel")
            .field("codec", &self.codec)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<T: Read + Write, E: Environment> Drop for SecureChannel<T, E> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use ciphergram_crypto::SchnorrParams;

    use super::*;
    use crate::{CodecConfig, KeyMaterial, SystemEnv};

    /// A loopback transport: reads return what was queued, writes are
    /// captured.
    #[derive(Default)]
    struct Loopback {
        inbound: Cursor<Vec<u8>>,
        outbound: Vec<u8>,
    }

    impl Read for Loopback {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inbound.read(buf)
        }
    }

    impl Write for Loopback {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.outbound.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn self_trusting_codec() -> MessageCodec<SystemEnv> {
        let params = SchnorrParams::default();
        let secret = 99_999;
        let keys = KeyMaterial {
            cipher_key: b"loopback-key".to_vec(),
            signing_secret: secret,
            accepted_public_keys: vec![params.public_for(secret)],
        };
        MessageCodec::new(&CodecConfig::sealed(params), &keys, SystemEnv).unwrap()
    }

    #[test]
    fn send_writes_one_envelope() {
        let mut channel = SecureChannel::new(Loopback::default(), self_trusting_codec());
        channel.send("ping").unwrap();

        let written = channel.transport.as_ref().unwrap().outbound.clone();
        assert_eq!(channel.codec().parse(&written).unwrap(), b"ping");
    }

    #[test]
    fn receive_returns_verified_text() {
        let codec = self_trusting_codec();
        let envelope = codec.frame("héllo".as_bytes()).unwrap();
        let transport = Loopback { inbound: Cursor::new(envelope), outbound: Vec::new() };

        let mut channel = SecureChannel::new(transport, codec);
        assert_eq!(channel.receive(1024).unwrap(), "héllo");
    }

    #[test]
    fn end_of_stream_is_transport_error() {
        let mut channel = SecureChannel::new(Loopback::default(), self_trusting_codec());
        let err = channel.receive(1024).unwrap_err();
        assert!(matches!(err, ChannelError::Transport(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn zero_max_size_rejected() {
        let mut channel = SecureChannel::new(Loopback::default(), self_trusting_codec());
        assert!(matches!(channel.receive(0), Err(ChannelError::Transport(_))));
    }

    #[test]
    fn non_utf8_message_is_parse_error() {
        let codec = self_trusting_codec();
        let envelope = codec.frame(&[0xff, 0xfe]).unwrap();
        let transport = Loopback { inbound: Cursor::new(envelope), outbound: Vec::new() };

        let mut channel = SecureChannel::new(transport, codec);
        assert!(matches!(channel.receive(1024), Err(ChannelError::Parse(_))));
    }

    #[test]
    fn close_is_idempotent() {
        let mut channel = SecureChannel::new(Loopback::default(), self_trusting_codec());
        channel.close();
        channel.close();
        assert!(channel.is_closed());
        assert!(matches!(channel.send("late"), Err(ChannelError::Closed)));
        assert!(matches!(channel.receive(16), Err(ChannelError::Closed)));
    }
}
