//! In-memory byte-stream pair.
//!
//! Each `write` lands as one chunk; a `read` returns bytes from at most one
//! chunk. That keeps one envelope per read, which is what
//! [`SecureChannel::receive`](ciphergram_core::SecureChannel::receive)
//! expects from a quiet TCP connection.

use std::{
    collections::VecDeque,
    io::{self, Read, Write},
    sync::{Arc, Condvar, Mutex, MutexGuard},
};

#[derive(Default)]
struct PipeState {
    chunks: VecDeque<Vec<u8>>,
    closed: bool,
}

/// One direction of the duplex.
#[derive(Default)]
struct Pipe {
    state: Mutex<PipeState>,
    ready: Condvar,
}

impl Pipe {
    fn lock(&self) -> io::Result<MutexGuard<'_, PipeState>> {
        self.state.lock().map_err(|_| io::Error::other("pipe mutex poisoned"))
    }

    fn close(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.closed = true;
        }
        self.ready.notify_all();
    }
}

/// One end of an in-memory duplex stream.
///
/// Reads block until the peer writes or drops its end. Dropping an end
/// closes both directions.
pub struct DuplexEnd {
    inbound: Arc<Pipe>,
    outbound: Arc<Pipe>,
}

/// Create a connected pair of endpoints.
pub fn duplex() -> (DuplexEnd, DuplexEnd) {
    let a_to_b = Arc::new(Pipe::default());
    let b_to_a = Arc::new(Pipe::default());

    let a = DuplexEnd { inbound: Arc::clone(&b_to_a), outbound: Arc::clone(&a_to_b) };
    let b = DuplexEnd { inbound: a_to_b, outbound: b_to_a };
    (a, b)
}

impl DuplexEnd {
    /// Number of chunks written by the peer and not yet read.
    pub fn pending(&self) -> usize {
        self.inbound.lock().map(|state| state.chunks.len()).unwrap_or(0)
    }
}

impl Read for DuplexEnd {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut state = self.inbound.lock()?;
        while state.chunks.is_empty() && !state.closed {
            state = self
                .inbound
                .ready
                .wait(state)
                .map_err(|_| io::Error::other("pipe mutex poisoned"))?;
        }

        let Some(chunk) = state.chunks.front_mut() else {
            return Ok(0);
        };

        let n = buf.len().min(chunk.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n == chunk.len() {
            state.chunks.pop_front();
        } else {
            chunk.drain(..n);
        }
        Ok(n)
    }
}

impl Write for DuplexEnd {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.outbound.lock()?;
        if state.closed {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        if !buf.is_empty() {
            state.chunks.push_back(buf.to_vec());
        }
        drop(state);

        self.outbound.ready.notify_all();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for DuplexEnd {
    fn drop(&mut self) {
        self.outbound.close();
        self.inbound.close();
    }
}
