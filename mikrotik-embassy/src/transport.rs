//! Async transport over an `embedded-io-async` socket, for embedded targets
//! that can't bring in tokio.

use embedded_io_async::{Read, Write};

/// Wraps anything implementing `embedded-io-async`'s [`Read`]/[`Write`]
/// (an `embassy-net` [`embassy_net::tcp::TcpSocket`], in the common case)
/// as the engine's byte transport.
pub struct EmbeddedTransport<IO>(IO);

impl<IO> EmbeddedTransport<IO> {
    /// Wraps an already-connected socket.
    pub fn new(io: IO) -> Self {
        Self(io)
    }
}

/// I/O errors this transport can surface, erased from the concrete socket
/// error type so the engine doesn't need to be generic over it too.
#[derive(Debug)]
pub struct TransportError;

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("embedded transport error")
    }
}

impl<IO: Read + Write> EmbeddedTransport<IO> {
    /// Writes `bytes` in full.
    pub async fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.0.write_all(bytes).await.map_err(|_| TransportError)
    }

    /// Reads exactly `buf.len()` bytes.
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        self.0.read_exact(buf).await.map_err(|_| TransportError)
    }
}
