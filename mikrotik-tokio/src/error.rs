//! Error type returned by the tokio runtime: [`mikrotik_proto::Error`] plus
//! the additional ways an async socket and timeout can fail.

/// Everything a [`crate::device::MikrotikDevice`] call can fail with.
#[derive(thiserror::Error, Debug)]
pub enum DeviceError {
    /// A protocol-level error from the sans-IO core.
    #[error(transparent)]
    Protocol(#[from] mikrotik_proto::Error),
    /// The underlying socket failed outside of a read/write call (connect,
    /// TLS handshake, DNS resolution).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// A command did not complete within its configured timeout.
    #[error("command timed out")]
    Timeout,
}
