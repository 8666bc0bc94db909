//! Error taxonomy: one base, four kinds (spec §7), flattened into enums the
//! way the teacher's `DeviceError` is flattened rather than modeled as a
//! class hierarchy.

use alloc::string::String;

use crate::response::TrapResponse;

/// Framing/encoding invariant violations. Unrecoverable for the connection
/// that raised them.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// `encode_length` was asked to encode a value `>= 0x1000_0000`.
    #[error("length {0} is too large to encode (>= 0x10000000)")]
    LengthOverflow(u32),
    /// `decode_length` was handed a slice whose length wasn't 1..=4.
    #[error("invalid length-prefix slice size {0}")]
    InvalidLengthSize(usize),
    /// The first byte of a length prefix had an unknown high nibble (`>= 0xF0`).
    #[error("unknown length control byte 0x{0:02x}")]
    UnknownControlByte(u8),
    /// A word did not match any recognized shape (`=k=v`, `.tag=n`, `!cat`, …)
    /// where one was required.
    #[error("malformed word: {0}")]
    MalformedWord(String),
    /// The sentence ended (NUL word) where a reply word was expected.
    ///
    /// Some implementations of this protocol silently swallow an empty
    /// sentence mid-response; this core treats it as a protocol error and
    /// closes the connection (spec §9, "Open question — empty-sentence
    /// semantics").
    #[error("empty sentence where a reply word was expected")]
    EmptySentence,
    /// A `!trap` sentence was missing its mandatory `message` attribute.
    #[error("trap sentence is missing its message attribute")]
    TrapMissingMessage,
}

/// Error returned while building a login digest.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UnicodeError {
    /// The password contains a character outside the ASCII range.
    #[error("password contains non-ASCII character {0:?} at byte offset {1}")]
    NonAscii(char, usize),
}

/// Top-level error type returned by the sans-IO engine and its runtimes.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// The peer closed the connection mid-sentence, or the socket is
    /// otherwise unreadable. Unrecoverable for this connection.
    #[error("connection closed")]
    ConnectionClosed,
    /// A framing/encoding invariant was violated.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// The peer sent `!fatal`. The transport has already been closed.
    #[error("fatal: {0}")]
    Fatal(String),
    /// A single `!trap` rejected the command. The connection remains usable.
    #[error(transparent)]
    Trap(#[from] TrapResponse),
    /// Two or more `!trap` sentences were received for one command.
    #[error("{0}")]
    MultiTrap(MultiTrapError),
    /// The login password could not be represented in ASCII.
    #[error(transparent)]
    Unicode(#[from] UnicodeError),
}

/// Aggregate of two or more [`TrapResponse`]s raised by a single response.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{0:?}")]
pub struct MultiTrapError(pub alloc::vec::Vec<TrapResponse>);
