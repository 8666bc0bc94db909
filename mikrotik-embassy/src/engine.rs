//! The embedded protocol engine: same reply loop as
//! [`mikrotik_proto::engine::Engine`] and `mikrotik-tokio`'s `AsyncEngine`,
//! driven over an [`EmbeddedTransport`] with an `embassy-time` deadline
//! standing in for tokio's timeout.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use embedded_io_async::{Read, Write};
use embassy_time::{Duration, Timer};
use embassy_futures::select::{select, Either};

use mikrotik_proto::error::{Error, ProtocolError};
use mikrotik_proto::length::{decode_length, determine_length};
use mikrotik_proto::response::{FoldStep, ReplyWord, Response, ResponseFolder};
use mikrotik_proto::sentence::{decode_word_payload, encode_sentence, Encoding};

use crate::transport::EmbeddedTransport;

/// Errors this runtime adds on top of [`mikrotik_proto::Error`]: socket
/// failure and read timeout.
#[derive(thiserror::Error, Debug)]
pub enum DeviceError {
    /// A protocol-level error from the sans-IO core.
    #[error(transparent)]
    Protocol(#[from] Error),
    /// The socket failed.
    #[error("i/o error")]
    Io,
    /// A sentence was not fully read before the deadline.
    #[error("command timed out")]
    Timeout,
}

/// The embedded sans-IO engine. Single outstanding command, same as every
/// other runtime built on this core.
pub struct AsyncEngine<IO: Read + Write> {
    transport: EmbeddedTransport<IO>,
    encoding: Encoding,
    timeout: Duration,
    closed: bool,
}

impl<IO: Read + Write> AsyncEngine<IO> {
    /// Builds an engine over `io` with ASCII encoding and a 10 second
    /// per-sentence read deadline.
    pub fn new(io: IO) -> Self {
        Self {
            transport: EmbeddedTransport::new(io),
            encoding: Encoding::Ascii,
            timeout: Duration::from_secs(10),
            closed: false,
        }
    }

    /// Sends a command and its words, then reads and folds the full
    /// response.
    pub async fn call(&mut self, command: &str, words: &[String]) -> Result<Response, DeviceError> {
        if self.closed {
            return Err(Error::ConnectionClosed.into());
        }
        self.write_sentence(command, words).await?;
        self.read_response().await
    }

    async fn write_sentence(&mut self, command: &str, words: &[String]) -> Result<(), DeviceError> {
        let mut all = Vec::with_capacity(words.len() + 1);
        all.push(command.to_string());
        all.extend_from_slice(words);
        let bytes = encode_sentence(&all, self.encoding).map_err(|e| {
            self.closed = true;
            Error::Protocol(e)
        })?;
        self.transport.write_all(&bytes).await.map_err(|_| {
            self.closed = true;
            DeviceError::Io
        })
    }

    async fn read_response(&mut self) -> Result<Response, DeviceError> {
        let mut folder = ResponseFolder::new();
        loop {
            let words = self.read_sentence().await?;
            let Some((reply, rest)) = words.split_first() else {
                self.closed = true;
                return Err(Error::Protocol(ProtocolError::EmptySentence).into());
            };
            let reply_word = ReplyWord::parse(reply).ok_or_else(|| {
                self.closed = true;
                DeviceError::Protocol(Error::Protocol(ProtocolError::MalformedWord(reply.clone())))
            })?;
            match folder.feed(reply_word, rest).map_err(Error::Protocol)? {
                FoldStep::Continue => continue,
                FoldStep::Done => return folder.finish().map_err(DeviceError::Protocol),
            }
        }
    }

    async fn read_sentence(&mut self) -> Result<Vec<String>, DeviceError> {
        match select(self.read_sentence_inner(), Timer::after(self.timeout)).await {
            Either::First(result) => result,
            Either::Second(()) => {
                self.closed = true;
                Err(DeviceError::Timeout)
            }
        }
    }

    async fn read_sentence_inner(&mut self) -> Result<Vec<String>, DeviceError> {
        let mut words = Vec::new();
        loop {
            let mut first = [0u8; 1];
            self.transport.read_exact(&mut first).await.map_err(|_| {
                self.closed = true;
                DeviceError::Io
            })?;
            if first[0] == 0x00 {
                break;
            }
            let extra = determine_length(first[0]).map_err(|e| {
                self.closed = true;
                DeviceError::Protocol(Error::Protocol(e))
            })?;
            let mut len_bytes = Vec::with_capacity(extra + 1);
            len_bytes.push(first[0]);
            if extra > 0 {
                let mut rest = alloc::vec![0u8; extra];
                self.transport.read_exact(&mut rest).await.map_err(|_| {
                    self.closed = true;
                    DeviceError::Io
                })?;
                len_bytes.extend_from_slice(&rest);
            }
            let len = decode_length(&len_bytes).map_err(|e| {
                self.closed = true;
                DeviceError::Protocol(Error::Protocol(e))
            })? as usize;
            let mut payload = alloc::vec![0u8; len];
            self.transport.read_exact(&mut payload).await.map_err(|_| {
                self.closed = true;
                DeviceError::Io
            })?;
            let word = decode_word_payload(&payload, self.encoding);

            if words.is_empty() && word == "!fatal" {
                let message = self.read_one_word().await?;
                self.closed = true;
                return Err(Error::Fatal(message).into());
            }
            words.push(word);
        }
        Ok(words)
    }

    async fn read_one_word(&mut self) -> Result<String, DeviceError> {
        let mut first = [0u8; 1];
        self.transport.read_exact(&mut first).await.map_err(|_| DeviceError::Io)?;
        let extra = determine_length(first[0]).map_err(|e| DeviceError::Protocol(Error::Protocol(e)))?;
        let mut len_bytes = Vec::with_capacity(extra + 1);
        len_bytes.push(first[0]);
        if extra > 0 {
            let mut rest = alloc::vec![0u8; extra];
            self.transport.read_exact(&mut rest).await.map_err(|_| DeviceError::Io)?;
            len_bytes.extend_from_slice(&rest);
        }
        let len =
            decode_length(&len_bytes).map_err(|e| DeviceError::Protocol(Error::Protocol(e)))? as usize;
        let mut payload = alloc::vec![0u8; len];
        self.transport.read_exact(&mut payload).await.map_err(|_| DeviceError::Io)?;
        Ok(decode_word_payload(&payload, self.encoding))
    }
}
