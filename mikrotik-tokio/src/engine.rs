//! The async protocol engine: the same reply loop as
//! [`mikrotik_proto::engine::Engine`], driven over an [`AsyncTransport`]
//! instead of a blocking one. Reuses the sans-IO core's codec and folding
//! logic directly so the two engines can never drift apart.

use std::time::Duration;

use mikrotik_proto::error::{Error, ProtocolError};
use mikrotik_proto::length::{decode_length, determine_length};
use mikrotik_proto::response::{FoldStep, ReplyWord, Response, ResponseFolder};
use mikrotik_proto::sentence::{decode_word_payload, encode_sentence, Encoding};

use crate::error::DeviceError;
use crate::transport::AsyncTransport;

/// Observes words crossing the wire, mirroring
/// [`mikrotik_proto::engine::WordSink`] for the async side.
pub trait WordSink: Send {
    /// Called with every word this connection sends.
    fn sent(&mut self, _word: &str) {}
    /// Called with every word this connection receives.
    fn received(&mut self, _word: &str) {}
}

/// A [`WordSink`] that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;
impl WordSink for NoopSink {}

/// Logs every word at `trace` level via the `tracing` crate, tagged by
/// direction. Gated behind the `tracing` feature.
#[cfg(feature = "tracing")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl WordSink for TracingSink {
    fn sent(&mut self, word: &str) {
        tracing::trace!(direction = "tx", %word);
    }
    fn received(&mut self, word: &str) {
        tracing::trace!(direction = "rx", %word);
    }
}

/// The async sans-IO engine. One command is outstanding at a time; callers
/// wanting concurrent commands over one connection serialize through a
/// shared `Mutex<AsyncEngine<T>>` (see [`crate::device::MikrotikDevice`])
/// rather than this type multiplexing by `.tag` itself.
pub struct AsyncEngine<T: AsyncTransport, S: WordSink = NoopSink> {
    transport: T,
    encoding: Encoding,
    sink: S,
    timeout: Duration,
    closed: bool,
}

impl<T: AsyncTransport> AsyncEngine<T, NoopSink> {
    /// Builds an engine over `transport` with ASCII encoding, no sink, and a
    /// 10 second per-sentence read timeout.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            encoding: Encoding::Ascii,
            sink: NoopSink,
            timeout: Duration::from_secs(10),
            closed: false,
        }
    }
}

impl<T: AsyncTransport, S: WordSink> AsyncEngine<T, S> {
    /// Builds an engine with an explicit encoding, sink, and read timeout.
    pub fn with_sink(transport: T, encoding: Encoding, sink: S, timeout: Duration) -> Self {
        Self {
            transport,
            encoding,
            sink,
            timeout,
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

    /// Writes one sentence: the command word followed by `words`.
    pub async fn write_sentence(&mut self, command: &str, words: &[String]) -> Result<(), DeviceError> {
        let mut all = Vec::with_capacity(words.len() + 1);
        all.push(command.to_string());
        all.extend_from_slice(words);
        for word in &all {
            self.sink.sent(word);
        }
        let bytes = encode_sentence(&all, self.encoding).map_err(|e| {
            self.closed = true;
            Error::Protocol(e)
        })?;
        self.transport.write_all(&bytes).await.map_err(|e| {
            self.closed = true;
            DeviceError::Io(e)
        })
    }

    /// Reads sentences until `!done`, folding them into a [`Response`].
    pub async fn read_response(&mut self) -> Result<Response, DeviceError> {
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

    /// Reads one sentence's words, under the engine's read timeout.
    /// Intercepts `!fatal` before it reaches the response folder.
    pub async fn read_sentence(&mut self) -> Result<Vec<String>, DeviceError> {
        tokio::time::timeout(self.timeout, self.read_sentence_inner())
            .await
            .map_err(|_| {
                self.closed = true;
                DeviceError::Timeout
            })?
    }

    async fn read_sentence_inner(&mut self) -> Result<Vec<String>, DeviceError> {
        let mut words = Vec::new();
        loop {
            let mut first = [0u8; 1];
            self.transport.read_exact(&mut first).await.map_err(|e| {
                self.closed = true;
                DeviceError::Io(e)
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
                let mut rest = vec![0u8; extra];
                self.transport.read_exact(&mut rest).await.map_err(|e| {
                    self.closed = true;
                    DeviceError::Io(e)
                })?;
                len_bytes.extend_from_slice(&rest);
            }
            let len = decode_length(&len_bytes).map_err(|e| {
                self.closed = true;
                DeviceError::Protocol(Error::Protocol(e))
            })? as usize;
            let mut payload = vec![0u8; len];
            self.transport.read_exact(&mut payload).await.map_err(|e| {
                self.closed = true;
                DeviceError::Io(e)
            })?;
            let word = decode_word_payload(&payload, self.encoding);
            self.sink.received(&word);

            if words.is_empty() && word == "!fatal" {
                let message = self.read_single_word().await?;
                self.closed = true;
                self.transport.close().await;
                return Err(Error::Fatal(message).into());
            }
            words.push(word);
        }
        Ok(words)
    }

    async fn read_single_word(&mut self) -> Result<String, DeviceError> {
        let mut first = [0u8; 1];
        self.transport.read_exact(&mut first).await.map_err(DeviceError::Io)?;
        let extra = determine_length(first[0]).map_err(|e| DeviceError::Protocol(Error::Protocol(e)))?;
        let mut len_bytes = vec![first[0]];
        if extra > 0 {
            let mut rest = vec![0u8; extra];
            self.transport.read_exact(&mut rest).await.map_err(DeviceError::Io)?;
            len_bytes.extend_from_slice(&rest);
        }
        let len =
            decode_length(&len_bytes).map_err(|e| DeviceError::Protocol(Error::Protocol(e)))? as usize;
        let mut payload = vec![0u8; len];
        self.transport.read_exact(&mut payload).await.map_err(DeviceError::Io)?;
        Ok(decode_word_payload(&payload, self.encoding))
    }

    /// Closes the connection explicitly.
    pub async fn close(&mut self) {
        if !self.closed {
            self.transport.close().await;
            self.closed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockTransport {
        inbound: Mutex<VecDeque<u8>>,
    }

    impl AsyncTransport for MockTransport {
        async fn write_all(&mut self, _bytes: &[u8]) -> std::io::Result<()> {
            Ok(())
        }

        async fn read_exact(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
            let mut inbound = self.inbound.lock().unwrap();
            if inbound.len() < buf.len() {
                return Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof"));
            }
            for slot in buf {
                *slot = inbound.pop_front().unwrap();
            }
            Ok(())
        }

        async fn close(&mut self) {}
    }

    fn push_sentence(transport: &MockTransport, words: &[&str]) {
        let owned: Vec<String> = words.iter().map(|s| s.to_string()).collect();
        let bytes = encode_sentence(&owned, Encoding::Ascii).unwrap();
        transport.inbound.lock().unwrap().extend(bytes);
    }

    #[tokio::test]
    async fn call_folds_re_and_done() {
        let transport = MockTransport::default();
        push_sentence(&transport, &["!re", "=name=ether1"]);
        push_sentence(&transport, &["!done"]);
        let mut engine = AsyncEngine::new(transport);
        let response = engine.call("/interface/print", &[]).await.unwrap();
        assert_eq!(response.len(), 1);
    }

    #[tokio::test]
    async fn fatal_closes_connection() {
        let transport = MockTransport::default();
        push_sentence(&transport, &["!fatal", "session terminated on request"]);
        let mut engine = AsyncEngine::new(transport);
        let err = engine.call("/quit", &[]).await.unwrap_err();
        assert!(matches!(err, DeviceError::Protocol(Error::Fatal(_))));
        assert!(engine.closed);
    }
}
