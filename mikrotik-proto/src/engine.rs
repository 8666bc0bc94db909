//! The blocking protocol engine (spec §4.5) and the [`Transport`] seam it's
//! built on. Available with the `std` feature; `mikrotik-tokio` and
//! `mikrotik-embassy` re-implement the same reply loop against their own
//! async transports, sharing [`crate::sentence`], [`crate::word`] and
//! [`crate::response`] so the framing and folding logic is never duplicated.

use std::vec::Vec;

use crate::error::{Error, ProtocolError};
use crate::length::determine_length;
use crate::response::{FoldStep, ReplyWord, Response, ResponseFolder};
use crate::sentence::{encode_sentence, Encoding};

/// The byte transport an [`Engine`] drives. Implementations own the actual
/// socket (or test double); the engine only ever calls these three methods.
pub trait Transport {
    /// Transport-specific I/O error.
    type Error: core::fmt::Display;

    /// Writes `bytes` in full.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
    /// Reads exactly `buf.len()` bytes, or fails (including on EOF).
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
    /// Closes the connection. Called once, after `!fatal` or a protocol
    /// error (spec §4.3).
    fn close(&mut self);
}

/// Observes words as they cross the wire in either direction, for logging.
/// The default implementation does nothing, so taking one on is free unless
/// a caller opts in.
pub trait WordSink {
    /// Called with every word this connection sends.
    fn sent(&mut self, _word: &str) {}
    /// Called with every word this connection receives.
    fn received(&mut self, _word: &str) {}
}

/// A [`WordSink`] that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;
impl WordSink for NoopSink {}

/// The blocking sans-IO engine: owns a [`Transport`], speaks the wire
/// protocol over it, and folds replies per spec §4.5. One command is
/// outstanding at a time — this core does not multiplex by `.tag`.
pub struct Engine<T: Transport, S: WordSink = NoopSink> {
    transport: T,
    encoding: Encoding,
    sink: S,
    closed: bool,
}

impl<T: Transport> Engine<T, NoopSink> {
    /// Builds an engine over `transport` with ASCII encoding and no sink.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            encoding: Encoding::Ascii,
            sink: NoopSink,
            closed: false,
        }
    }
}

impl<T: Transport, S: WordSink> Engine<T, S> {
    /// Builds an engine with an explicit encoding and word sink.
    pub fn with_sink(transport: T, encoding: Encoding, sink: S) -> Self {
        Self {
            transport,
            encoding,
            sink,
            closed: false,
        }
    }

    /// Sends a command and its attribute/query words, then reads and folds
    /// the full response (spec §4.5). Returns [`Error::ConnectionClosed`] if
    /// called after the connection has already been torn down.
    pub fn call(&mut self, command: &str, words: &[String]) -> Result<Response, Error> {
        if self.closed {
            return Err(Error::ConnectionClosed);
        }
        self.write_sentence(command, words)?;
        self.read_response()
    }

    /// Writes one sentence: the command word followed by `words`, in order.
    pub fn write_sentence(&mut self, command: &str, words: &[String]) -> Result<(), Error> {
        let mut all = Vec::with_capacity(words.len() + 1);
        all.push(command.to_string());
        all.extend_from_slice(words);
        for word in &all {
            self.sink.sent(word);
        }
        let bytes = encode_sentence(&all, self.encoding).map_err(|e| {
            self.mark_closed();
            Error::Protocol(e)
        })?;
        self.transport.write_all(&bytes).map_err(|_| {
            self.mark_closed();
            Error::ConnectionClosed
        })
    }

    /// Reads sentences until `!done`, folding them into a [`Response`] or
    /// the error they represent (spec §4.5 reply loop).
    pub fn read_response(&mut self) -> Result<Response, Error> {
        let mut folder = ResponseFolder::new();
        loop {
            let words = self.read_sentence()?;
            let Some((reply, rest)) = words.split_first() else {
                self.mark_closed();
                return Err(Error::Protocol(ProtocolError::EmptySentence));
            };
            let reply_word = ReplyWord::parse(reply).ok_or_else(|| {
                self.mark_closed();
                Error::Protocol(ProtocolError::MalformedWord(reply.clone()))
            })?;
            match folder.feed(reply_word, rest).map_err(Error::Protocol)? {
                FoldStep::Continue => continue,
                FoldStep::Done => return folder.finish(),
            }
        }
    }

    /// Reads one sentence's words off the wire. Intercepts `!fatal` here,
    /// before it ever reaches the response folder (spec §4.3): the message
    /// word is read, the transport is closed, and [`Error::Fatal`] is
    /// returned directly.
    pub fn read_sentence(&mut self) -> Result<Vec<String>, Error> {
        let mut words = Vec::new();
        loop {
            let mut first = [0u8; 1];
            self.transport.read_exact(&mut first).map_err(|_| {
                self.mark_closed();
                Error::ConnectionClosed
            })?;
            if first[0] == 0x00 {
                break;
            }
            let extra = determine_length(first[0]).map_err(|e| {
                self.mark_closed();
                Error::Protocol(e)
            })?;
            let mut len_bytes = Vec::with_capacity(extra + 1);
            len_bytes.push(first[0]);
            if extra > 0 {
                let mut rest = vec![0u8; extra];
                self.transport.read_exact(&mut rest).map_err(|_| {
                    self.mark_closed();
                    Error::ConnectionClosed
                })?;
                len_bytes.extend_from_slice(&rest);
            }
            let len = crate::length::decode_length(&len_bytes).map_err(|e| {
                self.mark_closed();
                Error::Protocol(e)
            })? as usize;
            let mut payload = vec![0u8; len];
            self.transport.read_exact(&mut payload).map_err(|_| {
                self.mark_closed();
                Error::ConnectionClosed
            })?;
            let word = crate::sentence::decode_word_payload(&payload, self.encoding);
            self.sink.received(&word);

            if words.is_empty() && word == "!fatal" {
                let message = self.read_single_word()?;
                self.mark_closed();
                return Err(Error::Fatal(message));
            }
            words.push(word);
        }
        Ok(words)
    }

    fn read_single_word(&mut self) -> Result<String, Error> {
        let mut first = [0u8; 1];
        self.transport
            .read_exact(&mut first)
            .map_err(|_| Error::ConnectionClosed)?;
        let extra = determine_length(first[0]).map_err(Error::Protocol)?;
        let mut len_bytes = vec![first[0]];
        if extra > 0 {
            let mut rest = vec![0u8; extra];
            self.transport
                .read_exact(&mut rest)
                .map_err(|_| Error::ConnectionClosed)?;
            len_bytes.extend_from_slice(&rest);
        }
        let len = crate::length::decode_length(&len_bytes).map_err(Error::Protocol)? as usize;
        let mut payload = vec![0u8; len];
        self.transport
            .read_exact(&mut payload)
            .map_err(|_| Error::ConnectionClosed)?;
        Ok(crate::sentence::decode_word_payload(&payload, self.encoding))
    }

    fn mark_closed(&mut self) {
        if !self.closed {
            self.transport.close();
            self.closed = true;
        }
    }

    /// Closes the connection explicitly.
    pub fn close(&mut self) {
        self.mark_closed();
    }

    /// The connection's current text encoding.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct MockTransport {
        inbound: VecDeque<u8>,
        outbound: Vec<u8>,
        closed: bool,
    }

    impl Transport for MockTransport {
        type Error = &'static str;

        fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
            self.outbound.extend_from_slice(bytes);
            Ok(())
        }

        fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
            if self.inbound.len() < buf.len() {
                return Err("eof");
            }
            for slot in buf {
                *slot = self.inbound.pop_front().unwrap();
            }
            Ok(())
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    fn push_sentence(transport: &mut MockTransport, words: &[&str]) {
        let owned: Vec<String> = words.iter().map(|s| s.to_string()).collect();
        let bytes = encode_sentence(&owned, Encoding::Ascii).unwrap();
        transport.inbound.extend(bytes);
    }

    #[test]
    fn call_folds_re_and_done() {
        let mut transport = MockTransport::default();
        push_sentence(&mut transport, &["!re", "=name=ether1"]);
        push_sentence(&mut transport, &["!done"]);
        let mut engine = Engine::new(transport);
        let response = engine.call("/interface/print", &[]).unwrap();
        assert_eq!(response.len(), 1);
    }

    #[test]
    fn fatal_closes_connection() {
        let mut transport = MockTransport::default();
        push_sentence(&mut transport, &["!fatal", "session terminated on request"]);
        let mut engine = Engine::new(transport);
        let err = engine.call("/quit", &[]).unwrap_err();
        assert!(matches!(err, Error::Fatal(_)));
        assert!(engine.closed);
        let again = engine.call("/interface/print", &[]).unwrap_err();
        assert!(matches!(again, Error::ConnectionClosed));
    }
}
