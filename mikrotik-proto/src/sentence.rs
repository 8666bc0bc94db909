//! Word/sentence wire encoding and decoding (spec §4.2, §4.3, §6).
//!
//! Word = length-prefix || payload bytes. Sentence = (word)* || 0x00.
//! The actual byte transport lives one layer up (see [`crate::engine`]);
//! this module only turns words into bytes and bytes into words.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::ProtocolError;
use crate::length::{encode_length, encoded_len};

/// Per-connection word text encoding (spec §6 `encoding` option).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Default. Write path is strict (rejects non-ASCII); read path is
    /// lenient, decoding each byte 1:1 as its Latin-1 codepoint so that
    /// firmware that emits stray high-bit bytes inside values never tears
    /// down the connection over a cosmetic value (spec §9 "Lenient UTF-8 on
    /// read").
    #[default]
    Ascii,
    /// Write path requires valid UTF-8 (always true of a Rust `&str`); read
    /// path uses lossy UTF-8 decoding, replacing invalid sequences.
    Utf8,
}

/// Encodes one word: its length prefix followed by its encoded bytes.
/// The write path is always strict (spec §9).
pub fn encode_word(word: &str, encoding: Encoding) -> Result<Vec<u8>, ProtocolError> {
    let payload: Vec<u8> = match encoding {
        Encoding::Ascii => {
            if !word.is_ascii() {
                return Err(ProtocolError::MalformedWord(word.to_string()));
            }
            encode_latin1(word)
        }
        Encoding::Utf8 => word.as_bytes().to_vec(),
    };
    let len = payload.len() as u32;
    let mut out = Vec::with_capacity(encoded_len(len)? + payload.len());
    out.extend_from_slice(&encode_length(len)?[..encoded_len(len)?]);
    out.extend_from_slice(&payload);
    Ok(out)
}

#[cfg(feature = "std")]
fn encode_latin1(word: &str) -> Vec<u8> {
    encoding_rs::mem::encode_latin1_lossy(word).into_owned()
}

#[cfg(not(feature = "std"))]
fn encode_latin1(word: &str) -> Vec<u8> {
    word.as_bytes().to_vec()
}

/// Encodes a full sentence: each word in order, followed by the zero-length
/// terminator (spec P6: always ends with `0x00`).
pub fn encode_sentence(words: &[String], encoding: Encoding) -> Result<Vec<u8>, ProtocolError> {
    let mut out = Vec::new();
    for word in words {
        out.extend_from_slice(&encode_word(word, encoding)?);
    }
    out.push(0x00);
    Ok(out)
}

/// Decodes a word's payload bytes into a `String` per the connection's
/// encoding. This is always the *lenient* read-path behavior: it never
/// fails, tolerating firmware that emits non-conforming bytes inside an
/// otherwise well-framed word.
pub fn decode_word_payload(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Ascii => decode_latin1(bytes),
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(feature = "std")]
fn decode_latin1(bytes: &[u8]) -> String {
    encoding_rs::mem::decode_latin1(bytes).into_owned()
}

#[cfg(not(feature = "std"))]
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_s2_sentence_round_trip() {
        let words = ["/ip/address/print".to_string(), "=.id=*1".to_string()];
        let encoded = encode_sentence(&words, Encoding::Ascii).unwrap();
        let expected: &[u8] = &[
            0x11, b'/', b'i', b'p', b'/', b'a', b'd', b'd', b'r', b'e', b's', b's', b'/', b'p',
            b'r', b'i', b'n', b't', 0x07, b'=', b'.', b'i', b'd', b'=', b'*', b'1', 0x00,
        ];
        assert_eq!(encoded, expected);
    }

    #[test]
    fn p6_sentence_always_ends_with_nul() {
        let encoded = encode_sentence(&[], Encoding::Ascii).unwrap();
        assert_eq!(encoded, vec![0x00]);
    }

    #[test]
    fn scenario_s6_long_word() {
        let value = "a".repeat(256);
        let encoded = encode_word(&value, Encoding::Ascii).unwrap();
        assert_eq!(&encoded[..2], &[0x81, 0x00]);
        let payload = decode_word_payload(&encoded[2..], Encoding::Ascii);
        assert_eq!(payload, value);
    }

    #[test]
    fn ascii_write_rejects_non_ascii() {
        assert!(encode_word("café", Encoding::Ascii).is_err());
        assert!(encode_word("café", Encoding::Utf8).is_ok());
    }

    #[test]
    fn lenient_read_never_fails_on_garbage_bytes() {
        let garbage = [0xff, 0xfe, b'x'];
        assert_eq!(decode_word_payload(&garbage, Encoding::Ascii), "\u{FF}\u{FE}x");
        // Invalid UTF-8 is replaced, not fatal.
        let decoded = decode_word_payload(&garbage, Encoding::Utf8);
        assert!(decoded.ends_with('x'));
    }
}
