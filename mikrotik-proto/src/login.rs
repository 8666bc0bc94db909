//! Login digest and strategy selection (spec §4.6).
//!
//! RouterOS pre-6.43 uses a challenge/response scheme keyed off an MD5
//! digest of the password; 6.43+ sends plaintext credentials in the `login`
//! command itself. The digest is a pure function here; which strategy to
//! run is the caller's choice via [`LoginMethod`] (spec §4.6 "chosen by the
//! caller via a configuration option"), carried out by each runtime's
//! connector.

use alloc::format;
use alloc::string::String;

use md5::{Digest, Md5};

use crate::error::UnicodeError;

/// Checks that `password` is plain ASCII, the one constraint the wire digest
/// imposes (spec §4.6 "ASCII-only password").
pub fn validate_password(password: &str) -> Result<(), UnicodeError> {
    match password.char_indices().find(|(_, c)| !c.is_ascii()) {
        Some((offset, c)) => Err(UnicodeError::NonAscii(c, offset)),
        None => Ok(()),
    }
}

/// Computes the legacy login response: `hex(md5(0x00 || password || token))`,
/// prefixed with `"00"` (spec §4.6, scenario S3).
///
/// `token` is the hex-encoded challenge from the first `/login` reply's
/// `ret` attribute.
pub fn challenge_response(password: &str, token: &str) -> Result<String, UnicodeError> {
    validate_password(password)?;
    let token_bytes = decode_hex(token);

    let mut hasher = Md5::new();
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    hasher.update(&token_bytes);
    let digest = hasher.finalize();

    let mut hex = String::with_capacity(2 + digest.len() * 2);
    hex.push_str("00");
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    Ok(hex)
}

/// Decodes a hex string into bytes, ignoring any trailing odd nibble. The
/// challenge token is always emitted as an even number of hex digits by
/// RouterOS; a malformed one simply folds into a shorter byte string rather
/// than failing the login outright, since the server will reject a wrong
/// digest with `!trap` regardless.
fn decode_hex(hex: &str) -> alloc::vec::Vec<u8> {
    let bytes = hex.as_bytes();
    bytes
        .chunks_exact(2)
        .filter_map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some(((hi << 4) | lo) as u8)
        })
        .collect()
}

/// The login strategy a connection is configured to use (spec §6
/// `login_method` option).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMethod {
    /// Post-6.43: send `=name=` and `=password=` in the one `/login`
    /// sentence; success is a trap-free `!done`.
    #[default]
    Plain,
    /// Pre-6.43: send a bare `/login`, read the challenge out of the
    /// reply's `ret` attribute, then send a second `/login` with `=name=`
    /// and the computed `=response=`.
    Token,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_s3_challenge_response() {
        let response = challenge_response("test", "259e0bc05acd6f46926dc2f809ed1bba").unwrap();
        assert_eq!(response, "00c7fd865183a43a772dde231f6d0bff13");
    }

    #[test]
    fn rejects_non_ascii_password() {
        assert!(validate_password("pässwörd").is_err());
        assert!(validate_password("password").is_ok());
    }

    #[test]
    fn default_login_method_is_plain() {
        assert_eq!(LoginMethod::default(), LoginMethod::Plain);
    }
}
