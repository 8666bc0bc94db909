//! Connect + login over an already-bound `embassy-net` TCP socket.

use alloc::string::ToString;
use alloc::vec;

use embedded_io_async::{Read, Write};

use mikrotik_proto::login::{challenge_response, LoginMethod};
use mikrotik_proto::word::{compose_word, value_to_api, Value};

use crate::engine::{AsyncEngine, DeviceError};

/// Runs the `/login` handshake against an already-connected engine, per
/// whichever [`LoginMethod`] the caller configured — same two explicit
/// strategies as the tokio runtime (spec §4.6).
pub async fn login<IO: Read + Write>(
    engine: &mut AsyncEngine<IO>,
    username: &str,
    password: Option<&str>,
    method: LoginMethod,
) -> Result<(), DeviceError> {
    let password = password.unwrap_or("");
    match method {
        LoginMethod::Plain => {
            let words = vec![
                compose_word("name", &Value::Str(username.to_string())),
                compose_word("password", &Value::Str(password.to_string())),
            ];
            engine.call("/login", &words).await?;
            Ok(())
        }
        LoginMethod::Token => {
            let first = engine.call("/login", &[]).await?;
            let token = first
                .first()
                .and_then(|record| record.get("ret"))
                .map(value_to_api)
                .unwrap_or_default();
            let response =
                challenge_response(password, &token).map_err(mikrotik_proto::Error::Unicode)?;
            let words = vec![
                compose_word("name", &Value::Str(username.to_string())),
                compose_word("response", &Value::Str(response)),
            ];
            engine.call("/login", &words).await?;
            Ok(())
        }
    }
}
