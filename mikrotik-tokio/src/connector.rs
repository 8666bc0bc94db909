//! Connect + login, producing a ready-to-use [`MikrotikDevice`].

use mikrotik_proto::login::{challenge_response, LoginMethod};
use mikrotik_proto::word::{compose_word, value_to_api, Value};

use crate::config::ConnectOptions;
use crate::device::MikrotikDevice;
use crate::engine::AsyncEngine;
use crate::error::DeviceError;
use crate::transport::TcpTransport;

/// Connects to `addr` (`host:port`) over plain TCP and logs in as `username`
/// using the spec §6 default configuration (port 8728, plain login). For
/// control over port/timeout/`saddr`/encoding/login method, build a
/// [`ConnectOptions`] and call [`connect_with`] instead.
pub async fn connect(
    addr: &str,
    username: &str,
    password: Option<&str>,
) -> Result<MikrotikDevice<TcpTransport>, DeviceError> {
    let (host, port) = split_host_port(addr);
    let options = ConnectOptions::new(host).port(port.unwrap_or(crate::config::DEFAULT_PORT));
    connect_with(&options, username, password).await
}

/// Connects and logs in per `options` (spec §6's full connection
/// configuration table).
pub async fn connect_with(
    options: &ConnectOptions,
    username: &str,
    password: Option<&str>,
) -> Result<MikrotikDevice<TcpTransport>, DeviceError> {
    let transport = TcpTransport::connect_from(&options.addr(), options.saddr_value()).await?;
    let mut engine = AsyncEngine::with_sink(
        transport,
        options.encoding_value(),
        crate::engine::NoopSink,
        options.timeout_value(),
    );
    login(&mut engine, username, password, options.login_method_value()).await?;
    Ok(MikrotikDevice::from_engine(engine))
}

/// Connects to `addr` over TLS (API-SSL, typically port 8729) and logs in,
/// same as [`connect`]. Requires the `tls` feature.
#[cfg(feature = "tls")]
pub async fn connect_tls(
    addr: &str,
    server_name: &str,
    tls_config: std::sync::Arc<tokio_rustls::rustls::ClientConfig>,
    username: &str,
    password: Option<&str>,
) -> Result<MikrotikDevice<crate::transport::TlsTransport>, DeviceError> {
    let (host, port) = split_host_port(addr);
    let options = ConnectOptions::new(host).port(port.unwrap_or(crate::config::DEFAULT_TLS_PORT));
    connect_tls_with(&options, server_name, tls_config, username, password).await
}

/// Connects over TLS and logs in per `options`, same as [`connect_with`].
/// Requires the `tls` feature.
#[cfg(feature = "tls")]
pub async fn connect_tls_with(
    options: &ConnectOptions,
    server_name: &str,
    tls_config: std::sync::Arc<tokio_rustls::rustls::ClientConfig>,
    username: &str,
    password: Option<&str>,
) -> Result<MikrotikDevice<crate::transport::TlsTransport>, DeviceError> {
    let transport = crate::transport::TlsTransport::connect_from(
        &options.addr(),
        options.saddr_value(),
        server_name,
        tls_config,
    )
    .await?;
    let mut engine = AsyncEngine::with_sink(
        transport,
        options.encoding_value(),
        crate::engine::NoopSink,
        options.timeout_value(),
    );
    login(&mut engine, username, password, options.login_method_value()).await?;
    Ok(MikrotikDevice::from_engine(engine))
}

fn split_host_port(addr: &str) -> (&str, Option<u16>) {
    match addr.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (host, Some(port)),
            Err(_) => (addr, None),
        },
        None => (addr, None),
    }
}

/// Runs the `/login` handshake against an already-connected engine, per
/// whichever [`LoginMethod`] the caller configured (spec §4.6): `Plain`
/// sends credentials directly in one sentence; `Token` sends a bare
/// `/login` first, reads the challenge, and answers with the MD5 digest.
pub(crate) async fn login<T: crate::transport::AsyncTransport>(
    engine: &mut AsyncEngine<T>,
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
            let response = challenge_response(password, &token).map_err(mikrotik_proto::Error::Unicode)?;
            let words = vec![
                compose_word("name", &Value::Str(username.to_string())),
                compose_word("response", &Value::Str(response)),
            ];
            engine.call("/login", &words).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_host_port_handles_both_forms() {
        assert_eq!(split_host_port("192.168.88.1:8728"), ("192.168.88.1", Some(8728)));
        assert_eq!(split_host_port("192.168.88.1"), ("192.168.88.1", None));
        assert_eq!(split_host_port("router.lan:8728"), ("router.lan", Some(8728)));
    }
}
