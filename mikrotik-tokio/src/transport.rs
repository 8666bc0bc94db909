//! The async byte transport seam and its TCP (and optional TLS)
//! implementations.

use std::future::Future;
use std::net::IpAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpSocket, TcpStream};

/// The async counterpart of [`mikrotik_proto::engine::Transport`]. Kept as
/// its own trait rather than reused directly, since async fns in traits
/// aren't object-safe and the sans-IO core's trait predates them.
pub trait AsyncTransport: Send {
    /// Writes `bytes` in full.
    fn write_all(&mut self, bytes: &[u8]) -> impl Future<Output = std::io::Result<()>> + Send;
    /// Reads exactly `buf.len()` bytes.
    fn read_exact(&mut self, buf: &mut [u8]) -> impl Future<Output = std::io::Result<()>> + Send;
    /// Shuts the connection down. Best-effort: errors are not surfaced,
    /// since this only ever runs after the connection is already being torn
    /// down for another reason.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Resolves `addr` (`host:port`) and connects, optionally binding the local
/// side to `saddr` first (spec §6 `saddr` option). Tries every resolved
/// address in order, the way `std::net::TcpStream::connect` does.
async fn connect_tcp(addr: &str, saddr: Option<IpAddr>) -> std::io::Result<TcpStream> {
    let mut last_err = None;
    for remote in tokio::net::lookup_host(addr).await? {
        let socket = if remote.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        if let Some(ip) = saddr {
            socket.bind(std::net::SocketAddr::new(ip, 0))?;
        }
        match socket.connect(remote).await {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::AddrNotAvailable, "no addresses to connect to")
    }))
}

/// A plain, unencrypted TCP transport — the default for RouterOS API port
/// 8728.
pub struct TcpTransport(TcpStream);

impl TcpTransport {
    /// Connects to `addr` (`host:port`) and wraps the resulting socket.
    pub async fn connect(addr: &str) -> std::io::Result<Self> {
        Self::connect_from(addr, None).await
    }

    /// Connects to `addr`, binding the local side to `saddr` first if given
    /// (spec §6 `saddr` option).
    pub async fn connect_from(addr: &str, saddr: Option<IpAddr>) -> std::io::Result<Self> {
        let stream = connect_tcp(addr, saddr).await?;
        stream.set_nodelay(true)?;
        Ok(Self(stream))
    }
}

impl AsyncTransport for TcpTransport {
    async fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.0.write_all(bytes).await
    }

    async fn read_exact(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
        self.0.read_exact(buf).await.map(|_| ())
    }

    async fn close(&mut self) {
        let _ = self.0.shutdown().await;
    }
}

#[cfg(feature = "tls")]
mod tls {
    use super::{connect_tcp, AsyncTransport};
    use std::net::IpAddr;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio_rustls::client::TlsStream;
    use tokio_rustls::rustls::pki_types::ServerName;
    use tokio_rustls::rustls::ClientConfig;
    use tokio_rustls::TlsConnector;

    /// A TLS-wrapped transport for RouterOS API-SSL (port 8729).
    pub struct TlsTransport(TlsStream<TcpStream>);

    impl TlsTransport {
        /// Connects to `addr` and performs the TLS handshake for `server_name`.
        pub async fn connect(
            addr: &str,
            server_name: &str,
            config: Arc<ClientConfig>,
        ) -> std::io::Result<Self> {
            Self::connect_from(addr, None, server_name, config).await
        }

        /// Connects to `addr`, binding the local side to `saddr` first if
        /// given, then performs the TLS handshake for `server_name`.
        pub async fn connect_from(
            addr: &str,
            saddr: Option<IpAddr>,
            server_name: &str,
            config: Arc<ClientConfig>,
        ) -> std::io::Result<Self> {
            let stream = connect_tcp(addr, saddr).await?;
            stream.set_nodelay(true)?;
            let name = ServerName::try_from(server_name.to_string())
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
            let connector = TlsConnector::from(config);
            let tls = connector.connect(name, stream).await?;
            Ok(Self(tls))
        }
    }

    impl AsyncTransport for TlsTransport {
        async fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
            self.0.write_all(bytes).await
        }

        async fn read_exact(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
            self.0.read_exact(buf).await.map(|_| ())
        }

        async fn close(&mut self) {
            let _ = self.0.shutdown().await;
        }
    }
}

#[cfg(feature = "tls")]
pub use tls::TlsTransport;
