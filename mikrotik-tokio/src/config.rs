//! Connection configuration (spec §6 "Connection configuration").

use std::net::IpAddr;
use std::time::Duration;

use mikrotik_proto::login::LoginMethod;
use mikrotik_proto::sentence::Encoding;

/// The RouterOS API's default plaintext port.
pub const DEFAULT_PORT: u16 = 8728;
/// The conventional port for the TLS-wrapped API (API-SSL).
pub const DEFAULT_TLS_PORT: u16 = 8729;

/// Every knob spec §6 names, gathered into one builder so a caller doesn't
/// have to thread them through `connect`'s argument list one at a time.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    host: String,
    port: u16,
    timeout: Duration,
    saddr: Option<IpAddr>,
    encoding: Encoding,
    login_method: LoginMethod,
}

impl ConnectOptions {
    /// Starts from `host` with every other option at its spec §6 default:
    /// port 8728, a 10 second per-operation timeout, no local bind address,
    /// ASCII encoding, and the plain login method.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(10),
            saddr: None,
            encoding: Encoding::Ascii,
            login_method: LoginMethod::Plain,
        }
    }

    /// Overrides the TCP port (default 8728, conventionally 8729 for TLS).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the per-operation wall-clock timeout (default 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Binds the local side of the connection to `addr` before connecting.
    pub fn saddr(mut self, addr: IpAddr) -> Self {
        self.saddr = Some(addr);
        self
    }

    /// Overrides the connection's word text encoding (default ASCII).
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Selects which login strategy to run (default [`LoginMethod::Plain`]).
    pub fn login_method(mut self, method: LoginMethod) -> Self {
        self.login_method = method;
        self
    }

    /// The `host:port` string suitable for resolution/connection.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub(crate) fn saddr_value(&self) -> Option<IpAddr> {
        self.saddr
    }

    pub(crate) fn timeout_value(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn encoding_value(&self) -> Encoding {
        self.encoding
    }

    pub(crate) fn login_method_value(&self) -> LoginMethod {
        self.login_method
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let options = ConnectOptions::new("192.168.88.1");
        assert_eq!(options.addr(), "192.168.88.1:8728");
        assert_eq!(options.timeout_value(), Duration::from_secs(10));
        assert_eq!(options.saddr_value(), None);
        assert_eq!(options.encoding_value(), Encoding::Ascii);
        assert_eq!(options.login_method_value(), LoginMethod::Plain);
    }

    #[test]
    fn builder_overrides_apply() {
        let options = ConnectOptions::new("192.168.88.1")
            .port(8729)
            .timeout(Duration::from_secs(30))
            .login_method(LoginMethod::Token);
        assert_eq!(options.addr(), "192.168.88.1:8729");
        assert_eq!(options.timeout_value(), Duration::from_secs(30));
        assert_eq!(options.login_method_value(), LoginMethod::Token);
    }
}
