#![warn(missing_docs)]
//! Tokio-based async runtime for the MikroTik RouterOS API.
//!
//! Builds [`MikrotikDevice`] on top of `mikrotik-proto`'s sans-IO codec and
//! response folder. Connects over plain TCP by default; enable the `tls`
//! feature for RouterOS's API-SSL service.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let device = mikrotik_tokio::connect("192.168.88.1:8728", "admin", Some("password")).await?;
//! let response = device.path(&["interface"]).print().await?;
//! for record in response {
//!     println!("{record:?}");
//! }
//! # Ok(())
//! # }
//! ```

/// Connection configuration (spec §6).
pub mod config;
/// Connect-and-login entry points.
pub mod connector;
/// The cheaply-clonable device handle.
pub mod device;
/// The async protocol engine.
pub mod engine;
/// Error type for this runtime.
pub mod error;
/// Absolute command-path handle.
pub mod path;
/// Async byte transports (plain TCP, optional TLS).
pub mod transport;

pub use config::ConnectOptions;
pub use connector::{connect, connect_with};
pub use device::MikrotikDevice;
pub use error::DeviceError;
pub use mikrotik_proto::login::LoginMethod;
pub use path::Path;

#[cfg(feature = "tls")]
pub use connector::{connect_tls, connect_tls_with};
#[cfg(feature = "tls")]
pub use transport::TlsTransport;
pub use transport::TcpTransport;
