#![no_std]
#![warn(missing_docs)]
//! Embassy-based `no_std` runtime for the MikroTik RouterOS API, for
//! embedded targets that can't bring in tokio. Builds on the same
//! `mikrotik-proto` sans-IO codec and response folder as `mikrotik-tokio`.
//!
//! The socket itself is supplied by the caller (typically an
//! `embassy_net::tcp::TcpSocket`) rather than owned by this crate, since
//! `embassy-net`'s stack needs to be driven by the application's executor.

extern crate alloc;

/// Connect-and-login handshake.
pub mod connector;
/// The cheaply-clonable device handle.
pub mod device;
/// The async protocol engine.
pub mod engine;
/// The `embedded-io-async` transport wrapper.
pub mod transport;

pub use connector::login;
pub use device::MikrotikDevice;
pub use engine::{AsyncEngine, DeviceError};
pub use mikrotik_proto::login::LoginMethod;
