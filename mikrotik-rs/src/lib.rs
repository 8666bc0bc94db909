#![warn(missing_docs)]
//! # MikroTik-rs
//!
//! `mikrotik-rs` is the facade crate: it re-exports the sans-IO protocol
//! core (`mikrotik-proto`) together with whichever runtime you've enabled
//! (`mikrotik-tokio` by default, or `mikrotik-embassy` for embedded
//! `no_std` targets), so most users only need this one crate.
//!
//! ## Examples
//!
//! Basic usage with the default tokio runtime:
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let addr = "192.168.88.1:8728";
//!     let username = "admin";
//!     let password = "password";
//!
//!     let device = mikrotik_rs::connect(addr, username, Some(password)).await?;
//!
//!     let response = device.path(&["interface"]).print().await?;
//!     for record in response {
//!         println!("{record:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mikrotik-rs = "0.7"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! Disable default features and enable `embassy` to target an embedded,
//! `no_std` runtime instead.

#[cfg(target_pointer_width = "16")]
compiler_error!("This library supports 32-bit architectures or higher.");

pub use mikrotik_proto as proto;
pub use mikrotik_proto::{Error, ReplyRecord, Response, TrapCategory, TrapResponse, Value};

#[cfg(feature = "tokio")]
pub use mikrotik_tokio::{connect, connect_with, device::MikrotikDevice, ConnectOptions, DeviceError, LoginMethod, Path};

#[cfg(feature = "embassy")]
/// Embassy-based `no_std` runtime, re-exported under its own namespace
/// since it can coexist with the `tokio` feature in the same build.
pub mod embassy {
    pub use mikrotik_embassy::*;
}
