#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
//! Sans-IO core of the MikroTik RouterOS API protocol.
//!
//! This crate knows nothing about sockets. It encodes and decodes the wire
//! format (length-prefixed words, NUL-terminated sentences), folds reply
//! sentences into responses, computes the legacy login digest, and compiles
//! the query DSL into the device's reverse-polish filter words. A runtime
//! crate (`mikrotik-tokio`, `mikrotik-embassy`, or your own) supplies the
//! actual byte transport.
//!
//! With the `std` feature (default) this crate also provides a blocking
//! [`engine::Engine`] driven by any [`engine::Transport`] — the synchronous
//! variant of the client, usable directly over a [`std::net::TcpStream`].

extern crate alloc;

/// Error types shared by every layer of the protocol.
pub mod error;
/// Length-prefix codec (`encodeLength`/`decodeLength`/`determineLength`).
pub mod length;
/// Legacy and plain login strategies, and the MD5 challenge digest.
pub mod login;
/// Path-join helper and the RPN query-filter compiler.
pub mod query;
/// Reply-sentence classification and response folding.
pub mod response;
/// Sentence encoding/decoding and the per-connection text encoding.
pub mod sentence;
/// Attribute word classification, typed value coercion, and word encoding.
pub mod word;

#[cfg(feature = "std")]
/// Blocking `Transport` trait and the synchronous protocol engine.
pub mod engine;
#[cfg(feature = "std")]
/// Absolute command-path handle built on top of [`engine::Engine`].
pub mod path;

pub use error::Error;
pub use response::{ReplyRecord, Response, TrapCategory, TrapResponse};
pub use word::Value;
