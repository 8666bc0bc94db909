//! The cheaply-clonable device handle for the embedded runtime.
//!
//! Same rationale as `mikrotik-tokio`'s device: the sans-IO core doesn't
//! multiplex by `.tag`, so concurrent callers serialize through a shared
//! async mutex instead. Generic over the raw mutex kind so single-executor
//! firmware can use [`embassy_sync::blocking_mutex::raw::NoopRawMutex`]
//! (no locking overhead) while multi-core or multi-executor firmware can
//! use [`embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex`].

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_io_async::{Read, Write};

use mikrotik_proto::response::Response;

use crate::engine::{AsyncEngine, DeviceError};

/// A handle to one RouterOS API connection over an embedded socket.
pub struct MikrotikDevice<'a, M: RawMutex, IO: Read + Write> {
    engine: &'a Mutex<M, AsyncEngine<IO>>,
}

impl<'a, M: RawMutex, IO: Read + Write> MikrotikDevice<'a, M, IO> {
    /// Wraps an already-authenticated engine behind a shared mutex.
    pub fn new(engine: &'a Mutex<M, AsyncEngine<IO>>) -> Self {
        Self { engine }
    }

    /// Runs a raw command with pre-composed attribute/query words.
    pub async fn call(&self, command: &str, words: &[alloc::string::String]) -> Result<Response, DeviceError> {
        self.engine.lock().await.call(command, words).await
    }
}

impl<M: RawMutex, IO: Read + Write> Clone for MikrotikDevice<'_, M, IO> {
    fn clone(&self) -> Self {
        Self { engine: self.engine }
    }
}
