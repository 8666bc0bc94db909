//! The cheaply-clonable device handle.
//!
//! The spec's sans-IO core does not multiplex commands by `.tag` — one
//! command is outstanding on the wire at a time. Rather than reintroduce a
//! tag-keyed dispatch table, concurrent callers are serialized through a
//! shared [`tokio::sync::Mutex`]: a second `call` simply waits for the first
//! to finish, which satisfies the single-outstanding-command invariant by
//! construction instead of by convention.

use std::sync::Arc;

use mikrotik_proto::response::Response;
use tokio::sync::Mutex;

use crate::engine::{AsyncEngine, NoopSink, WordSink};
use crate::error::DeviceError;
use crate::path::Path;
use crate::transport::AsyncTransport;

/// A handle to one RouterOS API connection. Clones share the same
/// underlying connection and serialize their commands.
pub struct MikrotikDevice<T: AsyncTransport, S: WordSink = NoopSink> {
    engine: Arc<Mutex<AsyncEngine<T, S>>>,
}

impl<T: AsyncTransport> MikrotikDevice<T, NoopSink> {
    pub(crate) fn from_engine(engine: AsyncEngine<T, NoopSink>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }
}

impl<T: AsyncTransport, S: WordSink> Clone for MikrotikDevice<T, S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<T: AsyncTransport, S: WordSink> MikrotikDevice<T, S> {
    /// Wraps an already-authenticated engine.
    pub fn new(engine: AsyncEngine<T, S>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Runs a raw command with pre-composed attribute/query words.
    pub async fn call(&self, command: &str, words: &[String]) -> Result<Response, DeviceError> {
        self.engine.lock().await.call(command, words).await
    }

    /// Binds an absolute command path, e.g. `/interface`, for repeated use.
    pub fn path(&self, segments: &[&str]) -> Path<T, S> {
        Path::new(self.clone(), segments)
    }

    /// Closes the connection. Any handle sharing it will see subsequent
    /// calls fail with [`mikrotik_proto::Error::ConnectionClosed`].
    pub async fn close(&self) {
        self.engine.lock().await.close().await;
    }
}
