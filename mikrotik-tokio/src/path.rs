//! Async counterpart of [`mikrotik_proto::path::Path`], built on a
//! [`MikrotikDevice`] handle instead of a borrowed engine so it can be held
//! across `.await` points and cloned freely.

use mikrotik_proto::query::{join, Query};
use mikrotik_proto::response::Response;
use mikrotik_proto::word::{compose_word, value_to_api, Value};

use crate::device::MikrotikDevice;
use crate::engine::{NoopSink, WordSink};
use crate::error::DeviceError;
use crate::transport::AsyncTransport;

/// A command path bound to a [`MikrotikDevice`], e.g. `/interface`.
pub struct Path<T: AsyncTransport, S: WordSink = NoopSink> {
    device: MikrotikDevice<T, S>,
    base: String,
}

impl<T: AsyncTransport, S: WordSink> Path<T, S> {
    pub(crate) fn new(device: MikrotikDevice<T, S>, segments: &[&str]) -> Self {
        Self {
            device,
            base: join(segments),
        }
    }

    /// Runs `print` under this path, returning every item with every
    /// property.
    pub async fn print(&self) -> Result<Response, DeviceError> {
        self.device.call(&format!("{}/print", self.base), &[]).await
    }

    /// Runs `print` with a compiled [`Query`] restricting properties and/or
    /// items.
    pub async fn select(&self, query: Query) -> Result<Response, DeviceError> {
        self.device
            .call(&format!("{}/print", self.base), &query.into_words())
            .await
    }

    /// Adds an item, returning its `.id` if the device supplied one.
    pub async fn add(&self, attributes: &[(&str, Value)]) -> Result<Option<String>, DeviceError> {
        let words = attribute_words(attributes);
        let response = self.device.call(&format!("{}/add", self.base), &words).await?;
        Ok(response
            .first()
            .and_then(|record| record.get("ret"))
            .map(value_to_api))
    }

    /// Removes one or more items by `.id`.
    pub async fn remove(&self, ids: impl IntoIterator<Item = impl AsRef<str>>) -> Result<(), DeviceError> {
        let joined: Vec<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        let words = vec![compose_word(".id", &Value::Str(joined.join(",")))];
        self.device.call(&format!("{}/remove", self.base), &words).await?;
        Ok(())
    }

    /// Updates an existing item's attributes by `.id`.
    pub async fn update(&self, id: &str, attributes: &[(&str, Value)]) -> Result<(), DeviceError> {
        let mut words = vec![compose_word(".id", &Value::Str(id.to_string()))];
        words.extend(attribute_words(attributes));
        self.device.call(&format!("{}/set", self.base), &words).await?;
        Ok(())
    }

    /// Runs an arbitrary verb under this path with raw attribute words.
    pub async fn call(&self, verb: &str, attributes: &[(&str, Value)]) -> Result<Response, DeviceError> {
        let words = attribute_words(attributes);
        self.device.call(&format!("{}/{verb}", self.base), &words).await
    }

    /// The path's absolute string form, e.g. `/ip/address`.
    pub fn as_str(&self) -> &str {
        &self.base
    }
}

fn attribute_words(attributes: &[(&str, Value)]) -> Vec<String> {
    attributes.iter().map(|(key, value)| compose_word(key, value)).collect()
}
