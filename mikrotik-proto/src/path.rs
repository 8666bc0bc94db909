//! Absolute command-path handle (spec §4.7 "Path"), built on top of a
//! blocking [`crate::engine::Engine`].

use std::string::String;
use std::vec::Vec;

use crate::engine::{Engine, Transport, WordSink};
use crate::error::Error;
use crate::query::{join, Query};
use crate::response::Response;
use crate::word::{compose_word, Value};

/// A command path bound to a specific [`Engine`], e.g. `/interface`. Methods
/// append the RouterOS verb (`print`, `add`, `remove`, `set`) to the bound
/// path and run the resulting command.
pub struct Path<'e, T: Transport, S: WordSink = crate::engine::NoopSink> {
    engine: &'e mut Engine<T, S>,
    base: String,
}

impl<'e, T: Transport, S: WordSink> Path<'e, T, S> {
    /// Binds a path to `engine` at the absolute path built from `segments`.
    pub fn new(engine: &'e mut Engine<T, S>, segments: &[&str]) -> Self {
        Self {
            engine,
            base: join(segments),
        }
    }

    /// Runs `print` under this path, returning every matching item with all
    /// properties (spec §4.7 "select/print", scenario absent a query).
    pub fn print(&mut self) -> Result<Response, Error> {
        self.engine.call(&format!("{}/print", self.base), &[])
    }

    /// Runs `print` with a compiled [`Query`] restricting properties and/or
    /// items (spec §4.7, scenario S4).
    pub fn select(&mut self, query: Query) -> Result<Response, Error> {
        self.engine.call(&format!("{}/print", self.base), &query.into_words())
    }

    /// Adds an item with the given attributes, returning its `.id` if the
    /// device supplied one in the `ret` attribute.
    pub fn add(&mut self, attributes: &[(&str, Value)]) -> Result<Option<String>, Error> {
        let words = attribute_words(attributes);
        let response = self.engine.call(&format!("{}/add", self.base), &words)?;
        Ok(response
            .first()
            .and_then(|record| record.get("ret"))
            .map(|value| crate::word::value_to_api(value)))
    }

    /// Removes one or more items by `.id`.
    pub fn remove(&mut self, ids: impl IntoIterator<Item = impl AsRef<str>>) -> Result<(), Error> {
        let joined: Vec<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        let words = vec![compose_word(".id", &Value::Str(joined.join(",")))];
        self.engine.call(&format!("{}/remove", self.base), &words)?;
        Ok(())
    }

    /// Updates an existing item's attributes by `.id`.
    pub fn update(&mut self, id: &str, attributes: &[(&str, Value)]) -> Result<(), Error> {
        let mut words = vec![compose_word(".id", &Value::Str(id.to_string()))];
        words.extend(attribute_words(attributes));
        self.engine.call(&format!("{}/set", self.base), &words)?;
        Ok(())
    }

    /// Runs an arbitrary verb under this path with raw attribute words, for
    /// commands that don't fit the `print`/`add`/`remove`/`set` shapes
    /// (spec §4.7 "arbitrary command invocation").
    pub fn call(&mut self, verb: &str, attributes: &[(&str, Value)]) -> Result<Response, Error> {
        let words = attribute_words(attributes);
        self.engine.call(&format!("{}/{verb}", self.base), &words)
    }

    /// The path's absolute string form, e.g. `/ip/address`.
    pub fn as_str(&self) -> &str {
        &self.base
    }
}

fn attribute_words(attributes: &[(&str, Value)]) -> Vec<String> {
    attributes
        .iter()
        .map(|(key, value)| compose_word(key, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::sentence::{encode_sentence, Encoding};
    use std::collections::VecDeque;

    #[derive(Default)]
    struct MockTransport {
        inbound: VecDeque<u8>,
        outbound: Vec<u8>,
    }

    impl Transport for MockTransport {
        type Error = &'static str;
        fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
            self.outbound.extend_from_slice(bytes);
            Ok(())
        }
        fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
            if self.inbound.len() < buf.len() {
                return Err("eof");
            }
            for slot in buf {
                *slot = self.inbound.pop_front().unwrap();
            }
            Ok(())
        }
        fn close(&mut self) {}
    }

    fn push_sentence(transport: &mut MockTransport, words: &[&str]) {
        let owned: Vec<String> = words.iter().map(|s| s.to_string()).collect();
        let bytes = encode_sentence(&owned, Encoding::Ascii).unwrap();
        transport.inbound.extend(bytes);
    }

    #[test]
    fn add_returns_ret_id() {
        let mut transport = MockTransport::default();
        push_sentence(&mut transport, &["!done", "=ret=*a"]);
        let mut engine = Engine::new(transport);
        let mut path = Path::new(&mut engine, &["interface"]);
        let id = path.add(&[("name", Value::Str("ether5".to_string()))]).unwrap();
        assert_eq!(id.as_deref(), Some("*a"));
    }

    #[test]
    fn path_join_is_absolute() {
        let mut transport = MockTransport::default();
        push_sentence(&mut transport, &["!done"]);
        let mut engine = Engine::new(transport);
        let path = Path::new(&mut engine, &["ip", "address"]);
        assert_eq!(path.as_str(), "/ip/address");
    }
}
