//! Custom parameters embedded in an envelope.
//!
//! A small string-key to byte-blob store that rides inside the envelope.
//! Values set before encryption are carried in the header, encrypted under
//! the content key, and become readable again after a successful decrypt.

use crate::artifacts::Bytes;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Custom key/value parameters carried inside an envelope.
///
/// Values are raw byte blobs; [`set_string`][`CustomParams::set_string`] and
/// [`set_integer`][`CustomParams::set_integer`] are conveniences over the
/// same storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomParams(BTreeMap<String, Bytes>);

impl CustomParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a byte-blob value.
    pub fn set_data(&mut self, key: impl Into<String>, value: &[u8]) {
        self.0.insert(key.into(), Bytes(value.to_vec()));
    }

    /// Returns a byte-blob value.
    pub fn data(&self, key: &str) -> Option<&[u8]> {
        self.0.get(key).map(|v| v.as_ref())
    }

    /// Stores a string value.
    pub fn set_string(&mut self, key: impl Into<String>, value: &str) {
        self.set_data(key, value.as_bytes());
    }

    /// Returns a string value, if present and valid UTF-8.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.data(key).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Stores an integer value.
    pub fn set_integer(&mut self, key: impl Into<String>, value: i64) {
        self.set_data(key, &value.to_be_bytes());
    }

    /// Returns an integer value, if present and of the right width.
    pub fn integer(&self, key: &str) -> Option<i64> {
        self.data(key)
            .and_then(|v| <[u8; 8]>::try_from(v).ok())
            .map(i64::from_be_bytes)
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }

    /// Removes all values.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of parameters set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over all parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}
