use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Key/value state shared by every task of one graph run.
///
/// Values are stored as JSON, so anything `Serialize` can go in and anything
/// `DeserializeOwned` can come out. Clones share the same underlying map.
#[derive(Clone, Debug)]
pub struct Context {
    data: Arc<DashMap<String, Value>>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    pub async fn set(&self, key: impl Into<String>, value: impl serde::Serialize) {
        self.set_sync(key, value);
    }

    /// Synchronous variant of [`Context::set`], usable from edge conditions.
    ///
    /// A value that cannot be represented as JSON is not stored, and any
    /// previous value under `key` is dropped so later reads cannot see it.
    pub fn set_sync(&self, key: impl Into<String>, value: impl serde::Serialize) {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(value) => {
                self.data.insert(key, value);
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Context value is not serializable");
                self.data.remove(&key);
            }
        }
    }

    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_sync(key)
    }

    pub fn get_sync<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Removes `key` and returns its value decoded as `T`.
    pub async fn take<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .remove(key)
            .and_then(|(_, v)| serde_json::from_value(v).ok())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
