//! JSON read-modify-write adapter over a key-value store

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::util::compact_text;

use super::KeyValueStore;

/// Typed JSON access to a [`KeyValueStore`].
///
/// Reads never fail: a missing key, a read error, or a value that does not
/// decode all come back as `None`. Writes are reported as
/// [`Error::PersistenceWrite`] and never partially overwrite the old value.
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    /// Wrap a key-value store
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Load and decode the value under `key`
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                tracing::warn!("Failed to read '{}' from storage: {}", key, error);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(
                    "Ignoring malformed value stored under '{}': {} ({})",
                    key,
                    error,
                    compact_text(&raw)
                );
                None
            }
        }
    }

    /// Encode `value` and write it under `key`
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)
            .map_err(|error| Error::PersistenceWrite(format!("failed to encode '{key}': {error}")))?;

        self.store.set(key, &encoded).map_err(|error| match error {
            Error::PersistenceWrite(message) => Error::PersistenceWrite(message),
            other => Error::PersistenceWrite(other.to_string()),
        })
    }

    /// Remove the value under `key`
    pub fn clear(&mut self, key: &str) -> Result<()> {
        self.store.remove(key)
    }

    /// Borrow the underlying store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrow the underlying store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Unwrap the underlying store
    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn save_then_load() {
        let mut persistence = Persistence::new(MemoryStore::new());
        let sample = Sample {
            name: "a".to_string(),
            count: 2,
        };
        persistence.save("sample", &sample).unwrap();

        let loaded: Option<Sample> = persistence.load("sample");
        assert_eq!(loaded, Some(sample));
    }

    #[test]
    fn missing_key_loads_none() {
        let persistence = Persistence::new(MemoryStore::new());
        assert_eq!(persistence.load::<Sample>("nothing"), None);
    }

    #[test]
    fn malformed_value_loads_none() {
        let mut store = MemoryStore::new();
        store.set("sample", "{not json").unwrap();
        store.set("wrong-shape", r#"{"name": 3}"#).unwrap();

        let persistence = Persistence::new(store);
        assert_eq!(persistence.load::<Sample>("sample"), None);
        assert_eq!(persistence.load::<Sample>("wrong-shape"), None);
    }

    #[test]
    fn failed_write_reports_error_and_keeps_previous_value() {
        let mut persistence = Persistence::new(MemoryStore::with_quota(64));
        persistence.save("k", &"short").unwrap();

        let error = persistence.save("k", &"x".repeat(200)).unwrap_err();
        assert!(matches!(error, Error::PersistenceWrite(_)));
        assert_eq!(persistence.load::<String>("k").as_deref(), Some("short"));
    }

    #[test]
    fn clear_removes_value() {
        let mut persistence = Persistence::new(MemoryStore::new());
        persistence.save("k", &1_u32).unwrap();
        persistence.clear("k").unwrap();
        assert_eq!(persistence.load::<u32>("k"), None);
    }
}
