//! In-memory key-value store

use std::collections::HashMap;

use crate::error::{Error, Result};

use super::KeyValueStore;

/// `HashMap`-backed store, optionally limited to a total byte quota.
///
/// The quota mirrors browser local storage limits: a write that would push
/// the total size (keys plus values) over the quota fails and leaves the old
/// value in place.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    /// Create an unlimited store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes beyond `quota_bytes`
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Total bytes currently stored
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.used_bytes()
            - self
                .entries
                .get(key)
                .map_or(0, |value| key.len() + value.len())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            let required = self.used_bytes_without(key) + key.len() + value.len();
            if required > quota {
                return Err(Error::PersistenceWrite(format!(
                    "quota exceeded: {required} bytes needed, {quota} available"
                )));
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn quota_rejects_write_and_keeps_old_value() {
        let mut store = MemoryStore::with_quota(10);
        store.set("k", "small").unwrap();

        let error = store.set("k", "much too large").unwrap_err();
        assert!(matches!(error, Error::PersistenceWrite(_)));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("small"));
    }

    #[test]
    fn quota_accounts_for_replaced_value() {
        let mut store = MemoryStore::with_quota(10);
        store.set("k", "123456789").unwrap();
        // Replacing frees the old value's bytes first.
        store.set("k", "987654321").unwrap();
        assert_eq!(store.used_bytes(), 10);
    }
}
