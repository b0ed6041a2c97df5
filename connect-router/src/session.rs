//! String key/value storage in the manner of browser session and local storage.

use snafu::ResultExt;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{IoSnafu, StorageFormatSnafu};
use crate::state::Entity;

/// A shared key/value store. Clones see the same items.
#[derive(Clone)]
pub struct Storage {
    items: Entity<BTreeMap<String, String>>,
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage {
    pub fn new() -> Self {
        Self { items: Entity::new(BTreeMap::new()) }
    }

    pub fn get_item(&self, key: &str) -> crate::Result<Option<String>> {
        self.items.read(|items| items.get(key).cloned())
    }

    pub fn set_item(&self, key: impl Into<String>, value: impl Into<String>) -> crate::Result<()> {
        let (key, value) = (key.into(), value.into());
        self.items.update(|items| {
            items.insert(key, value);
        })
    }

    /// Remove an item, returning its previous value.
    pub fn remove_item(&self, key: &str) -> crate::Result<Option<String>> {
        self.items.update(|items| items.remove(key))
    }

    pub fn clear(&self) -> crate::Result<()> {
        self.items.update(|items| items.clear())
    }

    pub fn len(&self) -> crate::Result<usize> {
        self.items.read(|items| items.len())
    }

    pub fn is_empty(&self) -> crate::Result<bool> {
        self.len().map(|len| len == 0)
    }

    /// Load items from a JSON object file. A missing file yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e).context(IoSnafu),
        };
        let items: BTreeMap<String, String> = serde_json::from_str(&json).context(StorageFormatSnafu {
            key: path.display().to_string(),
        })?;
        tracing::debug!(path = %path.display(), items = items.len(), "loaded storage");
        Ok(Self { items: Entity::new(items) })
    }

    /// Write all items to `path` as a JSON object.
    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();
        let json = self.items.read(|items| serde_json::to_string_pretty(items))?.context(StorageFormatSnafu {
            key: path.display().to_string(),
        })?;
        std::fs::write(path, json).context(IoSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_roundtrip() {
        let storage = Storage::new();
        assert_eq!(storage.get_item("user").unwrap(), None);

        storage.set_item("user", "{}").unwrap();
        let shared = storage.clone();
        assert_eq!(shared.get_item("user").unwrap().as_deref(), Some("{}"));

        assert_eq!(storage.remove_item("user").unwrap().as_deref(), Some("{}"));
        assert_eq!(storage.remove_item("user").unwrap(), None);
        assert!(shared.is_empty().unwrap());
    }

    #[test]
    fn test_clear() {
        let storage = Storage::new();
        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();
        assert_eq!(storage.len().unwrap(), 2);
        storage.clear().unwrap();
        assert!(storage.is_empty().unwrap());
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");

        assert!(Storage::load(&path).unwrap().is_empty().unwrap());

        let storage = Storage::new();
        storage.set_item("registeredUsers", "[]").unwrap();
        storage.save(&path).unwrap();

        let reloaded = Storage::load(&path).unwrap();
        assert_eq!(reloaded.get_item("registeredUsers").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(Storage::load(&path), Err(crate::Error::StorageFormat { .. })));
    }
}
