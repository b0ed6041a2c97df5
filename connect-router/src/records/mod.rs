//! In-process record collections for events and contacts.
//!
//! Each collection is an ordered list of records keyed by a generated id,
//! shared through an [`Entity`] and optionally persisted as a JSON array.

pub mod contact;
pub mod event;

pub use contact::{Contact, ContactDetails, ContactStore};
pub use event::{EventDraft, EventStore, EventUpdate, NewEvent, PlannedEvent};

use serde::de::DeserializeOwned;
use serde::Serialize;
use snafu::ResultExt;
use std::path::Path;
use tokio::sync::watch;

use crate::error::{Error, IoSnafu, StorageFormatSnafu};
use crate::state::Entity;

/// Something stored in a [`Records`] collection.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// A fresh record id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub(crate) struct Records<T: Record> {
    items: Entity<Vec<T>>,
}

impl<T: Record> Clone for Records<T> {
    fn clone(&self) -> Self {
        Self { items: self.items.clone() }
    }
}

impl<T: Record> Records<T> {
    pub(crate) fn from_items(items: Vec<T>) -> Self {
        Self { items: Entity::new(items) }
    }

    pub(crate) fn all(&self) -> crate::Result<Vec<T>> {
        self.items.read(|items| items.clone())
    }

    pub(crate) fn filter(&self, keep: impl Fn(&T) -> bool) -> crate::Result<Vec<T>> {
        self.items.read(|items| items.iter().filter(|item| keep(*item)).cloned().collect())
    }

    pub(crate) fn get(&self, id: &str) -> crate::Result<T> {
        self.items
            .read(|items| items.iter().find(|item| item.id() == id).cloned())?
            .ok_or_else(|| not_found::<T>(id))
    }

    pub(crate) fn insert(&self, item: T) -> crate::Result<T> {
        tracing::info!(kind = T::KIND, id = item.id(), "record created");
        let stored = item.clone();
        self.items.update(|items| items.push(item))?;
        Ok(stored)
    }

    /// Apply `change` to the record with `id` and return the updated copy.
    pub(crate) fn modify(&self, id: &str, change: impl FnOnce(&mut T)) -> crate::Result<T> {
        let updated = self.items.update(|items| {
            items.iter_mut().find(|item| item.id() == id).map(|item| {
                change(item);
                item.clone()
            })
        })?;
        let updated = updated.ok_or_else(|| not_found::<T>(id))?;
        tracing::info!(kind = T::KIND, id, "record updated");
        Ok(updated)
    }

    pub(crate) fn remove(&self, id: &str) -> crate::Result<T> {
        let removed = self
            .items
            .update(|items| items.iter().position(|item| item.id() == id).map(|index| items.remove(index)))?;
        let removed = removed.ok_or_else(|| not_found::<T>(id))?;
        tracing::info!(kind = T::KIND, id, "record deleted");
        Ok(removed)
    }

    pub(crate) fn len(&self) -> crate::Result<usize> {
        self.items.read(|items| items.len())
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<()> {
        self.items.subscribe()
    }

    /// Read a JSON array of records. A missing file yields an empty collection.
    pub(crate) fn load(path: &Path) -> crate::Result<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::from_items(Vec::new())),
            Err(e) => return Err(e).context(IoSnafu),
        };
        let items: Vec<T> = serde_json::from_str(&json).context(StorageFormatSnafu {
            key: path.display().to_string(),
        })?;
        tracing::debug!(kind = T::KIND, path = %path.display(), records = items.len(), "loaded records");
        Ok(Self::from_items(items))
    }

    pub(crate) fn save(&self, path: &Path) -> crate::Result<()> {
        let json = self.items.read(|items| serde_json::to_string_pretty(items))?.context(StorageFormatSnafu {
            key: path.display().to_string(),
        })?;
        std::fs::write(path, json).context(IoSnafu)
    }
}

fn not_found<T: Record>(id: &str) -> Error {
    Error::RecordNotFound { kind: T::KIND, id: id.to_string() }
}
