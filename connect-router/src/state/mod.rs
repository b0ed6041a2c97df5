//! Shared, observable state.

use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// A value shared between the router, its sinks and the host.
///
/// Clones share the same value; every `update` notifies subscribers.
pub struct Entity<T: Send + Sync> {
    inner: Arc<RwLock<T>>,
    tx: watch::Sender<()>,
}

impl<T: Send + Sync> Entity<T> {
    /// Create a new entity with the given initial value.
    pub fn new(value: T) -> Self {
        let (tx, _) = watch::channel(());
        Self {
            inner: Arc::new(RwLock::new(value)),
            tx,
        }
    }

    /// Update the inner value using a closure and notify subscribers.
    pub fn update<F, R>(&self, f: F) -> crate::Result<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut guard = self.inner.write().map_err(|_| crate::Error::LockPoisoned)?;
        let res = f(&mut *guard);
        drop(guard);
        let _ = self.tx.send(());
        Ok(res)
    }

    /// Read the inner value using a closure.
    pub fn read<F, R>(&self, f: F) -> crate::Result<R>
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.inner.read().map_err(|_| crate::Error::LockPoisoned)?;
        Ok(f(&*guard))
    }

    /// Subscribe to changes of this entity.
    pub fn subscribe(&self) -> watch::Receiver<()> {
        self.tx.subscribe()
    }
}

impl<T: Send + Sync> Clone for Entity<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            tx: watch::Sender::clone(&self.tx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_value() {
        let a = Entity::new(1);
        let b = a.clone();
        b.update(|v| *v += 1).unwrap();
        assert_eq!(a.read(|v| *v).unwrap(), 2);
        assert_eq!(Entity::new(1).read(|v| *v).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_notifies_subscribers() {
        let entity = Entity::new(String::new());
        let mut rx = entity.subscribe();
        entity.update(|s| s.push_str("changed")).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(entity.read(|s| s.clone()).unwrap(), "changed");
    }
}
