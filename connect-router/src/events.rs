//! Navigation lifecycle notifications.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Published once per completed render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    /// Path of the route that was rendered.
    pub path: String,
    /// The navigation target that led to it (`/` for the home route, an unknown path for 404).
    pub requested: String,
}

/// Identifies a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&NavigationEvent) + Send + Sync>;

/// Observer list for [`NavigationEvent`]s. Listeners return nothing and are
/// called in registration order.
#[derive(Default)]
pub struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<(ListenerId, Listener)>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&NavigationEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Deliver an event to every listener.
    ///
    /// The list is snapshotted first, so listeners may subscribe, unsubscribe
    /// or trigger navigation from inside the callback.
    pub fn publish(&self, event: &NavigationEvent) {
        let snapshot: Vec<Listener> = {
            let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.iter().map(|(_, listener)| Arc::clone(listener)).collect()
        };
        tracing::debug!(path = %event.path, listeners = snapshot.len(), "publishing navigation event");
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(path: &str) -> NavigationEvent {
        NavigationEvent { path: path.to_string(), requested: path.to_string() }
    }

    #[test]
    fn test_every_listener_receives_event() {
        let listeners = Listeners::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for tag in ["a", "b"] {
            let seen = seen.clone();
            listeners.subscribe(move |e| seen.lock().unwrap().push(format!("{tag}:{}", e.path)));
        }

        listeners.publish(&event("/about"));
        assert_eq!(*seen.lock().unwrap(), vec!["a:/about", "b:/about"]);
    }

    #[test]
    fn test_unsubscribe() {
        let listeners = Listeners::new();
        let count = Arc::new(AtomicU64::new(0));
        let c = count.clone();
        let id = listeners.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        listeners.publish(&event("/home"));
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.publish(&event("/home"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_listener_may_subscribe_during_publish() {
        let listeners = Arc::new(Listeners::new());
        let inner = listeners.clone();
        listeners.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        listeners.publish(&event("/home"));
        assert_eq!(listeners.len(), 2);
    }

    #[test]
    fn test_len_survives_poisoned_lock() {
        let listeners = Arc::new(Listeners::new());
        listeners.subscribe(|_| {});
        let held = listeners.clone();
        let _ = std::thread::spawn(move || {
            let _entries = held.entries.lock().unwrap();
            panic!("listener registry poisoned");
        })
        .join();

        assert_eq!(listeners.len(), 1);
        listeners.subscribe(|_| {});
        assert_eq!(listeners.len(), 2);
    }
}
