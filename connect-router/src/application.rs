//! Host side of navigation: the hash-fragment target and the event loop that
//! feeds "target changed" notifications to the router.

use std::future::Future;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinSet;

use crate::router::{Navigator, Router};
use crate::surface::INTERNAL_LINK_PREFIX;

/// The current navigation target, stored as a hash fragment without the `#`.
///
/// Subscribers are notified only when the fragment actually changes.
#[derive(Clone)]
pub struct Location {
    hash: Arc<RwLock<String>>,
    tx: broadcast::Sender<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self::new("")
    }
}

impl Location {
    /// Start at `hash` (with or without a leading `#`).
    pub fn new(hash: &str) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            hash: Arc::new(RwLock::new(strip_hash(hash).to_string())),
            tx,
        }
    }

    /// The raw fragment, empty when none is set.
    pub fn hash(&self) -> String {
        self.hash.read().map(|hash| hash.clone()).unwrap_or_else(|e| e.into_inner().clone())
    }

    /// Set the fragment. Returns whether it changed.
    pub fn set_hash(&self, hash: &str) -> bool {
        let next = strip_hash(hash);
        let mut current = self.hash.write().unwrap_or_else(|e| e.into_inner());
        if *current == next {
            return false;
        }
        *current = next.to_string();
        drop(current);
        tracing::debug!(target_path = %next, "navigation target changed");
        let _ = self.tx.send(next.to_string());
        true
    }

    /// Handle a click on `href`.
    ///
    /// Internal `#/` links are turned into a target change and `true` is
    /// returned to signal that the default action was prevented. Other hrefs
    /// are left alone.
    pub fn follow_link(&self, href: &str) -> bool {
        if !href.starts_with(INTERNAL_LINK_PREFIX) {
            return false;
        }
        self.set_hash(href);
        true
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }
}

fn strip_hash(hash: &str) -> &str {
    hash.strip_prefix('#').unwrap_or(hash)
}

impl Navigator for Location {
    fn current_path(&self) -> String {
        let hash = self.hash();
        if hash.is_empty() { "/".to_string() } else { hash }
    }

    fn navigate(&self, path: &str) {
        self.set_hash(path);
    }
}

/// Drives a [`Router`] from a [`Location`].
///
/// Resolutions run as independent tasks owned by the application. A newer
/// navigation never cancels an older one; all of them are aborted when the
/// application stops or is dropped.
pub struct Application {
    router: Arc<Router>,
    location: Location,
    tasks: JoinSet<()>,
}

impl Application {
    pub fn new(router: Arc<Router>, location: Location) -> Self {
        Self { router, location, tasks: JoinSet::new() }
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Reap finished resolutions and count the ones still running.
    fn in_flight(&mut self) -> usize {
        while let Some(finished) = self.tasks.try_join_next() {
            if let Err(e) = finished {
                tracing::error!(error = %e, "resolution task failed");
            }
        }
        self.tasks.len()
    }

    fn spawn_resolution(&mut self) {
        let router = Arc::clone(&self.router);
        let path = self.location.current_path();
        let in_flight = self.in_flight();
        tracing::trace!(target_path = %path, in_flight, "spawning resolution");
        self.tasks.spawn(async move {
            router.render_path(&path).await;
        });
    }

    /// Render the current target, then one resolution per target change until
    /// `shutdown` completes. In-flight resolutions are aborted on exit.
    pub async fn run<S>(mut self, shutdown: S) -> crate::Result<()>
    where
        S: Future<Output = ()>,
    {
        let mut rx = self.location.subscribe();
        self.spawn_resolution();

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                changed = rx.recv() => match changed {
                    Ok(_) => self.spawn_resolution(),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "missed navigation notifications, rendering current target");
                        self.spawn_resolution();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = &mut shutdown => break,
            }
        }

        tracing::debug!(in_flight = self.in_flight(), "application shutting down");
        self.tasks.shutdown().await;
        Ok(())
    }
}
