//! The router state machine.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::table::RouteTable;
use super::traits::{ContentSink, Navigator, SessionGuard};
use crate::config::{RenderPolicy, RouterConfig};
use crate::error::Error;
use crate::events::{ListenerId, Listeners, NavigationEvent};

/// Where the router is in handling the latest navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterState {
    #[default]
    Idle,
    Resolving,
    Rendering,
    Blocked,
    Failed,
}

/// Result of a single resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The page rendered and a [`NavigationEvent`] was published.
    Rendered(NavigationEvent),
    /// The route needs a session; navigation was redirected.
    Blocked { redirect: String },
    /// The content producer failed; the failure markup is showing.
    Failed { path: String },
    /// No content sink is mounted; nothing was rendered.
    Detached { path: String },
    /// A newer navigation started while this one was producing content.
    Superseded { path: String },
}

/// Resolves navigation targets to routes and renders them into a [`ContentSink`].
///
/// # Example
/// ```ignore
/// let router = Router::new(table, guard, location.clone())
///     .with_sink(document.clone());
/// router.subscribe(|event| println!("loaded {}", event.path));
/// router.route_changed().await;
/// ```
pub struct Router {
    table: RouteTable,
    guard: Arc<dyn SessionGuard>,
    navigator: Arc<dyn Navigator>,
    sink: Option<Arc<dyn ContentSink>>,
    listeners: Listeners,
    state: Mutex<RouterState>,
    generation: AtomicU64,
    config: RouterConfig,
}

impl Router {
    /// Create a router with the default configuration and no content sink.
    pub fn new(table: RouteTable, guard: Arc<dyn SessionGuard>, navigator: Arc<dyn Navigator>) -> Self {
        let config = RouterConfig::default();
        Self {
            table: table.with_fallbacks(config.home_path.clone(), config.not_found_path.clone()),
            guard,
            navigator,
            sink: None,
            listeners: Listeners::new(),
            state: Mutex::new(RouterState::Idle),
            generation: AtomicU64::new(0),
            config,
        }
    }

    /// Mount the content area to render into.
    pub fn with_sink(mut self, sink: Arc<dyn ContentSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the configuration. The table's fallback routes follow `config`.
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.table = self.table.with_fallbacks(config.home_path.clone(), config.not_found_path.clone());
        self.config = config;
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn state(&self) -> RouterState {
        self.state.lock().map(|state| *state).unwrap_or_else(|e| *e.into_inner())
    }

    fn set_state(&self, next: RouterState) {
        let mut state = self.state.lock().unwrap_or_else(|e| {
            tracing::warn!("router state lock poisoned, recovering");
            e.into_inner()
        });
        *state = next;
    }

    /// Register a listener for completed navigations.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&NavigationEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Handle a "target changed" notification by rendering the navigator's current path.
    pub async fn route_changed(&self) -> NavigationOutcome {
        let path = self.navigator.current_path();
        self.render_path(&path).await
    }

    /// Resolve `path`, apply the session guard and render the matched route.
    pub async fn render_path(&self, path: &str) -> NavigationOutcome {
        self.set_state(RouterState::Resolving);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let route = self.table.get_route(path);
        tracing::debug!(requested = %path, route = %route.path(), "resolved route");

        if route.requires_auth() && !self.guard.is_authenticated() {
            let redirect = self.config.login_path.clone();
            tracing::info!(route = %route.path(), redirect = %redirect, "navigation blocked, no active session");
            self.set_state(RouterState::Blocked);
            self.navigator.navigate(&redirect);
            return NavigationOutcome::Blocked { redirect };
        }

        let Some(sink) = self.sink.as_ref() else {
            tracing::debug!(route = %route.path(), "no content area mounted, skipping render");
            self.set_state(RouterState::Idle);
            return NavigationOutcome::Detached { path: route.path().to_string() };
        };

        self.set_state(RouterState::Rendering);
        sink.set_title(&self.config.page_title(route.title()));

        let produced = route.produce().await;

        if self.config.render_policy == RenderPolicy::LatestOnly
            && self.generation.load(Ordering::SeqCst) != generation
        {
            tracing::debug!(route = %route.path(), "render superseded by a newer navigation");
            return NavigationOutcome::Superseded { path: route.path().to_string() };
        }

        match produced {
            Ok(html) => {
                sink.set_markup(&html);
                sink.scroll_to_top();
                sink.highlight_active(path);
                self.set_state(RouterState::Idle);

                let event = NavigationEvent {
                    path: route.path().to_string(),
                    requested: path.to_string(),
                };
                self.listeners.publish(&event);
                NavigationOutcome::Rendered(event)
            }
            Err(source) => {
                let err = Error::RenderFailure { path: route.path().to_string(), source };
                tracing::error!(error = %err, "failed to render view");
                sink.set_markup(&self.config.failure_markup);
                self.set_state(RouterState::Failed);
                NavigationOutcome::Failed { path: route.path().to_string() }
            }
        }
    }
}
