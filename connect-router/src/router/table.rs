//! Route definitions and path resolution.

use futures::future::{BoxFuture, FutureExt};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use crate::error::{Error, ProducerError};

/// Future returned by a content producer.
pub type ContentFuture = BoxFuture<'static, Result<String, ProducerError>>;

/// Lazily produces a page's markup. Each call yields a fresh future.
pub type ContentProducer = Arc<dyn Fn() -> ContentFuture + Send + Sync>;

/// A named navigation target.
#[derive(Clone)]
pub struct Route {
    path: String,
    title: String,
    producer: ContentProducer,
    requires_auth: bool,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("title", &self.title)
            .field("requires_auth", &self.requires_auth)
            .finish()
    }
}

impl Route {
    /// Create a public route.
    pub fn new<F, Fut, E>(path: impl Into<String>, title: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, E>> + Send + 'static,
        E: Into<ProducerError>,
    {
        let producer: ContentProducer = Arc::new(move || {
            let fut = producer();
            async move { fut.await.map_err(Into::into) }.boxed()
        });
        Self::from_producer(path, title, producer)
    }

    /// Create a route from an already boxed producer.
    pub fn from_producer(path: impl Into<String>, title: impl Into<String>, producer: ContentProducer) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            producer,
            requires_auth: false,
        }
    }

    /// Require an active session to visit this route.
    pub fn protected(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    /// Start producing this route's markup.
    pub fn produce(&self) -> ContentFuture {
        (self.producer)()
    }
}

/// The immutable list of routes, with the fallbacks used for `/` and unknown paths.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    home_path: String,
    not_found_path: String,
}

impl RouteTable {
    /// Build a table, rejecting empty tables, duplicate paths and paths not starting with `/`.
    pub fn new(routes: Vec<Route>) -> crate::Result<Self> {
        if routes.is_empty() {
            return Err(Error::EmptyRouteTable);
        }
        let mut seen = HashSet::new();
        for route in &routes {
            if !route.path.starts_with('/') {
                return Err(Error::InvalidRoutePath { path: route.path.clone() });
            }
            if !seen.insert(route.path.as_str()) {
                return Err(Error::DuplicateRoute { path: route.path.clone() });
            }
        }
        Ok(Self {
            routes,
            home_path: "/home".to_string(),
            not_found_path: "/404".to_string(),
        })
    }

    /// Override the default (`/home`) and not-found (`/404`) route paths.
    ///
    /// The router sets these from its [`RouterConfig`](crate::RouterConfig).
    pub(crate) fn with_fallbacks(mut self, home_path: impl Into<String>, not_found_path: impl Into<String>) -> Self {
        self.home_path = home_path.into();
        self.not_found_path = not_found_path.into();
        self
    }

    /// Resolve a path to a route.
    ///
    /// An exact match always wins. Otherwise `/` resolves to the home route and
    /// any other path to the not-found route; either falls back to the first
    /// registered route when absent.
    pub fn get_route(&self, path: &str) -> &Route {
        if let Some(route) = self.find(path) {
            return route;
        }
        let fallback = if path == "/" { &self.home_path } else { &self.not_found_path };
        self.find(fallback).unwrap_or(&self.routes[0])
    }

    /// Exact lookup without fallbacks.
    pub fn find(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.path == path)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
