use std::sync::Arc;

use crate::events::{ListenerId, NavigationEvent};
use crate::router::{ContentFuture, ContentProducer, Route, RouteTable, Router};

/// The core Page trait for implementers.
pub trait Page: Send + Sync + 'static {
    /// Produce the page's markup.
    fn render(&self) -> ContentFuture;

    /// Called after the page's markup has been placed in the content area.
    fn init(&self, event: &NavigationEvent) {
        let _ = event;
    }
}

struct Entry {
    path: String,
    title: String,
    requires_auth: bool,
    page: Arc<dyn Page>,
}

/// Pages keyed by path, in registration order.
///
/// # Example
/// ```ignore
/// let pages = PageRegistry::new()
///     .page("/home", "Home", HomePage::default())
///     .protected("/statistics", "Statistics", StatisticsPage::default());
/// let router = Arc::new(Router::new(pages.route_table()?, guard, location));
/// pages.attach(&router);
/// ```
#[derive(Default)]
pub struct PageRegistry {
    entries: Vec<Entry>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a public page.
    pub fn page(self, path: impl Into<String>, title: impl Into<String>, page: impl Page) -> Self {
        self.register(path.into(), title.into(), false, Arc::new(page))
    }

    /// Register a page that requires an active session.
    pub fn protected(self, path: impl Into<String>, title: impl Into<String>, page: impl Page) -> Self {
        self.register(path.into(), title.into(), true, Arc::new(page))
    }

    /// Register an already shared page, e.g. the same page under two paths.
    pub fn shared(self, path: impl Into<String>, title: impl Into<String>, page: Arc<dyn Page>) -> Self {
        self.register(path.into(), title.into(), false, page)
    }

    fn register(mut self, path: String, title: String, requires_auth: bool, page: Arc<dyn Page>) -> Self {
        self.entries.push(Entry { path, title, requires_auth, page });
        self
    }

    pub fn get(&self, path: &str) -> Option<&Arc<dyn Page>> {
        self.entries.iter().find(|entry| entry.path == path).map(|entry| &entry.page)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the route table, one route per registered page.
    pub fn route_table(&self) -> crate::Result<RouteTable> {
        let routes = self
            .entries
            .iter()
            .map(|entry| {
                let page = Arc::clone(&entry.page);
                let producer: ContentProducer = Arc::new(move || page.render());
                let route = Route::from_producer(entry.path.clone(), entry.title.clone(), producer);
                if entry.requires_auth { route.protected() } else { route }
            })
            .collect();
        RouteTable::new(routes)
    }

    /// Subscribe to `router` and call `init` on the page owning each rendered path.
    pub fn attach(&self, router: &Router) -> ListenerId {
        let pages: Vec<(String, Arc<dyn Page>)> = self
            .entries
            .iter()
            .map(|entry| (entry.path.clone(), Arc::clone(&entry.page)))
            .collect();
        router.subscribe(move |event| {
            match pages.iter().find(|(path, _)| *path == event.path) {
                Some((_, page)) => page.init(event),
                None => tracing::debug!(path = %event.path, "no page initialization for path"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProducerError;
    use crate::router::{NavigationOutcome, Navigator, SessionGuard};
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Static {
        body: &'static str,
        inits: Arc<AtomicUsize>,
    }

    impl Page for Static {
        fn render(&self) -> ContentFuture {
            let body = self.body.to_string();
            async move { Ok::<_, ProducerError>(body) }.boxed()
        }

        fn init(&self, _event: &NavigationEvent) {
            self.inits.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Fixed;

    impl Navigator for Fixed {
        fn current_path(&self) -> String {
            "/".to_string()
        }
        fn navigate(&self, _path: &str) {}
    }

    #[test]
    fn test_route_table_carries_auth_flags() {
        let inits = Arc::new(AtomicUsize::new(0));
        let pages = PageRegistry::new()
            .page("/home", "Home", Static { body: "home", inits: inits.clone() })
            .protected("/statistics", "Statistics", Static { body: "stats", inits });
        let table = pages.route_table().unwrap();
        assert_eq!(table.len(), 2);
        assert!(!table.get_route("/home").requires_auth());
        assert!(table.get_route("/statistics").requires_auth());
        assert!(pages.get("/statistics").is_some());
    }

    #[test]
    fn test_duplicate_pages_are_rejected() {
        let inits = Arc::new(AtomicUsize::new(0));
        let pages = PageRegistry::new()
            .page("/home", "Home", Static { body: "a", inits: inits.clone() })
            .page("/home", "Home", Static { body: "b", inits });
        assert!(pages.route_table().is_err());
    }

    #[tokio::test]
    async fn test_attach_dispatches_init_for_rendered_page() {
        let home_inits = Arc::new(AtomicUsize::new(0));
        let about_inits = Arc::new(AtomicUsize::new(0));
        let pages = PageRegistry::new()
            .page("/home", "Home", Static { body: "home", inits: home_inits.clone() })
            .page("/about", "About", Static { body: "about", inits: about_inits.clone() });
        let guard: Arc<dyn SessionGuard> = Arc::new(|| true);
        let router = Router::new(pages.route_table().unwrap(), guard, Arc::new(Fixed))
            .with_sink(Arc::new(crate::surface::Document::default()));
        pages.attach(&router);

        let outcome = router.route_changed().await;

        assert!(matches!(outcome, NavigationOutcome::Rendered(ref e) if e.path == "/home"));
        assert_eq!(home_inits.load(Ordering::SeqCst), 1);
        assert_eq!(about_inits.load(Ordering::SeqCst), 0);
    }
}
