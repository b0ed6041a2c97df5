//! Events and news: pages that load remote data.

use connect_router::{ContentFuture, EventStore, NavigationEvent, Page, PlannedEvent, ProducerError};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::{sleep, Duration};

/// One list item per event, flagging the ones `viewer` organizes.
pub fn event_items(events: &[PlannedEvent], viewer: Option<&str>) -> String {
    let mut markup = String::from("<ul>\n");
    for event in events {
        let yours = if viewer == Some(event.organizer.as_str()) { " (yours)" } else { "" };
        markup.push_str(&format!(
            "<li>{} {}  {} @ {} - {}{}</li>\n",
            event.date.format("%b %-d, %Y"),
            event.time.format("%H:%M"),
            event.name,
            event.location,
            event.organizer,
            yours,
        ));
    }
    markup.push_str("</ul>\n");
    markup
}

pub struct EventsPage {
    store: EventStore,
    visits: AtomicUsize,
}

impl EventsPage {
    pub fn new(store: EventStore) -> Self {
        Self { store, visits: AtomicUsize::new(0) }
    }
}

impl Page for EventsPage {
    fn render(&self) -> ContentFuture {
        let store = self.store.clone();
        Box::pin(async move {
            sleep(Duration::from_millis(400)).await;
            let events = store.list()?;
            let mut markup = String::from("<section>\n<h1>Events</h1>\n");
            if events.is_empty() {
                markup.push_str("<p>No events are planned yet.</p>\n");
            } else {
                markup.push_str(&event_items(&events, None));
            }
            markup.push_str("</section>\n");
            Ok::<_, ProducerError>(markup)
        })
    }

    fn init(&self, _event: &NavigationEvent) {
        let visits = self.visits.fetch_add(1, Ordering::Relaxed) + 1;
        let events = self.store.len().unwrap_or_default();
        tracing::info!(events, visits, "events page initialized");
    }
}

/// The news feed is hosted elsewhere and is currently unreachable.
pub struct NewsPage;

impl Page for NewsPage {
    fn render(&self) -> ContentFuture {
        Box::pin(async {
            sleep(Duration::from_millis(200)).await;
            Err::<String, ProducerError>("community news feed unavailable".into())
        })
    }
}
