//! Pages that need a signed-in volunteer.

use connect_router::{AuthService, ContentFuture, EventStore, NavigationEvent, Page, ProducerError};
use std::sync::Arc;

use super::events::event_items;

pub struct StatisticsPage {
    auth: Arc<AuthService>,
    events: EventStore,
}

impl StatisticsPage {
    pub fn new(auth: Arc<AuthService>, events: EventStore) -> Self {
        Self { auth, events }
    }
}

impl Page for StatisticsPage {
    fn render(&self) -> ContentFuture {
        let name = self
            .auth
            .current_user()
            .map(|user| user.display_name)
            .unwrap_or_else(|| "volunteer".to_string());
        let events = self.events.clone();
        Box::pin(async move {
            let planned = events.len()?;
            let organized = events.by_organizer(&name)?.len();
            Ok::<_, ProducerError>(format!(
                "<section>\n<h1>Statistics</h1>\n<p>Welcome back, {name}.</p>\n\
                 <p>Events on the calendar: {planned}</p>\n<p>Events you organize: {organized}</p>\n</section>\n"
            ))
        })
    }

    fn init(&self, event: &NavigationEvent) {
        tracing::info!(path = %event.path, "statistics loaded");
    }
}

/// Lists the signed-in organizer's events above everyone else's.
pub struct EventPlanningPage {
    auth: Arc<AuthService>,
    events: EventStore,
}

impl EventPlanningPage {
    pub fn new(auth: Arc<AuthService>, events: EventStore) -> Self {
        Self { auth, events }
    }
}

impl Page for EventPlanningPage {
    fn render(&self) -> ContentFuture {
        let organizer = self.auth.current_user().map(|user| user.display_name);
        let events = self.events.clone();
        Box::pin(async move {
            let all = events.list()?;
            let mine = match organizer.as_deref() {
                Some(name) => events.by_organizer(name)?,
                None => Vec::new(),
            };

            let mut markup = String::from("<section>\n<h1>Event Planning</h1>\n");
            markup.push_str("<p>Press 'n' to plan an event, 'p' to postpone your latest one by a week, 'x' to cancel it.</p>\n");
            markup.push_str("<h2>My events</h2>\n");
            if mine.is_empty() {
                markup.push_str("<p>You have not planned any events yet.</p>\n");
            } else {
                markup.push_str(&event_items(&mine, organizer.as_deref()));
            }
            markup.push_str("<h2>All planned events</h2>\n");
            markup.push_str(&event_items(&all, organizer.as_deref()));
            markup.push_str("</section>\n");
            Ok::<_, ProducerError>(markup)
        })
    }

    fn init(&self, _event: &NavigationEvent) {
        let organizer = self.auth.current_user().map(|user| user.display_name).unwrap_or_default();
        let mine = self.events.by_organizer(&organizer).map(|events| events.len()).unwrap_or_default();
        tracing::debug!(organizer = %organizer, events = mine, "event planning ready");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SEED_EVENTS, USERS_JSON};
    use connect_router::Storage;

    fn signed_in_as(username: &str, password: &str) -> Arc<AuthService> {
        let auth = AuthService::new(Storage::new(), Storage::new()).with_directory_json(USERS_JSON).unwrap();
        let user = auth.authenticate(username, password).unwrap();
        auth.login(&user).unwrap();
        Arc::new(auth)
    }

    #[tokio::test]
    async fn test_planning_page_separates_own_events() {
        let events = EventStore::with_events(serde_json::from_str(SEED_EVENTS).unwrap());
        let page = EventPlanningPage::new(signed_in_as("volunteer", "helping-hands"), events);

        let markup = page.render().await.unwrap();
        let (mine, all) = markup.split_once("All planned events").unwrap();

        assert!(mine.contains("Holiday Meal Service"));
        assert!(!mine.contains("Riverside Clean-up"));
        assert!(all.contains("Riverside Clean-up"));
        assert!(all.contains("Vera Volunteer (yours)"));
    }

    #[tokio::test]
    async fn test_statistics_count_organized_events() {
        let events = EventStore::with_events(serde_json::from_str(SEED_EVENTS).unwrap());
        let page = StatisticsPage::new(signed_in_as("organizer", "plan-ahead"), events);

        let markup = page.render().await.unwrap();

        assert!(markup.contains("Welcome back, Ollie Organizer."));
        assert!(markup.contains("Events on the calendar: 3"));
        assert!(markup.contains("Events you organize: 2"));
    }
}
