pub mod account;
pub mod contact;
pub mod content;
pub mod events;

use connect_router::{AuthService, ContactStore, EventStore, Page, PageRegistry};
use std::sync::Arc;

use account::{EventPlanningPage, StatisticsPage};
use contact::ContactPage;
use content::ContentPage;
use events::{EventsPage, NewsPage};

/// Every page of the site, in navigation order.
pub fn registry(auth: Arc<AuthService>, events: EventStore, contacts: ContactStore) -> PageRegistry {
    let home: Arc<dyn Page> = Arc::new(ContentPage::new(content::HOME));
    PageRegistry::new()
        .shared("/", "Home", home.clone())
        .shared("/home", "Home", home)
        .page("/about", "About", ContentPage::new(content::ABOUT))
        .page("/contact", "Contact Us", ContactPage::new(contacts))
        .page("/events", "Events", EventsPage::new(events.clone()))
        .page("/opportunities", "Volunteer Opportunities", ContentPage::new(content::OPPORTUNITIES).with_latency(1500))
        .page("/news", "Community News", NewsPage)
        .page("/login", "Login", ContentPage::new(content::LOGIN))
        .page("/register", "Register", ContentPage::new(content::REGISTER))
        .protected("/statistics", "Statistics", StatisticsPage::new(auth.clone(), events.clone()))
        .protected("/event-planning", "Event Planning", EventPlanningPage::new(auth, events))
        .page("/privacy-policy", "Privacy Policy", ContentPage::new(content::PRIVACY_POLICY))
        .page("/terms-of-service", "Terms of Service", ContentPage::new(content::TERMS_OF_SERVICE))
        .page("/404", "Page Not Found", ContentPage::new(content::NOT_FOUND))
}
