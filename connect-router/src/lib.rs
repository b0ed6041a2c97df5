pub mod application;
pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod page;
pub mod records;
pub mod router;
pub mod session;
pub mod state;
pub mod surface;
pub mod validate;

pub use error::{Error, ProducerError, Result};

// Re-export common types for convenience
pub use application::{Application, Location};
pub use auth::{AuthEvent, AuthService, RegistrationForm, User};
pub use config::{RenderPolicy, RouterConfig};
pub use events::{ListenerId, NavigationEvent};
pub use page::{Page, PageRegistry};
pub use records::{Contact, ContactDetails, ContactStore, EventDraft, EventStore, EventUpdate, NewEvent, PlannedEvent};
pub use router::{
    ContentFuture, ContentSink, NavigationOutcome, Navigator, Route, RouteTable, Router, RouterState, SessionGuard,
};
pub use session::Storage;
pub use state::Entity;
pub use surface::{Document, DocumentState, NavLink};
pub use validate::FieldError;
