//! Router module.
//!
//! Provides the route table, the `Router` state machine and the capabilities
//! it is wired to.

pub mod core;
pub mod table;
pub mod traits;

pub use self::core::{NavigationOutcome, Router, RouterState};
pub use table::{ContentFuture, ContentProducer, Route, RouteTable};
pub use traits::{ContentSink, Navigator, SessionGuard};
