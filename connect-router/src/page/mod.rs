//! Page collaborators.
//!
//! A page renders its markup on demand and initializes itself once that
//! markup is showing. `PageRegistry` turns a set of pages into a route table
//! and dispatches `init` from the router's navigation events.

pub mod traits;

pub use traits::{Page, PageRegistry};
