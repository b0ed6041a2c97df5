use snafu::prelude::*;

/// Boxed error returned by content producers.
pub type ProducerError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to lock shared state: poisoned"))]
    LockPoisoned,

    #[snafu(display("Route table has no routes"))]
    EmptyRouteTable,

    #[snafu(display("Route '{path}' is registered more than once"))]
    DuplicateRoute { path: String },

    #[snafu(display("Route path '{path}' must begin with '/'"))]
    InvalidRoutePath { path: String },

    #[snafu(display("Failed to render '{path}': {source}"))]
    RenderFailure { path: String, source: ProducerError },

    #[snafu(display("Invalid router configuration: {source}"))]
    Config { source: serde_json::Error },

    #[snafu(display("Stored value under '{key}' is malformed: {source}"))]
    StorageFormat { key: String, source: serde_json::Error },

    #[snafu(display("Invalid form: {}", crate::validate::summary(errors)))]
    InvalidForm { errors: Vec<crate::validate::FieldError> },

    #[snafu(display("No {kind} with id '{id}'"))]
    RecordNotFound { kind: &'static str, id: String },

    #[snafu(display("Username '{username}' is already registered"))]
    UsernameTaken { username: String },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
