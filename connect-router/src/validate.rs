//! Form checks shared by registration, event planning and contacts.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

// Something, an @, something, a dot, something. No whitespace anywhere.
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_REGEX: invalid regex pattern"));

/// A problem with one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors joined for display.
pub fn summary(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Collects field errors in form order.
#[derive(Debug, Default)]
pub(crate) struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Require a non-blank value. Returns whether it was present.
    pub(crate) fn required(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.fail(field, message);
            return false;
        }
        true
    }

    /// Require a non-blank value of at least `min` characters.
    pub(crate) fn min_len(&mut self, field: &'static str, value: &str, min: usize, label: &str) {
        if self.required(field, value, &format!("{label} is required")) && value.trim().chars().count() < min {
            self.fail(field, format!("{label} must be at least {min} characters"));
        }
    }

    pub(crate) fn email(&mut self, field: &'static str, value: &str) {
        if self.required(field, value, "Email address is required") && !is_valid_email(value.trim()) {
            self.fail(field, "Please enter a valid email address");
        }
    }

    pub(crate) fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// `Ok` when nothing failed, otherwise [`Error::InvalidForm`](crate::Error::InvalidForm).
    pub(crate) fn finish(self) -> crate::Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(crate::Error::InvalidForm { errors: self.errors })
        }
    }
}
