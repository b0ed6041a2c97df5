//! Authentication backed by [`Storage`].
//!
//! Registered users live in local storage under `registeredUsers`; the signed-in
//! user lives in session storage under `user`. A session is active exactly when
//! that session item exists.

use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tokio::sync::broadcast;

use crate::error::{ConfigSnafu, Error, StorageFormatSnafu};
use crate::router::{Navigator, SessionGuard};
use crate::session::Storage;
use crate::validate::{Checks, FieldError};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

/// Session storage key holding the signed-in user.
pub const SESSION_USER_KEY: &str = "user";
/// Local storage key holding users registered in this browser.
pub const REGISTERED_USERS_KEY: &str = "registeredUsers";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub display_name: String,
    pub email_address: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl User {
    pub fn new(
        display_name: impl Into<String>,
        email_address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            email_address: email_address.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Copy without the password, as stored in the session.
    pub fn without_password(&self) -> Self {
        Self { password: String::new(), ..self.clone() }
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    fn check(&self) -> crate::Result<()> {
        let mut checks = Checks::new();
        checks.required("displayName", &self.display_name, "Display name is required");
        checks.email("emailAddress", &self.email_address);
        checks.min_len("username", &self.username, MIN_USERNAME_LEN, "Username");
        checks.min_len("password", &self.password, MIN_PASSWORD_LEN, "Password");
        checks.finish()
    }
}

/// The registration form as typed, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Field errors in form order; empty when the form can be submitted.
    pub fn validate(&self) -> Vec<FieldError> {
        self.check().into_errors()
    }

    fn check(&self) -> Checks {
        let mut checks = Checks::new();
        checks.required("firstName", &self.first_name, "First name is required");
        checks.required("lastName", &self.last_name, "Last name is required");
        checks.email("emailAddress", &self.email_address);
        checks.min_len("username", &self.username, MIN_USERNAME_LEN, "Username");
        checks.min_len("password", &self.password, MIN_PASSWORD_LEN, "Password");
        if checks.required("confirmPassword", &self.confirm_password, "Please confirm your password")
            && self.password.trim() != self.confirm_password.trim()
        {
            checks.fail("confirmPassword", "Passwords do not match");
        }
        checks
    }

    /// Validate and build the user, named "First Last".
    pub fn into_user(self) -> crate::Result<User> {
        self.check().finish()?;
        Ok(User::new(
            format!("{} {}", self.first_name.trim(), self.last_name.trim()),
            self.email_address.trim(),
            self.username.trim(),
            self.password.trim(),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct Directory {
    users: Vec<User>,
}

/// Session changes, for hosts that redraw their header on login/logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    Login(User),
    Logout,
}

pub struct AuthService {
    session: Storage,
    local: Storage,
    directory: Vec<User>,
    events: broadcast::Sender<AuthEvent>,
}

impl AuthService {
    pub fn new(session: Storage, local: Storage) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { session, local, directory: Vec::new(), events }
    }

    /// Use a fixed set of known users, checked after the registered ones.
    pub fn with_directory(mut self, users: Vec<User>) -> Self {
        self.directory = users;
        self
    }

    /// Parse the user directory from `{"users": [...]}` JSON.
    pub fn with_directory_json(self, json: &str) -> crate::Result<Self> {
        let directory: Directory = serde_json::from_str(json).context(ConfigSnafu)?;
        Ok(self.with_directory(directory.users))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    fn registered_users(&self) -> crate::Result<Vec<User>> {
        match self.local.get_item(REGISTERED_USERS_KEY)? {
            Some(json) => serde_json::from_str(&json).context(StorageFormatSnafu { key: REGISTERED_USERS_KEY }),
            None => Ok(Vec::new()),
        }
    }

    /// Find a user with exactly this username and password.
    ///
    /// Registered users are checked before the directory. Unreadable storage
    /// counts as no match.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        let registered = self.registered_users().unwrap_or_else(|e| {
            tracing::error!(error = %e, "ignoring registered users");
            Vec::new()
        });
        let found = registered
            .iter()
            .chain(self.directory.iter())
            .find(|user| user.matches(username, password))
            .cloned();
        if found.is_none() {
            tracing::debug!(username, "authentication failed, no matching user");
        }
        found
    }

    /// Add a user to local storage.
    ///
    /// The user needs a display name, a valid email address, a username of at
    /// least three characters and a password of at least six.
    pub fn register(&self, user: User) -> crate::Result<()> {
        user.check()?;
        let mut registered = self.registered_users()?;
        let taken = registered.iter().chain(self.directory.iter()).any(|u| u.username == user.username);
        if taken {
            return Err(Error::UsernameTaken { username: user.username });
        }
        tracing::info!(username = %user.username, "registered user");
        registered.push(user);
        let json = serde_json::to_string(&registered).context(StorageFormatSnafu { key: REGISTERED_USERS_KEY })?;
        self.local.set_item(REGISTERED_USERS_KEY, json)
    }

    /// Validate a submitted registration form and register its user.
    pub fn register_form(&self, form: RegistrationForm) -> crate::Result<User> {
        let user = form.into_user()?;
        self.register(user.clone())?;
        Ok(user)
    }

    /// Start a session for `user`. The password is not stored.
    pub fn login(&self, user: &User) -> crate::Result<()> {
        let stored = user.without_password();
        let json = serde_json::to_string(&stored).context(StorageFormatSnafu { key: SESSION_USER_KEY })?;
        self.session.set_item(SESSION_USER_KEY, json)?;
        tracing::info!(username = %stored.username, "user logged in");
        let _ = self.events.send(AuthEvent::Login(stored));
        Ok(())
    }

    /// End the session and return to the home page.
    pub fn logout(&self, navigator: &dyn Navigator) -> crate::Result<()> {
        self.session.remove_item(SESSION_USER_KEY)?;
        tracing::info!("user logged out");
        let _ = self.events.send(AuthEvent::Logout);
        navigator.navigate("/home");
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.session.get_item(SESSION_USER_KEY), Ok(Some(_)))
    }

    /// The signed-in user, or `None` when signed out or the session item is unreadable.
    pub fn current_user(&self) -> Option<User> {
        let json = self.session.get_item(SESSION_USER_KEY).ok()??;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::error!(error = %e, "failed to parse session user");
                None
            }
        }
    }
}

impl SessionGuard for AuthService {
    fn is_authenticated(&self) -> bool {
        self.is_logged_in()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        requests: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn current_path(&self) -> String {
            self.requests.lock().unwrap().last().cloned().unwrap_or_else(|| "/".to_string())
        }
        fn navigate(&self, path: &str) {
            self.requests.lock().unwrap().push(path.to_string());
        }
    }

    fn service() -> AuthService {
        AuthService::new(Storage::new(), Storage::new())
            .with_directory_json(
                r#"{"users": [{"DisplayName": "Admin", "EmailAddress": "admin@example.org", "Username": "admin", "Password": "secret"}]}"#,
            )
            .unwrap()
    }

    #[test]
    fn test_authenticate_against_directory() {
        let auth = service();
        let user = auth.authenticate("admin", "secret").expect("known user");
        assert_eq!(user.display_name, "Admin");
        assert!(auth.authenticate("admin", "wrong").is_none());
        assert!(auth.authenticate("nobody", "secret").is_none());
    }

    #[test]
    fn test_registered_users_are_checked_first() {
        let auth = service();
        auth.register(User::new("Local", "l@example.org", "local", "local-pass")).unwrap();
        assert_eq!(auth.authenticate("local", "local-pass").map(|u| u.display_name), Some("Local".to_string()));
    }

    #[test]
    fn test_register_rejects_taken_username() {
        let auth = service();
        let err = auth.register(User::new("Other", "o@example.org", "admin", "password")).unwrap_err();
        assert!(matches!(err, Error::UsernameTaken { username } if username == "admin"));
    }

    #[test]
    fn test_register_rejects_blank_credentials() {
        let auth = service();
        let err = auth.register(User::new("Blank", "b@example.org", "", "")).unwrap_err();
        let errors = match err {
            Error::InvalidForm { errors } => errors,
            other => panic!("expected form errors, got {other:?}"),
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["username", "password"]);
        assert!(auth.authenticate("", "").is_none());
    }

    fn form() -> RegistrationForm {
        RegistrationForm {
            first_name: "Gwen".to_string(),
            last_name: "Guest".to_string(),
            email_address: "gwen@example.org".to_string(),
            username: "gwen".to_string(),
            password: "open-sesame".to_string(),
            confirm_password: "open-sesame".to_string(),
        }
    }

    #[test]
    fn test_registration_form_messages() {
        assert!(form().validate().is_empty());

        let errors = RegistrationForm {
            first_name: " ".to_string(),
            email_address: "gwen@example".to_string(),
            username: "gw".to_string(),
            password: "short".to_string(),
            confirm_password: "shorter".to_string(),
            ..form()
        }
        .validate();

        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "First name is required",
                "Please enter a valid email address",
                "Username must be at least 3 characters",
                "Password must be at least 6 characters",
                "Passwords do not match",
            ]
        );
        let missing = RegistrationForm { confirm_password: String::new(), ..form() }.validate();
        assert_eq!(missing, vec![FieldError::new("confirmPassword", "Please confirm your password")]);
    }

    #[test]
    fn test_register_form_creates_user() {
        let auth = service();
        let user = auth.register_form(form()).unwrap();
        assert_eq!(user.display_name, "Gwen Guest");
        assert_eq!(auth.authenticate("gwen", "open-sesame"), Some(user));

        let mismatch = RegistrationForm { username: "gwen2".to_string(), confirm_password: "nope".to_string(), ..form() };
        assert!(matches!(auth.register_form(mismatch), Err(Error::InvalidForm { .. })));
        assert!(auth.authenticate("gwen2", "open-sesame").is_none());
    }

    #[test]
    fn test_corrupt_registered_users_do_not_block_directory() {
        let local = Storage::new();
        local.set_item(REGISTERED_USERS_KEY, "not json").unwrap();
        let auth = AuthService::new(Storage::new(), local)
            .with_directory(vec![User::new("Admin", "a@example.org", "admin", "secret")]);
        assert!(auth.authenticate("admin", "secret").is_some());
    }

    #[test]
    fn test_login_stores_user_without_password() {
        let session = Storage::new();
        let auth = AuthService::new(session.clone(), Storage::new());
        let mut events = auth.subscribe();
        assert!(!auth.is_authenticated());

        auth.login(&User::new("Admin", "a@example.org", "admin", "secret")).unwrap();

        assert!(auth.is_authenticated());
        let stored = session.get_item(SESSION_USER_KEY).unwrap().unwrap();
        assert!(!stored.contains("Password"));
        assert_eq!(auth.current_user().map(|u| u.username), Some("admin".to_string()));
        assert!(matches!(events.try_recv(), Ok(AuthEvent::Login(user)) if user.password.is_empty()));
    }

    #[test]
    fn test_logout_clears_session_and_goes_home() {
        let auth = service();
        let navigator = RecordingNavigator::default();
        let user = auth.authenticate("admin", "secret").unwrap();
        auth.login(&user).unwrap();
        let mut events = auth.subscribe();

        auth.logout(&navigator).unwrap();

        assert!(!auth.is_logged_in());
        assert!(auth.current_user().is_none());
        assert_eq!(*navigator.requests.lock().unwrap(), vec!["/home"]);
        assert_eq!(events.try_recv().unwrap(), AuthEvent::Logout);
    }

    #[test]
    fn test_unreadable_session_user() {
        let session = Storage::new();
        session.set_item(SESSION_USER_KEY, "garbage").unwrap();
        let auth = AuthService::new(session, Storage::new());
        assert!(auth.is_logged_in());
        assert!(auth.current_user().is_none());
    }
}
