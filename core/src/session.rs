//! Session ownership: login, registration, logout, persistence.
//!
//! # Design
//! `SessionManager` is the single owner of the authentication credential.
//! The persisted token and display name are loaded once at construction, so
//! `current()` is answerable before any other component initializes. Every
//! mutation saves or clears the store explicitly. A failed login or
//! registration leaves an existing session untouched; the failure is also
//! recorded in `last_error` for the presentation layer to read.

use log::{debug, warn};

use crate::api::ApiClient;
use crate::error::{ApiError, AuthError, ValidationError};
use crate::http::Transport;
use crate::store::KeyValueStore;
use crate::types::{Credentials, Session};

const TOKEN_KEY: &str = "token";
const USERNAME_KEY: &str = "username";

const MIN_USERNAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 6;

/// Owns the authenticated session and its persistence.
pub struct SessionManager {
    api: ApiClient,
    transport: Box<dyn Transport>,
    store: Box<dyn KeyValueStore>,
    session: Option<Session>,
    last_error: Option<AuthError>,
}

impl SessionManager {
    /// Build a manager, restoring any persisted session from the store.
    pub fn new(
        api: ApiClient,
        transport: Box<dyn Transport>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let session = match (store.get(TOKEN_KEY), store.get(USERNAME_KEY)) {
            (Some(token), display_name) if !token.is_empty() => Some(Session {
                token,
                display_name: display_name.unwrap_or_default(),
            }),
            _ => None,
        };
        Self {
            api,
            transport,
            store,
            session,
            last_error: None,
        }
    }

    /// Authenticate against the service, persisting the session on success.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Session, AuthError> {
        self.last_error = None;
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.sign_in(&credentials)
    }

    /// Create a new account, then sign in with the same credentials.
    ///
    /// Credentials the service would never accept are rejected locally,
    /// before any round trip. A failed registration short-circuits; login is
    /// only attempted once the account exists.
    pub fn register(&mut self, username: &str, password: &str) -> Result<Session, AuthError> {
        self.last_error = None;
        if let Err(violation) = validate_credentials(username, password) {
            return Err(self.fail(violation.into()));
        }
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        if let Err(err) = self.run_register(&credentials) {
            warn!("registration failed: {err}");
            return Err(self.fail(AuthError::Failed(err.detail())));
        }
        self.sign_in(&credentials)
    }

    /// Drop the session, in memory and in the store. Idempotent; store
    /// failures are logged and swallowed so logout itself cannot fail.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.remove(TOKEN_KEY) {
            warn!("failed to clear persisted token: {err}");
        }
        if let Err(err) = self.store.remove(USERNAME_KEY) {
            warn!("failed to clear persisted display name: {err}");
        }
        self.session = None;
        self.last_error = None;
        debug!("logged out");
    }

    /// The current session, if any. Synchronous; no network call.
    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(Session::is_authenticated)
    }

    /// The bearer token of the current session.
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// The failure recorded by the most recent operation, if any.
    pub fn last_error(&self) -> Option<&AuthError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    fn sign_in(&mut self, credentials: &Credentials) -> Result<Session, AuthError> {
        match self.run_login(credentials) {
            Ok(session) => {
                self.persist(&session);
                self.session = Some(session.clone());
                debug!("signed in as {}", session.display_name);
                Ok(session)
            }
            Err(err) => {
                warn!("login failed: {err}");
                Err(self.fail(AuthError::Failed(err.detail())))
            }
        }
    }

    fn run_register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let request = self.api.build_register(credentials)?;
        let response = self.transport.execute(&request)?;
        self.api.parse_register(response)
    }

    fn run_login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let request = self.api.build_login(credentials)?;
        let response = self.transport.execute(&request)?;
        let login = self.api.parse_login(response)?;
        Ok(Session {
            token: login.token,
            display_name: login.username,
        })
    }

    fn persist(&mut self, session: &Session) {
        if let Err(err) = self.store.set(TOKEN_KEY, &session.token) {
            warn!("failed to persist token: {err}");
        }
        if let Err(err) = self.store.set(USERNAME_KEY, &session.display_name) {
            warn!("failed to persist display name: {err}");
        }
    }

    fn fail(&mut self, err: AuthError) -> AuthError {
        self.last_error = Some(err.clone());
        err
    }
}

/// Reject credentials the service would never accept, before any round trip.
fn validate_credentials(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.chars().count() < MIN_USERNAME_CHARS {
        return Err(ValidationError::UsernameTooShort);
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}
