//! Per-session authentication state and change notification.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::AuthConfig;
use crate::credentials::CredentialStore;
use crate::error::Error;
use crate::hasher::PasswordHasher;
use crate::session::Session;

/// Session value key holding the authenticated username.
pub const SESSION_USERNAME_KEY: &str = "username";

/// Callback invoked with the new authentication state on every transition.
pub type ChangeHandler = Box<dyn Fn(bool) + Send + Sync>;

/// Mediates authentication state for exactly one session.
///
/// The session itself is the source of truth: a session is authenticated iff
/// it carries the username key. The authenticator only reads the credential
/// store, never mutates it.
pub struct SessionAuthenticator {
    session: Arc<Session>,
    credentials: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    change_handlers: Vec<ChangeHandler>,
}

impl SessionAuthenticator {
    #[must_use]
    pub fn new(
        session: Arc<Session>,
        credentials: Arc<dyn CredentialStore>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            session,
            credentials,
            hasher: PasswordHasher::new(config),
            change_handlers: Vec::new(),
        }
    }

    /// Authenticate the session via username and password.
    ///
    /// Two outcomes only: granted or denied. Unknown users, bad passwords,
    /// and corrupt stored records all read as a plain denial to the caller;
    /// corruption is additionally logged. On success the username is stored
    /// in the session and handlers fire with `true`.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        let Some(user) = self.credentials.lookup(username) else {
            debug!("Login denied for session {}", self.session.id());
            return false;
        };

        match self.hasher.verify(&user.password_hash, password) {
            Ok(true) => {}
            Ok(false) => {
                debug!("Login denied for session {}", self.session.id());
                return false;
            }
            Err(err @ Error::InvalidRecord) => {
                // Storage corruption: loud in the logs, silent to the client.
                error!("Rejected credential record for {username}: {err}");
                return false;
            }
            Err(err) => {
                error!("Password verification failed for {username}: {err}");
                return false;
            }
        }

        self.session
            .insert(SESSION_USERNAME_KEY, username.to_string().into());
        info!(
            "Session {} authenticated as {username}",
            self.session.id()
        );
        self.notify(true);
        true
    }

    /// De-authenticate the session by dropping the username from its values.
    /// Idempotent; handlers fire with `false` either way.
    pub fn logout(&self) {
        self.session.remove(SESSION_USERNAME_KEY);
        info!("Session {} logged out", self.session.id());
        self.notify(false);
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.contains(SESSION_USERNAME_KEY)
    }

    #[must_use]
    pub fn current_user(&self) -> Option<String> {
        self.session
            .get(SESSION_USERNAME_KEY)
            .and_then(|value| value.as_str().map(ToString::to_string))
    }

    /// Append a change handler. Handlers run synchronously, in registration
    /// order, after the session state has already been updated.
    pub fn register_handler(&mut self, handler: impl Fn(bool) + Send + Sync + 'static) {
        self.change_handlers.push(Box::new(handler));
    }

    fn notify(&self, authenticated: bool) {
        for handler in &self.change_handlers {
            handler(authenticated);
        }
    }
}
