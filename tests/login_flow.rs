//! End-to-end login flow as the HTTP layer would drive it: resolve a
//! session from an (absent) cookie, commit the cookie once, authenticate,
//! and log out again.

use ensaluti::{
    AuthConfig, CredentialStore, InMemoryCredentialStore, InMemorySessionStore,
    SESSION_COOKIE_NAME, SessionAuthenticator, SessionStore, cookie,
};
use parking_lot::Mutex;
use std::sync::Arc;

fn test_config() -> AuthConfig {
    AuthConfig::new().with_hash_iterations(1_000)
}

#[test]
fn full_login_logout_flow() {
    let config = test_config();
    let credentials: Arc<dyn CredentialStore> = Arc::new(
        InMemoryCredentialStore::seeded(&config, &[("user1", "user1"), ("user2", "user2")])
            .unwrap(),
    );
    let sessions = InMemorySessionStore::new(&config);

    // First request arrives without a cookie: a fresh session is created.
    let session = sessions.get_or_create(None).unwrap();
    assert!(session.fresh());

    // Response side: commit the cookie exactly once.
    let set_cookie = cookie::commit_session_cookie(&sessions, &session).unwrap();
    assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE_NAME}={}", session.id())));
    assert_eq!(cookie::commit_session_cookie(&sessions, &session), None);

    // Next request presents the cookie and resolves the same session.
    let sid = session.id().to_string();
    let session = sessions.get_or_create(Some(&sid)).unwrap();
    assert_eq!(session.id(), sid);
    assert!(!session.fresh());

    // Form submit wires into the authenticator.
    let mut auth =
        SessionAuthenticator::new(Arc::clone(&session), Arc::clone(&credentials), &config);
    let ui_state = Arc::new(Mutex::new(Vec::new()));
    let handler_state = Arc::clone(&ui_state);
    auth.register_handler(move |state| handler_state.lock().push(state));

    assert!(!auth.authenticate("user1", "not-the-password"));
    assert!(!auth.is_authenticated());

    assert!(auth.authenticate("user1", "user1"));
    assert!(auth.is_authenticated());
    assert_eq!(auth.current_user(), Some("user1".to_string()));

    // A later request for the same session sees the authenticated state.
    let later = sessions.get_or_create(Some(&sid)).unwrap();
    let later_auth = SessionAuthenticator::new(later, credentials, &config);
    assert!(later_auth.is_authenticated());
    assert_eq!(later_auth.current_user(), Some("user1".to_string()));

    auth.logout();
    assert!(!auth.is_authenticated());
    assert!(!later_auth.is_authenticated());

    // The UI handler saw exactly the successful transitions.
    assert_eq!(*ui_state.lock(), vec![true, false]);
}

#[test]
fn expired_session_restarts_the_flow() {
    let config = test_config().with_session_ttl_seconds(-1);
    let sessions = InMemorySessionStore::new(&config);

    let stale = sessions.get_or_create(None).unwrap();
    let sid = stale.id().to_string();

    // Presenting an expired id behaves like presenting none at all.
    let replacement = sessions.get_or_create(Some(&sid)).unwrap();
    assert_ne!(replacement.id(), sid);
    assert!(replacement.fresh());
    assert!(replacement.get(ensaluti::SESSION_USERNAME_KEY).is_none());
}
