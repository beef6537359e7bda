//! `Set-Cookie` rendering for the session id.
//!
//! The HTTP layer owns the request/response lifecycle; this module only
//! produces the header value so the id reaches the client with the right
//! attributes, and pins down the single commit point for fresh sessions.

use tracing::debug;

use crate::session::{Session, SessionStore};

/// Cookie name carrying the session id.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Render the `Set-Cookie` value for a session.
///
/// The cookie is scoped as tightly as the session semantics allow:
/// `Secure`, `HttpOnly`, `SameSite=Strict`, expiring with the session.
#[must_use]
pub fn session_cookie(session: &Session) -> String {
    let expires = session
        .expires_at()
        .format("%a, %d %b %Y %H:%M:%S GMT");
    format!(
        "{SESSION_COOKIE_NAME}={}; Path=/; Secure; HttpOnly; SameSite=Strict; Expires={expires}",
        session.id()
    )
}

/// Issue the cookie for a fresh session and mark it committed, in one step.
///
/// Returns `None` when the session was committed before; callers can blindly
/// invoke this per response without double-issuing the cookie.
pub fn commit_session_cookie(store: &dyn SessionStore, session: &Session) -> Option<String> {
    if !session.fresh() {
        return None;
    }
    let cookie = session_cookie(session);
    store.mark_committed(session);
    debug!("Setting cookie for session {}", session.id());
    Some(cookie)
}
