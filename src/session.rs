//! Server-side sessions keyed by an opaque id.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rand::{RngCore, rngs::OsRng};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::error::Error;

/// Session id entropy before hex encoding (32 bytes = 64 hex chars).
const SESSION_ID_BYTES: usize = 32;

struct SessionState {
    values: HashMap<String, Value>,
    fresh: bool,
}

/// Per-client state tracked across requests.
///
/// The id and expiry are fixed at creation; `values` and the freshness flag
/// are the only mutable parts. `fresh` is true until the id has been
/// committed to the client once, and never reverts.
pub struct Session {
    id: String,
    expires_at: DateTime<Utc>,
    state: RwLock<SessionState>,
}

impl Session {
    /// Create a session with a freshly generated id expiring `ttl_seconds`
    /// from now.
    ///
    /// # Errors
    /// Returns an error if the OS random source fails.
    pub fn new(ttl_seconds: i64) -> Result<Self, Error> {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        OsRng.try_fill_bytes(&mut bytes)?;
        Ok(Self {
            id: hex::encode(bytes),
            expires_at: Utc::now() + Duration::seconds(ttl_seconds),
            state: RwLock::new(SessionState {
                values: HashMap::new(),
                fresh: true,
            }),
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Expiry is evaluated lazily; nothing evicts a session before lookup.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Whether the session id has yet to be committed to the client.
    #[must_use]
    pub fn fresh(&self) -> bool {
        self.state.read().fresh
    }

    /// Record that the id has been committed to the client. Idempotent;
    /// the flag never flips back.
    pub fn mark_committed(&self) {
        self.state.write().fresh = false;
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.read().values.get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.state.read().values.contains_key(key)
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.state.write().values.insert(key.into(), value);
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.state.write().values.remove(key)
    }
}

/// Store resolving presented session ids to live sessions.
///
/// Like [`crate::credentials::CredentialStore`], this is a seam for swapping
/// in a persistent backend; the in-memory implementation covers tests and
/// single-process use.
pub trait SessionStore: Send + Sync {
    /// Resolve a presented id, or create a new session when the id is
    /// absent, unknown, or expired. Expired sessions degrade to creation
    /// rather than surfacing an error.
    ///
    /// # Errors
    /// Returns an error only if creating a replacement session fails.
    fn get_or_create(&self, session_id: Option<&str>) -> Result<Arc<Session>, Error>;

    /// Mark the session committed after its id has been written to a
    /// response. Idempotent.
    fn mark_committed(&self, session: &Session);
}

/// Process-local session store.
///
/// Expired sessions are dropped when their id is next presented; abandoned
/// ids are never purged, an accepted cost of the in-memory design.
pub struct InMemorySessionStore {
    ttl_seconds: i64,
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            ttl_seconds: config.session_ttl_seconds(),
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&self, session_id: Option<&str>) -> Result<Arc<Session>, Error> {
        let mut sessions = self.sessions.write();

        if let Some(sid) = session_id {
            let stale = match sessions.get(sid) {
                Some(session) if session.is_expired() => true,
                Some(session) => {
                    debug!("Reusing existing session {sid}");
                    return Ok(Arc::clone(session));
                }
                None => false,
            };
            if stale {
                sessions.remove(sid);
                info!("Session {sid} expired, replacing it");
            }
        }

        let session = Arc::new(Session::new(self.ttl_seconds)?);
        info!("Created new session {}", session.id());
        sessions.insert(session.id().to_string(), Arc::clone(&session));
        Ok(session)
    }

    fn mark_committed(&self, session: &Session) {
        session.mark_committed();
    }
}
