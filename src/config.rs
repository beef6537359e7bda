//! Tunables for the authentication core.

const DEFAULT_SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_HASH_ITERATIONS: u32 = 100_000;

/// Configuration shared by the stores and the password hasher.
///
/// Defaults are production values: a one-week session TTL and an iteration
/// count slow enough to resist offline brute force. Tests lower the
/// iteration count to keep PBKDF2 cheap.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    session_ttl_seconds: i64,
    hash_iterations: u32,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            hash_iterations: DEFAULT_HASH_ITERATIONS,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_hash_iterations(mut self, iterations: u32) -> Self {
        self.hash_iterations = iterations;
        self
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn hash_iterations(&self) -> u32 {
        self.hash_iterations
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}
