//! # Ensaluti (Session-Backed Authentication Core)
//!
//! `ensaluti` pairs a server-side session store with salted password
//! verification and the state transitions that connect them. It is the core
//! an interactive web UI hangs its login flow on; the HTTP layer stays
//! outside and talks to it through a small surface:
//!
//! - The request layer resolves an optional cookie value into a session via
//!   [`SessionStore::get_or_create`].
//! - A [`SessionAuthenticator`] binds that session to a
//!   [`CredentialStore`] and exposes `authenticate` / `logout` /
//!   `is_authenticated`, plus change notification for UI state.
//! - The response layer issues the session cookie for fresh sessions via
//!   [`cookie::commit_session_cookie`], which also closes the one-way
//!   freshness window.
//!
//! ## Credentials
//!
//! Passwords are stored as `salt || derived-key` records: a 256-bit random
//! salt and a PBKDF2-HMAC-SHA512 key, both hex-encoded. Verification
//! re-derives with the stored salt and compares in constant time. Unknown
//! users and bad passwords are indistinguishable to callers; a corrupt
//! stored record is logged and reported as the same plain denial.
//!
//! ## Stores
//!
//! [`CredentialStore`] and [`SessionStore`] are traits so deployments can
//! plug in persistent backends; the bundled in-memory implementations
//! satisfy the same contracts for tests and single-process use. Session
//! expiry is lazy: an expired id degrades to a new session on lookup.

pub mod authenticator;
pub mod config;
pub mod cookie;
pub mod credentials;
pub mod error;
pub mod hasher;
pub mod session;

pub use authenticator::{SESSION_USERNAME_KEY, SessionAuthenticator};
pub use config::AuthConfig;
pub use cookie::SESSION_COOKIE_NAME;
pub use credentials::{CredentialStore, InMemoryCredentialStore, User};
pub use error::Error;
pub use hasher::PasswordHasher;
pub use session::{InMemorySessionStore, Session, SessionStore};
