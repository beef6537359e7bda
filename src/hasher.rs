//! Salted password hashing with PBKDF2-HMAC-SHA512.

use rand::{RngCore, rngs::OsRng};
use sha2::Sha512;

use crate::config::AuthConfig;
use crate::error::Error;

/// Salt entropy drawn from the OS CSPRNG (256 bits).
const SALT_BYTES: usize = 32;

/// Hex-encoded salt length; the record is split at this boundary during verify.
const SALT_HEX_LEN: usize = SALT_BYTES * 2;

/// SHA-512 output size; the stored key must decode to exactly this.
const DERIVED_KEY_BYTES: usize = 64;

/// Derives and verifies credential records of the form `salt_hex || key_hex`.
///
/// The algorithm is fixed (PBKDF2-HMAC-SHA512); only the iteration count is
/// configurable, and both sides of a verify must use the same count.
#[derive(Clone, Debug)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            iterations: config.hash_iterations(),
        }
    }

    /// Hash a password for storing.
    ///
    /// Generates a fresh salt, so two calls with the same password produce
    /// different records.
    ///
    /// # Errors
    /// Returns an error if the OS random source fails.
    pub fn hash(&self, password: &str) -> Result<String, Error> {
        let mut salt_bytes = [0u8; SALT_BYTES];
        OsRng.try_fill_bytes(&mut salt_bytes)?;
        let salt = hex::encode(salt_bytes);
        let key = self.derive(password, &salt);
        Ok(format!("{salt}{}", hex::encode(key)))
    }

    /// Verify a stored record against a candidate password.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRecord`] when the record is too short to hold
    /// a full salt or the stored key is not valid hex of the expected length.
    pub fn verify(&self, record: &str, candidate_password: &str) -> Result<bool, Error> {
        if !record.is_ascii() || record.len() <= SALT_HEX_LEN {
            return Err(Error::InvalidRecord);
        }
        let (salt, stored_hex) = record.split_at(SALT_HEX_LEN);
        let stored = hex::decode(stored_hex).map_err(|_| Error::InvalidRecord)?;
        if stored.len() != DERIVED_KEY_BYTES {
            return Err(Error::InvalidRecord);
        }
        let derived = self.derive(candidate_password, salt);
        Ok(constant_time_eq(&derived, &stored))
    }

    /// The salt participates as its hex text, matching what `hash` stores.
    fn derive(&self, password: &str, salt: &str) -> [u8; DERIVED_KEY_BYTES] {
        let mut key = [0u8; DERIVED_KEY_BYTES];
        pbkdf2::pbkdf2_hmac::<Sha512>(
            password.as_bytes(),
            salt.as_bytes(),
            self.iterations,
            &mut key,
        );
        key
    }
}

/// Constant-time byte comparison to avoid a timing oracle on verify.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
