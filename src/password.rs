//! Password hashing and verification.
//!
//! Digests are self-describing: the scheme is embedded in the digest string,
//! so the verifier can keep accepting digests produced before a scheme
//! change. New hashes always use bcrypt; the iterated SHA-512 scheme used by
//! earlier releases is kept as deprecated-but-verifiable.

use std::fmt::Display;

use bcrypt::hash;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::Error;

/// The prefix shared by all bcrypt digest variants ($2a$, $2b$, $2y$).
const BCRYPT_PREFIX: &str = "$2";

/// The prefix of the deprecated iterated SHA-512 scheme,
/// `$sha512$<iterations>$<salt hex>$<digest hex>`.
const LEGACY_SHA512_PREFIX: &str = "$sha512$";

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash a raw password string with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed
    /// to verify a password. A value of at least 12 is recommended. Pass in
    /// [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// The caller is responsible for checking the password against the
    /// format policy first, see [crate::validation::is_strong_password].
    ///
    /// # Errors
    ///
    /// This function will return an [Error::HashingError] if the password
    /// could not be hashed.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        match hash(raw_password, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(e) => Err(Error::HashingError(e.to_string())),
        }
    }

    /// Create a new `PasswordHash` from an existing digest string without
    /// any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid digest.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`,
    /// because an invalid digest may cause incorrect behaviour but will not
    /// affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check that `raw_password` matches the stored digest.
    ///
    /// The hashing scheme is read from the digest itself. A digest that does
    /// not parse as any known scheme fails verification instead of
    /// returning an error.
    pub fn verify(&self, raw_password: &str) -> bool {
        if self.0.starts_with(LEGACY_SHA512_PREFIX) {
            return verify_legacy_sha512(raw_password, &self.0);
        }

        if self.0.starts_with(BCRYPT_PREFIX) {
            return bcrypt::verify(raw_password, &self.0).unwrap_or(false);
        }

        false
    }

    /// The digest as a string slice, e.g. for binding to an SQL parameter.
    pub fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verify a digest in the deprecated `$sha512$` format.
///
/// Any parse failure counts as a verification failure.
fn verify_legacy_sha512(raw_password: &str, digest: &str) -> bool {
    let mut parts = digest.strip_prefix(LEGACY_SHA512_PREFIX).unwrap_or("").split('$');

    let iterations: u32 = match parts.next().and_then(|text| text.parse().ok()) {
        Some(iterations) if iterations > 0 => iterations,
        _ => return false,
    };
    let salt = match parts.next().and_then(decode_hex) {
        Some(salt) => salt,
        None => return false,
    };
    let stored = match parts.next().and_then(decode_hex) {
        Some(stored) => stored,
        None => return false,
    };
    if parts.next().is_some() {
        return false;
    }

    constant_time_eq(&legacy_sha512_digest(raw_password, &salt, iterations), &stored)
}

fn legacy_sha512_digest(raw_password: &str, salt: &[u8], iterations: u32) -> Vec<u8> {
    let mut hasher = Sha512::new();
    hasher.update(salt);
    hasher.update(raw_password.as_bytes());
    let mut digest = hasher.finalize();

    for _ in 1..iterations {
        digest = Sha512::digest(&digest);
    }

    digest.to_vec()
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    left.iter()
        .zip(right.iter())
        .fold(0u8, |acc, (l, r)| acc | (l ^ r))
        == 0
}

fn decode_hex(text: &str) -> Option<Vec<u8>> {
    if text.is_empty() || text.len() % 2 != 0 {
        return None;
    }

    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(text.get(i..i + 2)?, 16).ok())
        .collect()
}
