//! Anti-forgery tokens bound to a fixed scope.
//!
//! A token is a keyed hash of the scope and the current time bucket ("tick").
//! A tick lasts half of the configured lifetime and a token is accepted for
//! its own tick and the one after, so it stays valid for at least half and at
//! most the whole lifetime.

use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Scope every status check token is bound to
pub const STATUS_CHECK_SCOPE: &str = "status_check_nonce";

const NONCE_LENGTH: usize = 10;

/// Which tick a verified token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceAge {
    Current,
    Previous,
}

#[derive(Clone)]
pub struct NonceIssuer {
    secret: String,
    lifetime: Duration,
}

impl std::fmt::Debug for NonceIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceIssuer")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl NonceIssuer {
    pub fn new(secret: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            secret: secret.into(),
            lifetime,
        }
    }

    /// Issuer with a per-process secret; tokens do not survive a restart
    pub fn with_random_secret(lifetime: Duration) -> Self {
        let bytes: [u8; 32] = rand::rng().random();
        let secret: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        Self::new(secret, lifetime)
    }

    pub fn create(&self, scope: &str) -> String {
        self.create_at(scope, Utc::now().timestamp())
    }

    pub fn create_at(&self, scope: &str, now: i64) -> String {
        self.digest(self.tick(now), scope)
    }

    pub fn verify(&self, scope: &str, token: &str) -> Option<NonceAge> {
        self.verify_at(scope, token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, scope: &str, token: &str, now: i64) -> Option<NonceAge> {
        if token.is_empty() {
            return None;
        }

        let tick = self.tick(now);
        if constant_time_eq(&self.digest(tick, scope), token) {
            return Some(NonceAge::Current);
        }
        if constant_time_eq(&self.digest(tick - 1, scope), token) {
            return Some(NonceAge::Previous);
        }

        None
    }

    fn tick(&self, now: i64) -> i64 {
        let half = (self.lifetime.as_secs() / 2).max(1) as i64;
        now.div_euclid(half) + 1
    }

    fn digest(&self, tick: i64, scope: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b"|");
        hasher.update(tick.to_string().as_bytes());
        hasher.update(b"|");
        hasher.update(scope.as_bytes());
        let hex = format!("{:x}", hasher.finalize());
        hex[..NONCE_LENGTH].to_string()
    }
}

fn constant_time_eq(expected: &str, given: &str) -> bool {
    if expected.len() != given.len() {
        return false;
    }
    expected
        .bytes()
        .zip(given.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
