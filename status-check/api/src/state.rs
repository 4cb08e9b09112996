use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::errors::{ApiError, Result};
use crate::services::nonce::NonceIssuer;
use crate::services::prober::Prober;

// App state, shared read-only by every worker
pub struct AppState {
    pub config: Config,
    pub prober: Prober,
    pub nonces: NonceIssuer,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        config.validate().map_err(ApiError::Config)?;

        let prober = Prober::new(config.probe_timeout)?;
        let nonces = match &config.nonce_secret {
            Some(secret) => NonceIssuer::new(secret.clone(), config.nonce_lifetime),
            None => NonceIssuer::with_random_secret(config.nonce_lifetime),
        };

        Ok(Self {
            config,
            prober,
            nonces,
        })
    }

    /// Whether the presented key matches the configured admin key
    pub fn is_privileged(&self, presented: Option<&str>) -> bool {
        match (&self.config.admin_key, presented) {
            (Some(expected), Some(given)) => hash_with_sha256(expected) == hash_with_sha256(given),
            _ => false,
        }
    }
}

fn hash_with_sha256(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}
