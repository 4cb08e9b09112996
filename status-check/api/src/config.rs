//! Configuration for the status check API

use std::env;
use std::time::Duration;

use crate::models::service::parse_service_list;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_address: String,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Service URLs offered to the page, in display order
    pub services: Vec<String>,

    /// Timeout of the single outbound probe
    pub probe_timeout: Duration,

    /// Full lifetime of an anti-forgery token
    pub nonce_lifetime: Duration,

    /// Secret mixed into every token; random per process when unset
    pub nonce_secret: Option<String>,

    /// Key that marks a caller as privileged
    pub admin_key: Option<String>,

    /// Externally visible base URL used to build the ajax URL
    pub public_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            services: Vec::new(),
            probe_timeout: Duration::from_secs(5),
            nonce_lifetime: Duration::from_secs(24 * 60 * 60),
            nonce_secret: None,
            admin_key: None,
            public_base_url: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(bind_address) = lookup("BIND_ADDRESS") {
            config.bind_address = bind_address;
        }

        if let Some(port) = lookup("PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }

        if let Some(services) = lookup("STATUS_SERVICES") {
            config.services = parse_service_list(&services);
        }

        if let Some(timeout) = lookup("PROBE_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.probe_timeout = Duration::from_secs(seconds);
            }
        }

        if let Some(lifetime) = lookup("NONCE_LIFETIME_SECONDS") {
            if let Ok(seconds) = lifetime.parse::<u64>() {
                config.nonce_lifetime = Duration::from_secs(seconds);
            }
        }

        config.nonce_secret = lookup("NONCE_SECRET").filter(|s| !s.is_empty());
        config.admin_key = lookup("ADMIN_KEY").filter(|s| !s.is_empty());
        config.public_base_url = lookup("PUBLIC_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.bind_address.is_empty() {
            return Err("bind_address cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }

        if self.probe_timeout.is_zero() {
            return Err("probe_timeout must be greater than 0".to_string());
        }

        if self.nonce_lifetime.as_secs() < 2 {
            return Err("nonce_lifetime must be at least 2 seconds".to_string());
        }

        Ok(())
    }

    /// URL the page posts status checks to
    pub fn ajax_url(&self) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/admin-ajax", base),
            None => "/admin-ajax".to_string(),
        }
    }
}
