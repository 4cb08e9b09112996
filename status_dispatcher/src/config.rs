//! Configuration management for the status dispatcher

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the status check API
    pub api_url: String,

    /// Timeout of the client-side fetch; `None` leaves it to the transport
    pub client_timeout: Option<Duration>,

    /// Timeout for calls to the API (page and prober)
    pub server_timeout: Duration,

    /// Admin key presented when requesting the page
    pub admin_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            client_timeout: None,
            server_timeout: Duration::from_secs(15),
            admin_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(api_url) = env::var("STATUS_API_URL") {
            config.api_url = api_url;
        }

        if let Ok(timeout) = env::var("CLIENT_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.client_timeout = Some(Duration::from_secs(seconds));
            }
        }

        if let Ok(timeout) = env::var("SERVER_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.server_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(admin_key) = env::var("ADMIN_KEY") {
            if !admin_key.is_empty() {
                config.admin_key = Some(admin_key);
            }
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.is_empty() {
            return Err("api_url cannot be empty".to_string());
        }

        if reqwest::Url::parse(&self.api_url).is_err() {
            return Err(format!("api_url is not a valid URL: {}", self.api_url));
        }

        if self.client_timeout.is_some_and(|t| t.is_zero()) {
            return Err("client_timeout must be greater than 0".to_string());
        }

        if self.server_timeout.is_zero() {
            return Err("server_timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
