//! Server-side reachability, proxied through the API's prober endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::errors::Result;

/// Action discriminator the prober endpoint expects
pub const STATUS_CHECK_ACTION: &str = "status_check";

#[async_trait]
pub trait ServerProbe: Send + Sync {
    /// Ok(true) when the prober reports the URL reachable
    async fn probe(&self, url: &str) -> Result<bool>;
}

#[derive(Debug, Deserialize)]
struct ProbeReply {
    success: bool,
    #[serde(default)]
    data: serde_json::Value,
}

/// Posts status checks to the prober with the token of the current page
#[derive(Debug, Clone)]
pub struct ProberClient {
    client: Client,
    ajax_url: String,
    nonce: String,
}

impl ProberClient {
    pub fn new(ajax_url: impl Into<String>, nonce: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("status_dispatcher/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            ajax_url: ajax_url.into(),
            nonce: nonce.into(),
        })
    }
}

#[async_trait]
impl ServerProbe for ProberClient {
    async fn probe(&self, url: &str) -> Result<bool> {
        let form = [
            ("action", STATUS_CHECK_ACTION),
            ("url", url),
            ("nonce", self.nonce.as_str()),
        ];

        // Rejections (403/400) still carry an envelope, so the status line is not inspected
        let response = self.client.post(&self.ajax_url).form(&form).send().await?;
        let body = response.text().await?;
        let reply: ProbeReply = serde_json::from_str(&body)?;

        debug!(url, success = reply.success, data = %reply.data, "Prober replied");
        Ok(reply.success)
    }
}
