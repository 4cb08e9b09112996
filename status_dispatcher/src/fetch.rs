//! Client-side reachability: a direct fetch from the caller's own network.
//!
//! The fetch is treated as opaque. Any completed response counts as
//! reachable whatever its status code, and only a transport-level failure
//! counts as unreachable. HTTP error codes are invisible on this path.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::errors::Result;

#[async_trait]
pub trait ClientFetcher: Send + Sync {
    /// Ok when the transport completed, Err on a network-level failure
    async fn fetch(&self, url: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct DirectFetcher {
    client: Client,
}

impl DirectFetcher {
    /// `timeout` of `None` leaves the transport default in place
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(format!("status_dispatcher/{}", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl ClientFetcher for DirectFetcher {
    async fn fetch(&self, url: &str) -> Result<()> {
        let response = self.client.get(url).send().await?;
        debug!(url, status = response.status().as_u16(), "Client fetch completed");
        Ok(())
    }
}
