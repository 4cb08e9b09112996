use log::{debug, info};
use reqwest::{Client, Url};
use std::error::Error as StdError;
use std::time::Duration;

use crate::errors::Result;
use crate::models::probe::ProbeResult;

/// Issues one bounded GET per call and classifies the outcome
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    timeout: Duration,
}

impl Prober {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("status-check-api/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe the target once. The response body is never read.
    pub async fn probe(&self, target: &Url) -> ProbeResult {
        debug!("Probing {} with timeout {:?}", target, self.timeout);

        let result = match self.client.get(target.clone()).send().await {
            Ok(response) => ProbeResult::from_status(response.status().as_u16()),
            Err(e) => ProbeResult::NetworkError(error_chain(&e)),
        };

        info!("Probe of {} finished: {:?}", target, result);
        result
    }
}

/// Sanitize an untrusted value into an absolute http(s) URL.
///
/// Whitespace and control characters are dropped, a missing scheme defaults
/// to `http://`, and anything without a host or with another scheme is
/// refused.
pub fn sanitize_url(raw: &str) -> Option<Url> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_control() && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let candidate = if has_scheme(&cleaned) {
        cleaned
    } else {
        format!("http://{}", cleaned)
    };

    let url = Url::parse(&candidate).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.host_str().filter(|host| !host.is_empty())?;

    Some(url)
}

// A scheme is `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )` right before "://"
fn has_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

// reqwest keeps the interesting part (refused, timed out, dns) in the sources
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
