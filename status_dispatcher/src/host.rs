//! The host page: services to show, the token for this render, and the
//! privilege of the caller

use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::errors::{DispatchError, Result};
use crate::status::Service;

/// Header carrying the admin key of a privileged caller
pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

#[derive(Debug, Clone, Deserialize)]
pub struct HostPage {
    pub services: Vec<Service>,
    pub nonce: String,
    pub ajax_url: String,
    pub privileged: bool,
}

/// Request one page render from the API
pub async fn fetch_host_page(
    api_url: &str,
    admin_key: Option<&str>,
    timeout: Duration,
) -> Result<HostPage> {
    let base = Url::parse(api_url)
        .map_err(|e| DispatchError::Config(format!("invalid api url {}: {}", api_url, e)))?;
    let page_url = base
        .join("/services")
        .map_err(|e| DispatchError::Config(e.to_string()))?;

    let client = Client::builder().timeout(timeout).build()?;
    let mut request = client.get(page_url);
    if let Some(key) = admin_key {
        request = request.header(ADMIN_KEY_HEADER, key);
    }

    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(DispatchError::Host(format!(
            "page request failed with status: {}",
            response.status()
        )));
    }

    let mut page: HostPage = response.json().await?;
    page.ajax_url = base
        .join(&page.ajax_url)
        .map_err(|e| DispatchError::Host(format!("invalid ajax url {}: {}", page.ajax_url, e)))?
        .to_string();

    info!(
        services = page.services.len(),
        privileged = page.privileged,
        "Loaded host page"
    );
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_relative_ajax_url_is_resolved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "services": [{"url": "https://www.example.com", "display_name": "example.com"}],
                "nonce": "abc123",
                "ajax_url": "/admin-ajax",
                "privileged": false
            })))
            .mount(&server)
            .await;

        let page = fetch_host_page(&server.uri(), None, Duration::from_secs(2)).await.unwrap();

        assert_eq!(page.services.len(), 1);
        assert_eq!(page.ajax_url, format!("{}/admin-ajax", server.uri()));
        assert!(!page.privileged);
    }

    #[tokio::test]
    async fn test_admin_key_is_presented() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services"))
            .and(header(ADMIN_KEY_HEADER, "letmein"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "services": [],
                "nonce": "abc123",
                "ajax_url": "https://status.example.com/admin-ajax",
                "privileged": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = fetch_host_page(&server.uri(), Some("letmein"), Duration::from_secs(2))
            .await
            .unwrap();

        assert!(page.privileged);
        assert_eq!(page.ajax_url, "https://status.example.com/admin-ajax");
    }

    #[tokio::test]
    async fn test_error_status_is_host_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = fetch_host_page(&server.uri(), None, Duration::from_secs(2)).await;
        assert!(matches!(result, Err(DispatchError::Host(_))));
    }
}
