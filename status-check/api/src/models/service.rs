use serde::{Deserialize, Serialize};

// A monitored service as handed to the page
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Service {
    pub url: String,
    pub display_name: String,
}

impl Service {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let display_name = display_name(&url);
        Self { url, display_name }
    }
}

/// Payload the host renders a status table from
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HostPage {
    pub services: Vec<Service>,
    pub nonce: String,
    pub ajax_url: String,
    pub privileged: bool,
}

/// Strips a leading `http://`/`https://` and then a leading `www.`
pub fn display_name(url: &str) -> String {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    rest.strip_prefix("www.").unwrap_or(rest).to_string()
}

/// Parse a comma separated service list, dropping blank entries
pub fn parse_service_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_scheme_and_www() {
        assert_eq!(display_name("https://www.example.com/a"), "example.com/a");
        assert_eq!(display_name("http://github.com"), "github.com");
        assert_eq!(display_name("www.rust-lang.org"), "rust-lang.org");
        assert_eq!(display_name("ftp://www.example.com"), "ftp://www.example.com");
    }

    #[test]
    fn test_parse_service_list_keeps_order() {
        let services = parse_service_list(" https://a.com ,, https://b.com,  ,https://c.com");
        assert_eq!(services, vec!["https://a.com", "https://b.com", "https://c.com"]);
        assert!(parse_service_list(" , ").is_empty());
    }

    #[test]
    fn test_service_new_derives_display_name() {
        let service = Service::new("https://www.google.com");
        assert_eq!(service.url, "https://www.google.com");
        assert_eq!(service.display_name, "google.com");
    }
}
