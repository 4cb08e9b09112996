use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use log::{info, warn};
use serde::Deserialize;

use crate::errors::ProbeError;
use crate::models::probe::Envelope;
use crate::services::nonce::{NonceIssuer, STATUS_CHECK_SCOPE};
use crate::services::prober::{sanitize_url, Prober};
use crate::state::AppState;

/// Action discriminator of the status check request
pub const STATUS_CHECK_ACTION: &str = "status_check";

#[derive(Debug, Default, Deserialize)]
pub struct StatusCheckForm {
    pub action: Option<String>,
    pub url: Option<String>,
    pub nonce: Option<String>,
}

/// Answer one status check request.
///
/// Holds no state of its own: the token is checked first, then the URL, and
/// only then is the single probe issued.
pub async fn status_check(
    nonces: &NonceIssuer,
    prober: &Prober,
    token: Option<&str>,
    url: Option<&str>,
) -> (StatusCode, Envelope) {
    match classify(nonces, prober, token, url).await {
        Ok(()) => (StatusCode::OK, Envelope::reachable()),
        Err(e) => {
            if e.is_rejection() {
                warn!("Status check rejected: {}", e);
            }
            (e.status_code(), Envelope::from(&e))
        }
    }
}

async fn classify(
    nonces: &NonceIssuer,
    prober: &Prober,
    token: Option<&str>,
    url: Option<&str>,
) -> Result<(), ProbeError> {
    let token = token.ok_or(ProbeError::Auth)?;
    nonces
        .verify(STATUS_CHECK_SCOPE, token)
        .ok_or(ProbeError::Auth)?;

    let raw = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(ProbeError::missing_parameter)?;
    let target = sanitize_url(raw).ok_or_else(ProbeError::invalid_url)?;

    prober.probe(&target).await.into_result()
}

// POST /admin-ajax
pub async fn admin_ajax(
    data: web::Data<AppState>,
    form: web::Form<StatusCheckForm>,
) -> impl Responder {
    let form = form.into_inner();

    if form.action.as_deref() != Some(STATUS_CHECK_ACTION) {
        let err = ProbeError::unknown_action();
        warn!("Request with unknown action: {:?}", form.action);
        return HttpResponse::build(err.status_code()).json(Envelope::from(&err));
    }

    info!("Request to check status of: {:?}", form.url);
    let (status, envelope) = status_check(
        &data.nonces,
        &data.prober,
        form.nonce.as_deref(),
        form.url.as_deref(),
    )
    .await;

    HttpResponse::build(status).json(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixtures() -> (NonceIssuer, Prober) {
        (
            NonceIssuer::new("test-secret", Duration::from_secs(86_400)),
            Prober::new(Duration::from_secs(2)).unwrap(),
        )
    }

    async fn upstream(status: u16, expected_calls: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .expect(expected_calls)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_reachable_upstream() {
        let (nonces, prober) = fixtures();
        let server = upstream(200, 1).await;
        let token = nonces.create(STATUS_CHECK_SCOPE);

        let (status, envelope) =
            status_check(&nonces, &prober, Some(&token), Some(&server.uri())).await;

        assert_eq!(status, StatusCode::OK);
        assert!(envelope.success);
        assert_eq!(envelope.status(), "✅");
    }

    #[tokio::test]
    async fn test_upstream_404_is_failure_with_code() {
        let (nonces, prober) = fixtures();
        let server = upstream(404, 1).await;
        let token = nonces.create(STATUS_CHECK_SCOPE);

        let (status, envelope) =
            status_check(&nonces, &prober, Some(&token), Some(&server.uri())).await;

        assert_eq!(status, StatusCode::OK);
        assert!(!envelope.success);
        assert_eq!(envelope.status(), "❌");
        assert!(envelope.error_message().unwrap().contains("404"));
    }

    #[tokio::test]
    async fn test_invalid_token_never_probes() {
        let (nonces, prober) = fixtures();
        let server = upstream(200, 0).await;

        let (status, envelope) =
            status_check(&nonces, &prober, Some("0123456789"), Some(&server.uri())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(envelope.error_message(), Some("invalid token"));

        let (status, _) = status_check(&nonces, &prober, None, Some(&server.uri())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_token_from_other_scope_is_refused() {
        let (nonces, prober) = fixtures();
        let server = upstream(200, 0).await;
        let token = nonces.create("some_other_action");

        let (status, _) = status_check(&nonces, &prober, Some(&token), Some(&server.uri())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_missing_url_is_bad_request() {
        let (nonces, prober) = fixtures();
        let token = nonces.create(STATUS_CHECK_SCOPE);

        let (status, envelope) = status_check(&nonces, &prober, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(envelope.error_message(), Some("missing parameter"));

        let (status, _) = status_check(&nonces, &prober, Some(&token), Some("   ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unsanitizable_url_is_bad_request() {
        let (nonces, prober) = fixtures();
        let token = nonces.create(STATUS_CHECK_SCOPE);

        let (status, envelope) =
            status_check(&nonces, &prober, Some(&token), Some("ftp://example.com")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(envelope.error_message(), Some("invalid url"));
    }

    #[tokio::test]
    async fn test_token_checked_before_url() {
        let (nonces, prober) = fixtures();

        let (status, _) = status_check(&nonces, &prober, Some("bad"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
