//! Server side of the dual-perspective status checker.
//!
//! Hosts the probe endpoint that classifies reachability of a URL from the
//! server's network, and the page endpoint that hands out the monitored
//! services together with a fresh anti-forgery token.

pub mod config;
pub mod controllers;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;

use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};

pub use config::Config;
pub use errors::{ApiError, ProbeError, Result};
pub use models::{Envelope, HostPage, ProbeResult, Service};
pub use state::AppState;

use crate::controllers::{page, status};
use crate::services::health;

/// Register every route of the API
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // A malformed form body still gets a well-formed envelope
    let form_config = web::FormConfig::default().error_handler(|err, _req| {
        let envelope = Envelope::from(&ProbeError::Validation(err.to_string()));
        InternalError::from_response(err, HttpResponse::BadRequest().json(envelope)).into()
    });

    cfg.app_data(form_config)
        .route("/health", web::get().to(health::health_check))
        .route("/services", web::get().to(page::host_page))
        .route("/admin-ajax", web::post().to(status::admin_ajax));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::page::ADMIN_KEY_HEADER;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_state(services: &[&str]) -> web::Data<AppState> {
        let config = Config {
            services: services.iter().map(|s| s.to_string()).collect(),
            probe_timeout: Duration::from_secs(2),
            nonce_secret: Some("route-test-secret".to_string()),
            admin_key: Some("letmein".to_string()),
            ..Config::default()
        };
        web::Data::new(AppState::new(config).unwrap())
    }

    fn form_body(pairs: &[(&str, &str)]) -> String {
        serde_urlencoded::to_string(pairs).unwrap()
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(configure_routes)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: String = test::read_body_json(resp).await;
        assert_eq!(body, "OK");
    }

    #[actix_web::test]
    async fn test_host_page_lists_services_and_token() {
        let data = test_state(&["https://www.example.com", "https://rust-lang.org"]);
        let app = test::init_service(App::new().app_data(data.clone()).configure(configure_routes)).await;

        let page: HostPage = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/services").to_request(),
        )
        .await;

        assert_eq!(page.services.len(), 2);
        assert_eq!(page.services[0].display_name, "example.com");
        assert_eq!(page.ajax_url, "/admin-ajax");
        assert!(!page.privileged);
        assert!(
            data.nonces
                .verify(services::nonce::STATUS_CHECK_SCOPE, &page.nonce)
                .is_some()
        );
    }

    #[actix_web::test]
    async fn test_host_page_privileged_with_admin_key() {
        let data = test_state(&[]);
        let app = test::init_service(App::new().app_data(data).configure(configure_routes)).await;

        let page: HostPage = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/services")
                .insert_header((ADMIN_KEY_HEADER, "letmein"))
                .to_request(),
        )
        .await;

        assert!(page.privileged);
    }

    #[actix_web::test]
    async fn test_status_check_round_trip() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&upstream)
            .await;

        let data = test_state(&[]);
        let token = data.nonces.create(services::nonce::STATUS_CHECK_SCOPE);
        let app = test::init_service(App::new().app_data(data).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/admin-ajax")
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload(form_body(&[
                ("action", "status_check"),
                ("url", &upstream.uri()),
                ("nonce", &token),
            ]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let envelope: Envelope = test::read_body_json(resp).await;
        assert!(envelope.success);
    }

    #[actix_web::test]
    async fn test_status_check_bad_token_is_forbidden() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&upstream)
            .await;

        let data = test_state(&[]);
        let app = test::init_service(App::new().app_data(data).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/admin-ajax")
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload(form_body(&[
                ("action", "status_check"),
                ("url", &upstream.uri()),
                ("nonce", "forged"),
            ]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let envelope: Envelope = test::read_body_json(resp).await;
        assert!(!envelope.success);
        assert_eq!(envelope.error_message(), Some("invalid token"));
    }

    #[actix_web::test]
    async fn test_unknown_action_is_bad_request() {
        let data = test_state(&[]);
        let app = test::init_service(App::new().app_data(data).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/admin-ajax")
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload(form_body(&[("action", "delete_everything")]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let envelope: Envelope = test::read_body_json(resp).await;
        assert_eq!(envelope.error_message(), Some("unknown action"));
    }

    #[actix_web::test]
    async fn test_malformed_body_still_gets_envelope() {
        let data = test_state(&[]);
        let app = test::init_service(App::new().app_data(data).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/admin-ajax")
            .insert_header(("content-type", "application/json"))
            .set_payload("{}")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let envelope: Envelope = test::read_body_json(resp).await;
        assert!(!envelope.success);
    }
}
