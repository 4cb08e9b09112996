use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::info;

use crate::models::service::{HostPage, Service};
use crate::services::nonce::STATUS_CHECK_SCOPE;
use crate::state::AppState;

/// Header carrying the admin key of a privileged caller
pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

// GET /services
//
// One call per page render: the token handed out here is what the page
// attaches to every status check it sends back.
pub async fn host_page(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    let presented = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    let privileged = data.is_privileged(presented);

    let services: Vec<Service> = data
        .config
        .services
        .iter()
        .map(|url| Service::new(url.clone()))
        .collect();
    info!(
        "Rendering page with {} services (privileged: {})",
        services.len(),
        privileged
    );

    HttpResponse::Ok().json(HostPage {
        services,
        nonce: data.nonces.create(STATUS_CHECK_SCOPE),
        ajax_url: data.config.ajax_url(),
        privileged,
    })
}
