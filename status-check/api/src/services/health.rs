use actix_web::{HttpResponse, Responder};

// Liveness of the API process itself, no probing involved
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json("OK")
}
