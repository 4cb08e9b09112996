use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info, warn};

use status_check_api::{configure_routes, AppState, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    if config.services.is_empty() {
        warn!("STATUS_SERVICES is empty, the page will list no services");
    }
    if config.nonce_secret.is_none() {
        info!("NONCE_SECRET not set, tokens will not survive a restart");
    }

    let bind = (config.bind_address.clone(), config.port);
    let state = match AppState::new(config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            error!("Failed to initialise application state: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Server is live at http://{}:{} (probe timeout {:?})",
        bind.0,
        bind.1,
        state.prober.timeout()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
