mod config;
mod deployment;
mod routes;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use config::Config;
use routes::configure_routes;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("Checking deployment files...");
    let report = deployment::check(&config.frontend_dir, &config.model_dir);
    deployment::log_report(&report, &config.model_dir);
    if !report.model_ready(&config.model_dir) {
        log::warn!("Classification will be unavailable until the model files are deployed");
    }

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(config.clone()))
            .configure(|cfg| configure_routes(cfg, &config))
    })
    .bind(&bind_address)?
    .run()
    .await
}
