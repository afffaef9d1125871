mod config;
mod inference;
mod rating;
mod routes;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use config::AppConfig;
use inference::client::RatingModel;
use inference::vertex::VertexClient;
use rating::references::ReferenceSet;
use rating::service::RatingService;
use routes::configure_routes;
use std::env;
use std::sync::Arc;
use std::time::Duration;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = AppConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, format!("Configuration error: {}", e))
    })?;

    for dir in [&config.rating.train_dir, &config.rating.test_dir] {
        if let Err(e) = std::fs::create_dir_all(dir) {
            log::warn!("Could not create directory {}: {}", dir.display(), e);
        }
    }

    let references = ReferenceSet::load(&config.rating.train_dir);
    if !references.is_ready() {
        log::warn!(
            "Only {} reference images loaded from '{}'; rating requests will be refused until this is fixed and the server restarted.",
            references.len(),
            config.rating.train_dir.display()
        );
    }

    let model = VertexClient::new(&config.vertex).map_err(|e| {
        log::error!("Failed to create model client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, format!("Model client error: {}", e))
    })?;
    if config.vertex.access_token.is_none() {
        log::warn!("VERTEX_ACCESS_TOKEN is not set; model requests will be sent unauthenticated.");
    }
    log::info!("Using model {} at {}", model.model_name(), model.stream_url());

    let rating_service = web::Data::new(RatingService::new(
        references,
        Arc::new(model),
        Duration::from_secs(config.vertex.timeout_secs),
        config.vertex.max_concurrent_requests,
    ));

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let static_dir = config.server.static_dir.display().to_string();
    let app_config = web::Data::new(config);

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(rating_service.clone())
            .app_data(app_config.clone())
            .configure(|cfg| configure_routes(cfg, static_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
