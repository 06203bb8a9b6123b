use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use foodcart_dispatch::config::{LoggingSettings, Settings};
use foodcart_dispatch::core::OrderAssignmentPipeline;
use foodcart_dispatch::routes::{self, orders::AppState};
use foodcart_dispatch::services::{GeocodeCache, PostgresClient, YandexGeocoder};
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// Initialize logging; `RUST_LOG` wins over the configured level
fn init_logging(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Settings drive the log level, so they load before logging starts
    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    init_logging(&settings.logging);

    info!("Starting Foodcart dispatch service...");

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?,
    );

    info!("PostgreSQL client initialized");

    let geocoder = YandexGeocoder::new(
        settings.geocoder.endpoint.clone(),
        settings.geocoder.api_key.clone(),
        settings.geocoder.timeout(),
    )
    .map_err(|e| {
        error!("Failed to create geocoder client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let geocode_cache = Arc::new(GeocodeCache::new(
        postgres.clone(),
        Arc::new(geocoder),
        settings.cache.l1_cache_size,
        settings.cache.ttl_secs,
        settings.geocoder.timeout(),
    ));

    info!(
        "Geocode cache initialized (L1: {} entries, TTL: {}s, provider timeout: {}s)",
        settings.cache.l1_cache_size,
        settings.cache.ttl_secs,
        settings.geocoder.timeout_secs
    );

    let app_state = AppState {
        postgres,
        pipeline: OrderAssignmentPipeline::new(geocode_cache),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
