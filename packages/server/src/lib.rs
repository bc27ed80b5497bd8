#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the quake feed.
//!
//! `GET /fetch-data` runs one ingestion cycle and reports how many new
//! records were stored. The read-only `/api` scope serves the stored events.
//! When `FETCH_INTERVAL_SECS` is set, the same pipeline is also driven by an
//! in-process timer, sharing the single-flight guard with the endpoint.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use quake_feed_ingest::config::fetch_interval_from_env;
use quake_feed_ingest::{Pipeline, PipelineConfig, scheduler};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;

/// Shared application state.
pub struct AppState {
    /// Ingestion pipeline, also the owner of the `DuckDB` connection.
    pub pipeline: Arc<Pipeline>,
}

/// Registers every route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/fetch-data", web::get().to(handlers::fetch_data))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/earthquakes", web::get().to(handlers::earthquakes))
                .route("/earthquakes/{id}", web::get().to(handlers::earthquake_by_id)),
        );
}

/// Starts the quake feed API server.
///
/// Builds the pipeline from the environment, opens (and if needed creates)
/// the `DuckDB` store, starts the internal scheduler when configured, and
/// serves until shutdown. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the pipeline cannot be built, or if
/// the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = PipelineConfig::from_env();
    log::info!(
        "Opening earthquake store at {} (feed {})",
        config.db_path.display(),
        config.feed_id
    );
    let pipeline = Arc::new(Pipeline::from_config(&config).map_err(std::io::Error::other)?);

    if let Some(period) = fetch_interval_from_env() {
        actix_rt::spawn(scheduler::run_every(pipeline.clone(), period));
    } else {
        log::info!("FETCH_INTERVAL_SECS not set; cycles run only via /fetch-data");
    }

    let state = web::Data::new(AppState { pipeline });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
