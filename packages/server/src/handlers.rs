//! HTTP handler functions for the quake feed API.

use actix_web::{HttpResponse, web};
use quake_feed_database::earthquake_db;
use quake_feed_ingest::IngestError;
use quake_feed_server_models::{ApiEarthquake, ApiFetchResponse, ApiHealth, EarthquakeQueryParams};

use crate::AppState;

const DEFAULT_LIMIT: u32 = 100;
const MAX_LIMIT: u32 = 1_000;

/// `GET /fetch-data`
///
/// Runs one fetch cycle. Responds 200 with the number of newly stored
/// records, 409 if a cycle is already running, and 500 with the error text
/// for any other failure.
pub async fn fetch_data(state: web::Data<AppState>) -> HttpResponse {
    match state.pipeline.run_cycle().await {
        Ok(inserted) => HttpResponse::Ok().json(ApiFetchResponse::stored(inserted)),
        Err(e @ IngestError::CycleInProgress) => {
            HttpResponse::Conflict().json(ApiFetchResponse::error(e.to_string()))
        }
        Err(e) => {
            log::error!("Fetch cycle failed: {e}");
            HttpResponse::InternalServerError().json(ApiFetchResponse::error(e.to_string()))
        }
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/earthquakes`
///
/// Most recent stored events first.
pub async fn earthquakes(
    state: web::Data<AppState>,
    params: web::Query<EarthquakeQueryParams>,
) -> HttpResponse {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

    let Ok(conn) = state.pipeline.db().lock() else {
        return store_unavailable();
    };

    match earthquake_db::recent(&conn, limit) {
        Ok(rows) => {
            let events: Vec<ApiEarthquake> = rows.into_iter().map(ApiEarthquake::from).collect();
            HttpResponse::Ok().json(events)
        }
        Err(e) => {
            log::error!("Failed to query earthquakes: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query earthquakes"
            }))
        }
    }
}

/// `GET /api/earthquakes/{id}`
pub async fn earthquake_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();

    let Ok(conn) = state.pipeline.db().lock() else {
        return store_unavailable();
    };

    match earthquake_db::get_by_id(&conn, &id) {
        Ok(Some(row)) => HttpResponse::Ok().json(ApiEarthquake::from(row)),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Earthquake '{id}' not found")
        })),
        Err(e) => {
            log::error!("Failed to query earthquake {id}: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query earthquake"
            }))
        }
    }
}

fn store_unavailable() -> HttpResponse {
    log::error!("Earthquake store lock poisoned");
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Earthquake store is unavailable"
    }))
}
