#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Earthquake ingestion pipeline.
//!
//! One cycle fetches the configured feed, normalizes every feature,
//! reverse-geocodes each record, and inserts the records whose IDs are not
//! yet stored. Feed and storage failures abort the cycle; geocoding
//! failures degrade to `"Unknown"` location fields.
//!
//! At most one cycle runs at a time per [`Pipeline`]. A cycle started while
//! another is in flight fails fast with [`IngestError::CycleInProgress`].

pub mod config;
pub mod scheduler;
pub mod trigger;

use std::sync::{Arc, Mutex};
use std::time::Instant;

use quake_feed_database::{Connection, DbError, earthquake_db};
use quake_feed_feed::normalize::normalize_features;
use quake_feed_feed::usgs::UsgsFeed;
use quake_feed_feed::{FeedError, FeedSource, registry};
use quake_feed_geocoder::{BigDataCloudGeocoder, ReverseGeocoder, service_registry};
use quake_feed_quake_models::EarthquakeRecord;

pub use config::PipelineConfig;

/// Errors that abort an ingestion cycle.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Fetching or parsing the upstream feed failed.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// Creating the schema or writing records failed.
    #[error(transparent)]
    Database(#[from] DbError),

    /// Building the HTTP client failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Another cycle is still running.
    #[error("A fetch cycle is already in progress")]
    CycleInProgress,

    /// A remote trigger endpoint answered with a failure status.
    #[error("Trigger endpoint returned {status}: {message}")]
    TriggerFailed {
        /// HTTP status code.
        status: u16,
        /// The `message` field of the response body, or the raw body.
        message: String,
    },

    /// The database lock was poisoned by a panic in another cycle.
    #[error("Earthquake store is unavailable (lock poisoned)")]
    StoreUnavailable,
}

/// Fetch → normalize → geocode → store, one cycle at a time.
pub struct Pipeline {
    feed: Arc<dyn FeedSource>,
    geocoder: Arc<dyn ReverseGeocoder>,
    /// `duckdb::Connection` is `Send` but not `Sync`, so a `Mutex` is needed.
    db: Arc<Mutex<Connection>>,
    cycle_lock: tokio::sync::Mutex<()>,
}

impl Pipeline {
    /// Creates a pipeline from its collaborators.
    #[must_use]
    pub fn new(
        feed: Arc<dyn FeedSource>,
        geocoder: Arc<dyn ReverseGeocoder>,
        db: Arc<Mutex<Connection>>,
    ) -> Self {
        Self {
            feed,
            geocoder,
            db,
            cycle_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Builds the production pipeline: the registered USGS feed, the
    /// `BigDataCloud` geocoder, and the `DuckDB` file at `config.db_path`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] if the feed ID is not registered, the HTTP
    /// client cannot be built, or the database cannot be opened.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, IngestError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("quake_feed/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let feed = UsgsFeed::new(client.clone(), registry::feed_by_id(&config.feed_id)?);
        let geocoder = BigDataCloudGeocoder::new(
            client,
            service_registry::bigdatacloud(),
            config.geocoder_api_key.clone(),
        );

        if config.geocoder_api_key.is_none() {
            log::warn!("BIGDATACLOUD_API_KEY is not set; reverse geocoding will likely fail");
        }

        let conn = earthquake_db::open(&config.db_path)?;

        Ok(Self::new(
            Arc::new(feed),
            Arc::new(geocoder),
            Arc::new(Mutex::new(conn)),
        ))
    }

    /// The shared database connection.
    #[must_use]
    pub const fn db(&self) -> &Arc<Mutex<Connection>> {
        &self.db
    }

    /// ID of the feed this pipeline polls.
    #[must_use]
    pub fn feed_id(&self) -> &str {
        self.feed.id()
    }

    /// Runs one cycle and returns the number of newly stored records.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::CycleInProgress`] if another cycle is running,
    /// or the feed/storage error that aborted this cycle.
    pub async fn run_cycle(&self) -> Result<u64, IngestError> {
        let Ok(_guard) = self.cycle_lock.try_lock() else {
            log::warn!("Skipping cycle: another cycle is still running");
            return Err(IngestError::CycleInProgress);
        };

        let start = Instant::now();
        log::info!("Starting cycle for feed {}", self.feed.id());

        let collection = self
            .feed
            .fetch()
            .await
            .inspect_err(|e| log::error!("Error fetching earthquake data: {e}"))?;

        let mut records = normalize_features(&collection.features);
        self.enrich(&mut records).await;

        let inserted = self
            .store(&records)
            .inspect_err(|e| log::error!("Error storing earthquake data: {e}"))?;

        log::info!(
            "Cycle complete: {} features, {inserted} new records in {:.1}s",
            records.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(inserted)
    }

    async fn enrich(&self, records: &mut [EarthquakeRecord]) {
        let mut unresolved = 0usize;
        for record in records.iter_mut() {
            record.location = self
                .geocoder
                .resolve(record.latitude, record.longitude)
                .await;
            if record.location.is_unknown() {
                unresolved += 1;
            }
        }
        if unresolved > 0 {
            log::warn!(
                "{unresolved} of {} records could not be reverse geocoded",
                records.len()
            );
        }
    }

    fn store(&self, records: &[EarthquakeRecord]) -> Result<u64, IngestError> {
        let mut conn = self.db.lock().map_err(|_| IngestError::StoreUnavailable)?;
        earthquake_db::ensure_schema(&conn)?;
        Ok(earthquake_db::insert_new(&mut conn, records)?)
    }
}
