//! USGS `GeoJSON` summary feed client.
//!
//! See <https://earthquake.usgs.gov/earthquakes/feed/v1.0/geojson.php>

use async_trait::async_trait;

use crate::raw::{FeedCollection, parse_feed};
use crate::registry::FeedDefinition;
use crate::{FeedError, FeedSource};

/// Fetches a registered USGS summary feed with one GET per call.
pub struct UsgsFeed {
    client: reqwest::Client,
    definition: FeedDefinition,
}

impl UsgsFeed {
    /// Creates a client for the given feed definition.
    #[must_use]
    pub const fn new(client: reqwest::Client, definition: FeedDefinition) -> Self {
        Self { client, definition }
    }
}

#[async_trait]
impl FeedSource for UsgsFeed {
    fn id(&self) -> &str {
        &self.definition.id
    }

    async fn fetch(&self) -> Result<FeedCollection, FeedError> {
        log::info!("Fetching {} from {}", self.definition.name, self.definition.url);

        let text = self
            .client
            .get(&self.definition.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let collection = parse_feed(&text)?;
        log::info!(
            "{}: received {} features",
            self.definition.id,
            collection.features.len()
        );
        Ok(collection)
    }
}
