//! Timer-driven cycle scheduling.
//!
//! Runs [`Pipeline::run_cycle`] on a fixed period inside the process. The
//! first cycle starts immediately. Ticks that fire while a slow cycle is
//! still running are skipped rather than queued.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::{IngestError, Pipeline};

/// Runs a cycle every `period`, forever. Failures are logged and the next
/// tick is the recovery mechanism.
pub async fn run_every(pipeline: Arc<Pipeline>, period: Duration) {
    log::info!(
        "Scheduling {} every {}s",
        pipeline.feed_id(),
        period.as_secs()
    );

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        match pipeline.run_cycle().await {
            Ok(inserted) => {
                log::info!("Scheduled fetch completed: {inserted} new earthquake records");
            }
            Err(IngestError::CycleInProgress) => {
                log::info!("Scheduled fetch skipped: previous cycle still running");
            }
            Err(e) => log::error!("Error during scheduled fetch: {e}"),
        }
    }
}
