//! One-shot call to a running server's `/fetch-data` endpoint.
//!
//! This is the external-scheduler path: cron (or similar) runs
//! `quake_feed_ingest trigger` and the server does the work. A 409 means the
//! server is already mid-cycle, which is a skip rather than a failure.

use reqwest::StatusCode;

use crate::IngestError;

/// What the server reported for a trigger request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The cycle ran; carries the response body.
    Completed(serde_json::Value),
    /// Another cycle was already running; carries the response body.
    Skipped(serde_json::Value),
}

/// Calls the trigger endpoint at `url` once.
///
/// # Errors
///
/// Returns [`IngestError::Http`] if the request fails, or
/// [`IngestError::TriggerFailed`] if the server answers with any status other
/// than success or 409.
pub async fn trigger(client: &reqwest::Client, url: &str) -> Result<TriggerOutcome, IngestError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    let text = response.text().await?;
    let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));

    if status.is_success() {
        Ok(TriggerOutcome::Completed(body))
    } else if status == StatusCode::CONFLICT {
        Ok(TriggerOutcome::Skipped(body))
    } else {
        let message = body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| body.to_string(), str::to_string);
        Err(IngestError::TriggerFailed {
            status: status.as_u16(),
            message,
        })
    }
}
