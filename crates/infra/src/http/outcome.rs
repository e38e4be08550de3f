//! HTTP response classification
//!
//! Turns a single response (or transport failure) into a [`FetchOutcome`]
//! for the retry policy.

use dunkstats_core::ResponseClassifier;
use dunkstats_domain::{DunkstatsError, FetchOutcome};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

/// `Retry-After` in whole seconds. HTTP-date values are ignored.
pub fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()
}

/// Classify the result of [`super::HttpClient::send`] and decode a
/// successful body as `T`.
///
/// A body that does not decode is treated as a transient failure.
pub async fn classify_response<T>(
    result: Result<Response, DunkstatsError>,
    classifier: &ResponseClassifier,
) -> FetchOutcome<T>
where
    T: DeserializeOwned,
{
    let response = match result {
        Ok(response) => response,
        Err(err) => return FetchOutcome::NetworkError { message: err.to_string() },
    };

    let status = response.status();
    if status.is_success() {
        return match response.json::<T>().await {
            Ok(body) => FetchOutcome::Success(body),
            Err(err) => FetchOutcome::NetworkError { message: format!("invalid response body: {err}") },
        };
    }

    let retry_after = retry_after_secs(response.headers());
    let outcome = classifier.classify_failure(status.as_u16(), retry_after);
    debug!(status = status.as_u16(), outcome = outcome.label(), "classified HTTP failure");
    outcome
}
