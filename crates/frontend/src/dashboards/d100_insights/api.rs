use crate::shared::api_utils::insights_api_base;
use contracts::dashboards::d100_insights::{InsightEndpoint, InsightsEnvelope};
use gloo_net::http::Request;
use serde::de::DeserializeOwned;

/// Fetches one insights collection. A response whose `status` is not
/// "success" is an error, just like a transport or HTTP failure.
pub async fn fetch_insight<T: DeserializeOwned>(endpoint: InsightEndpoint) -> Result<Vec<T>, String> {
    let url = endpoint.url(&insights_api_base());

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let envelope: InsightsEnvelope<T> = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    envelope.into_result()
}
