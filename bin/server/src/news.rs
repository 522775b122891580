//! Passthrough proxy to the external news search API.
//!
//! The API key stays server-side; the browser only ever sees the search
//! results. Thin glue: the upstream response body is forwarded as-is.

use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

/// Fetches stories from the configured news search API.
pub async fn stories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let news = &state.news;

    let mut params: Vec<(&str, &str)> = vec![
        ("api-key", news.api_key.as_str()),
        ("q", news.query.as_str()),
        ("sort", news.sort.as_str()),
    ];
    if let Some(filter) = news.filter.as_deref() {
        params.push(("fq", filter));
    }

    let response = state
        .http
        .get(&news.endpoint)
        .query(&params)
        .send()
        .await
        .map_err(|e| ApiError::Upstream(format!("news API request failed: {}", e)))?
        .error_for_status()
        .map_err(|e| ApiError::Upstream(format!("news API returned error: {}", e)))?;

    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| ApiError::Upstream(format!("news API returned invalid JSON: {}", e)))?;

    Ok(Json(body))
}
