//! Shared request plumbing for provider clients.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::MarketDataError;

pub(crate) async fn get_json(
    client: &Client,
    source: &'static str,
    url: &str,
    query: &[(&str, String)],
) -> Result<Value, MarketDataError> {
    debug!("{} GET {} ({} params)", source, url, query.len());
    let response = client.get(url).query(query).send().await?;
    decode(source, response).await
}

pub(crate) async fn post_json(
    client: &Client,
    source: &'static str,
    url: &str,
    body: &Value,
) -> Result<Value, MarketDataError> {
    debug!("{} POST {}", source, url);
    let response = client.post(url).json(body).send().await?;
    decode(source, response).await
}

async fn decode(
    source: &'static str,
    response: reqwest::Response,
) -> Result<Value, MarketDataError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail: String = body.chars().take(200).collect();
        warn!("{} answered HTTP {}: {}", source, status.as_u16(), detail);
        return Err(MarketDataError::provider(
            source,
            format!("HTTP {}", status.as_u16()),
        ));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| MarketDataError::provider(source, format!("malformed payload: {}", e)))
}

/// Pluck a nested element out of a payload, erroring with the path when the
/// upstream shape changed under us.
pub(crate) fn pluck<'a>(
    source: &'static str,
    payload: &'a Value,
    path: &[&str],
) -> Result<&'a Value, MarketDataError> {
    let mut current = payload;
    for key in path {
        current = current.get(key).ok_or_else(|| {
            MarketDataError::provider(source, format!("missing field '{}' in payload", key))
        })?;
    }
    Ok(current)
}

/// Like [`pluck`], but requires the target to be a JSON array.
pub(crate) fn pluck_rows<'a>(
    source: &'static str,
    payload: &'a Value,
    path: &[&str],
) -> Result<&'a Vec<Value>, MarketDataError> {
    pluck(source, payload, path)?.as_array().ok_or_else(|| {
        MarketDataError::provider(
            source,
            format!("expected an array at '{}'", path.join(".")),
        )
    })
}
