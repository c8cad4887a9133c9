// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// GET a URL and decode the JSON body.
///
/// Every failure becomes [`AppError::Fetch`] carrying the URL and either the
/// HTTP status code, `Exception` for transport errors, or `Decode` for a body
/// that does not match `T`.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &Url,
    bearer: Option<&str>,
) -> Result<T> {
    let mut request = client.get(url.clone());
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            log::warn!("Error making request to {}: {}", url, e);
            return Err(AppError::fetch(url.as_str(), "Exception"));
        }
    };

    let status = response.status();
    if !status.is_success() {
        log::warn!("Failed to fetch data from {}: {}", url, status.as_u16());
        return Err(AppError::fetch(url.as_str(), status.as_u16()));
    }

    response.json::<T>().await.map_err(|e| {
        log::warn!("Undecodable response from {}: {}", url, e);
        AppError::fetch(url.as_str(), "Decode")
    })
}
