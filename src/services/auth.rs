//! Blizzard client-credentials token exchange.
//!
//! Token requests are not counted against the collection rate budget.

use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{BlizzardConfig, EndpointConfig};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client id and secret, read from the environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Read credentials from the configured environment variables.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn from_env(config: &BlizzardConfig) -> Result<Self> {
        dotenvy::dotenv().ok();
        let read = |name: &str| {
            std::env::var(name)
                .map_err(|_| AppError::config(format!("environment variable {name} is not set")))
        };
        Ok(Self {
            client_id: read(&config.client_id_env)?,
            client_secret: read(&config.client_secret_env)?,
        })
    }
}

/// Exchange client credentials for a bearer token.
pub async fn request_token(
    client: &Client,
    endpoints: &EndpointConfig,
    credentials: &Credentials,
) -> Result<String> {
    let response = client
        .post(&endpoints.token_url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?
        .error_for_status()?;
    let token: TokenResponse = response.json().await?;
    Ok(token.access_token)
}

/// Acquire a token, or an empty one if acquisition fails.
///
/// With an empty token every authenticated lookup fails individually, which
/// the collector treats like any other failed lookup.
pub async fn access_token_or_empty(
    client: &Client,
    endpoints: &EndpointConfig,
    blizzard: &BlizzardConfig,
) -> String {
    let result = match Credentials::from_env(blizzard) {
        Ok(credentials) => request_token(client, endpoints, &credentials).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(token) => {
            log::info!("Acquired Blizzard access token");
            token
        }
        Err(e) => {
            log::error!("Error acquiring access token: {}", e);
            String::new()
        }
    }
}
