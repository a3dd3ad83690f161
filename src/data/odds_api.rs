//! The Odds API live feed.
//!
//! API docs: https://the-odds-api.com/liveapi/guides/v4/
//! Endpoint: `GET /v4/sports/{sport}/odds/?regions=..&markets=h2h&oddsFormat=decimal`
//! Auth: `apiKey` query parameter. Each call costs one request per region
//! and market from the account quota.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::{decode_events, OddsSource};
use crate::config::OddsApiConfig;
use crate::types::{Event, H2H_MARKET};

const SOURCE_NAME: &str = "the-odds-api";

/// Client for the live odds endpoint.
pub struct OddsApiClient {
    http: Client,
    api_key: SecretString,
    base_url: String,
    sport: String,
    regions: String,
}

impl OddsApiClient {
    pub fn new(api_key: SecretString, cfg: &OddsApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent("ARBSCAN/0.1.0")
            .build()
            .context("Failed to build HTTP client for The Odds API")?;

        Ok(Self {
            http,
            api_key,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            sport: cfg.sport.clone(),
            regions: cfg.regions.clone(),
        })
    }

    /// Odds endpoint for the configured sport, without query parameters.
    pub fn odds_url(&self) -> String {
        format!(
            "{}/sports/{}/odds/",
            self.base_url,
            urlencoding::encode(&self.sport)
        )
    }

    /// Fetch the raw JSON payload.
    pub async fn fetch_payload(&self) -> Result<Value> {
        let url = self.odds_url();
        debug!(url = %url, sport = %self.sport, regions = %self.regions, "Fetching live odds");

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("regions", self.regions.as_str()),
                ("markets", H2H_MARKET),
                ("oddsFormat", "decimal"),
                ("apiKey", self.api_key.expose_secret().as_str()),
            ])
            .send()
            .await
            .context("Odds API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Odds API error {status}: {body}");
        }

        if let Some(remaining) = resp
            .headers()
            .get("x-requests-remaining")
            .and_then(|v| v.to_str().ok())
        {
            info!(remaining, "Odds API quota");
        }

        resp.json()
            .await
            .context("Failed to parse Odds API response")
    }
}

#[async_trait]
impl OddsSource for OddsApiClient {
    async fn fetch_events(&self) -> Result<Vec<Event>> {
        decode_events(self.fetch_payload().await?)
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}
