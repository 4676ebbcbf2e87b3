//!  Delulu Travel Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # SerpAPI Search Client
//!
//! Effectful (network) operations against SerpAPI. Returns the raw JSON
//! document; normalization lives in the results parsers.

use crate::serpapi_query_builder::{
    FlightSearchParams, HotelSearchParams, SerpApiConfig, build_search_url,
};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use wreq::redirect::Policy;

#[derive(Clone)]
pub struct SerpApiClient {
    client: Arc<wreq::Client>,
    config: SerpApiConfig,
}

impl SerpApiClient {
    pub fn new(config: SerpApiConfig) -> Result<Self> {
        let client = wreq::Client::builder()
            .redirect(Policy::default())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    pub fn config(&self) -> &SerpApiConfig {
        &self.config
    }

    /// Masks the API key, raw or percent-encoded, in text bound for callers.
    fn redact(&self, text: &dyn std::fmt::Display) -> String {
        let key = self.config.api_key();
        text.to_string()
            .replace(key, "***")
            .replace(urlencoding::encode(key).as_ref(), "***")
    }
}

impl SerpApiClient {
    pub async fn fetch_raw(&self, pairs: &[(&'static str, String)]) -> Result<Value> {
        let url = build_search_url(&self.config.base_url, pairs, false);
        let redacted_url = build_search_url(&self.config.base_url, pairs, true);
        tracing::info!("Fetching SerpAPI URL: {}", redacted_url);

        // wreq errors embed the full request URL, key included
        let http_start = std::time::Instant::now();
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => bail!("Request failed for {}: {}", redacted_url, self.redact(&e)),
        };
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => bail!("Read body from {}: {}", redacted_url, self.redact(&e)),
        };
        tracing::debug!(
            "[fetch_raw] HTTP {} in {:?}: {} KB",
            status.as_u16(),
            http_start.elapsed(),
            body.len() / 1024
        );

        if !status.is_success() {
            let body_preview = body.chars().take(500).collect::<String>();
            bail!("HTTP error {}: {}", status, self.redact(&body_preview));
        }

        serde_json::from_str(&body).context("Response body is not valid JSON")
    }

    pub async fn search_flights(&self, params: &FlightSearchParams) -> Result<Value> {
        params.validate().context("Invalid search parameters")?;
        tracing::info!("Searching flights: {}", params.natural_query());
        self.fetch_raw(&params.to_query_pairs(&self.config)).await
    }

    pub async fn search_hotels(&self, params: &HotelSearchParams) -> Result<Value> {
        params.validate().context("Invalid search parameters")?;
        tracing::info!(
            "Searching hotels: {} ({} to {})",
            params.query,
            params.checkin_date,
            params.checkout_date
        );
        self.fetch_raw(&params.to_query_pairs(&self.config)).await
    }
}
