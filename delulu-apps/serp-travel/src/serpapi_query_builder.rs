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

//! # SerpAPI Query Builder
//!
//! Side-effect free construction of SerpAPI request parameters for the
//! `google_flights` and `google_hotels` engines.

use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;
use thiserror::Error;

pub const SERPAPI_BASE_URL: &str = "https://serpapi.com/search";
const PLACEHOLDER_API_KEY: &str = "YOUR_SERPAPI_API_KEY";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// SerpAPI `type` value for one-way flight searches.
const ONE_WAY_TRIP: &str = "2";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Please provide a valid SerpAPI key")]
    MissingApiKey,
}

/// Credentials and locale handed to the client at construction time.
#[derive(Clone)]
pub struct SerpApiConfig {
    api_key: String,
    pub base_url: String,
    pub language: String,
    pub country: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for SerpApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("country", &self.country)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SerpApiConfig {
    pub fn new(api_key: impl Into<String>) -> std::result::Result<Self, ConfigError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() || api_key == PLACEHOLDER_API_KEY {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            base_url: SERPAPI_BASE_URL.to_string(),
            language: "en".to_string(),
            country: "us".to_string(),
            timeout_secs: 30,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_locale(mut self, language: impl Into<String>, country: impl Into<String>) -> Self {
        self.language = language.into();
        self.country = country.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }
}

pub type QueryPairs = Vec<(&'static str, String)>;

/// Percent-encodes every value. The key is masked when `redact_key` is set.
pub fn build_search_url(base_url: &str, pairs: &[(&'static str, String)], redact_key: bool) -> String {
    let query = pairs
        .iter()
        .map(|(k, v)| {
            let value = if redact_key && *k == "api_key" {
                "***".to_string()
            } else {
                urlencoding::encode(v).into_owned()
            };
            format!("{}={}", k, value)
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", base_url, query)
}

fn check_date(date: &str, what: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .context(format!("Invalid {}: {}", what, date))?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightSearchParams {
    pub from_airport: String,
    pub to_airport: String,
    pub depart_date: String,
    pub return_date: Option<String>,
}

impl FlightSearchParams {
    pub fn builder(from_airport: String, to_airport: String, depart_date: NaiveDate) -> FlightSearchParamsBuilder {
        FlightSearchParamsBuilder {
            from_airport,
            to_airport,
            depart_date,
            return_date: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.from_airport.trim().is_empty(), "Origin airport is required");
        ensure!(!self.to_airport.trim().is_empty(), "Destination airport is required");
        check_date(&self.depart_date, "departure date")?;
        if let Some(rd) = &self.return_date {
            check_date(rd, "return date")?;
        }
        Ok(())
    }

    /// "flights from JFK to LAX on 2025-05-01 returning on 2025-05-10"
    pub fn natural_query(&self) -> String {
        let mut query = format!(
            "flights from {} to {} on {}",
            self.from_airport, self.to_airport, self.depart_date
        );
        if let Some(rd) = &self.return_date {
            query.push_str(&format!(" returning on {}", rd));
        }
        query
    }

    pub fn to_query_pairs(&self, config: &SerpApiConfig) -> QueryPairs {
        let mut pairs = vec![
            ("engine", "google_flights".to_string()),
            ("q", self.natural_query()),
            ("hl", config.language.clone()),
            ("gl", config.country.clone()),
            ("departure_id", self.from_airport.clone()),
            ("arrival_id", self.to_airport.clone()),
            ("outbound_date", self.depart_date.clone()),
        ];
        match &self.return_date {
            Some(rd) => pairs.push(("return_date", rd.clone())),
            None => pairs.push(("type", ONE_WAY_TRIP.to_string())),
        }
        pairs.push(("api_key", config.api_key().to_string()));
        pairs
    }

    pub fn get_search_url(&self, config: &SerpApiConfig) -> String {
        build_search_url(&config.base_url, &self.to_query_pairs(config), false)
    }
}

#[derive(Clone)]
pub struct FlightSearchParamsBuilder {
    from_airport: String,
    to_airport: String,
    depart_date: NaiveDate,
    return_date: Option<NaiveDate>,
}

impl FlightSearchParamsBuilder {
    pub fn return_date(mut self, return_date: NaiveDate) -> Self {
        self.return_date = Some(return_date);
        self
    }

    pub fn build(self) -> Result<FlightSearchParams> {
        let params = FlightSearchParams {
            from_airport: self.from_airport.trim().to_uppercase(),
            to_airport: self.to_airport.trim().to_uppercase(),
            depart_date: self.depart_date.format(DATE_FORMAT).to_string(),
            return_date: self.return_date.map(|d| d.format(DATE_FORMAT).to_string()),
        };
        params.validate()?;
        Ok(params)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotelSearchParams {
    pub query: String,
    pub checkin_date: String,
    pub checkout_date: String,
}

impl HotelSearchParams {
    pub fn new(query: String, checkin: NaiveDate, checkout: NaiveDate) -> Result<Self> {
        let params = Self {
            query,
            checkin_date: checkin.format(DATE_FORMAT).to_string(),
            checkout_date: checkout.format(DATE_FORMAT).to_string(),
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.query.trim().is_empty(), "Hotel search query is required");
        check_date(&self.checkin_date, "check-in date")?;
        check_date(&self.checkout_date, "check-out date")?;
        Ok(())
    }

    pub fn to_query_pairs(&self, config: &SerpApiConfig) -> QueryPairs {
        vec![
            ("engine", "google_hotels".to_string()),
            ("q", self.query.clone()),
            ("hl", config.language.clone()),
            ("gl", config.country.clone()),
            ("check_in_date", self.checkin_date.clone()),
            ("check_out_date", self.checkout_date.clone()),
            ("api_key", config.api_key().to_string()),
        ]
    }

    pub fn get_search_url(&self, config: &SerpApiConfig) -> String {
        build_search_url(&config.base_url, &self.to_query_pairs(config), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SerpApiConfig {
        SerpApiConfig::new("secret-key").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_rejects_missing_api_key() {
        assert_eq!(SerpApiConfig::new("").unwrap_err(), ConfigError::MissingApiKey);
        assert_eq!(SerpApiConfig::new("   ").unwrap_err(), ConfigError::MissingApiKey);
        assert_eq!(
            SerpApiConfig::new("YOUR_SERPAPI_API_KEY").unwrap_err(),
            ConfigError::MissingApiKey
        );
        assert!(!format!("{:?}", config()).contains("secret-key"));
    }

    #[test]
    fn test_round_trip_flight_pairs() {
        let params = FlightSearchParams::builder("jfk".into(), "lax".into(), date("2025-05-01"))
            .return_date(date("2025-05-10"))
            .build()
            .unwrap();
        assert_eq!(
            params.natural_query(),
            "flights from JFK to LAX on 2025-05-01 returning on 2025-05-10"
        );
        let pairs = params.to_query_pairs(&config());
        assert!(pairs.contains(&("engine", "google_flights".to_string())));
        assert!(pairs.contains(&("departure_id", "JFK".to_string())));
        assert!(pairs.contains(&("return_date", "2025-05-10".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "type"));
        assert_eq!(pairs.last().map(|(k, _)| *k), Some("api_key"));
    }

    #[test]
    fn test_one_way_flight_pairs() {
        let params = FlightSearchParams::builder("SFO".into(), "JFK".into(), date("2025-07-15"))
            .build()
            .unwrap();
        assert_eq!(params.natural_query(), "flights from SFO to JFK on 2025-07-15");
        let pairs = params.to_query_pairs(&config());
        assert!(pairs.contains(&("type", "2".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "return_date"));
    }

    #[test]
    fn test_rejects_empty_airport() {
        let built = FlightSearchParams::builder(" ".into(), "JFK".into(), date("2025-07-15")).build();
        assert!(built.is_err());
    }

    #[test]
    fn test_hotel_url_encoding_and_redaction() {
        let params = HotelSearchParams::new("New York hotels".into(), date("2025-05-01"), date("2025-05-05")).unwrap();
        let url = params.get_search_url(&config());
        assert!(url.starts_with("https://serpapi.com/search?engine=google_hotels&q=New%20York%20hotels"));
        assert!(url.contains("check_in_date=2025-05-01"));
        assert!(url.ends_with("api_key=secret-key"));

        let redacted = build_search_url(SERPAPI_BASE_URL, &params.to_query_pairs(&config()), true);
        assert!(redacted.ends_with("api_key=***"));
        assert!(!redacted.contains("secret-key"));
    }

    #[test]
    fn test_hotel_dates_are_not_compared() {
        let params = HotelSearchParams::new("Paris".into(), date("2025-05-05"), date("2025-05-01"));
        assert!(params.is_ok());
    }
}
