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

//! Live SerpAPI searches. Needs SERPAPI_API_KEY and spends search credits.
//!
//! Run with `cargo test --test t_serpapi_integration_live -- --ignored --nocapture`.

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use delulu_serp_travel::{
    FlightSearchParams, HotelSearchParams, SerpApiClient, SerpApiConfig, summarize_flights,
    summarize_hotels,
};
use std::path::Path;

fn client() -> Result<SerpApiClient> {
    let key = std::env::var("SERPAPI_API_KEY").context("SERPAPI_API_KEY not set")?;
    SerpApiClient::new(SerpApiConfig::new(key)?)
}

fn in_days(days: u64) -> NaiveDate {
    chrono::Local::now().date_naive() + Days::new(days)
}

#[tokio::test]
#[ignore]
async fn test_live_round_trip_flights() -> Result<()> {
    let params = FlightSearchParams::builder("SFO".into(), "JFK".into(), in_days(30))
        .return_date(in_days(37))
        .build()?;
    let document = client()?.search_flights(&params).await?;

    let reply = summarize_flights(&document);
    let summary = reply.summary().context("expected flight data")?;
    assert!(summary.total_outbound > 0, "no outbound flights");
    println!("{}", reply.to_json_pretty()?);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_live_hotels() -> Result<()> {
    let params = HotelSearchParams::new("Tokyo Shinjuku".into(), in_days(30), in_days(33))?;
    let document = client()?.search_hotels(&params).await?;

    let reply = summarize_hotels(&document);
    let summary = reply.summary().context("expected hotel data")?;
    assert!(summary.query_details.total_results > 0, "no hotels");
    println!("{}", reply.to_json_pretty()?);
    Ok(())
}

/// Saves fresh provider responses next to the checked-in fixtures for inspection.
#[tokio::test]
#[ignore]
async fn fetch_fixtures() -> Result<()> {
    let client = client()?;
    let base = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests");

    let flights = FlightSearchParams::builder("CDG".into(), "NRT".into(), in_days(45)).build()?;
    let document = client.search_flights(&flights).await?;
    let path = base.join("fixtures-flights-parsing/live_cdg_nrt_one_way.json");
    std::fs::write(&path, serde_json::to_string_pretty(&document)?)?;
    println!("Saved {:?}", path);

    let hotels = HotelSearchParams::new("Paris Le Marais".into(), in_days(45), in_days(47))?;
    let document = client.search_hotels(&hotels).await?;
    let path = base.join("fixtures-hotels-parsing/live_paris.json");
    std::fs::write(&path, serde_json::to_string_pretty(&document)?)?;
    println!("Saved {:?}", path);

    Ok(())
}
