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
//!
//! # Examples
//!
//! ## Basic search
//!
//! ```bash
//! delulu-serp-hotels -L "New York hotels" -i 2026-05-01 -o 2026-05-05
//! ```
//!
//! ## Summarize a saved response as JSON
//!
//! ```bash
//! delulu-serp-hotels --input raw_hotels.json --json --output formatted_hotel_data.json
//! ```
//!
//! # Output
//!
//! The tool prints the query details followed by matching hotels with:
//! - Name and star class
//! - Nightly and total price
//! - Guest rating and review count
//! - Key amenities and nearby places

use anyhow::{Context, Result};
use clap::Parser;
use delulu_serp_travel::{
    AgentReply, HotelSearchParams, HotelsSummary, SerpApiClient, SerpApiConfig, summarize_hotels,
};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "delulu-serp-hotels")]
#[command(version = "0.1.0")]
#[command(about = "Search hotels via SerpAPI Google Hotels")]
struct Args {
    #[arg(short = 'L', long, required_unless_present = "input")]
    location: Option<String>,
    #[arg(short = 'i', long, required_unless_present = "input")]
    checkin: Option<String>,
    #[arg(short = 'o', long, required_unless_present = "input")]
    checkout: Option<String>,
    #[arg(long, env = "SERPAPI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, help = "Summarize a saved SerpAPI response instead of searching")]
    input: Option<PathBuf>,
    #[arg(long, help = "Save the raw SerpAPI response to file")]
    save_raw: bool,
    #[arg(long, help = "Print the agent summary as JSON")]
    json: bool,
    #[arg(long, help = "Write the agent summary as JSON to this file")]
    output: Option<PathBuf>,
    #[arg(short = 'n', long, default_value = "10")]
    limit: usize,
    #[arg(short, long)]
    verbose: bool,
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date: {}", s))
}

async fn fetch_document(args: &Args) -> Result<Value> {
    let (Some(location), Some(checkin), Some(checkout)) =
        (&args.location, &args.checkin, &args.checkout)
    else {
        anyhow::bail!("--location, --checkin and --checkout are required without --input");
    };
    let request = HotelSearchParams::new(
        location.clone(),
        parse_date(checkin)?,
        parse_date(checkout)?,
    )?;

    let config = SerpApiConfig::new(args.api_key.clone().unwrap_or_default())?;
    let client = SerpApiClient::new(config)?;
    let document = client.search_hotels(&request).await?;

    if args.save_raw {
        let filename = format!("debug_hotels_{}.json", location.replace(' ', "_"));
        std::fs::write(&filename, serde_json::to_string_pretty(&document)?)
            .context("Failed to write raw response file")?;
        tracing::info!("Saved raw response to {}", filename);
    }

    Ok(document)
}

fn render_summary(summary: &HotelsSummary, limit: usize) {
    let details = &summary.query_details;
    println!("\n🏨 Google Hotels Search");
    println!("=======================");
    println!("Location: {}", details.location);
    println!("Dates: {} to {}", details.check_in, details.check_out);
    println!("=======================");

    if summary.hotel_options.is_empty() {
        println!("No hotels found.");
        return;
    }

    println!("Found {} hotel(s)\n", details.total_results);
    for (i, hotel) in summary.hotel_options.iter().take(limit).enumerate() {
        println!("{}. {}", i + 1, hotel.name);
        println!("   {}", hotel.class);
        println!(
            "   Price: {} / night ({} total)",
            hotel.price.nightly, hotel.price.total
        );
        println!("   Rating: {}", hotel.rating);
        if !hotel.key_amenities.is_empty() {
            println!("   Amenities: {}", hotel.key_amenities.join(", "));
        }
        for highlight in &hotel.location_highlights {
            println!("   Nearby: {}", highlight);
        }
        println!("   Book: {}", hotel.booking_link);
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let document: Value = match &args.input {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .context(format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw).context("Input is not valid JSON")?
        }
        None => match fetch_document(&args).await {
            Ok(document) => document,
            Err(e) => {
                eprintln!("Search failed: {:#}", e);
                std::process::exit(1);
            }
        },
    };

    let reply = summarize_hotels(&document);

    if let Some(path) = &args.output {
        std::fs::write(path, reply.to_json_pretty()?).context("Failed to write summary file")?;
        tracing::info!("Data saved to {}", path.display());
    }

    if args.json {
        println!("{}", reply.to_json_pretty()?);
        return Ok(());
    }

    match &reply {
        AgentReply::Summary(summary) => render_summary(summary, args.limit),
        AgentReply::Error { error } => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    }
    Ok(())
}
