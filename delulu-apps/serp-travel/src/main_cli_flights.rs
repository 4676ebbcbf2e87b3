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

//! CLI for SerpAPI Google Flights search.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use delulu_serp_travel::{
    AgentReply, FlightOption, FlightSearchParams, FlightsSummary, SerpApiClient, SerpApiConfig,
    summarize_flights,
};
use serde_json::Value;
use std::cmp::max;
use std::path::PathBuf;
use term_size;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "delulu-serp-flights")]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Origin airport code (e.g., JFK, SFO)
    #[arg(short, long, required_unless_present = "input")]
    from: Option<String>,

    /// Destination airport code (e.g., LAX, LHR)
    #[arg(short, long, required_unless_present = "input")]
    to: Option<String>,

    /// Departure date (YYYY-MM-DD or YYYY/MM/DD)
    #[arg(short, long, required_unless_present = "input")]
    date: Option<String>,

    /// Return date for round trips (YYYY-MM-DD or YYYY/MM/DD)
    #[arg(short = 'R', long)]
    return_date: Option<String>,

    /// SerpAPI key
    #[arg(long, env = "SERPAPI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Summarize a saved SerpAPI response instead of searching
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Save the raw SerpAPI response to file for debugging
    #[arg(long)]
    save_raw: bool,

    /// Print the agent summary as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Write the agent summary as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

/// Configure logging based on verbosity level
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse date string to NaiveDate
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .context(format!(
            "Invalid date format: {}. Use YYYY-MM-DD or YYYY/MM/DD",
            s
        ))
}

/// Get terminal width for responsive tables
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn dash_bar() -> String {
    "-".repeat(get_terminal_width().min(100))
}

/// Trim a cell to `width` characters, marking the cut with an ellipsis.
fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// "08:00 → 11:35" from "2025-05-01 08:00" style timestamps
fn fmt_times(option: &FlightOption) -> String {
    let clock = |s: &str| s.rsplit(' ').next().unwrap_or(s).to_string();
    format!(
        "{} → {}",
        clock(&option.departure_time),
        clock(&option.arrival_time)
    )
}

fn fmt_stops(option: &FlightOption) -> String {
    match option.stops {
        0 => "direct".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{} stops", n),
    }
}

/// Calculate terminal-aware column widths
fn calc_column_widths(options: &[&FlightOption]) -> (usize, usize, usize, usize) {
    let mut max_airline = 7;
    let mut max_times = 15;
    let mut max_duration = 10;
    let mut max_stops = 8;

    for option in options {
        max_airline = max(max_airline, option.airlines.chars().count());
        max_times = max(max_times, fmt_times(option).chars().count());
        max_duration = max(max_duration, option.duration.len());
        max_stops = max(max_stops, fmt_stops(option).len());
    }

    let terminal_width = get_terminal_width();
    let available_width = terminal_width.saturating_sub(25);
    let total_content = max_airline + max_times + max_duration + max_stops;

    if total_content > available_width && available_width > 50 {
        let ratio = available_width as f64 / total_content as f64;
        max_airline = max((max_airline as f64 * ratio).floor() as usize, 4);
        max_times = max((max_times as f64 * ratio).floor() as usize, 10);
        max_duration = max((max_duration as f64 * ratio).floor() as usize, 5);
        max_stops = max((max_stops as f64 * ratio).floor() as usize, 6);
    }

    (max_airline, max_times, max_duration, max_stops)
}

fn render_section(title: &str, options: &[FlightOption]) {
    if options.is_empty() {
        return;
    }
    let refs: Vec<&FlightOption> = options.iter().collect();
    let (aw, tw, dw, sw) = calc_column_widths(&refs);

    println!("\n{} (top {}):", title, options.len());
    println!("{}", dash_bar());
    println!(
        "  {:>3}  {:<aw$}  {:<tw$}  {:<dw$}  {:<sw$}   PRICE",
        "#",
        "AIRLINE",
        "DEP → ARR",
        "DURATION",
        "STOPS",
        aw = aw,
        tw = tw,
        dw = dw,
        sw = sw
    );
    println!("{}", dash_bar());

    for (i, option) in options.iter().enumerate() {
        let star = if option.recommended { " ★" } else { "" };
        println!(
            "  {:>3}  {:<aw$}  {:<tw$}  {:<dw$}  {:<sw$}   {}{}",
            i + 1,
            fit(&option.airlines, aw),
            fit(&fmt_times(option), tw),
            fit(&option.duration, dw),
            fit(&fmt_stops(option), sw),
            option.price,
            star,
            aw = aw,
            tw = tw,
            dw = dw,
            sw = sw
        );
        for layover in &option.layovers {
            println!("        ↳ {}", layover);
        }
    }
}

/// Render results to stdout
fn render_summary(summary: &FlightsSummary) {
    let title_bar = format!(
        "================================================================================================\n  🛫  {} on {} ({})\n================================================================================================",
        summary.route, summary.departure_date, summary.trip_type
    );
    println!("{}\n", title_bar);

    println!("💰 Price range:   {}", summary.price_range);
    println!("📈 Typical range: {}", summary.typical_price_range);
    println!(
        "📊 Total Flights: {} outbound, {} return",
        summary.total_outbound, summary.total_return
    );

    render_section("🏆 Outbound", &summary.outbound_options);
    render_section("🔁 Return", &summary.return_options);
}

async fn fetch_document(args: &CliArgs) -> Result<Value> {
    let (Some(from), Some(to), Some(date)) = (&args.from, &args.to, &args.date) else {
        anyhow::bail!("--from, --to and --date are required without --input");
    };
    let depart_date = parse_date(date)?;
    let return_date = args.return_date.as_deref().map(parse_date).transpose()?;

    let mut builder = FlightSearchParams::builder(from.clone(), to.clone(), depart_date);
    if let Some(rd) = return_date {
        builder = builder.return_date(rd);
    }
    let params = builder
        .build()
        .context("Failed to build search parameters")?;

    let config = SerpApiConfig::new(args.api_key.clone().unwrap_or_default())?;
    let client = SerpApiClient::new(config)?;
    let document = client
        .search_flights(&params)
        .await
        .context("Search failed")?;

    if args.save_raw {
        let filename = format!("debug_{}_{}.json", params.from_airport, params.to_airport);
        std::fs::write(&filename, serde_json::to_string_pretty(&document)?)
            .context("Failed to write raw response file")?;
        tracing::info!("Saved raw response to {}", filename);
    }

    Ok(document)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    tracing::info!("Starting delulu-serp-flights CLI");

    let document: Value = match &args.input {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .context(format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw).context("Input is not valid JSON")?
        }
        None => fetch_document(&args).await?,
    };

    let reply = summarize_flights(&document);

    if let Some(path) = &args.output {
        std::fs::write(path, reply.to_json_pretty()?).context("Failed to write summary file")?;
        tracing::info!("Summary saved to {}", path.display());
    }

    if args.json {
        println!("{}", reply.to_json_pretty()?);
        return Ok(());
    }

    match &reply {
        AgentReply::Summary(summary) => render_summary(summary),
        AgentReply::Error { error } => {
            eprintln!("Search failed: {}", error);
            std::process::exit(1);
        }
    }

    Ok(())
}
