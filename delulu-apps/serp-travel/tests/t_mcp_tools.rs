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

//! Command-line smoke tests for the shipped binaries.

use anyhow::Result;
use serde_json::Value;
use std::path::PathBuf;
use tokio::process::Command;

const FLIGHTS_BIN: &str = env!("CARGO_BIN_EXE_delulu-serp-flights");
const HOTELS_BIN: &str = env!("CARGO_BIN_EXE_delulu-serp-hotels");
const MCP_BIN: &str = env!("CARGO_BIN_EXE_delulu-serp-mcp");

fn fixture(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join(relative)
}

#[tokio::test]
async fn test_mcp_help_output() -> Result<()> {
    let output = Command::new(MCP_BIN).arg("--help").output().await?;

    assert!(output.status.success(), "Help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("delulu-serp-mcp"), "Help should show binary name");
    assert!(stdout.contains("stdio"), "Help should show stdio command");
    assert!(stdout.contains("http"), "Help should show http command");
    assert!(stdout.contains("--api-key"), "Help should show the API key option");

    Ok(())
}

#[tokio::test]
async fn test_version_output() -> Result<()> {
    for bin in [FLIGHTS_BIN, HOTELS_BIN, MCP_BIN] {
        let output = Command::new(bin).arg("--version").output().await?;
        assert!(output.status.success(), "{} --version should succeed", bin);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("0.1.0"), "Version should show 0.1.0: {}", stdout);
    }
    Ok(())
}

#[tokio::test]
async fn test_flights_cli_requires_route_without_input() -> Result<()> {
    let output = Command::new(FLIGHTS_BIN)
        .args(["--to", "LAX"])
        .env_remove("SERPAPI_API_KEY")
        .output()
        .await?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--from"), "clap should name the missing argument: {}", stderr);
    Ok(())
}

#[tokio::test]
async fn test_flights_cli_json_from_input() -> Result<()> {
    let output = Command::new(FLIGHTS_BIN)
        .arg("--input")
        .arg(fixture("fixtures-flights-parsing/jfk_lax_round_trip.json"))
        .arg("--json")
        .output()
        .await?;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let summary: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(summary["route"], "New York (JFK) to Los Angeles (LAX)");
    assert_eq!(summary["outbound_options"].as_array().map(Vec::len), Some(4));
    Ok(())
}

#[tokio::test]
async fn test_flights_cli_table_from_input() -> Result<()> {
    let output = Command::new(FLIGHTS_BIN)
        .arg("--input")
        .arg(fixture("fixtures-flights-parsing/jfk_lax_round_trip.json"))
        .output()
        .await?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("$214"), "table should list the cheapest fare: {}", stdout);
    assert!(stdout.contains("Frontier"));
    Ok(())
}

#[tokio::test]
async fn test_flights_cli_no_data_exits_with_error() -> Result<()> {
    let dir = std::env::temp_dir().join(format!("delulu-serp-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let input = dir.join("empty.json");
    std::fs::write(&input, "{}")?;

    let output = Command::new(FLIGHTS_BIN).arg("--input").arg(&input).output().await?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No flight data found"), "{}", stderr);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[tokio::test]
async fn test_hotels_cli_writes_output_file() -> Result<()> {
    let dir = std::env::temp_dir().join(format!("delulu-serp-hotels-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let out = dir.join("summary.json");

    let output = Command::new(HOTELS_BIN)
        .arg("--input")
        .arg(fixture("fixtures-hotels-parsing/new_york.json"))
        .arg("--output")
        .arg(&out)
        .args(["-n", "1"])
        .output()
        .await?;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("The Manhattan at Times Square Hotel"));
    assert!(!stdout.contains("Pod 39"), "limit should cap the table: {}", stdout);

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&out)?)?;
    assert_eq!(saved["hotel_options"].as_array().map(Vec::len), Some(3));

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
