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

//! # Unified MCP Server Entry Point
//!
//! Supports stdio and streamable HTTP transports via subcommand.

use anyhow::{Context, Error, Result};
use clap::{Parser, Subcommand};
use delulu_serp_travel::{
    FlightSearchParams, HotelSearchParams, SerpApiClient, SerpApiConfig, summarize_flights,
    summarize_hotels,
};
use rmcp::handler::server::{ServerHandler, tool::ToolRouter, wrapper::Parameters};
use rmcp::service::serve_server;
use rmcp::tool;
use rmcp::tool_router;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "delulu-serp-mcp")]
#[command(
    author,
    version,
    about = "MCP server for travel search summaries (flights & hotels)"
)]
struct Args {
    /// SerpAPI key
    #[arg(long, env = "SERPAPI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run MCP server over stdio (for Claude Desktop, etc.)
    Stdio,

    /// Run MCP server over HTTP
    Http {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct FlightsInput {
    pub from: String,
    pub to: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    /// Previously fetched SerpAPI response to summarize instead of searching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_document: Option<Value>,
}

#[derive(Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub struct HotelsInput {
    pub location: String,
    pub checkin_date: String,
    pub checkout_date: String,
    /// Previously fetched SerpAPI response to summarize instead of searching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_document: Option<Value>,
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

#[derive(Clone)]
pub struct TravelAgentServer {
    client: Option<Arc<SerpApiClient>>,
    tool_router: ToolRouter<Self>,
}

impl TravelAgentServer {
    pub fn new(client: Option<Arc<SerpApiClient>>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    fn client(&self) -> Result<&SerpApiClient, String> {
        self.client
            .as_deref()
            .ok_or_else(|| "No SerpAPI key configured; pass raw_document or set SERPAPI_API_KEY".to_string())
    }
}

#[tool_router]
impl TravelAgentServer {
    #[tool(
        name = "search_flights",
        description = "Search flights via SerpAPI Google Flights and return a compact summary. Parameters: from (IATA), to (IATA), date (YYYY-MM-DD), return_date (YYYY-MM-DD, optional), raw_document (optional SerpAPI response to summarize offline)."
    )]
    async fn search_flights(&self, params: Parameters<FlightsInput>) -> Result<String, String> {
        let input = params.0;

        let document = match input.raw_document {
            Some(document) => document,
            None => {
                let mut builder =
                    FlightSearchParams::builder(input.from, input.to, parse_date(&input.date)?);
                if let Some(rd) = &input.return_date {
                    builder = builder.return_date(parse_date(rd)?);
                }
                let params = builder.build().map_err(|e| format!("{e:#}"))?;
                self.client()?
                    .search_flights(&params)
                    .await
                    .map_err(|e| format!("Flight search failed: {e:#}"))?
            }
        };

        serde_json::to_string(&summarize_flights(&document)).map_err(|e| e.to_string())
    }

    #[tool(
        name = "search_hotels",
        description = "Search hotels via SerpAPI Google Hotels and return a compact summary. Parameters: location (city/area/POI), checkin_date (YYYY-MM-DD), checkout_date (YYYY-MM-DD), raw_document (optional SerpAPI response to summarize offline)."
    )]
    async fn search_hotels(&self, params: Parameters<HotelsInput>) -> Result<String, String> {
        let input = params.0;

        let document = match input.raw_document {
            Some(document) => document,
            None => {
                let params = HotelSearchParams::new(
                    input.location,
                    parse_date(&input.checkin_date)?,
                    parse_date(&input.checkout_date)?,
                )
                .map_err(|e| format!("{e:#}"))?;
                self.client()?
                    .search_hotels(&params)
                    .await
                    .map_err(|e| format!("Hotel search failed: {e:#}"))?
            }
        };

        serde_json::to_string(&summarize_hotels(&document)).map_err(|e| e.to_string())
    }
}

impl ServerHandler for TravelAgentServer {
    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::ListToolsResult, rmcp::ErrorData>> + Send + '_
    {
        tracing::debug!(
            "list_tools called, tools count: {}",
            self.tool_router.list_all().len()
        );
        Box::pin(async move {
            let tools = self.tool_router.list_all();
            Ok(rmcp::model::ListToolsResult::with_all_items(tools))
        })
    }

    fn call_tool(
        &self,
        request: rmcp::model::CallToolRequestParam,
        context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::CallToolResult, rmcp::ErrorData>> + Send + '_
    {
        let router = self.tool_router.clone();
        let self_clone = self.clone();
        Box::pin(async move {
            let context =
                rmcp::handler::server::tool::ToolCallContext::new(&self_clone, request, context);
            router.call(context).await
        })
    }

    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::V_2025_03_26,
            capabilities: rmcp::model::ServerCapabilities {
                tools: Some(rmcp::model::ToolsCapability::default()),
                ..Default::default()
            },
            server_info: rmcp::model::Implementation::from_build_env(),
            instructions: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".to_string().into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();

    let client = match args.api_key.as_deref().map(SerpApiConfig::new) {
        Some(Ok(config)) => Some(Arc::new(
            SerpApiClient::new(config).context("Failed to create SerpAPI client")?,
        )),
        Some(Err(e)) => {
            tracing::warn!("Invalid SERPAPI_API_KEY ({}), only raw_document summaries are available", e);
            None
        }
        None => {
            tracing::warn!("SERPAPI_API_KEY not set, only raw_document summaries are available");
            None
        }
    };

    match args.command {
        Command::Stdio => {
            eprintln!("Starting MCP server over stdio...");
            let server = TravelAgentServer::new(client);
            let (stdin, stdout) = rmcp::transport::io::stdio();
            let _running = serve_server(Arc::new(server), (stdin, stdout))
                .await
                .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;
            tracing::debug!("Server running. Press Ctrl+C to stop.");
            std::future::pending::<()>().await;
        }
        Command::Http { host, port } => {
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .context("Invalid host:port")?;
            tracing::info!("Starting MCP server over HTTP on {}", addr);
            let server = TravelAgentServer::new(client);
            let session_manager = Arc::new(LocalSessionManager::default());
            let config = StreamableHttpServerConfig {
                stateful_mode: true,
                ..Default::default()
            };
            let service =
                StreamableHttpService::new(move || Ok(server.clone()), session_manager, config);
            let app = axum::Router::new().nest_service("/mcp", service);
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .context("Failed to bind to address")?;
            axum::serve(listener, app)
                .await
                .context("HTTP server error")?;
        }
    }

    Ok(())
}
