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

// Library for delulu-serp-travel
// Normalizes SerpAPI flight and hotel results into agent-ready summaries

pub mod agent_summary;
pub mod flights_results_parser;
pub mod hotels_results_parser;
pub mod raw_document;
mod serpapi_query_builder;
mod serpapi_search;
pub mod units_format;

// Re-export the extraction pipeline
pub use agent_summary::{
    AgentReply, FlightOption, FlightsSummary, HotelOption, HotelsSummary, TripType,
    summarize_flights, summarize_hotels,
};
pub use flights_results_parser::{FlightSearchResult, NormalizedFlight};
pub use hotels_results_parser::{Hotel, HotelSearchResult};
pub use raw_document::{ExtractError, NOT_AVAILABLE};

// Re-export the SerpAPI client
pub use serpapi_query_builder::{
    ConfigError, FlightSearchParams, HotelSearchParams, SERPAPI_BASE_URL, SerpApiConfig,
    build_search_url,
};
pub use serpapi_search::SerpApiClient;
