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

//! # Flights Results Parser
//!
//! Side-effect free normalization of Google Flights search results
//! as returned by SerpAPI. Recommended and other itineraries are merged,
//! sorted by price and split into outbound and return legs.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::raw_document::PathSegment::{Index, Key};
use crate::raw_document::{
    ExtractError, get_array, get_bool, get_number, get_str, get_u64, lookup, node, or_na,
};
use crate::units_format::format_carbon;

/// Trip-leg tag marking an itinerary as part of the return journey.
const RETURNING_TAG: &str = "returning";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LocationInfo {
    #[serde(with = "or_na")]
    pub code: Option<String>,
    #[serde(with = "or_na")]
    pub name: Option<String>,
    #[serde(with = "or_na")]
    pub city: Option<String>,
    #[serde(with = "or_na")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: Number,
    pub high: Number,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PriceInsights {
    #[serde(with = "or_na")]
    pub lowest_price: Option<Number>,
    #[serde(with = "or_na")]
    pub price_level: Option<String>,
    #[serde(with = "or_na")]
    pub typical_range: Option<PriceRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AirportTime {
    #[serde(with = "or_na")]
    pub code: Option<String>,
    #[serde(with = "or_na")]
    pub name: Option<String>,
    #[serde(with = "or_na")]
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FlightSegment {
    #[serde(with = "or_na")]
    pub airline: Option<String>,
    #[serde(with = "or_na")]
    pub flight_number: Option<String>,
    #[serde(with = "or_na")]
    pub aircraft: Option<String>,
    pub departure: AirportTime,
    pub arrival: AirportTime,
    #[serde(with = "or_na")]
    pub duration_minutes: Option<u64>,
    #[serde(with = "or_na")]
    pub travel_class: Option<String>,
    pub features: Vec<String>,
    pub overnight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Layover {
    #[serde(with = "or_na")]
    pub airport_code: Option<String>,
    #[serde(with = "or_na")]
    pub airport_name: Option<String>,
    #[serde(with = "or_na")]
    pub duration_minutes: Option<u64>,
    pub overnight: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripLeg {
    Outbound,
    Return,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NormalizedFlight {
    #[serde(with = "or_na")]
    pub price: Option<Number>,
    pub is_recommended: bool,
    #[serde(with = "or_na")]
    pub total_duration_minutes: Option<u64>,
    pub carbon_footprint: String,
    pub segments: Vec<FlightSegment>,
    pub layovers: Vec<Layover>,
    pub trip_leg: TripLeg,
}

impl NormalizedFlight {
    /// Sort key: unknown prices compare as +inf.
    fn price_key(&self) -> f64 {
        self.price
            .as_ref()
            .and_then(Number::as_f64)
            .unwrap_or(f64::INFINITY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchInfo {
    pub origin: LocationInfo,
    pub destination: LocationInfo,
    #[serde(with = "or_na")]
    pub departure_date: Option<String>,
    #[serde(with = "or_na")]
    pub return_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FlightSearchResult {
    pub search_info: SearchInfo,
    pub price_insights: PriceInsights,
    pub outbound_flights: Vec<NormalizedFlight>,
    pub return_flights: Vec<NormalizedFlight>,
}

impl FlightSearchResult {
    pub fn from_document(document: &Value) -> Result<Self, ExtractError> {
        if !has_flight_collections(document) {
            if let Some(message) = get_str(document, &[Key("error")]) {
                tracing::warn!("Provider returned an error instead of flights: {}", message);
            } else {
                tracing::warn!("No flight collections in provider response");
            }
            return Err(ExtractError::NoFlightData);
        }

        let search_info = SearchInfo {
            origin: parse_location(document, "departure"),
            destination: parse_location(document, "arrival"),
            departure_date: get_str(document, &[Key("search_parameters"), Key("outbound_date")]),
            return_date: get_str(document, &[Key("search_parameters"), Key("return_date")]),
        };
        let price_insights = parse_price_insights(document);

        let mut pool: Vec<NormalizedFlight> = get_array(document, &[Key("best_flights")])
            .iter()
            .map(|raw| parse_flight(raw, true))
            .chain(
                get_array(document, &[Key("other_flights")])
                    .iter()
                    .map(|raw| parse_flight(raw, false)),
            )
            .collect();
        sort_by_price(&mut pool);

        let (return_flights, outbound_flights): (Vec<_>, Vec<_>) = pool
            .into_iter()
            .partition(|f| f.trip_leg == TripLeg::Return);

        tracing::debug!(
            "Normalized {} outbound and {} return itineraries",
            outbound_flights.len(),
            return_flights.len()
        );

        Ok(Self {
            search_info,
            price_insights,
            outbound_flights,
            return_flights,
        })
    }

    pub fn len(&self) -> usize {
        self.outbound_flights.len() + self.return_flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outbound_flights.is_empty() && self.return_flights.is_empty()
    }

    pub fn is_round_trip(&self) -> bool {
        self.search_info.return_date.is_some()
    }
}

fn has_flight_collections(document: &Value) -> bool {
    match document.as_object() {
        Some(map) if !map.is_empty() => {
            !node(document, &[Key("best_flights")]).is_absent()
                || !node(document, &[Key("other_flights")]).is_absent()
        }
        _ => false,
    }
}

/// Stable ascending sort; itineraries without a price keep their relative
/// order at the end.
pub fn sort_by_price(flights: &mut [NormalizedFlight]) {
    flights.sort_by(|a, b| a.price_key().total_cmp(&b.price_key()));
}

fn parse_location(document: &Value, direction: &str) -> LocationInfo {
    let entry = lookup(document, &[Key("airports"), Index(0), Key(direction), Index(0)]);
    let Some(entry) = entry else {
        return LocationInfo::default();
    };
    LocationInfo {
        code: get_str(entry, &[Key("airport"), Key("id")]),
        name: get_str(entry, &[Key("airport"), Key("name")]),
        city: get_str(entry, &[Key("city")]),
        country: get_str(entry, &[Key("country")]),
    }
}

fn parse_price_insights(document: &Value) -> PriceInsights {
    let Some(insights) = lookup(document, &[Key("price_insights")]) else {
        return PriceInsights::default();
    };
    let low = get_number(insights, &[Key("typical_price_range"), Index(0)]);
    let high = get_number(insights, &[Key("typical_price_range"), Index(1)]);
    let typical_range = match (low, high) {
        (Some(low), Some(high)) => Some(PriceRange { low, high }),
        _ => None,
    };
    PriceInsights {
        lowest_price: get_number(insights, &[Key("lowest_price")]),
        price_level: get_str(insights, &[Key("price_level")]),
        typical_range,
    }
}

fn parse_trip_leg(raw: &Value) -> TripLeg {
    match get_str(raw, &[Key("type")]) {
        Some(tag) if tag.eq_ignore_ascii_case(RETURNING_TAG) => TripLeg::Return,
        _ => TripLeg::Outbound,
    }
}

fn parse_flight(raw: &Value, is_recommended: bool) -> NormalizedFlight {
    let segments = get_array(raw, &[Key("flights")])
        .iter()
        .map(parse_segment)
        .collect();
    let layovers = get_array(raw, &[Key("layovers")])
        .iter()
        .map(parse_layover)
        .collect();

    let emissions = Key("carbon_emissions");
    let this_flight = get_number(raw, &[emissions, Key("this_flight")]);
    let typical = get_number(raw, &[emissions, Key("typical_for_this_route")]);
    let difference = get_number(raw, &[emissions, Key("difference_percent")]);

    NormalizedFlight {
        price: get_number(raw, &[Key("price")]),
        is_recommended,
        total_duration_minutes: get_u64(raw, &[Key("total_duration")]),
        carbon_footprint: format_carbon(this_flight.as_ref(), typical.as_ref(), difference.as_ref()),
        segments,
        layovers,
        trip_leg: parse_trip_leg(raw),
    }
}

fn parse_airport_time(raw: &Value, key: &str) -> AirportTime {
    AirportTime {
        code: get_str(raw, &[Key(key), Key("id")]),
        name: get_str(raw, &[Key(key), Key("name")]),
        time: get_str(raw, &[Key(key), Key("time")]),
    }
}

fn parse_segment(raw: &Value) -> FlightSegment {
    let features = get_array(raw, &[Key("extensions")])
        .iter()
        .filter_map(|f| f.as_str().map(str::to_string))
        .collect();

    FlightSegment {
        airline: get_str(raw, &[Key("airline")]),
        flight_number: get_str(raw, &[Key("flight_number")]),
        aircraft: get_str(raw, &[Key("airplane")]),
        departure: parse_airport_time(raw, "departure_airport"),
        arrival: parse_airport_time(raw, "arrival_airport"),
        duration_minutes: get_u64(raw, &[Key("duration")]),
        travel_class: get_str(raw, &[Key("travel_class")]),
        features,
        overnight: get_bool(raw, &[Key("overnight")]).unwrap_or(false),
    }
}

fn parse_layover(raw: &Value) -> Layover {
    Layover {
        airport_code: get_str(raw, &[Key("id")]),
        airport_name: get_str(raw, &[Key("name")]),
        duration_minutes: get_u64(raw, &[Key("duration")]),
        overnight: get_bool(raw, &[Key("overnight")]).unwrap_or(false),
    }
}
