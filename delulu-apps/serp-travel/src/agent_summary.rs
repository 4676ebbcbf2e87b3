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

//! # Agent Summaries
//!
//! Compact projections of normalized flight and hotel results, shaped for
//! LLM agents and terminal output. Result lists are cut to a short,
//! deterministic prefix of the already ordered records.

use serde::Serialize;
use serde_json::Value;

use crate::flights_results_parser::{FlightSearchResult, FlightSegment, Layover, NormalizedFlight};
use crate::hotels_results_parser::{Hotel, HotelSearchResult};
use crate::raw_document::{ExtractError, NOT_AVAILABLE};
use crate::units_format::{format_duration, format_price};

/// Options kept per direction in a flight summary.
pub const MAX_FLIGHT_OPTIONS: usize = 5;

/// Either a summary or the extraction error, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AgentReply<T> {
    Summary(T),
    Error { error: ExtractError },
}

impl<T> From<Result<T, ExtractError>> for AgentReply<T> {
    fn from(result: Result<T, ExtractError>) -> Self {
        match result {
            Ok(summary) => AgentReply::Summary(summary),
            Err(error) => AgentReply::Error { error },
        }
    }
}

impl<T: Serialize> AgentReply<T> {
    pub fn summary(&self) -> Option<&T> {
        match self {
            AgentReply::Summary(summary) => Some(summary),
            AgentReply::Error { .. } => None,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TripType {
    #[serde(rename = "Round Trip")]
    RoundTrip,
    #[serde(rename = "One Way")]
    OneWay,
}

impl std::fmt::Display for TripType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripType::RoundTrip => write!(f, "Round Trip"),
            TripType::OneWay => write!(f, "One Way"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FlightOption {
    pub price: String,
    pub duration: String,
    pub recommended: bool,
    pub departure_time: String,
    pub arrival_time: String,
    pub airlines: String,
    pub stops: usize,
    pub layovers: Vec<String>,
    pub segments: Vec<String>,
    pub carbon_footprint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FlightsSummary {
    pub trip_type: TripType,
    pub route: String,
    pub departure_date: String,
    pub return_date: String,
    pub price_range: String,
    pub typical_price_range: String,
    pub total_outbound: usize,
    pub total_return: usize,
    pub outbound_options: Vec<FlightOption>,
    pub return_options: Vec<FlightOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QueryDetails {
    pub location: String,
    pub check_in: String,
    pub check_out: String,
    pub total_results: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StayPrice {
    pub nightly: String,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HotelOption {
    pub name: String,
    pub class: String,
    pub rating: String,
    pub price: StayPrice,
    pub key_amenities: Vec<String>,
    pub location_highlights: Vec<String>,
    pub booking_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HotelsSummary {
    pub query_details: QueryDetails,
    pub hotel_options: Vec<HotelOption>,
}

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

fn or_na_display<T: std::fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

impl FlightSearchResult {
    pub fn to_agent_summary(&self) -> FlightsSummary {
        let info = &self.search_info;
        let trip_type = if self.is_round_trip() {
            TripType::RoundTrip
        } else {
            TripType::OneWay
        };
        let route = format!(
            "{} ({}) to {} ({})",
            or_na(info.origin.city.as_deref()),
            or_na(info.origin.code.as_deref()),
            or_na(info.destination.city.as_deref()),
            or_na(info.destination.code.as_deref()),
        );

        let insights = &self.price_insights;
        let price_range = match &insights.lowest_price {
            Some(lowest) => format!(
                "${} ({})",
                lowest,
                or_na(insights.price_level.as_deref())
            ),
            None => "Price information not available".to_string(),
        };
        let typical_price_range = insights
            .typical_range
            .as_ref()
            .map_or_else(|| NOT_AVAILABLE.to_string(), |r| format!("${}-${}", r.low, r.high));

        FlightsSummary {
            trip_type,
            route,
            departure_date: or_na(info.departure_date.as_deref()),
            return_date: or_na(info.return_date.as_deref()),
            price_range,
            typical_price_range,
            total_outbound: self.outbound_flights.len(),
            total_return: self.return_flights.len(),
            outbound_options: summarize_options(&self.outbound_flights),
            return_options: summarize_options(&self.return_flights),
        }
    }
}

fn summarize_options(flights: &[NormalizedFlight]) -> Vec<FlightOption> {
    flights
        .iter()
        .take(MAX_FLIGHT_OPTIONS)
        .map(FlightOption::from)
        .collect()
}

impl From<&NormalizedFlight> for FlightOption {
    fn from(flight: &NormalizedFlight) -> Self {
        let mut airlines: Vec<&str> = Vec::new();
        for airline in flight.segments.iter().filter_map(|s| s.airline.as_deref()) {
            if !airlines.contains(&airline) {
                airlines.push(airline);
            }
        }
        let airlines = if airlines.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            airlines.join(", ")
        };

        FlightOption {
            price: format_price(flight.price.as_ref()),
            duration: format_duration(flight.total_duration_minutes),
            recommended: flight.is_recommended,
            departure_time: or_na(
                flight
                    .segments
                    .first()
                    .and_then(|s| s.departure.time.as_deref()),
            ),
            arrival_time: or_na(
                flight
                    .segments
                    .last()
                    .and_then(|s| s.arrival.time.as_deref()),
            ),
            airlines,
            stops: flight.layovers.len(),
            layovers: flight.layovers.iter().map(describe_layover).collect(),
            segments: flight.segments.iter().map(describe_segment).collect(),
            carbon_footprint: flight.carbon_footprint.clone(),
        }
    }
}

/// "1h 10m layover at Denver International Airport (DEN), overnight"
fn describe_layover(layover: &Layover) -> String {
    let mut text = format!(
        "{} layover at {} ({})",
        format_duration(layover.duration_minutes),
        or_na(layover.airport_name.as_deref()),
        or_na(layover.airport_code.as_deref()),
    );
    if layover.overnight {
        text.push_str(", overnight");
    }
    text
}

/// "Delta DL 123: JFK 2025-05-01 06:00 → LAX 2025-05-01 09:35 (5h 35m, Economy, Airbus A321)"
fn describe_segment(segment: &FlightSegment) -> String {
    let mut text = format!(
        "{} {}: {} {} → {} {} ({}, {}, {})",
        or_na(segment.airline.as_deref()),
        or_na(segment.flight_number.as_deref()),
        or_na(segment.departure.code.as_deref()),
        or_na(segment.departure.time.as_deref()),
        or_na(segment.arrival.code.as_deref()),
        or_na(segment.arrival.time.as_deref()),
        format_duration(segment.duration_minutes),
        or_na(segment.travel_class.as_deref()),
        or_na(segment.aircraft.as_deref()),
    );
    if segment.overnight {
        text.push_str(", overnight");
    }
    text
}

impl HotelSearchResult {
    pub fn to_agent_summary(&self) -> HotelsSummary {
        HotelsSummary {
            query_details: QueryDetails {
                location: or_na(self.query.as_deref()),
                check_in: or_na(self.dates.check_in.as_deref()),
                check_out: or_na(self.dates.check_out.as_deref()),
                total_results: self.total_hotels,
            },
            hotel_options: self.hotels().map(HotelOption::from).collect(),
        }
    }
}

impl From<&Hotel> for HotelOption {
    fn from(hotel: &Hotel) -> Self {
        let class = match &hotel.stars {
            Some(stars) => format!("{}★", stars),
            None => or_na(hotel.hotel_class.as_deref()),
        };
        let rating = match &hotel.overall_rating {
            Some(rating) => format!(
                "{}/5 ({} reviews)",
                rating,
                or_na_display(hotel.total_reviews.as_ref())
            ),
            None => "No ratings".to_string(),
        };
        let location_highlights = hotel
            .nearby_places
            .iter()
            .filter_map(|place| {
                let first = place.transportation.first()?;
                Some(format!(
                    "{} ({} by {})",
                    or_na(place.name.as_deref()),
                    or_na(first.duration.as_deref()),
                    or_na(first.kind.as_deref()),
                ))
            })
            .collect();

        HotelOption {
            name: or_na(hotel.name.as_deref()),
            class,
            rating,
            price: StayPrice {
                nightly: or_na(hotel.pricing.per_night.as_deref()),
                total: or_na(hotel.pricing.total.as_deref()),
            },
            key_amenities: hotel.amenities.clone(),
            location_highlights,
            booking_link: or_na(hotel.link.as_deref()),
        }
    }
}

/// Raw flight document straight to an agent reply.
pub fn summarize_flights(document: &Value) -> AgentReply<FlightsSummary> {
    FlightSearchResult::from_document(document)
        .map(|result| result.to_agent_summary())
        .into()
}

/// Raw hotel document straight to an agent reply.
pub fn summarize_hotels(document: &Value) -> AgentReply<HotelsSummary> {
    HotelSearchResult::from_document(document)
        .map(|result| result.to_agent_summary())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn itinerary(price: u64, airlines: &[&str]) -> Value {
        let legs: Vec<Value> = airlines
            .iter()
            .enumerate()
            .map(|(i, airline)| {
                json!({
                    "airline": airline,
                    "flight_number": format!("XX {}", i),
                    "departure_airport": {"id": format!("A{}", i), "time": format!("2025-05-01 0{}:00", i)},
                    "arrival_airport": {"id": format!("A{}", i + 1), "time": format!("2025-05-01 0{}:30", i + 1)},
                    "duration": 90
                })
            })
            .collect();
        let layovers: Vec<Value> = (1..airlines.len())
            .map(|i| json!({"id": format!("A{}", i), "name": "Hub", "duration": 45}))
            .collect();
        json!({"price": price, "total_duration": 225, "flights": legs, "layovers": layovers})
    }

    #[test]
    fn test_trip_type_classification() {
        let one_way = json!({"best_flights": []});
        let round = json!({"search_parameters": {"return_date": "2025-05-10"}, "best_flights": []});
        assert_eq!(
            summarize_flights(&one_way).summary().unwrap().trip_type,
            TripType::OneWay
        );
        assert_eq!(
            summarize_flights(&round).summary().unwrap().trip_type,
            TripType::RoundTrip
        );
        assert_eq!(TripType::RoundTrip.to_string(), "Round Trip");
    }

    #[test]
    fn test_route_and_price_range() {
        let doc = json!({
            "airports": [{
                "departure": [{"airport": {"id": "JFK"}, "city": "New York"}],
                "arrival": [{"airport": {"id": "LAX"}, "city": "Los Angeles"}]
            }],
            "price_insights": {"lowest_price": 289, "price_level": "low", "typical_price_range": [300, 480]},
            "other_flights": []
        });
        let summary = summarize_flights(&doc);
        let summary = summary.summary().unwrap();
        assert_eq!(summary.route, "New York (JFK) to Los Angeles (LAX)");
        assert_eq!(summary.price_range, "$289 (low)");
        assert_eq!(summary.typical_price_range, "$300-$480");

        let bare = summarize_flights(&json!({"other_flights": []}));
        let bare = bare.summary().unwrap();
        assert_eq!(bare.route, "N/A (N/A) to N/A (N/A)");
        assert_eq!(bare.price_range, "Price information not available");
        assert_eq!(bare.return_date, "N/A");
    }

    #[test]
    fn test_options_are_capped_prefix() {
        let flights: Vec<Value> = (0..8).map(|i| itinerary(900 - i * 100, &["Delta"])).collect();
        let doc = json!({"other_flights": flights});
        let reply = summarize_flights(&doc);
        let summary = reply.summary().unwrap();
        assert_eq!(summary.total_outbound, 8);
        assert_eq!(summary.outbound_options.len(), MAX_FLIGHT_OPTIONS);
        let prices: Vec<_> = summary.outbound_options.iter().map(|o| o.price.as_str()).collect();
        assert_eq!(prices, ["$200", "$300", "$400", "$500", "$600"]);
        assert!(summary.return_options.is_empty());
    }

    #[test]
    fn test_option_details() {
        let doc = json!({"best_flights": [itinerary(450, &["United", "Lufthansa", "United"])]});
        let reply = summarize_flights(&doc);
        let option = &reply.summary().unwrap().outbound_options[0];
        assert_eq!(option.price, "$450");
        assert_eq!(option.duration, "3h 45m");
        assert!(option.recommended);
        assert_eq!(option.airlines, "United, Lufthansa");
        assert_eq!(option.stops, 2);
        assert_eq!(option.departure_time, "2025-05-01 00:00");
        assert_eq!(option.arrival_time, "2025-05-01 03:30");
        assert_eq!(option.layovers[0], "45m layover at Hub (A1)");
        assert_eq!(
            option.segments[1],
            "Lufthansa XX 1: A1 2025-05-01 01:00 → A2 2025-05-01 02:30 (1h 30m, N/A, N/A)"
        );
    }

    #[test]
    fn test_no_data_passes_through() {
        let reply = summarize_flights(&json!({}));
        assert_eq!(
            reply,
            AgentReply::Error {
                error: ExtractError::NoFlightData
            }
        );
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"error": "No flight data found or invalid response format"})
        );

        let reply = summarize_hotels(&json!({"search_parameters": {"q": "Rome"}}));
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"error": "No hotel data found or invalid response format"})
        );
    }

    #[test]
    fn test_half_star_class_rendered_as_sent() {
        let doc = json!({"properties": [
            {"extracted_hotel_class": 3.5, "hotel_class": "3.5-star hotel"},
            {"extracted_hotel_class": 5, "hotel_class": "5-star hotel"}
        ]});
        let reply = summarize_hotels(&doc);
        let options = &reply.summary().unwrap().hotel_options;
        assert_eq!(options[0].class, "3.5★");
        assert_eq!(options[1].class, "5★");
    }

    #[test]
    fn test_hotel_option_formatting() {
        let doc = json!({
            "search_parameters": {"q": "Lisbon hotels", "check_in_date": "2025-06-01", "check_out_date": "2025-06-04"},
            "properties": [
                {
                    "name": "Casa Azul",
                    "extracted_hotel_class": 4,
                    "hotel_class": "4-star hotel",
                    "overall_rating": 4.6,
                    "reviews": 812,
                    "rate_per_night": {"lowest": "$140"},
                    "nearby_places": [
                        {"name": "Alfama", "transportations": [{"type": "Walking", "duration": "6 min"}, {"type": "Taxi", "duration": "3 min"}]},
                        {"name": "Nowhere"}
                    ],
                    "amenities": ["Free Wi-Fi"]
                },
                {"name": "Hostel Norte", "hotel_class": "Budget", "overall_rating": 3.9},
                {}
            ]
        });
        let reply = summarize_hotels(&doc);
        let summary = reply.summary().unwrap();
        assert_eq!(summary.query_details.location, "Lisbon hotels");
        assert_eq!(summary.query_details.total_results, 3);

        let casa = &summary.hotel_options[0];
        assert_eq!(casa.class, "4★");
        assert_eq!(casa.rating, "4.6/5 (812 reviews)");
        assert_eq!(casa.price.nightly, "$140");
        assert_eq!(casa.price.total, "N/A");
        assert_eq!(casa.location_highlights, ["Alfama (6 min by Walking)"]);
        assert_eq!(casa.key_amenities, ["Free Wi-Fi"]);

        let hostel = &summary.hotel_options[1];
        assert_eq!(hostel.class, "Budget");
        assert_eq!(hostel.rating, "3.9/5 (N/A reviews)");

        let empty = &summary.hotel_options[2];
        assert_eq!(empty.name, "N/A");
        assert_eq!(empty.class, "N/A");
        assert_eq!(empty.rating, "No ratings");
        assert_eq!(empty.booking_link, "N/A");
    }
}
