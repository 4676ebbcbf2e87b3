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

//! # Hotels Results Parser
//!
//! Side-effect free normalization of Google Hotels search results
//! as returned by SerpAPI. Property order is kept as sent; nested lists
//! are cut to a fixed prefix.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::raw_document::PathSegment::Key;
use crate::raw_document::{
    ExtractError, NOT_AVAILABLE, get_array, get_number, get_str, get_text, get_u64, node, or_na,
};

pub const MAX_PROVIDERS: usize = 3;
pub const MAX_AMENITIES: usize = 10;
pub const MAX_NEARBY_PLACES: usize = 3;
pub const MAX_TRANSPORTATIONS: usize = 2;
pub const MAX_IMAGES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: Number,
    pub longitude: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderRate {
    #[serde(with = "or_na")]
    pub source: Option<String>,
    #[serde(with = "or_na")]
    pub rate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transportation {
    #[serde(rename = "type", with = "or_na")]
    pub kind: Option<String>,
    #[serde(with = "or_na")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NearbyPlace {
    #[serde(with = "or_na")]
    pub name: Option<String>,
    pub transportation: Vec<Transportation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HotelPricing {
    #[serde(with = "or_na")]
    pub per_night: Option<String>,
    #[serde(with = "or_na")]
    pub total: Option<String>,
    pub providers: Vec<ProviderRate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Hotel {
    #[serde(with = "or_na")]
    pub name: Option<String>,
    #[serde(rename = "type", with = "or_na")]
    pub kind: Option<String>,
    #[serde(with = "or_na")]
    pub hotel_class: Option<String>,
    #[serde(with = "or_na")]
    pub stars: Option<Number>,
    #[serde(with = "or_na")]
    pub overall_rating: Option<Number>,
    #[serde(with = "or_na")]
    pub total_reviews: Option<u64>,
    #[serde(with = "or_na")]
    pub coordinates: Option<Coordinates>,
    #[serde(with = "or_na")]
    pub location_rating: Option<Number>,
    #[serde(with = "or_na")]
    pub check_in_time: Option<String>,
    #[serde(with = "or_na")]
    pub check_out_time: Option<String>,
    pub pricing: HotelPricing,
    pub amenities: Vec<String>,
    pub nearby_places: Vec<NearbyPlace>,
    pub images: Vec<String>,
    #[serde(with = "or_na")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StayDates {
    #[serde(with = "or_na")]
    pub check_in: Option<String>,
    #[serde(with = "or_na")]
    pub check_out: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HotelSearchResult {
    #[serde(with = "or_na")]
    pub query: Option<String>,
    pub dates: StayDates,
    pub hotels: Vec<Hotel>,
    pub total_hotels: usize,
}

impl HotelSearchResult {
    pub fn from_document(document: &Value) -> Result<Self, ExtractError> {
        let has_properties = document.as_object().is_some_and(|m| !m.is_empty())
            && !node(document, &[Key("properties")]).is_absent();
        if !has_properties {
            if let Some(message) = get_str(document, &[Key("error")]) {
                tracing::warn!("Provider returned an error instead of hotels: {}", message);
            } else {
                tracing::warn!("No properties in provider response");
            }
            return Err(ExtractError::NoHotelData);
        }

        let hotels: Vec<Hotel> = get_array(document, &[Key("properties")])
            .iter()
            .map(parse_hotel)
            .collect();
        tracing::debug!("Normalized {} hotels", hotels.len());

        let params = Key("search_parameters");
        Ok(Self {
            query: get_str(document, &[params, Key("q")]),
            dates: StayDates {
                check_in: get_str(document, &[params, Key("check_in_date")]),
                check_out: get_str(document, &[params, Key("check_out_date")]),
            },
            total_hotels: hotels.len(),
            hotels,
        })
    }

    pub fn hotels(&self) -> impl Iterator<Item = &Hotel> {
        self.hotels.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }
}

fn parse_hotel(raw: &Value) -> Hotel {
    let coordinates = match (
        get_number(raw, &[Key("gps_coordinates"), Key("latitude")]),
        get_number(raw, &[Key("gps_coordinates"), Key("longitude")]),
    ) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };

    let providers = get_array(raw, &[Key("prices")])
        .iter()
        .take(MAX_PROVIDERS)
        .map(|price| ProviderRate {
            source: get_str(price, &[Key("source")]),
            rate: get_text(price, &[Key("rate_per_night"), Key("lowest")]),
        })
        .collect();

    let amenities = get_array(raw, &[Key("amenities")])
        .iter()
        .take(MAX_AMENITIES)
        .filter_map(|a| a.as_str().map(str::to_string))
        .collect();

    let nearby_places = get_array(raw, &[Key("nearby_places")])
        .iter()
        .take(MAX_NEARBY_PLACES)
        .map(parse_nearby_place)
        .collect();

    let images = get_array(raw, &[Key("images")])
        .iter()
        .take(MAX_IMAGES)
        .map(|img| get_str(img, &[Key("thumbnail")]).unwrap_or_else(|| NOT_AVAILABLE.to_string()))
        .collect();

    Hotel {
        name: get_str(raw, &[Key("name")]),
        kind: get_str(raw, &[Key("type")]),
        hotel_class: get_str(raw, &[Key("hotel_class")]),
        stars: get_number(raw, &[Key("extracted_hotel_class")]),
        overall_rating: get_number(raw, &[Key("overall_rating")]),
        total_reviews: get_u64(raw, &[Key("reviews")]),
        coordinates,
        location_rating: get_number(raw, &[Key("location_rating")]),
        check_in_time: get_str(raw, &[Key("check_in_time")]),
        check_out_time: get_str(raw, &[Key("check_out_time")]),
        pricing: HotelPricing {
            per_night: get_text(raw, &[Key("rate_per_night"), Key("lowest")]),
            total: get_text(raw, &[Key("total_rate"), Key("lowest")]),
            providers,
        },
        amenities,
        nearby_places,
        images,
        link: get_str(raw, &[Key("link")]),
    }
}

fn parse_nearby_place(raw: &Value) -> NearbyPlace {
    let transportation = get_array(raw, &[Key("transportations")])
        .iter()
        .take(MAX_TRANSPORTATIONS)
        .map(|t| Transportation {
            kind: get_str(t, &[Key("type")]),
            duration: get_text(t, &[Key("duration")]),
        })
        .collect();
    NearbyPlace {
        name: get_str(raw, &[Key("name")]),
        transportation,
    }
}
