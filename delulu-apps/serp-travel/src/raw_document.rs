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

//! # Raw Document Access
//!
//! Side-effect free lookups into provider JSON documents.
//! Every accessor is total: missing keys, wrong shapes and out-of-range
//! indices resolve to `None` (or an empty slice) instead of an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Placeholder rendered in place of any unknown scalar.
pub const NOT_AVAILABLE: &str = "N/A";

/// The one hard failure of extraction: the provider sent nothing to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("No flight data found or invalid response format")]
    NoFlightData,
    #[error("No hotel data found or invalid response format")]
    NoHotelData,
}

impl Serialize for ExtractError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One step of a lookup path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Shape of the node found at the end of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    Mapping(&'a Map<String, Value>),
    Sequence(&'a [Value]),
    Scalar(&'a Value),
    Absent,
}

impl<'a> Node<'a> {
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Node::Absent,
            Some(Value::Object(map)) => Node::Mapping(map),
            Some(Value::Array(items)) => Node::Sequence(items),
            Some(scalar) => Node::Scalar(scalar),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Node::Absent)
    }
}

/// Walks `path` from `document`. JSON `null` counts as absent.
pub fn lookup<'a>(document: &'a Value, path: &[PathSegment<'_>]) -> Option<&'a Value> {
    let mut current = document;
    for segment in path {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(map)) => map.get(*key)?,
            (PathSegment::Index(idx), Value::Array(items)) => items.get(*idx)?,
            _ => return None,
        };
    }
    (!current.is_null()).then_some(current)
}

/// `lookup` with a fallback returned the moment the path breaks.
pub fn get<'a>(document: &'a Value, path: &[PathSegment<'_>], default: &'a Value) -> &'a Value {
    lookup(document, path).unwrap_or(default)
}

pub fn node<'a>(document: &'a Value, path: &[PathSegment<'_>]) -> Node<'a> {
    Node::of(lookup(document, path))
}

pub fn get_str(document: &Value, path: &[PathSegment<'_>]) -> Option<String> {
    lookup(document, path)?.as_str().map(str::to_string)
}

/// Strings as-is, numbers and booleans through their JSON rendering.
pub fn get_text(document: &Value, path: &[PathSegment<'_>]) -> Option<String> {
    match lookup(document, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn get_number(document: &Value, path: &[PathSegment<'_>]) -> Option<Number> {
    lookup(document, path)?.as_number().cloned()
}

/// Whole non-negative quantities such as minutes or review counts.
/// Fractional values are truncated; negative ones are unknown.
pub fn get_u64(document: &Value, path: &[PathSegment<'_>]) -> Option<u64> {
    lookup(document, path).and_then(value_as_u64)
}

pub fn get_bool(document: &Value, path: &[PathSegment<'_>]) -> Option<bool> {
    lookup(document, path)?.as_bool()
}

/// Empty slice unless the node is a sequence.
pub fn get_array<'a>(document: &'a Value, path: &[PathSegment<'_>]) -> &'a [Value] {
    match node(document, path) {
        Node::Sequence(items) => items,
        _ => &[],
    }
}

pub(crate) fn value_as_u64(value: &Value) -> Option<u64> {
    let number = value.as_number()?;
    if let Some(n) = number.as_u64() {
        return Some(n);
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 => Some(f.trunc() as u64),
        _ => None,
    }
}

/// Serde adapter writing `None` as [`NOT_AVAILABLE`] instead of `null`.
///
/// Use as `#[serde(with = "crate::raw_document::or_na")]` on `Option<T>` fields.
pub mod or_na {
    use super::*;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_str(NOT_AVAILABLE),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::String(s) if s == NOT_AVAILABLE => Ok(None),
            other => T::deserialize(other)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
