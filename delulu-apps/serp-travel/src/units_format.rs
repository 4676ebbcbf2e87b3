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

//! # Units Formatting
//!
//! Side-effect free rendering of durations, prices and emissions.
//! Numbers are rendered exactly as the provider sent them.

use serde_json::{Number, Value};

use crate::raw_document::{NOT_AVAILABLE, value_as_u64};

/// Format duration in hours/minutes: "1h 5m", "2h", "45m", "0m".
pub fn format_duration(minutes: Option<u64>) -> String {
    let Some(minutes) = minutes else {
        return NOT_AVAILABLE.to_string();
    };
    let hrs = minutes / 60;
    let mins = minutes % 60;
    match (hrs, mins) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Same as [`format_duration`] for a raw node; anything but a
/// non-negative number is unknown.
pub fn format_duration_value(raw: &Value) -> String {
    format_duration(value_as_u64(raw))
}

/// "$350", or the sentinel when the price is unknown.
pub fn format_price(price: Option<&Number>) -> String {
    match price {
        Some(p) => format!("${}", p),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Emissions of this flight compared with the route's typical figure.
///
/// The comparison is only rendered when all three figures are known.
pub fn format_carbon(
    this_flight: Option<&Number>,
    typical: Option<&Number>,
    difference_percent: Option<&Number>,
) -> String {
    match (this_flight, typical, difference_percent) {
        (Some(this), Some(_), Some(diff)) => {
            let sign = diff.as_f64().unwrap_or(0.0);
            if sign == 0.0 {
                format!("{}g (average)", this)
            } else {
                let direction = if sign < 0.0 { "below" } else { "above" };
                format!("{}g ({}% {} average)", this, abs_number(diff), direction)
            }
        }
        (Some(this), _, _) => format!("{}g", this),
        (None, _, _) => "No data".to_string(),
    }
}

fn abs_number(n: &Number) -> Number {
    if let Some(i) = n.as_i64() {
        return Number::from(i.unsigned_abs());
    }
    if n.is_u64() {
        return n.clone();
    }
    n.as_f64()
        .and_then(|f| Number::from_f64(f.abs()))
        .unwrap_or_else(|| n.clone())
}
