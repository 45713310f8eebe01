//! Geocoder HTTP adapter (Nominatim-style `/search` and `/reverse`).
//!
//! Lookups are biased to the configured country so "Breda" resolves to the
//! Dutch city and not a namesake elsewhere.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::error::GeocodeError;
use crate::location::Coordinate;
use crate::traits::{Geocoder, LookupDetail, Place, PlaceDetails};

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Comma-separated ISO country codes for the `countrycodes` bias.
    pub country_codes: String,
    pub timeout_secs: u64,
    /// Nominatim's usage policy requires an identifying user agent.
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            country_codes: "nl".to_string(),
            timeout_secs: 10,
            user_agent: "moped-router/0.2".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }
}

impl Geocoder for NominatimClient {
    fn forward(&self, query: &str) -> Result<Option<Place>, GeocodeError> {
        debug!(query, "forward geocoding");
        let response = self
            .client
            .get(self.endpoint("search"))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", &self.config.country_codes),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status));
        }

        let results: Vec<SearchResult> = response
            .json()
            .map_err(|err| {
                if err.is_timeout() {
                    GeocodeError::Timeout
                } else {
                    GeocodeError::Malformed(err.to_string())
                }
            })?;

        match results.into_iter().next() {
            None => Ok(None),
            Some(hit) => Ok(Some(Place {
                position: Coordinate::new(parse_degrees(&hit.lat)?, parse_degrees(&hit.lon)?),
                display_name: hit.display_name,
            })),
        }
    }

    fn reverse(
        &self,
        position: Coordinate,
        detail: LookupDetail,
    ) -> Result<Option<PlaceDetails>, GeocodeError> {
        debug!(lat = position.lat, lon = position.lon, "reverse geocoding");
        let lat = position.lat.to_string();
        let lon = position.lon.to_string();
        let mut params = vec![
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("format", "json"),
            ("countrycodes", self.config.country_codes.as_str()),
        ];
        if detail.address_details {
            params.push(("addressdetails", "1"));
        }
        if detail.extra_tags {
            params.push(("extratags", "1"));
        }
        if detail.name_details {
            params.push(("namedetails", "1"));
        }

        let response = self
            .client
            .get(self.endpoint("reverse"))
            .query(&params)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status));
        }

        let result: ReverseResult = response
            .json()
            .map_err(|err| {
                if err.is_timeout() {
                    GeocodeError::Timeout
                } else {
                    GeocodeError::Malformed(err.to_string())
                }
            })?;

        // a miss comes back as 200 with an error field instead of an address
        if result.error.is_some() {
            return Ok(None);
        }
        match result.display_name {
            None => Ok(None),
            Some(display_name) => Ok(Some(PlaceDetails {
                display_name,
                address: result.address.unwrap_or_default(),
                extratags: result.extratags.unwrap_or_default(),
                namedetails: result.namedetails.unwrap_or_default(),
            })),
        }
    }
}

/// Nominatim sends coordinates as JSON strings.
fn parse_degrees(raw: &str) -> Result<f64, GeocodeError> {
    raw.parse()
        .map_err(|_| GeocodeError::Malformed(format!("bad coordinate in response: {raw:?}")))
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResult {
    display_name: Option<String>,
    // detail sections are absent unless requested, and may be null
    address: Option<BTreeMap<String, String>>,
    extratags: Option<BTreeMap<String, String>>,
    namedetails: Option<BTreeMap<String, String>>,
    error: Option<String>,
}
