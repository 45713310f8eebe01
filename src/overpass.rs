//! Nearby-feature lookup over an Overpass-style query endpoint.
//!
//! Backs the map inspector: given a position, fetch the roads, Dutch traffic
//! signs, moped-relevant cycleways and points of interest around it.

use serde::Deserialize;
use tracing::debug;

use crate::error::FeatureError;
use crate::location::Coordinate;
use crate::traits::{Feature, FeatureSource};

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: "https://overpass-api.de".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverpassClient {
    config: OverpassConfig,
    client: reqwest::blocking::Client,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl FeatureSource for OverpassClient {
    fn features_near(
        &self,
        position: Coordinate,
        radius_meters: u32,
    ) -> Result<Vec<Feature>, FeatureError> {
        let url = format!(
            "{}/api/interpreter",
            self.config.base_url.trim_end_matches('/')
        );
        let query = build_query(position, radius_meters, self.config.timeout_secs);
        debug!(lat = position.lat, lon = position.lon, radius_meters, "querying features");

        let response = self
            .client
            .post(&url)
            .form(&[("data", query.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeatureError::Status(status));
        }

        let body: OverpassResponse = response.json().map_err(|err| {
            if err.is_timeout() {
                FeatureError::Timeout
            } else {
                FeatureError::Malformed(err.to_string())
            }
        })?;

        Ok(body.elements)
    }
}

/// Builds the selection in the feature service's query language: everything
/// moped-relevant (roads, NL traffic signs, moped cycleways) plus nearby
/// points of interest and boundaries.
fn build_query(position: Coordinate, radius_meters: u32, timeout_secs: u64) -> String {
    let around = format!("around:{},{},{}", radius_meters, position.lat, position.lon);
    format!(
        "[out:json][timeout:{timeout_secs}];(\
         way({around})[highway];\
         way({around})[\"traffic_sign\"~\"NL:\"];\
         node({around})[\"traffic_sign\"~\"NL:\"];\
         way({around})[\"cycleway:moped\"];\
         node({around})[amenity];\
         node({around})[shop];\
         node({around})[tourism];\
         relation({around})[boundary];\
         );out tags;"
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Feature>,
}
