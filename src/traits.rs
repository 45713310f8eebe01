//! Seams between the planning core and the external services.
//!
//! The orchestrator only talks to these traits. The HTTP clients implement
//! them for production; tests substitute in-process fakes.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{EngineError, FeatureError, GeocodeError};
use crate::location::Coordinate;
use crate::polyline::Polyline;
use crate::rules::{self, Algorithm, RouteMode, RuleSet};

/// A forward-geocoder match.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub position: Coordinate,
    pub display_name: String,
}

/// A reverse-geocoded address, optionally enriched with detail sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceDetails {
    pub display_name: String,
    pub address: BTreeMap<String, String>,
    pub extratags: BTreeMap<String, String>,
    pub namedetails: BTreeMap<String, String>,
}

/// Which optional sections a reverse lookup should request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupDetail {
    pub address_details: bool,
    pub extra_tags: bool,
    pub name_details: bool,
}

impl LookupDetail {
    /// All detail sections, as used by the feature inspector.
    pub fn full() -> Self {
        Self {
            address_details: true,
            extra_tags: true,
            name_details: true,
        }
    }
}

/// Resolves free-text addresses to coordinates and back.
pub trait Geocoder {
    /// Best match for a free-text query, or `None` when nothing matches.
    fn forward(&self, query: &str) -> Result<Option<Place>, GeocodeError>;

    /// Address for a position, or `None` when the position resolves to
    /// nothing.
    fn reverse(
        &self,
        position: Coordinate,
        detail: LookupDetail,
    ) -> Result<Option<PlaceDetails>, GeocodeError>;
}

/// A fully compiled routing request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub start: Coordinate,
    pub end: Coordinate,
    pub algorithm: Algorithm,
    pub rules: RuleSet,
}

impl RouteQuery {
    /// Compiles the policy for `mode` and fixes the algorithm hint.
    pub fn new(start: Coordinate, end: Coordinate, mode: RouteMode) -> Self {
        Self {
            start,
            end,
            algorithm: mode.algorithm(),
            rules: rules::compile(mode),
        }
    }
}

/// A route as returned by the engine, already normalized to latitude-first
/// geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRoute {
    pub geometry: Polyline,
    pub distance_meters: f64,
    pub time_millis: u64,
}

/// Computes a route for a compiled query.
pub trait RouteEngine {
    fn route(&self, query: &RouteQuery) -> Result<EngineRoute, EngineError>;
}

/// One tagged element returned by the feature service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    /// Element kind: `way`, `node` or `relation`.
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// Looks up tagged map features around a position.
pub trait FeatureSource {
    fn features_near(
        &self,
        position: Coordinate,
        radius_meters: u32,
    ) -> Result<Vec<Feature>, FeatureError>;
}
