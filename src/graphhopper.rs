//! Routing-engine HTTP adapter (GraphHopper-style `/route` endpoint).

use serde::Deserialize;
use tracing::debug;

use crate::error::EngineError;
use crate::polyline::Polyline;
use crate::traits::{EngineRoute, RouteEngine, RouteQuery};

#[derive(Debug, Clone)]
pub struct GraphHopperConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for GraphHopperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graphhopper.xanox.org".to_string(),
            profile: "moped".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphHopperClient {
    config: GraphHopperConfig,
    client: reqwest::blocking::Client,
}

impl GraphHopperClient {
    pub fn new(config: GraphHopperConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Full ordered parameter list for one request: endpoints and format
    /// flags first, then the compiled custom-model rules. Custom models do
    /// not work on the contraction-hierarchy graph, so `ch.disable` always
    /// rides along.
    fn query_params(&self, query: &RouteQuery) -> Vec<(String, String)> {
        let mut params = vec![
            ("point".to_string(), query.start.to_point_param()),
            ("point".to_string(), query.end.to_point_param()),
            ("profile".to_string(), self.config.profile.clone()),
            ("points_encoded".to_string(), "false".to_string()),
            ("ch.disable".to_string(), "true".to_string()),
            ("algorithm".to_string(), query.algorithm.as_str().to_string()),
        ];
        params.extend(query.rules.to_query_params());
        params
    }
}

impl RouteEngine for GraphHopperClient {
    fn route(&self, query: &RouteQuery) -> Result<EngineRoute, EngineError> {
        let url = format!("{}/route", self.config.base_url.trim_end_matches('/'));
        debug!(
            url = url.as_str(),
            algorithm = query.algorithm.as_str(),
            rules = query.rules.weights().len(),
            "requesting route"
        );

        let response = self.client.get(&url).query(&self.query_params(query)).send()?;
        let status = response.status();

        let body: EngineResponse = match response.json() {
            Ok(body) => body,
            Err(err) if status.is_success() => {
                if err.is_timeout() {
                    return Err(EngineError::Timeout);
                }
                return Err(EngineError::Malformed(err.to_string()));
            }
            // error statuses without a JSON body fall through to NoRoute
            Err(_) => EngineResponse::default(),
        };

        let EngineResponse { paths, message } = body;
        let path = match paths.into_iter().next() {
            Some(path) if status.is_success() => path,
            _ => return Err(EngineError::NoRoute { message }),
        };

        Ok(EngineRoute {
            geometry: Polyline::from_lon_lat_pairs(path.points.coordinates),
            distance_meters: path.distance,
            time_millis: path.time,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct EngineResponse {
    #[serde(default)]
    paths: Vec<EnginePath>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EnginePath {
    points: EnginePoints,
    distance: f64,
    time: u64,
}

#[derive(Debug, Deserialize)]
struct EnginePoints {
    coordinates: Vec<Vec<f64>>,
}
