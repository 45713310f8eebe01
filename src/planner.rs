//! Route request orchestration.
//!
//! One call resolves both endpoints (geocoding free-text input as needed),
//! compiles the policy for the requested mode, asks the engine, and
//! normalizes the outcome into a [`PlannedRoute`] or a [`RouteError`] whose
//! message is ready for display. [`PlannerSession`] adds cancel-and-replace
//! semantics on top for interactive use.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::error::{EngineError, RouteError};
use crate::location::{Coordinate, LocationInput, classify};
use crate::polyline::Polyline;
use crate::rules::RouteMode;
use crate::traits::{Geocoder, RouteEngine, RouteQuery};

const NO_ROUTE_FALLBACK: &str = "Could not find a route.";

/// A computed route plus its headline metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRoute {
    pub geometry: Polyline,
    pub distance_meters: f64,
    pub duration_millis: u64,
}

impl PlannedRoute {
    /// Whole minutes, for display next to the route.
    pub fn duration_minutes(&self) -> u64 {
        ((self.duration_millis as f64) / 60_000.0).round() as u64
    }

    /// Kilometres with two decimals, for display next to the route.
    pub fn distance_km_display(&self) -> String {
        format!("{:.2}", self.distance_meters / 1000.0)
    }
}

/// Outcome of one route request.
pub type RouteResult = Result<PlannedRoute, RouteError>;

/// Resolves both endpoints, compiles the policy for `mode`, and requests the
/// route.
///
/// The two endpoint resolutions are independent idempotent reads and run
/// concurrently. Every failure maps to a [`RouteError`]; nothing here
/// panics on bad input or a misbehaving service.
pub fn request_route<G, E>(
    geocoder: &G,
    engine: &E,
    start_input: &str,
    end_input: &str,
    mode: RouteMode,
) -> RouteResult
where
    G: Geocoder + Sync,
    E: RouteEngine,
{
    let start_input = start_input.trim();
    let end_input = end_input.trim();
    if start_input.is_empty() || end_input.is_empty() {
        return Err(RouteError::MissingInput);
    }

    let (start, end) = rayon::join(
        || resolve(geocoder, start_input),
        || resolve(geocoder, end_input),
    );
    let query = RouteQuery::new(start?, end?, mode);
    debug!(
        start = query.start.to_point_param().as_str(),
        end = query.end.to_point_param().as_str(),
        ?mode,
        "endpoints resolved"
    );

    let route = engine.route(&query).map_err(|err| match err {
        EngineError::NoRoute { message } => {
            RouteError::Routing(message.unwrap_or_else(|| NO_ROUTE_FALLBACK.to_string()))
        }
        EngineError::Timeout => RouteError::Timeout,
        EngineError::Transport(err) => RouteError::Transport(err.to_string()),
        EngineError::Malformed(message) => RouteError::Transport(message),
    })?;

    info!(
        distance_meters = route.distance_meters,
        time_millis = route.time_millis,
        points = route.geometry.len(),
        "route found"
    );
    Ok(PlannedRoute {
        geometry: route.geometry,
        distance_meters: route.distance_meters,
        duration_millis: route.time_millis,
    })
}

fn resolve<G: Geocoder>(geocoder: &G, input: &str) -> Result<Coordinate, RouteError> {
    match classify(input) {
        LocationInput::Point(point) => Ok(point),
        LocationInput::Address(address) => match geocoder.forward(&address) {
            Ok(Some(place)) => {
                debug!(
                    address = address.as_str(),
                    resolved = place.display_name.as_str(),
                    "geocoded"
                );
                Ok(place.position)
            }
            Ok(None) => Err(RouteError::NoMatch(address)),
            Err(err) => Err(RouteError::Geocoding(err.to_string())),
        },
    }
}

/// Serializes route requests for one interactive session.
///
/// Starting a request supersedes any still in flight: when a superseded
/// request finishes, its result is discarded (`None`) instead of surfaced,
/// so a stale route can never overwrite a newer one.
pub struct PlannerSession<G, E> {
    geocoder: G,
    engine: E,
    generation: AtomicU64,
}

impl<G, E> PlannerSession<G, E>
where
    G: Geocoder + Sync,
    E: RouteEngine,
{
    pub fn new(geocoder: G, engine: E) -> Self {
        Self {
            geocoder,
            engine,
            generation: AtomicU64::new(0),
        }
    }

    /// Requests a route; returns `None` when a newer request started while
    /// this one was in flight.
    pub fn request_route(
        &self,
        start_input: &str,
        end_input: &str,
        mode: RouteMode,
    ) -> Option<RouteResult> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = request_route(&self.geocoder, &self.engine, start_input, end_input, mode);
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding superseded route result");
            return None;
        }
        Some(result)
    }
}
