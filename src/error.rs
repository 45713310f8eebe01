//! Error types for the planning core and the service clients.
//!
//! Client errors ([`GeocodeError`], [`EngineError`], [`FeatureError`]) stay
//! close to the wire; [`RouteError`] is the orchestrator's uniform failure
//! type and its `Display` output is exactly what the presentation layer
//! shows. Timeouts are kept apart from other transport failures so they can
//! be surfaced distinctly.

use thiserror::Error;

/// Failure of a forward or reverse geocoding call.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The service did not answer within the configured timeout.
    #[error("geocoding service timed out")]
    Timeout,

    /// Network-level failure reaching the service.
    #[error("geocoding service unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("geocoding service returned status {0}")]
    Status(reqwest::StatusCode),

    /// The response body did not have the expected shape.
    #[error("unexpected geocoder response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeocodeError::Timeout
        } else {
            GeocodeError::Transport(err)
        }
    }
}

/// Failure of a routing-engine call.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine answered but produced no usable path. Carries the engine's
    /// own message when it sent one.
    #[error("{}", message.as_deref().unwrap_or("engine returned no route"))]
    NoRoute { message: Option<String> },

    /// The engine did not answer within the configured timeout.
    #[error("routing engine timed out")]
    Timeout,

    /// Network-level failure reaching the engine.
    #[error("routing engine unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    /// A 2xx response whose body did not have the expected shape.
    #[error("unexpected engine response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EngineError::Timeout
        } else {
            EngineError::Transport(err)
        }
    }
}

/// Failure of a nearby-feature query.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("feature service timed out")]
    Timeout,

    #[error("feature service unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("feature service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("unexpected feature response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FeatureError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeatureError::Timeout
        } else {
            FeatureError::Transport(err)
        }
    }
}

/// Terminal failure of one route request.
///
/// Every variant's message is user-facing; no failure here is fatal to the
/// process and none is retried automatically.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A required input field was empty.
    #[error("Start and End points are required.")]
    MissingInput,

    /// The geocoder failed outright (transport, status, malformed body).
    #[error("Geocoding failed: {0}")]
    Geocoding(String),

    /// The geocoder answered but had no candidate for the input.
    #[error("No location found for: {0}")]
    NoMatch(String),

    /// The engine found no route; carries its message or the generic
    /// fallback.
    #[error("{0}")]
    Routing(String),

    /// The engine did not respond in time.
    #[error("The routing service took too long to respond.")]
    Timeout,

    /// The engine was unreachable or answered with an unusable body.
    #[error("Could not reach the routing service.")]
    Transport(String),
}
