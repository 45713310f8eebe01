//! moped-router planning core
//!
//! Resolves user-supplied endpoints (coordinate literals or free-text
//! addresses), compiles the moped routing policy into the routing engine's
//! custom-model parameters, and normalizes engine responses into route
//! outcomes. Map rendering and all UI chrome live elsewhere; this crate is
//! the logic between the input fields and the external services.

pub mod traits;
pub mod rules;
pub mod planner;
pub mod location;
pub mod polyline;
pub mod error;
pub mod graphhopper;
pub mod nominatim;
pub mod overpass;
