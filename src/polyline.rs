//! Route geometry as a decoded coordinate sequence.
//!
//! The routing engine hands back GeoJSON-style `[lon, lat]` pairs. The axis
//! swap to latitude-first [`Coordinate`]s happens here, at the boundary, so
//! nothing downstream ever sees longitude-first data.

use serde::{Deserialize, Serialize};

use crate::location::Coordinate;

/// A route geometry as an ordered list of positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a polyline from latitude-first points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Converts engine geometry (`[lon, lat]` per entry, possibly with a
    /// trailing elevation component) into latitude-first points. Entries with
    /// fewer than two components are dropped.
    pub fn from_lon_lat_pairs(pairs: Vec<Vec<f64>>) -> Self {
        let points = pairs
            .into_iter()
            .filter(|pair| pair.len() >= 2)
            .map(|pair| Coordinate::new(pair[1], pair[0]))
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_points() {
        let points = vec![Coordinate::new(52.3702, 4.8952), Coordinate::new(52.0907, 5.1214)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.points(), &points[..]);
    }

    #[test]
    fn test_from_lon_lat_swaps_axes() {
        let polyline =
            Polyline::from_lon_lat_pairs(vec![vec![4.8952, 52.3702], vec![5.1214, 52.0907]]);
        assert_eq!(polyline.points()[0], Coordinate::new(52.3702, 4.8952));
        assert_eq!(polyline.points()[1], Coordinate::new(52.0907, 5.1214));
    }

    #[test]
    fn test_from_lon_lat_ignores_elevation() {
        let polyline = Polyline::from_lon_lat_pairs(vec![vec![4.8952, 52.3702, 3.2]]);
        assert_eq!(polyline.points(), &[Coordinate::new(52.3702, 4.8952)]);
    }

    #[test]
    fn test_from_lon_lat_drops_short_entries() {
        let polyline = Polyline::from_lon_lat_pairs(vec![vec![4.8952], vec![5.1214, 52.0907]]);
        assert_eq!(polyline.len(), 1);
    }

    #[test]
    fn test_empty_polyline() {
        let polyline = Polyline::new(vec![]);
        assert!(polyline.is_empty());
        assert_eq!(polyline.len(), 0);
    }

    #[test]
    fn test_into_points() {
        let points = vec![Coordinate::new(52.0, 5.0)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.into_points(), points);
    }
}
