use serde::{Deserialize, Serialize};

use super::location::Coordinate;

/// Result of a routing computation.
///
/// `geometry` runs from origin to destination in travel order and always
/// holds at least two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub geometry: Vec<Coordinate>,
}

impl Route {
    /// Two-point route straight from `origin` to `destination`.
    ///
    /// Distance and duration are unknown for a synthesized path and left at zero.
    pub fn straight_line(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            distance_meters: 0.0,
            duration_seconds: 0.0,
            geometry: vec![origin, destination],
        }
    }

    pub fn origin(&self) -> Option<&Coordinate> {
        self.geometry.first()
    }

    pub fn destination(&self) -> Option<&Coordinate> {
        self.geometry.last()
    }
}
