use serde::{Deserialize, Serialize};

use super::location::{Coordinate, CoordinateError};
use super::route::Route;

/// Query string of `GET /route-proxy`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl RouteQuery {
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self {
            start: Some(format!("{},{}", start.longitude, start.latitude)),
            end: Some(format!("{},{}", end.longitude, end.latitude)),
        }
    }

    /// Parse both endpoints; a missing parameter wins over a malformed one.
    pub fn coordinates(&self) -> Result<(Coordinate, Coordinate), CoordinateError> {
        let (Some(start), Some(end)) = (self.start.as_deref(), self.end.as_deref()) else {
            return Err(CoordinateError::Missing);
        };

        if start.trim().is_empty() || end.trim().is_empty() {
            return Err(CoordinateError::Missing);
        }

        Ok((start.parse()?, end.parse()?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

/// One route as it travels over the gateway wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteBody {
    pub distance: f64,
    pub duration: f64, // seconds
    pub geometry: RouteGeometry,
}

/// Success body of `GET /route-proxy`. Holds zero or one route.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteResponse {
    pub routes: Vec<RouteBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl RouteResponse {
    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn single(route: &Route) -> Self {
        Self {
            routes: vec![RouteBody::from(route)],
        }
    }
}

impl From<&Route> for RouteBody {
    fn from(route: &Route) -> Self {
        Self {
            distance: route.distance_meters,
            duration: route.duration_seconds,
            geometry: RouteGeometry {
                coordinates: route.geometry.iter().map(|c| c.to_pair()).collect(),
            },
        }
    }
}

impl RouteBody {
    /// Translate back into the internal shape. `None` when the geometry
    /// cannot describe a path.
    pub fn into_route(self) -> Option<Route> {
        if self.geometry.coordinates.len() < 2 {
            return None;
        }

        Some(Route {
            distance_meters: self.distance,
            duration_seconds: self.duration,
            geometry: self
                .geometry
                .coordinates
                .into_iter()
                .map(Coordinate::from_pair)
                .collect(),
        })
    }
}
