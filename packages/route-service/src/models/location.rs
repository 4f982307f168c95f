use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A point on the map, longitude first.
///
/// Every public surface of this crate speaks `lng,lat`. The only place the
/// order flips is the routing provider call site and the map-facing
/// `route_to_lat_lng_array` helper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    /// Create a new coordinate from longitude and latitude
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Validate that coordinates are finite and within valid GPS ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// `[lng, lat]` pair as used in GeoJSON-style geometry arrays
    pub fn to_pair(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    pub fn from_pair(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

/// Parses the gateway's `"<lng>,<lat>"` query form.
impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split(',');
        let (Some(lng), Some(lat), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(CoordinateError::Malformed(s.to_string()));
        };

        let longitude: f64 = lng
            .trim()
            .parse()
            .map_err(|_| CoordinateError::Malformed(s.to_string()))?;
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| CoordinateError::Malformed(s.to_string()))?;

        let coordinate = Coordinate::new(longitude, latitude);
        if !coordinate.is_valid() {
            return Err(CoordinateError::OutOfRange(s.to_string()));
        }

        Ok(coordinate)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("Missing coordinates")]
    Missing,

    #[error("Malformed coordinate pair: {0:?}")]
    Malformed(String),

    #[error("Coordinate out of range: {0:?}")]
    OutOfRange(String),
}
