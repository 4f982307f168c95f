use reqwest::StatusCode;
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, warn};

use crate::models::{Coordinate, Route};
use crate::services::location::calculate_distance;

/// Routing provider response structure
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    paths: Vec<ProviderPath>,
}

#[derive(Debug, Deserialize)]
struct ProviderPath {
    distance: f64, // meters
    time: f64,     // milliseconds
    points: ProviderPoints,
}

#[derive(Debug, Deserialize)]
struct ProviderPoints {
    coordinates: Vec<[f64; 2]>, // [lng, lat]
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Routing provider request failed: {0}")]
    Request(reqwest::Error),

    #[error("Routing provider returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse routing provider response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Routing provider path has {0} points, need at least 2")]
    MalformedPath(usize),
}

/// The provider takes points as `lat,lng`; everything else here is `lng,lat`.
pub fn provider_point(coordinate: &Coordinate) -> String {
    format!("{},{}", coordinate.latitude, coordinate.longitude)
}

/// Client for a GraphHopper-compatible routing API
#[derive(Debug, Clone)]
pub struct RoutingProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    profile: String,
}

impl RoutingProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            profile: profile.into(),
        }
    }

    /// Ask the provider for the best path from `start` to `end`.
    ///
    /// `Ok(None)` means the provider answered but found no path.
    pub async fn fetch_route(
        &self,
        start: &Coordinate,
        end: &Coordinate,
    ) -> Result<Option<Route>, ProviderError> {
        info!(
            "🗺️ Requesting route ({}, {}) -> ({}, {})",
            start.longitude, start.latitude, end.longitude, end.latitude
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("point", provider_point(start).as_str()),
                ("point", provider_point(end).as_str()),
                ("profile", self.profile.as_str()),
                ("points_encoded", "false"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                // The URL carries the key, keep it out of logs and errors
                let e = e.without_url();
                let mut error_msg = format!("Routing provider request failed: {}", e);
                let mut source = e.source();
                while let Some(err) = source {
                    error_msg.push_str(&format!("\n  Caused by: {}", err));
                    source = err.source();
                }
                warn!("{}", error_msg);
                ProviderError::Request(e)
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Request(e.without_url()))?;

        if !status.is_success() {
            return Err(ProviderError::Status { status, body: text });
        }

        debug!("✅ Routing provider responded successfully");

        let data: ProviderResponse = serde_json::from_str(&text)?;
        let route = translate(data)?;

        if let Some(route) = &route {
            log_endpoint_drift(route, start, end);
        } else {
            debug!("Routing provider found no path");
        }

        Ok(route)
    }
}

/// Keep the first (best) path, drop the alternatives, convert time to seconds
fn translate(response: ProviderResponse) -> Result<Option<Route>, ProviderError> {
    let Some(path) = response.paths.into_iter().next() else {
        return Ok(None);
    };

    if path.points.coordinates.len() < 2 {
        return Err(ProviderError::MalformedPath(path.points.coordinates.len()));
    }

    Ok(Some(Route {
        distance_meters: path.distance,
        duration_seconds: path.time / 1000.0,
        geometry: path
            .points
            .coordinates
            .into_iter()
            .map(Coordinate::from_pair)
            .collect(),
    }))
}

/// Providers snap endpoints onto the road network
fn log_endpoint_drift(route: &Route, start: &Coordinate, end: &Coordinate) {
    if let (Some(origin), Some(destination)) = (route.origin(), route.destination()) {
        debug!(
            "Route snapped origin by {:.1}m and destination by {:.1}m",
            calculate_distance(start, origin),
            calculate_distance(end, destination)
        );
    }
}
