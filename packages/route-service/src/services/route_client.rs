use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::{
    libraries::{
        line_string::{generate_straight_line_route, route_to_line_string},
        resilience::{retry_with_config, with_timeout, RetryConfig, TimeoutError},
    },
    models::{Coordinate, ErrorResponse, Route, RouteQuery, RouteResponse},
};

#[derive(Debug, thiserror::Error)]
pub enum RouteClientError {
    #[error("Route gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Route gateway returned HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Failed to parse route gateway response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Route gateway returned a route with fewer than 2 points")]
    MalformedRoute,

    #[error("Route gateway did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Route request was cancelled")]
    Cancelled,
}

/// Outcome of asking the gateway for a route
#[derive(Debug)]
pub enum RouteLookup {
    Found(Route),
    /// The gateway answered, but no path exists between the points
    NoRoute,
    /// The gateway could not be reached or answered with garbage
    TransportFailure(RouteClientError),
}

impl RouteLookup {
    /// Collapse to the found route. No-route and failure both read as `None`.
    pub fn into_route(self) -> Option<Route> {
        match self {
            RouteLookup::Found(route) => Some(route),
            RouteLookup::NoRoute | RouteLookup::TransportFailure(_) => None,
        }
    }
}

/// Client for the `GET /route-proxy` gateway
#[derive(Debug, Clone)]
pub struct RouteClient {
    client: reqwest::Client,
    gateway_url: String,
}

impl RouteClient {
    /// `gateway_url` is the full endpoint, e.g. `http://localhost:3000/route-proxy`
    pub fn new(gateway_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), gateway_url)
    }

    pub fn with_client(client: reqwest::Client, gateway_url: impl Into<String>) -> Self {
        Self {
            client,
            gateway_url: gateway_url.into(),
        }
    }

    /// Fetch a route and report which of the three outcomes happened.
    ///
    /// Never fails: transport problems are logged and returned as
    /// [`RouteLookup::TransportFailure`].
    pub async fn fetch_route(
        &self,
        start_lng: f64,
        start_lat: f64,
        end_lng: f64,
        end_lat: f64,
    ) -> RouteLookup {
        let query = RouteQuery::new(
            Coordinate::new(start_lng, start_lat),
            Coordinate::new(end_lng, end_lat),
        );

        let response = match self.request(&query).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error fetching route: {}", e);
                return RouteLookup::TransportFailure(e);
            }
        };

        let Some(body) = response.routes.into_iter().next() else {
            warn!(
                "No routes found between ({}, {}) and ({}, {})",
                start_lng, start_lat, end_lng, end_lat
            );
            return RouteLookup::NoRoute;
        };

        match body.into_route() {
            Some(route) => {
                debug!(
                    "Route found: {:.0}m, {:.0}s, {} points",
                    route.distance_meters,
                    route.duration_seconds,
                    route.geometry.len()
                );
                RouteLookup::Found(route)
            }
            None => {
                error!("Error fetching route: {}", RouteClientError::MalformedRoute);
                RouteLookup::TransportFailure(RouteClientError::MalformedRoute)
            }
        }
    }

    /// Fetch a route, or `None` when there is none or the gateway failed
    pub async fn get_route(
        &self,
        start_lng: f64,
        start_lat: f64,
        end_lng: f64,
        end_lat: f64,
    ) -> Option<Route> {
        self.fetch_route(start_lng, start_lat, end_lng, end_lat)
            .await
            .into_route()
    }

    /// [`fetch_route`](Self::fetch_route) with transport failures retried
    /// under `retry`, the whole sequence bounded by `deadline`.
    ///
    /// A no-route answer is final and is not retried.
    pub async fn fetch_route_with_retry(
        &self,
        start_lng: f64,
        start_lat: f64,
        end_lng: f64,
        end_lat: f64,
        retry: RetryConfig,
        deadline: Duration,
    ) -> RouteLookup {
        let client = self.clone();
        let attempts = retry_with_config(
            move || {
                let client = client.clone();
                async move {
                    match client
                        .fetch_route(start_lng, start_lat, end_lng, end_lat)
                        .await
                    {
                        RouteLookup::TransportFailure(e) => Err(e),
                        outcome => Ok(outcome),
                    }
                }
            },
            retry,
        );

        match with_timeout(attempts, deadline).await {
            Ok(outcome) => outcome,
            Err(TimeoutError::Inner(e)) => RouteLookup::TransportFailure(e),
            Err(TimeoutError::Cancelled) => {
                RouteLookup::TransportFailure(RouteClientError::Cancelled)
            }
            Err(TimeoutError::Elapsed(elapsed)) => {
                error!("Giving up on route after {:?}", elapsed);
                RouteLookup::TransportFailure(RouteClientError::Timeout(elapsed))
            }
        }
    }

    /// Route geometry ready for storage, falling back to a straight line
    /// when the gateway has nothing usable.
    pub async fn line_string_or_straight_line(
        &self,
        start_lng: f64,
        start_lat: f64,
        end_lng: f64,
        end_lat: f64,
    ) -> String {
        match self.fetch_route(start_lng, start_lat, end_lng, end_lat).await {
            RouteLookup::Found(route) => route_to_line_string(&route),
            RouteLookup::NoRoute => {
                info!("No road route, storing straight line");
                generate_straight_line_route(start_lat, start_lng, end_lat, end_lng)
            }
            RouteLookup::TransportFailure(e) => {
                warn!("Route gateway unavailable ({}), storing straight line", e);
                generate_straight_line_route(start_lat, start_lng, end_lat, end_lng)
            }
        }
    }

    async fn request(&self, query: &RouteQuery) -> Result<RouteResponse, RouteClientError> {
        let response = self
            .client
            .get(&self.gateway_url)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(RouteClientError::Status { status, message });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
