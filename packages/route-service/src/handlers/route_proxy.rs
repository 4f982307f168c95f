use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, error, warn};

use crate::{
    models::{CoordinateError, ErrorResponse, RouteQuery, RouteResponse},
    services::graphhopper::{ProviderError, RoutingProvider},
    AppState,
};

const MISSING_COORDINATES: &str = "Missing coordinates";
const INVALID_COORDINATES: &str = "Invalid coordinates";
const NOT_CONFIGURED: &str = "Routing service is not configured";
const FETCH_FAILED: &str = "Failed to fetch route";

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn reply(status: StatusCode, message: &str) -> ErrorReply {
    (status, Json(ErrorResponse::new(message)))
}

/// Proxy a route request to the external routing provider
///
/// `GET /route-proxy?start=<lng>,<lat>&end=<lng>,<lat>`
///
/// 1. Rejects missing or malformed coordinates with 400
/// 2. Rejects with 500 when no provider credential is configured
/// 3. Returns the provider's best path as `{routes: [..]}`, or `{routes: []}`
///    when the provider found none
///
/// Provider failures are logged and surfaced as a generic 500; provider
/// bodies and the credential never reach the caller.
pub async fn route_proxy(
    State(state): State<AppState>,
    query: Result<Query<RouteQuery>, QueryRejection>,
) -> Result<Json<RouteResponse>, ErrorReply> {
    // e.g. a repeated `start` parameter
    let Query(query) = query.map_err(|e| {
        debug!("Rejecting route request: {}", e);
        reply(StatusCode::BAD_REQUEST, INVALID_COORDINATES)
    })?;

    let (start, end) = query.coordinates().map_err(|e| {
        debug!("Rejecting route request: {}", e);
        match e {
            CoordinateError::Missing => reply(StatusCode::BAD_REQUEST, MISSING_COORDINATES),
            CoordinateError::Malformed(_) | CoordinateError::OutOfRange(_) => {
                reply(StatusCode::BAD_REQUEST, INVALID_COORDINATES)
            }
        }
    })?;

    // Checked per request; the server runs without a key
    let Some(api_key) = state.config.api_key() else {
        error!("ROUTING_API_KEY is not set; cannot fetch routes");
        return Err(reply(StatusCode::INTERNAL_SERVER_ERROR, NOT_CONFIGURED));
    };

    let provider = RoutingProvider::new(
        state.http.clone(),
        state.config.routing_base_url.as_str(),
        api_key,
        state.config.routing_profile.as_str(),
    );

    match provider.fetch_route(&start, &end).await {
        Ok(Some(route)) => Ok(Json(RouteResponse::single(&route))),
        Ok(None) => {
            warn!(
                "No route between ({}, {}) and ({}, {})",
                start.longitude, start.latitude, end.longitude, end.latitude
            );
            Ok(Json(RouteResponse::empty()))
        }
        Err(ProviderError::Status { status, body }) => {
            error!("Routing provider error: HTTP {} body: {}", status, body);
            Err(reply(StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED))
        }
        Err(e) => {
            error!("Error fetching route: {}", e);
            Err(reply(StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED))
        }
    }
}
