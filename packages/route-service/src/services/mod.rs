pub mod graphhopper;
pub mod location;
pub mod route_client;

pub use graphhopper::{ProviderError, RoutingProvider};
pub use route_client::{RouteClient, RouteClientError, RouteLookup};
