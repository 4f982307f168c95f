pub mod location;
pub mod requests;
pub mod route;

// Re-export commonly used types
pub use location::{Coordinate, CoordinateError};
pub use requests::{ErrorResponse, RouteBody, RouteGeometry, RouteQuery, RouteResponse};
pub use route::Route;
