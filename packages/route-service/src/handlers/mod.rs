pub mod route_proxy;

use axum::{response::IntoResponse, Json};

pub use route_proxy::route_proxy;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "route-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
