//! Courier route planning
//!
//! Resolves delivery stop names to coordinates, builds a traffic-inflated
//! great-circle distance matrix, orders the stops with a nearest-neighbor
//! tour and estimates distance and fuel cost.

pub mod config;
pub mod cost;
pub mod error;
pub mod geocoding;
pub mod logging;
pub mod map;
pub mod matrix;
pub mod models;
pub mod planner;
pub mod tour;
pub mod web;

// Re-export core types for public API
pub use config::RouteConfig;
pub use cost::aggregate;
pub use error::RouteError;
pub use geocoding::{GeocodeStatus, GeocodingProvider, LocationResolver, OpenRouteServiceClient};
pub use map::RouteMap;
pub use matrix::DistanceMatrix;
pub use models::{Coordinate, Location, RouteSummary, Tour};
pub use planner::{RoutePlan, RoutePlanner, RouteRequest};
pub use tour::construct;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
