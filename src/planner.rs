//! Route planning pipeline
//!
//! Geocoding, distance matrix, nearest-neighbor tour and cost aggregation,
//! run in sequence for one request. Each run owns its data; the planner
//! itself holds only the provider and the fallback points.

use rand::RngExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::{
    DEFAULT_FUEL_EFFICIENCY, DEFAULT_FUEL_PRICE, DEFAULT_TRAFFIC_LEVEL, DefaultsConfig,
    FallbackConfig,
};
use crate::cost::aggregate;
use crate::geocoding::{GeocodeStatus, GeocodingProvider, LocationResolver};
use crate::map::RouteMap;
use crate::matrix::{DistanceMatrix, validate_traffic_level};
use crate::models::{Coordinate, Location, RouteSummary, Tour};
use crate::tour::construct;
use crate::{Result, RouteError};

/// Caller input for one planning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Geocoding credential, passed through to the provider
    pub credential: String,
    /// Stop names in visiting-list order; the first one is the depot
    pub locations: Vec<String>,
    #[serde(default = "default_fuel_price")]
    pub fuel_price: f64,
    #[serde(default = "default_fuel_efficiency")]
    pub fuel_efficiency: f64,
    #[serde(default = "default_traffic_level")]
    pub traffic_level: f64,
}

fn default_fuel_price() -> f64 {
    DEFAULT_FUEL_PRICE
}

fn default_fuel_efficiency() -> f64 {
    DEFAULT_FUEL_EFFICIENCY
}

fn default_traffic_level() -> f64 {
    DEFAULT_TRAFFIC_LEVEL
}

impl RouteRequest {
    /// Request with the given stops and configured defaults
    #[must_use]
    pub fn new(
        credential: impl Into<String>,
        locations: Vec<String>,
        defaults: &DefaultsConfig,
    ) -> Self {
        Self {
            credential: credential.into(),
            locations,
            fuel_price: defaults.fuel_price,
            fuel_efficiency: defaults.fuel_efficiency,
            traffic_level: defaults.traffic_level,
        }
    }

    /// One stop per line; surrounding whitespace and blank lines are dropped
    #[must_use]
    pub fn parse_locations(text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Check the request before any lookup is made
    pub fn validate(&self) -> Result<()> {
        if self.credential.trim().is_empty() {
            return Err(RouteError::config("Please enter a valid ORS API key"));
        }
        if self.locations.len() < 2 {
            return Err(RouteError::config("Please enter at least 2 locations"));
        }
        if self.locations.iter().any(|name| name.trim().is_empty()) {
            return Err(RouteError::config("Location names cannot be empty"));
        }
        if !self.fuel_price.is_finite() || self.fuel_price < 0.0 {
            return Err(RouteError::config(format!(
                "Fuel price must be a non-negative number, got {}",
                self.fuel_price
            )));
        }
        if !self.fuel_efficiency.is_finite() || self.fuel_efficiency <= 0.0 {
            return Err(RouteError::config(format!(
                "Fuel efficiency must be greater than zero, got {}",
                self.fuel_efficiency
            )));
        }
        validate_traffic_level(self.traffic_level)
    }
}

/// Result of one planning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Per-name geocoding outcome, in input order
    pub statuses: Vec<GeocodeStatus>,
    /// Stops the tour runs over; the fallback points when nothing resolved
    pub locations: Vec<Location>,
    /// Positions fed to the distance matrix, one per stop
    pub points: Vec<Coordinate>,
    pub tour: Tour,
    pub summary: RouteSummary,
    /// Whether the fallback points replaced the caller's stops
    pub fallback_used: bool,
    /// Stops routed through the placeholder coordinate
    pub unresolved: Vec<usize>,
}

impl RoutePlan {
    /// Stop names in tour order, start repeated at the end
    #[must_use]
    pub fn route_names(&self) -> Vec<&str> {
        self.tour
            .indices()
            .iter()
            .map(|&i| self.locations[i].name.as_str())
            .collect()
    }

    /// Markers and segments for drawing the route
    #[must_use]
    pub fn route_map(&self) -> RouteMap {
        RouteMap::new(&self.locations, &self.tour)
    }
}

/// Runs the planning pipeline against a geocoding provider
pub struct RoutePlanner<P> {
    provider: P,
    fallback: Vec<Location>,
}

impl<P: GeocodingProvider> RoutePlanner<P> {
    /// Planner using the default fallback points
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            fallback: FallbackConfig::default().locations(),
        }
    }

    /// Replace the points used when no stop could be geocoded
    #[must_use]
    pub fn with_fallback(mut self, fallback: Vec<Location>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Plan a route with traffic drawn from the thread-local generator
    pub async fn plan(&self, request: &RouteRequest) -> Result<RoutePlan> {
        let statuses = self.resolve(request).await?;
        let mut rng = rand::rng();
        self.assemble(request, statuses, &mut rng)
    }

    /// Plan a route with reproducible traffic factors
    pub async fn plan_seeded(&self, request: &RouteRequest, seed: u64) -> Result<RoutePlan> {
        let statuses = self.resolve(request).await?;
        let mut rng = StdRng::seed_from_u64(seed);
        self.assemble(request, statuses, &mut rng)
    }

    #[instrument(skip_all, fields(stops = request.locations.len()))]
    async fn resolve(&self, request: &RouteRequest) -> Result<Vec<GeocodeStatus>> {
        request.validate()?;
        info!("Geocoding {} locations", request.locations.len());
        Ok(
            LocationResolver::resolve_all(&self.provider, &request.locations, &request.credential)
                .await,
        )
    }

    fn assemble<R: RngExt>(
        &self,
        request: &RouteRequest,
        statuses: Vec<GeocodeStatus>,
        rng: &mut R,
    ) -> Result<RoutePlan> {
        let mut locations: Vec<Location> = statuses.iter().map(GeocodeStatus::to_location).collect();

        let fallback_used = !locations.iter().any(Location::is_resolved);
        if fallback_used {
            warn!(
                "No location could be geocoded, using {} fallback points",
                self.fallback.len()
            );
            locations = self.fallback.clone();
        }

        let unresolved: Vec<usize> = locations
            .iter()
            .enumerate()
            .filter(|(_, location)| !location.is_resolved())
            .map(|(i, _)| i)
            .collect();
        if !unresolved.is_empty() {
            warn!(
                ?unresolved,
                "Unresolved stops are routed through the placeholder coordinate"
            );
        }

        let points: Vec<Coordinate> = locations.iter().map(Location::position).collect();
        let matrix = DistanceMatrix::build_with_rng(&points, request.traffic_level, rng)?;
        let tour = construct(&matrix, 0)?;
        let summary = aggregate(&matrix, &tour, request.fuel_price, request.fuel_efficiency)?;

        info!(
            distance = %summary.format_distance(),
            cost = summary.total_cost,
            "Route optimization complete"
        );

        Ok(RoutePlan {
            statuses,
            locations,
            points,
            tour,
            summary,
            fallback_used,
            unresolved,
        })
    }
}
