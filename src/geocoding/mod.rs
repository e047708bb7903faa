//! Location Resolution Module
//!
//! Resolves delivery stop names into coordinates through a
//! [`GeocodingProvider`]. Lookups run one at a time; a failed lookup is
//! reported as a status and never stops the batch.

pub mod openrouteservice;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, warn};

use crate::Result;
use crate::models::{Coordinate, Location};

pub use openrouteservice::OpenRouteServiceClient;

/// External place-name search
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Candidate coordinates for `text`, best match first
    async fn search(&self, text: &str, credential: &str) -> Result<Vec<Coordinate>>;
}

/// Outcome of resolving one stop name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeocodeStatus {
    Found { name: String, coordinate: Coordinate },
    NotFound { name: String },
    Failed { name: String, message: String },
}

impl GeocodeStatus {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            GeocodeStatus::Found { name, .. }
            | GeocodeStatus::NotFound { name }
            | GeocodeStatus::Failed { name, .. } => name,
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            GeocodeStatus::Found { coordinate, .. } => Some(*coordinate),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, GeocodeStatus::Found { .. })
    }

    /// Location carrying the resolved coordinate, or none
    #[must_use]
    pub fn to_location(&self) -> Location {
        Location {
            name: self.name().to_string(),
            coordinate: self.coordinate(),
        }
    }
}

impl fmt::Display for GeocodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeStatus::Found { name, coordinate } => {
                write!(f, "Found {name}: ({})", coordinate.format_coordinates())
            }
            GeocodeStatus::NotFound { name } => {
                write!(f, "Could not find {name}. Added default point.")
            }
            GeocodeStatus::Failed { name, message } => {
                write!(f, "Error geocoding {name}: {message}")
            }
        }
    }
}

/// Service for resolving stop names
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve every name in order, one request per name.
    ///
    /// The result has the same length and order as `names`.
    pub async fn resolve_all<P: GeocodingProvider + ?Sized>(
        provider: &P,
        names: &[String],
        credential: &str,
    ) -> Vec<GeocodeStatus> {
        let mut statuses = Vec::with_capacity(names.len());
        for name in names {
            statuses.push(Self::resolve_name(provider, name, credential).await);
        }
        statuses
    }

    /// Resolve a single name to its first candidate
    pub async fn resolve_name<P: GeocodingProvider + ?Sized>(
        provider: &P,
        name: &str,
        credential: &str,
    ) -> GeocodeStatus {
        debug!("Geocoding location name: {}", name);

        match provider.search(name, credential).await {
            Ok(candidates) => match candidates.into_iter().next() {
                Some(coordinate) => {
                    info!("Found {}: ({})", name, coordinate.format_coordinates());
                    GeocodeStatus::Found {
                        name: name.to_string(),
                        coordinate,
                    }
                }
                None => {
                    warn!("Could not find {}", name);
                    GeocodeStatus::NotFound {
                        name: name.to_string(),
                    }
                }
            },
            Err(e) => {
                error!("Error geocoding {}: {}", name, e);
                GeocodeStatus::Failed {
                    name: name.to_string(),
                    message: e.to_string(),
                }
            }
        }
    }
}
