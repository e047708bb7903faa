//! Distance matrix construction
//!
//! Builds a dense n×n great-circle distance matrix in kilometers and
//! inflates every directed leg by a random traffic factor.
//!
//! Rows for unresolved locations are computed against
//! [`Coordinate::UNRESOLVED`]. Those entries are valid numbers but do not
//! describe a real drive; callers that care check
//! [`crate::RoutePlan::unresolved`].

use haversine::{Location as HaversineLocation, Units, distance};
use rand::RngExt;
use tracing::debug;

use crate::models::Coordinate;
use crate::{Result, RouteError};

/// Great-circle distance between two coordinates in kilometers
#[must_use]
pub fn great_circle_km(from: &Coordinate, to: &Coordinate) -> f64 {
    let from_haversine = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to_haversine = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from_haversine, to_haversine, Units::Kilometers)
}

/// A dense n×n distance matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a matrix from explicit rows.
    ///
    /// Fails when the rows are not square or contain negative or
    /// non-finite entries.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(RouteError::invalid_input(format!(
                    "row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            if let Some(bad) = row.iter().find(|d| !d.is_finite() || **d < 0.0) {
                return Err(RouteError::invalid_input(format!(
                    "row {i} contains invalid distance {bad}"
                )));
            }
            data.extend(row);
        }
        Ok(Self { data, size })
    }

    /// Builds the matrix using the thread-local random generator.
    pub fn build(coords: &[Coordinate], traffic_level: f64) -> Result<Self> {
        Self::build_with_rng(coords, traffic_level, &mut rand::rng())
    }

    /// Builds the matrix drawing traffic factors from `rng`.
    ///
    /// Every off-diagonal entry is multiplied by `1 + U(0, traffic_level)`,
    /// drawn independently per direction. With `traffic_level == 0` no
    /// numbers are drawn and the result is exactly symmetric.
    pub fn build_with_rng<R: RngExt>(
        coords: &[Coordinate],
        traffic_level: f64,
        rng: &mut R,
    ) -> Result<Self> {
        validate_traffic_level(traffic_level)?;

        let n = coords.len();
        let mut matrix = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = great_circle_km(&coords[i], &coords[j]);
                matrix.set(i, j, d);
                matrix.set(j, i, d);
            }
        }

        if traffic_level > 0.0 {
            for i in 0..n {
                for j in 0..n {
                    if i != j {
                        let factor = 1.0 + rng.random_range(0.0..=traffic_level);
                        matrix.set(i, j, matrix.get(i, j) * factor);
                    }
                }
            }
        }

        debug!(size = n, traffic_level, "Built distance matrix");
        Ok(matrix)
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Outgoing distances from `from`
    #[must_use]
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Number of locations in this matrix.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    #[must_use]
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

pub(crate) fn validate_traffic_level(traffic_level: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&traffic_level) {
        return Err(RouteError::config(format!(
            "Traffic level must be between 0 and 1, got {traffic_level}"
        )));
    }
    Ok(())
}
