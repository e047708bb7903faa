//! Distance and fuel cost aggregation along a tour

use crate::matrix::DistanceMatrix;
use crate::models::{RouteSummary, Tour};
use crate::{Result, RouteError};

/// Sums the tour legs and converts them to fuel cost.
///
/// Cost per leg is `distance / fuel_efficiency * fuel_price`, with
/// efficiency in km per liter and price per liter.
///
/// # Errors
///
/// [`RouteError::DivisionInvalid`] when `fuel_efficiency` is not a positive
/// finite number, [`RouteError::InvalidInput`] when the tour references an
/// index outside the matrix.
pub fn aggregate(
    matrix: &DistanceMatrix,
    tour: &Tour,
    fuel_price: f64,
    fuel_efficiency: f64,
) -> Result<RouteSummary> {
    if !fuel_efficiency.is_finite() || fuel_efficiency <= 0.0 {
        return Err(RouteError::division_invalid(format!(
            "fuel efficiency must be positive, got {fuel_efficiency}"
        )));
    }
    if let Some(&bad) = tour.indices().iter().find(|&&i| i >= matrix.size()) {
        return Err(RouteError::invalid_input(format!(
            "tour index {bad} is outside {} locations",
            matrix.size()
        )));
    }

    let mut total_distance_km = 0.0;
    let mut total_cost = 0.0;
    for (from, to) in tour.legs() {
        let leg = matrix.get(from, to);
        total_distance_km += leg;
        total_cost += (leg / fuel_efficiency) * fuel_price;
    }

    Ok(RouteSummary {
        total_distance_km,
        total_cost,
    })
}
