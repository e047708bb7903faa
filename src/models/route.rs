//! Tour and route summary models

use serde::{Deserialize, Serialize};

/// Closed visiting order over location indices.
///
/// The first and last entries are the start index; every other index
/// appears exactly once in between.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Tour(Vec<usize>);

impl Tour {
    pub(crate) fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of entries, including the closing return to start
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn start(&self) -> Option<usize> {
        self.0.first().copied()
    }

    /// Consecutive `(from, to)` pairs along the tour
    pub fn legs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Total distance and fuel cost of a tour
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    pub total_distance_km: f64,
    pub total_cost: f64,
}

impl RouteSummary {
    /// Format distance with unit
    #[must_use]
    pub fn format_distance(&self) -> String {
        format!("{:.2} km", self.total_distance_km)
    }

    /// Format cost with currency symbol
    #[must_use]
    pub fn format_cost(&self, currency: &str) -> String {
        format!("{currency}{:.2}", self.total_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tour_legs() {
        let tour = Tour::from_indices(vec![0, 2, 1, 0]);
        let legs: Vec<_> = tour.legs().collect();
        assert_eq!(legs, vec![(0, 2), (2, 1), (1, 0)]);
        assert_eq!(tour.start(), Some(0));
    }

    #[test]
    fn test_tour_serializes_as_plain_list() {
        let tour = Tour::from_indices(vec![0, 1, 0]);
        assert_eq!(serde_json::to_string(&tour).unwrap(), "[0,1,0]");
    }

    #[test]
    fn test_summary_formatting() {
        let summary = RouteSummary {
            total_distance_km: 17.456,
            total_cost: 151.2849,
        };
        assert_eq!(summary.format_distance(), "17.46 km");
        assert_eq!(summary.format_cost("₹"), "₹151.28");
    }
}
