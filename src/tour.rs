//! Nearest-neighbor tour construction.
//!
//! Starting from a fixed stop, always drive to the closest unvisited stop,
//! then return to the start. Ties go to the smaller index.
//!
//! # Complexity
//!
//! O(n²) time and O(n) extra space.
//!
//! This is a greedy heuristic with no backtracking; the resulting tour is
//! usually noticeably longer than the best possible one.

use tracing::debug;

use crate::matrix::DistanceMatrix;
use crate::models::Tour;
use crate::{Result, RouteError};

/// Constructs a closed tour over every index of `matrix`, beginning and
/// ending at `start`.
///
/// # Errors
///
/// Returns [`RouteError::InvalidInput`] for an empty matrix or a `start`
/// outside it.
pub fn construct(matrix: &DistanceMatrix, start: usize) -> Result<Tour> {
    let n = matrix.size();
    if n == 0 {
        return Err(RouteError::invalid_input(
            "cannot build a tour over zero locations",
        ));
    }
    if start >= n {
        return Err(RouteError::invalid_input(format!(
            "start index {start} is outside {n} locations"
        )));
    }

    let mut visited = vec![false; n];
    visited[start] = true;
    let mut order = Vec::with_capacity(n + 1);
    order.push(start);
    let mut current = start;

    for _ in 1..n {
        let mut best: Option<(usize, f64)> = None;
        for (j, &d) in matrix.row(current).iter().enumerate() {
            if visited[j] {
                continue;
            }
            // strict comparison keeps the smallest index on ties
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((j, d));
            }
        }

        let Some((next, _)) = best else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order.push(start);
    debug!(?order, "Constructed nearest-neighbor tour");
    Ok(Tour::from_indices(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn line_matrix() -> DistanceMatrix {
        // Stops on a line at 0, 1, 2, 3
        let positions = [0.0f64, 1.0, 2.0, 3.0];
        let rows = positions
            .iter()
            .map(|a| positions.iter().map(|b| (a - b).abs()).collect())
            .collect();
        DistanceMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_visits_line_in_order() {
        let tour = construct(&line_matrix(), 0).unwrap();
        assert_eq!(tour.indices(), &[0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_chooses_nearest_first() {
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, 1.0],
            vec![10.0, 0.0, 9.0],
            vec![1.0, 9.0, 0.0],
        ])
        .unwrap();
        let tour = construct(&matrix, 0).unwrap();
        assert_eq!(tour.indices(), &[0, 2, 1, 0]);
    }

    #[test]
    fn test_ties_go_to_smaller_index() {
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, 4.0, 4.0],
            vec![4.0, 0.0, 2.0],
            vec![4.0, 2.0, 0.0],
        ])
        .unwrap();
        let tour = construct(&matrix, 0).unwrap();
        assert_eq!(tour.indices(), &[0, 1, 2, 0]);
    }

    #[test]
    fn test_follows_directed_distances() {
        // 0 -> 2 is cheap, 2 -> 0 is expensive; only outgoing legs matter
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, 5.0, 1.0],
            vec![5.0, 0.0, 5.0],
            vec![50.0, 5.0, 0.0],
        ])
        .unwrap();
        let tour = construct(&matrix, 0).unwrap();
        assert_eq!(tour.indices(), &[0, 2, 1, 0]);
    }

    #[test]
    fn test_single_location() {
        let matrix = DistanceMatrix::new(1);
        let tour = construct(&matrix, 0).unwrap();
        assert_eq!(tour.indices(), &[0, 0]);
        assert_eq!(tour.legs().count(), 1);
    }

    #[test]
    fn test_empty_matrix_is_invalid() {
        let result = construct(&DistanceMatrix::new(0), 0);
        assert!(matches!(result, Err(RouteError::InvalidInput { .. })));
    }

    #[rstest]
    #[case(4)]
    #[case(10)]
    fn test_start_out_of_range(#[case] start: usize) {
        let result = construct(&line_matrix(), start);
        assert!(matches!(result, Err(RouteError::InvalidInput { .. })));
    }

    #[test]
    fn test_non_zero_start() {
        let tour = construct(&line_matrix(), 2).unwrap();
        assert_eq!(tour.indices(), &[2, 1, 0, 3, 2]);
    }

    fn matrix_strategy() -> impl Strategy<Value = DistanceMatrix> {
        (1usize..15).prop_flat_map(|n| {
            prop::collection::vec(prop::collection::vec(0.0f64..1000.0, n), n).prop_map(
                |mut rows| {
                    for (i, row) in rows.iter_mut().enumerate() {
                        row[i] = 0.0;
                    }
                    DistanceMatrix::from_rows(rows).unwrap()
                },
            )
        })
    }

    proptest! {
        #[test]
        fn prop_tour_visits_every_index_once(matrix in matrix_strategy()) {
            let n = matrix.size();
            let tour = construct(&matrix, 0).unwrap();
            let indices = tour.indices();
            prop_assert_eq!(indices.len(), n + 1);
            prop_assert_eq!(indices[0], 0);
            prop_assert_eq!(indices[n], 0);

            let mut interior = indices[..n].to_vec();
            interior.sort_unstable();
            prop_assert_eq!(interior, (0..n).collect::<Vec<_>>());
        }
    }
}
