//! Sliced Wasserstein distance between persistence diagrams
//!
//! Both diagrams are completed with the diagonal projections of the other
//! one so they have the same number of points. For each direction θ the
//! completed diagrams are projected on the line, sorted, and compared with
//! the L1 distance; the result is the mean over directions.
//!
//! Reference: Carrière, Cuturi, Oudot. "Sliced Wasserstein Kernel for
//! Persistence Diagrams", ICML 2017.

use crate::core::{PersistenceDiagram, Point};
use std::f64::consts::PI;

/// Directions evenly spaced in [-π/2, π/2)
fn directions(num_directions: usize) -> Vec<(f64, f64)> {
    (0..num_directions)
        .map(|k| {
            let theta = -PI / 2.0 + PI * k as f64 / num_directions as f64;
            (theta.cos(), theta.sin())
        })
        .collect()
}

/// Sorted projections of `points` on direction (x, y)
fn sorted_projections(points: &[Point], x: f64, y: f64) -> Vec<f64> {
    let mut proj: Vec<f64> = points.iter().map(|p| p.dot(x, y)).collect();
    proj.sort_by(f64::total_cmp);
    proj
}

/// Approximate sliced Wasserstein distance using `num_directions` lines
///
/// # Panics
/// Panics if `num_directions` is zero
pub fn sliced_wasserstein_distance(
    d1: &PersistenceDiagram,
    d2: &PersistenceDiagram,
    num_directions: usize,
) -> f64 {
    assert!(num_directions > 0, "Number of directions must be positive");

    let a = d1.union(&d2.diagonal_projections());
    let b = d2.union(&d1.diagonal_projections());

    let total: f64 = directions(num_directions)
        .into_iter()
        .map(|(x, y)| {
            let pa = sorted_projections(a.points(), x, y);
            let pb = sorted_projections(b.points(), x, y);
            pa.iter().zip(pb.iter()).map(|(u, v)| (u - v).abs()).sum::<f64>()
        })
        .sum();

    total / num_directions as f64
}
