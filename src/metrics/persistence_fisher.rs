//! Persistence Fisher distance between persistence diagrams
//!
//! Each diagram, completed with the diagonal projections of the other, is
//! smoothed into a density by Gaussian convolution. The densities are
//! evaluated on the union of all points and projections, normalised, and
//! compared with the Fisher information metric
//! d(ρ₁, ρ₂) = arccos(Σ √(ρ₁ ρ₂)).
//!
//! Reference: Le, Yamada. "Persistence Fisher Kernel: A Riemannian Manifold
//! Kernel for Persistence Diagrams", NeurIPS 2018.

use crate::core::{PersistenceDiagram, Point};
use crate::kernel::weighted_gaussian::gaussian_normalization;
use crate::kernel::FeatureMap;
use crate::utils::{dot, pairwise_squared_distances};

/// Gaussian-smoothed density of `centers`, evaluated at every point of `at`
fn smoothed_density(at: &[Point], centers: &[Point], bandwidth: f64) -> Vec<f64> {
    let norm = gaussian_normalization(bandwidth);
    let two_sigma_sq = 2.0 * bandwidth * bandwidth;
    pairwise_squared_distances(at, centers)
        .iter()
        .map(|row| row.iter().map(|&sq| norm * (-sq / two_sigma_sq).exp()).sum())
        .collect()
}

/// Density approximated through a feature map: ⟨φ(z), Σᵤ φ(u)⟩
fn approximate_density(
    at: &[Point],
    centers: &[Point],
    bandwidth: f64,
    feature_map: &dyn FeatureMap,
) -> Vec<f64> {
    let norm = gaussian_normalization(bandwidth);
    let dim = feature_map.dim();

    let center_rows = feature_map.features(centers);
    assert_eq!(center_rows.len(), centers.len(), "Feature map must return one row per point");
    let mut mean_embedding = vec![0.0; dim];
    for row in center_rows {
        assert_eq!(row.len(), dim, "Feature rows must have length dim()");
        for (acc, f) in mean_embedding.iter_mut().zip(row) {
            *acc += f;
        }
    }

    let at_rows = feature_map.features(at);
    assert_eq!(at_rows.len(), at.len(), "Feature map must return one row per point");
    at_rows
        .iter()
        .map(|row| {
            assert_eq!(row.len(), dim, "Feature rows must have length dim()");
            norm * dot(row, &mean_embedding)
        })
        .collect()
}

/// Sum used to normalise a density; all-zero densities stay unnormalised
fn normalizer(v: &[f64]) -> f64 {
    let sum: f64 = v.iter().sum();
    if sum != 0.0 {
        sum.abs()
    } else {
        1.0
    }
}

/// Persistence Fisher distance with smoothing bandwidth σ
///
/// With a feature map the densities are approximated in linear time; the
/// approximation can produce small negative values, which are taken in
/// absolute value before the square root.
///
/// # Panics
/// Panics if the feature map does not return one row of length `dim()`
/// per point.
pub fn persistence_fisher_distance(
    d1: &PersistenceDiagram,
    d2: &PersistenceDiagram,
    bandwidth: f64,
    approximation: Option<&dyn FeatureMap>,
) -> f64 {
    let proj1 = d1.diagonal_projections();
    let proj2 = d2.diagonal_projections();

    let u = d1.union(&proj2);
    let v = d2.union(&proj1);
    let z = d1.union(&proj1).union(d2).union(&proj2);

    let (rho_u, rho_v) = match approximation {
        Some(feature_map) => (
            approximate_density(z.points(), u.points(), bandwidth, feature_map),
            approximate_density(z.points(), v.points(), bandwidth, feature_map),
        ),
        None => (
            smoothed_density(z.points(), u.points(), bandwidth),
            smoothed_density(z.points(), v.points(), bandwidth),
        ),
    };

    // Σ √(ρ_u ρ_v) over the normalised densities, dividing once at the end
    // so identical diagrams give an affinity of exactly 1
    let raw: f64 = rho_u
        .iter()
        .zip(rho_v.iter())
        .map(|(a, b)| (a.abs() * b.abs()).sqrt())
        .sum();
    let affinity = raw / (normalizer(&rho_u) * normalizer(&rho_v)).sqrt();

    affinity.min(1.0).acos()
}
